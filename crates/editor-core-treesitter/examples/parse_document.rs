use editor_core::{TextBuffer, TextModel};
use editor_core_lang::GrammarRegistry;
use editor_core_treesitter::{
    BundledGrammarLoader, MemoryGrammarReader, TreeSitterParserConfig, TreeSitterParserService,
};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().init();

    let registry = GrammarRegistry::new().with_grammar("rust", "tree-sitter-rust");
    let config = TreeSitterParserConfig::new(registry).with_grammar_root("grammars");
    let reader = MemoryGrammarReader::new().with_file(
        "grammars/tree-sitter-rust/tree-sitter-rust.wasm",
        b"\0asm".to_vec(),
    );
    let loader = BundledGrammarLoader::new()
        .with_language("tree-sitter-rust", tree_sitter_rust::LANGUAGE.into());
    let service = TreeSitterParserService::new(config, Arc::new(reader), Arc::new(loader));

    let model = Arc::new(TextModel::new(
        r#"
// comment
fn add(a: i32, b: i32) -> i32 {
    a + b
}
"#,
        "rust",
    ));
    service.register_document(model.clone()).await;

    model
        .insert(model.len(), "\nfn main() { println!(\"{}\", add(1, 2)); }\n")
        .expect("append main");

    let tree = service.get_tree(model.id()).expect("rust is registered");
    println!("{}", tree.root_node().to_sexp());
}
