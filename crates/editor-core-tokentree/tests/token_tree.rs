use editor_core::{Position, TextModel, TextRange};
use editor_core_lang::BracketConfig;
use editor_core_tokentree::{
    BracketKind, Node, RawToken, RegexLineTokenizer, Token, TokenScanner, build,
    build_from_buffer,
};
use pretty_assertions::assert_eq;

fn token(line: usize, start: usize, end: usize, text: &str) -> Token {
    let (token_type, bracket) = match text {
        "(" => ("c;(;)", BracketKind::Open),
        ")" => ("c;(;)", BracketKind::Close),
        "[" => ("c;[;]", BracketKind::Open),
        "]" => ("c;[;]", BracketKind::Close),
        "{" => ("c;{;}", BracketKind::Open),
        "}" => ("c;{;}", BracketKind::Close),
        _ => ("identifier", BracketKind::None),
    };
    Token::new(TextRange::on_line(line, start, end), token_type, bracket)
}

fn range(start: (usize, usize), end: (usize, usize)) -> TextRange {
    TextRange::new(Position::new(start.0, start.1), Position::new(end.0, end.1))
}

#[test]
fn test_matched_pair_becomes_root_block() {
    let tree = build(vec![
        token(0, 0, 1, "("),
        token(0, 2, 3, "x"),
        token(0, 4, 5, ")"),
    ]);

    let Node::Block {
        open,
        elements,
        close,
    } = tree.node(tree.root()).clone()
    else {
        panic!("expected a block root, got {:?}", tree.node(tree.root()));
    };
    assert_eq!(tree.range(open), Some(TextRange::on_line(0, 0, 1)));
    assert_eq!(tree.range(close), Some(TextRange::on_line(0, 4, 5)));
    assert_eq!(tree.children(elements).len(), 1);
    assert_eq!(tree.range(tree.root()), Some(TextRange::on_line(0, 0, 5)));
    assert_eq!(tree.len(), 5);
    assert_eq!(tree.parent(elements), Some(tree.root()));
}

#[test]
fn test_unclosed_bracket_degrades_to_flat_list() {
    let tree = build(vec![token(0, 0, 1, "("), token(0, 2, 3, "x")]);

    let children = tree.children(tree.root()).to_vec();
    assert_eq!(children.len(), 2);
    assert!(
        children
            .iter()
            .all(|id| matches!(tree.node(*id), Node::Token { .. }))
    );
    assert_eq!(tree.range(children[0]), Some(TextRange::on_line(0, 0, 1)));
}

#[test]
fn test_mismatched_close_is_not_paired() {
    let tree = build(vec![
        token(0, 0, 1, "("),
        token(0, 2, 3, "x"),
        token(0, 4, 5, "]"),
    ]);

    let children = tree.children(tree.root()).to_vec();
    assert_eq!(children.len(), 3);
    assert!(
        children
            .iter()
            .all(|id| matches!(tree.node(*id), Node::Token { .. }))
    );
    assert_eq!(tree.range(tree.root()), Some(TextRange::on_line(0, 0, 5)));
}

#[test]
fn test_block_spanning_lines() {
    // f {
    //   a
    // }
    let tree = build(vec![
        token(0, 0, 1, "f"),
        token(0, 2, 3, "{"),
        token(1, 2, 3, "a"),
        token(2, 0, 1, "}"),
    ]);

    let children = tree.children(tree.root()).to_vec();
    assert_eq!(children.len(), 2);
    assert!(matches!(tree.node(children[1]), Node::Block { .. }));
    assert_eq!(tree.range(children[1]), Some(range((0, 2), (2, 1))));

    let a = tree.find(Position::new(1, 2));
    assert_eq!(tree.range(a), Some(TextRange::on_line(1, 2, 3)));

    // Inside the block but on no token.
    assert_eq!(tree.find(Position::new(1, 0)), children[1]);
}

#[test]
fn test_find_outside_every_node_returns_root() {
    let tree = build(vec![token(0, 0, 1, "f"), token(0, 2, 3, "g")]);

    assert!(!tree.contains(Position::new(4, 0)));
    assert_eq!(tree.find(Position::new(4, 0)), tree.root());
    assert!(tree.selection_ranges(Position::new(4, 0)).is_empty());
}

#[test]
fn test_empty_block_elements_are_skipped_by_find() {
    // {
    //   }
    let tree = build(vec![token(0, 0, 1, "{"), token(1, 2, 3, "}")]);

    let Node::Block { elements, .. } = tree.node(tree.root()).clone() else {
        panic!("expected a block root");
    };
    assert!(tree.children(elements).is_empty());
    assert_eq!(tree.range(elements), tree.range(tree.root()));

    assert_eq!(tree.find(Position::new(0, 3)), tree.root());
    assert_eq!(
        tree.selection_ranges(Position::new(0, 3)),
        vec![range((0, 0), (1, 3))]
    );
}

#[test]
fn test_multi_line_token_belongs_to_its_start_line() {
    let brackets = BracketConfig::c_like("c");
    let raw = vec![
        RawToken::on_line(0, 0, "(", "delimiter"),
        RawToken {
            range: range((0, 2), (1, 3)),
            text: "/* (\n */".to_string(),
            token_type: "comment.block".to_string(),
        },
        RawToken::on_line(1, 4, "x", "identifier"),
        RawToken::on_line(1, 6, ")", "delimiter"),
    ];
    let tree = build(TokenScanner::new(raw.into_iter(), &brackets));

    let Node::Block { elements, .. } = tree.node(tree.root()).clone() else {
        panic!("expected a block root, got {:?}", tree.node(tree.root()));
    };
    assert_eq!(tree.children(elements).len(), 2);

    assert_eq!(
        tree.selection_ranges(Position::new(1, 4)),
        vec![
            TextRange::on_line(1, 4, 5),
            range((0, 2), (1, 5)),
            range((0, 0), (1, 7)),
        ]
    );
}

#[test]
fn test_empty_input_builds_empty_tree() {
    let tree = build(Vec::new());

    assert!(tree.is_empty());
    assert_eq!(tree.range(tree.root()), None);
    assert_eq!(tree.find(Position::new(0, 0)), tree.root());
    assert!(tree.selection_ranges(Position::new(0, 0)).is_empty());
}

#[test]
fn test_brackets_inside_strings_do_not_nest() {
    let model = TextModel::new("s = \"(\";\n", "c");
    let tokenizer = RegexLineTokenizer::c_like_default().unwrap();
    let tree = build_from_buffer(&model, &tokenizer, &BracketConfig::c_like("c"));

    let children = tree.children(tree.root());
    assert_eq!(children.len(), 4);
    assert!(
        children
            .iter()
            .all(|id| matches!(tree.node(*id), Node::Token { .. }))
    );
}

#[test]
fn test_selection_ranges_from_buffer() {
    let model = TextModel::new("fn main() {\n    call(1, [2]);\n}\n", "c");
    let tokenizer = RegexLineTokenizer::c_like_default().unwrap();
    let tree = build_from_buffer(&model, &tokenizer, &BracketConfig::c_like("c"));

    assert_eq!(tree.children(tree.root()).len(), 4);
    assert_eq!(
        tree.selection_ranges(Position::new(1, 14)),
        vec![
            TextRange::on_line(1, 13, 14),
            TextRange::on_line(1, 12, 15),
            TextRange::on_line(1, 9, 15),
            TextRange::on_line(1, 8, 16),
            TextRange::on_line(1, 4, 17),
            range((0, 10), (2, 1)),
            range((0, 0), (2, 1)),
        ]
    );
}

#[test]
fn test_open_bracket_wins_at_shared_boundary() {
    let model = TextModel::new("f([2])\n", "c");
    let tokenizer = RegexLineTokenizer::c_like_default().unwrap();
    let tree = build_from_buffer(&model, &tokenizer, &BracketConfig::c_like("c"));

    // Column 3 is both the end of `[` and the start of `2`.
    let found = tree.find(Position::new(0, 3));
    assert_eq!(tree.range(found), Some(TextRange::on_line(0, 2, 3)));
}
