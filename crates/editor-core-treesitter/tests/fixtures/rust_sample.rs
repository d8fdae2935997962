// Sample used by the parser service tests.
use std::collections::HashMap;

/// A small word counter.
pub struct Counter {
    counts: HashMap<String, usize>,
}

impl Counter {
    pub fn new() -> Self {
        Self {
            counts: HashMap::new(),
        }
    }

    pub fn add(&mut self, word: &str) -> usize {
        let count = self.counts.entry(word.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

fn main() {
    let mut counter = Counter::new();
    for word in "the quick brown fox jumps over the lazy dog".split(' ') {
        counter.add(word);
    }
    println!("{} words, \"{}\" twice", counter.total(), "the");
}
