use std::collections::{HashMap, HashSet};

use crate::common::title_words;

/// Normalized title word -> number of distinct papers using it
#[derive(Debug, Default, Clone)]
pub struct WordIndex {
    counts: HashMap<String, u64>,
}

impl WordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a newly catalogued paper's title; each word once per paper
    pub fn add_title(&mut self, title: &str) {
        let distinct: HashSet<String> = title_words(title).into_iter().collect();
        for word in distinct {
            *self.counts.entry(word).or_insert(0) += 1;
        }
    }

    pub fn count(&self, word: &str) -> u64 {
        self.counts.get(word).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
