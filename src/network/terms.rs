use std::collections::HashMap;

pub type TermCounts = HashMap<String, u64>;

/// Paper id -> text-mined term counts, filled at most once per paper
#[derive(Debug, Default, Clone)]
pub struct TermIndex {
    papers: HashMap<String, TermCounts>,
}

impl TermIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.papers.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&TermCounts> {
        self.papers.get(id)
    }

    /// Store terms for `id` unless it is already indexed
    pub fn insert(&mut self, id: &str, terms: TermCounts) -> bool {
        if self.papers.contains_key(id) {
            return false;
        }
        self.papers.insert(id.to_string(), terms);
        true
    }

    pub fn len(&self) -> usize {
        self.papers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.papers.is_empty()
    }
}
