use std::collections::HashSet;

/// Papers awaiting exploration, most cited first
#[derive(Debug, Default, Clone)]
pub struct Frontier {
    entries: Vec<(String, u64)>,
    queued: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a paper; false if it is already waiting
    pub fn push(&mut self, id: &str, cited_count: u64) -> bool {
        if !self.queued.insert(id.to_string()) {
            return false;
        }
        self.entries.push((id.to_string(), cited_count));
        true
    }

    /// Citing count descending, identifier ascending on ties
    pub fn sort(&mut self) {
        self.entries
            .sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    }

    /// Remove and return up to `n` papers from the front
    pub fn take_front(&mut self, n: usize) -> Vec<String> {
        let n = n.min(self.entries.len());
        let taken: Vec<String> = self.entries.drain(..n).map(|(id, _)| id).collect();
        for id in &taken {
            self.queued.remove(id);
        }
        taken
    }

    /// Drop every queued paper for which `keep` is false
    pub fn retain<F: FnMut(&str) -> bool>(&mut self, mut keep: F) {
        let queued = &mut self.queued;
        self.entries.retain(|(id, _)| {
            let kept = keep(id);
            if !kept {
                queued.remove(id);
            }
            kept
        });
    }

    pub fn contains(&self, id: &str) -> bool {
        self.queued.contains(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(id, _)| id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_by_citing_count() {
        let mut frontier = Frontier::new();
        frontier.push("low", 1);
        frontier.push("high", 50);
        frontier.push("mid-b", 10);
        frontier.push("mid-a", 10);
        frontier.sort();

        assert_eq!(frontier.take_front(3), vec!["high", "mid-a", "mid-b"]);
        assert_eq!(frontier.take_front(10), vec!["low"]);
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_push_deduplicates_until_taken() {
        let mut frontier = Frontier::new();
        assert!(frontier.push("a", 1));
        assert!(!frontier.push("a", 7));
        assert_eq!(frontier.len(), 1);

        frontier.take_front(1);
        assert!(frontier.push("a", 1));
    }

    #[test]
    fn test_retain_updates_membership() {
        let mut frontier = Frontier::new();
        frontier.push("a", 1);
        frontier.push("b", 2);
        frontier.retain(|id| id != "a");

        assert!(!frontier.contains("a"));
        assert_eq!(frontier.ids().collect::<Vec<_>>(), vec!["b"]);
    }
}
