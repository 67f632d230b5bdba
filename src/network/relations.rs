use std::collections::{BTreeMap, BTreeSet};

/// Adjacency sets: citing paper id -> ids it references
#[derive(Debug, Default, Clone)]
pub struct RelationGraph {
    edges: BTreeMap<String, BTreeSet<String>>,
    count: usize,
}

impl RelationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record "`citing` references `cited`"; false if already known
    pub fn add(&mut self, citing: &str, cited: &str) -> bool {
        let added = self
            .edges
            .entry(citing.to_string())
            .or_default()
            .insert(cited.to_string());
        if added {
            self.count += 1;
        }
        added
    }

    pub fn contains(&self, citing: &str, cited: &str) -> bool {
        self.edges
            .get(citing)
            .is_some_and(|refs| refs.contains(cited))
    }

    pub fn references(&self, citing: &str) -> Option<&BTreeSet<String>> {
        self.edges.get(citing)
    }

    /// All edges ordered by citing id, then cited id
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.edges
            .iter()
            .flat_map(|(citing, refs)| refs.iter().map(move |cited| (citing.as_str(), cited.as_str())))
    }

    /// Number of distinct edges
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
