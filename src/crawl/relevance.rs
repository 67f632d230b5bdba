use crate::network::{CrawlState, TermCounts};

/// Number of terms both papers mention; counts are ignored
pub fn relevance(initial: Option<&TermCounts>, other: Option<&TermCounts>) -> usize {
    match (initial, other) {
        (Some(initial), Some(other)) => other.keys().filter(|term| initial.contains_key(*term)).count(),
        _ => 0,
    }
}

/// Every catalogued paper except `initial_id`, most relevant first.
///
/// Equal scores are ordered by id so that repeated runs pick the same
/// candidates.
pub fn rank_by_relevance(state: &CrawlState, initial_id: &str) -> Vec<(String, usize)> {
    let initial = state.terms.get(initial_id);
    let mut ranked: Vec<(String, usize)> = state
        .catalog
        .iter()
        .filter(|paper| paper.id != initial_id)
        .map(|paper| (paper.id.clone(), relevance(initial, state.terms.get(&paper.id))))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

pub fn average_relevance(ranked: &[(String, usize)]) -> f64 {
    if ranked.is_empty() {
        return 0.0;
    }
    ranked.iter().map(|(_, score)| *score as f64).sum::<f64>() / ranked.len() as f64
}
