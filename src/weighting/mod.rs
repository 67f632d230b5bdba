//! Relation weights and the final network artifact.
//!
//! A relation `p1 -> p2` scores the sum of three signals:
//! - shared title words, each pair scaled by `|catalog| / wordFrequency`
//! - shared mined terms, each adding `terms[p2] / terms[p1]` (direction matters)
//! - shared author names, each pair adding a fixed weight

pub mod artifact;

pub use artifact::*;

use crate::common::{title_words, Paper};
use crate::network::{CrawlState, TermCounts, WordIndex};

/// Inverse-frequency score over every equal pair of title words
pub fn title_overlap(words1: &[String], words2: &[String], index: &WordIndex, catalog_size: usize) -> f64 {
    let mut weight = 0.0;
    for w1 in words1 {
        for w2 in words2 {
            if w1 != w2 {
                continue;
            }
            let frequency = index.count(w1);
            if frequency > 0 {
                weight += 1.0 / (frequency as f64 / catalog_size as f64);
            }
        }
    }
    weight
}

/// Sum of `cited[t] / citing[t]` over terms both papers mention
pub fn term_overlap(citing: &TermCounts, cited: &TermCounts) -> f64 {
    let mut shared: Vec<(&String, u64)> = citing
        .iter()
        .filter(|(term, _)| cited.contains_key(*term))
        .map(|(term, count)| (term, *count))
        .collect();
    shared.sort();

    shared
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(term, count)| cited[term] as f64 / count as f64)
        .sum()
}

/// `same_author_weight` for every equal pair of author strings
pub fn shared_authors(authors1: &[String], authors2: &[String], same_author_weight: f64) -> f64 {
    let pairs = authors1
        .iter()
        .map(|a1| authors2.iter().filter(|a2| *a2 == a1).count())
        .sum::<usize>();
    pairs as f64 * same_author_weight
}

/// Weight of `citing -> cited`; missing metadata contributes nothing
pub fn relation_weight(state: &CrawlState, citing: &str, cited: &str, same_author_weight: f64) -> f64 {
    let p1 = state.catalog.get(citing);
    let p2 = state.catalog.get(cited);

    let mut weight = 0.0;
    if let (Some(p1), Some(p2)) = (p1, p2) {
        weight += title_overlap(
            &title_words(&p1.title),
            &title_words(&p2.title),
            &state.words,
            state.catalog.len(),
        );
    }
    if let (Some(t1), Some(t2)) = (state.terms.get(citing), state.terms.get(cited)) {
        weight += term_overlap(t1, t2);
    }
    if let (Some(p1), Some(p2)) = (p1, p2) {
        weight += shared_authors(&p1.authors, &p2.authors, same_author_weight);
    }
    weight
}

/// Weigh every relation and assemble the artifact
pub fn build_artifact(state: &CrawlState, same_author_weight: f64) -> NetworkArtifact {
    let mut artifact = NetworkArtifact::default();

    for (citing, cited) in state.relations.iter() {
        let weight = relation_weight(state, citing, cited, same_author_weight);
        artifact
            .links
            .push(WeightedLink(citing.to_string(), cited.to_string(), weight));
    }

    for paper in state.catalog.iter() {
        artifact
            .papers
            .insert(paper.id.clone(), PaperEntry::from_paper(paper, referenced_ids(state, paper)));
    }

    artifact
}

fn referenced_ids(state: &CrawlState, paper: &Paper) -> Vec<String> {
    state
        .relations
        .references(&paper.id)
        .map(|refs| refs.iter().cloned().collect())
        .unwrap_or_default()
}
