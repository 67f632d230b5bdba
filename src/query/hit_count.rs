use log::debug;

use super::{BatchExecutor, QueryDescriptor, RelationKind};
use crate::common::PaperRef;
use crate::error::{NetworkError, Result};
use crate::remote::Envelope;

/// Hit counts for the papers whose count query answered.
/// Papers whose count query was dropped are absent from the result.
pub async fn estimate_relation_hit_counts(
    executor: &BatchExecutor,
    papers: &[PaperRef],
    kind: RelationKind,
    max_retry: usize,
) -> Result<Vec<(PaperRef, u64)>> {
    let queries = papers
        .iter()
        .cloned()
        .map(|paper| QueryDescriptor::relation_count(paper, kind));
    let outcome = executor.execute(queries, max_retry).await;
    if !outcome.is_complete() {
        debug!("{} {} count queries unresolved", outcome.unresolved.len(), kind);
    }
    outcome.payloads.into_iter().map(read_echoed_count).collect()
}

pub async fn estimate_mined_terms_hit_counts(
    executor: &BatchExecutor,
    papers: &[PaperRef],
    max_retry: usize,
) -> Result<Vec<(PaperRef, u64)>> {
    let queries = papers.iter().cloned().map(QueryDescriptor::mined_terms_count);
    let outcome = executor.execute(queries, max_retry).await;
    if !outcome.is_complete() {
        debug!("{} mined-term count queries unresolved", outcome.unresolved.len());
    }
    outcome.payloads.into_iter().map(read_echoed_count).collect()
}

/// Total hits of a free-text query, read from the profile endpoint
pub async fn estimate_search_hit_count(
    executor: &BatchExecutor,
    query: &str,
    max_retry: usize,
) -> Result<u64> {
    let outcome = executor
        .execute(
            std::iter::once(QueryDescriptor::Profile {
                query: query.to_string(),
            }),
            max_retry,
        )
        .await;

    let payload = outcome.payloads.into_iter().next().ok_or_else(|| {
        NetworkError::IncompleteEnvelope(format!("could not retrieve count data for {:?}", query))
    })?;
    Ok(Envelope::parse(payload)?.profile_total())
}

fn read_echoed_count(payload: serde_json::Value) -> Result<(PaperRef, u64)> {
    let envelope = Envelope::parse(payload)?;
    let paper = envelope
        .request()
        .and_then(|echo| echo.paper_ref())
        .ok_or_else(|| NetworkError::IncompleteEnvelope("count payload without request echo".into()))?;
    let hits = envelope.hit_count().ok_or_else(|| {
        NetworkError::IncompleteEnvelope(format!("count payload for {} without hitCount", paper))
    })?;
    Ok((paper, hits))
}
