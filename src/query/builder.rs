use std::collections::BTreeSet;

use super::hit_count::{
    estimate_mined_terms_hit_counts, estimate_relation_hit_counts, estimate_search_hit_count,
};
use super::{BatchExecutor, QueryDescriptor, RelationKind};
use crate::common::PaperRef;
use crate::error::{NetworkError, Result};

/// Pages needed for `hit_count` results; always at least one
pub fn page_count(hit_count: u64, page_size: u32) -> u64 {
    hit_count / u64::from(page_size.max(1)) + 1
}

pub fn validate_papers(papers: &[PaperRef]) -> Result<()> {
    papers.iter().try_for_each(PaperRef::validate)
}

pub fn validate_page_size(page_size: u32) -> Result<()> {
    if page_size == 0 {
        return Err(NetworkError::invalid("page size must be at least 1"));
    }
    Ok(())
}

/// Every result page of the given relation kinds for `papers`
pub async fn build_relation_queries(
    executor: &BatchExecutor,
    papers: &[PaperRef],
    kinds: &[RelationKind],
    page_size: u32,
    count_retry: usize,
) -> Result<BTreeSet<QueryDescriptor>> {
    validate_papers(papers)?;
    validate_page_size(page_size)?;

    let mut queries = BTreeSet::new();
    if papers.is_empty() {
        return Ok(queries);
    }
    for &kind in kinds {
        for (paper, hits) in estimate_relation_hit_counts(executor, papers, kind, count_retry).await? {
            for page in 1..=page_count(hits, page_size) {
                queries.insert(QueryDescriptor::Relations {
                    paper: paper.clone(),
                    kind,
                    page,
                    page_size,
                });
            }
        }
    }
    Ok(queries)
}

/// Every mined-term page for `papers`
pub async fn build_mined_terms_queries(
    executor: &BatchExecutor,
    papers: &[PaperRef],
    page_size: u32,
    count_retry: usize,
) -> Result<BTreeSet<QueryDescriptor>> {
    validate_papers(papers)?;
    validate_page_size(page_size)?;

    let mut queries = BTreeSet::new();
    if papers.is_empty() {
        return Ok(queries);
    }
    for (paper, hits) in estimate_mined_terms_hit_counts(executor, papers, count_retry).await? {
        for page in 1..=page_count(hits, page_size) {
            queries.insert(QueryDescriptor::MinedTerms {
                paper: paper.clone(),
                page,
                page_size,
            });
        }
    }
    Ok(queries)
}

/// Every search result page for a free-text query
pub async fn build_search_queries(
    executor: &BatchExecutor,
    query: &str,
    page_size: u32,
    count_retry: usize,
) -> Result<BTreeSet<QueryDescriptor>> {
    if query.trim().is_empty() {
        return Err(NetworkError::invalid("search query must not be empty"));
    }
    validate_page_size(page_size)?;

    let hits = estimate_search_hit_count(executor, query, count_retry).await?;
    Ok((1..=page_count(hits, page_size))
        .map(|page| QueryDescriptor::Search {
            query: query.to_string(),
            page,
            page_size,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::MemoryTransport;
    use serde_json::json;
    use std::sync::Arc;

    fn med(id: &str) -> PaperRef {
        PaperRef::new("MED", id).unwrap()
    }

    #[test]
    fn test_page_count_is_at_least_one() {
        assert_eq!(page_count(0, 1000), 1);
        assert_eq!(page_count(999, 1000), 1);
        // an exact multiple still asks for one extra page
        assert_eq!(page_count(1000, 1000), 2);
        assert_eq!(page_count(2500, 1000), 3);
        assert_eq!(page_count(7, 1), 8);
    }

    #[tokio::test]
    async fn test_relation_queries_cover_every_page() {
        let transport = MemoryTransport::new()
            .with_response(
                QueryDescriptor::relation_count(med("1"), RelationKind::References),
                json!({ "hitCount": 1500, "request": { "id": "1", "source": "MED" } }),
            )
            .with_response(
                QueryDescriptor::relation_count(med("1"), RelationKind::Citations),
                json!({ "hitCount": 0, "request": { "id": "1", "source": "MED" } }),
            );
        let executor = BatchExecutor::new(Arc::new(transport), 4);

        let queries = build_relation_queries(
            &executor,
            &[med("1")],
            &[RelationKind::References, RelationKind::Citations],
            1000,
            2,
        )
        .await
        .unwrap();

        let paths: Vec<String> = queries.iter().map(|q| q.path()).collect();
        assert_eq!(
            paths,
            vec![
                "MED/1/references/1/1000/json/",
                "MED/1/references/2/1000/json/",
                "MED/1/citations/1/1000/json/",
            ]
        );
    }

    #[tokio::test]
    async fn test_malformed_paper_reference_is_rejected() {
        let executor = BatchExecutor::new(Arc::new(MemoryTransport::new()), 4);
        let bad = PaperRef {
            source: "MED".to_string(),
            id: String::new(),
        };

        let err = build_mined_terms_queries(&executor, &[bad], 1000, 2)
            .await
            .unwrap_err();
        assert!(matches!(err, NetworkError::InvalidArgument(_)));

        let err = build_relation_queries(&executor, &[med("1")], &[RelationKind::References], 0, 2)
            .await
            .unwrap_err();
        assert!(matches!(err, NetworkError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_search_queries_from_profile_count() {
        let transport = MemoryTransport::new().with_response(
            QueryDescriptor::Profile {
                query: "malaria".to_string(),
            },
            json!({ "profileList": { "pubType": [ { "name": "ALL", "count": 2001 } ] } }),
        );
        let executor = BatchExecutor::new(Arc::new(transport), 4);

        let queries = build_search_queries(&executor, "malaria", 1000, 2).await.unwrap();
        assert_eq!(queries.len(), 3);
    }
}
