use log::{debug, info};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use super::builder::{build_mined_terms_queries, build_relation_queries, build_search_queries};
use super::executor::DEFAULT_CONCURRENCY;
use super::transport::DEFAULT_ENDPOINT;
use super::{BatchExecutor, BatchOutcome, RelationKind, Transport};
use crate::common::{format_elapsed, Paper, PaperRef};
use crate::error::Result;
use crate::remote::Envelope;

/// Page sizes and retry bounds for each query family
#[derive(Debug, Clone)]
pub struct QuerySettings {
    pub endpoint: String,
    pub page_size: u32,
    pub count_retry: usize,
    pub relation_retry: usize,
    pub terms_retry: usize,
    pub search_retry: usize,
    pub concurrency: usize,
    /// Per-request timeout in seconds, 0 disables it
    pub timeout_secs: u64,
}

impl Default for QuerySettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            page_size: 1000,
            count_retry: 2,
            relation_retry: 3,
            terms_retry: 2,
            search_retry: 3,
            concurrency: DEFAULT_CONCURRENCY,
            timeout_secs: 30,
        }
    }
}

/// Builds and runs the query families the crawl needs
#[derive(Clone)]
pub struct QueryClient {
    executor: BatchExecutor,
    settings: QuerySettings,
}

impl QueryClient {
    pub fn new(transport: Arc<dyn Transport>, settings: QuerySettings) -> Self {
        Self {
            executor: BatchExecutor::new(transport, settings.concurrency),
            settings,
        }
    }

    pub fn settings(&self) -> &QuerySettings {
        &self.settings
    }

    /// Distinct papers matching a free-text query
    pub async fn search_papers(&self, query: &str) -> Result<Vec<Paper>> {
        let start = Instant::now();
        let queries = build_search_queries(
            &self.executor,
            query,
            self.settings.page_size,
            self.settings.count_retry,
        )
        .await?;
        let outcome = self.executor.execute(queries, self.settings.search_retry).await;

        let mut seen = HashSet::new();
        let mut papers = Vec::new();
        for payload in outcome.payloads {
            for paper in Envelope::parse(payload)?.search_results() {
                if seen.insert(paper.key()) {
                    papers.push(paper);
                }
            }
        }

        info!(
            "search_papers({:?}): {} paper(s) in {}",
            query,
            papers.len(),
            format_elapsed(start.elapsed())
        );
        Ok(papers)
    }

    /// Raw relation payloads for `papers`; one request per result page
    pub async fn relation_payloads(
        &self,
        papers: &[PaperRef],
        kinds: &[RelationKind],
    ) -> Result<BatchOutcome> {
        let queries = build_relation_queries(
            &self.executor,
            papers,
            kinds,
            self.settings.page_size,
            self.settings.count_retry,
        )
        .await?;
        debug!("{} relation page(s) for {} paper(s)", queries.len(), papers.len());
        Ok(self.executor.execute(queries, self.settings.relation_retry).await)
    }

    /// Raw mined-term payloads for `papers`
    pub async fn mined_terms_payloads(&self, papers: &[PaperRef]) -> Result<BatchOutcome> {
        let queries = build_mined_terms_queries(
            &self.executor,
            papers,
            self.settings.page_size,
            self.settings.count_retry,
        )
        .await?;
        debug!("{} mined-term page(s) for {} paper(s)", queries.len(), papers.len());
        Ok(self.executor.execute(queries, self.settings.terms_retry).await)
    }
}
