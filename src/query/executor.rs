use futures::stream::{self, StreamExt};
use log::{debug, warn};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use super::{QueryDescriptor, Transport};
use crate::common::format_elapsed;

/// Default number of in-flight requests per round
pub const DEFAULT_CONCURRENCY: usize = 64;

/// Payloads gathered by a batch, plus the queries that never produced one
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Parsed bodies, in completion order; may still carry an `errCode`
    pub payloads: Vec<Value>,
    /// Queries still failing after the last round
    pub unresolved: Vec<QueryDescriptor>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Issues query sets in concurrent rounds, retrying only what failed
#[derive(Clone)]
pub struct BatchExecutor {
    transport: Arc<dyn Transport>,
    concurrency: usize,
}

impl BatchExecutor {
    pub fn new(transport: Arc<dyn Transport>, concurrency: usize) -> Self {
        Self {
            transport,
            concurrency: concurrency.max(1),
        }
    }

    /// Run `queries` for at most `max_retry` rounds.
    ///
    /// Each round dispatches every pending query and waits for all of them to
    /// settle before the next round starts. Duplicate descriptors run once.
    pub async fn execute<I>(&self, queries: I, max_retry: usize) -> BatchOutcome
    where
        I: IntoIterator<Item = QueryDescriptor>,
    {
        let mut pending: HashSet<QueryDescriptor> = queries.into_iter().collect();
        let mut payloads = Vec::with_capacity(pending.len());
        let mut round = 0;

        while !pending.is_empty() && round < max_retry {
            round += 1;
            let start = Instant::now();
            debug!(
                "Performing {} API request(s) (attempt {}/{})",
                pending.len(),
                round,
                max_retry
            );

            let transport = &self.transport;
            let results: Vec<_> = stream::iter(pending.iter().cloned())
                .map(|query| async move {
                    let result = transport.fetch(&query).await;
                    (query, result)
                })
                .buffer_unordered(self.concurrency)
                .collect()
                .await;

            for (query, result) in results {
                match result {
                    Ok(payload) => {
                        pending.remove(&query);
                        payloads.push(payload);
                    }
                    Err(e) => debug!("Request failed ({}): {}", query, e),
                }
            }

            debug!("Round {} settled in {}", round, format_elapsed(start.elapsed()));
        }

        if !pending.is_empty() {
            warn!(
                "Dropping {} unresolved quer{} after {} attempt(s)",
                pending.len(),
                if pending.len() == 1 { "y" } else { "ies" },
                round
            );
        }

        let mut unresolved: Vec<QueryDescriptor> = pending.into_iter().collect();
        unresolved.sort();

        BatchOutcome {
            payloads,
            unresolved,
        }
    }
}
