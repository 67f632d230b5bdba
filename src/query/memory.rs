use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use super::{QueryDescriptor, Transport};
use crate::error::TransportError;

/// Transport answering from recorded payloads.
///
/// Queries without a recorded payload always fail, and a recorded query can be
/// told to fail a number of times before it answers.
#[derive(Default)]
pub struct MemoryTransport {
    responses: HashMap<QueryDescriptor, Value>,
    pending_failures: Mutex<HashMap<QueryDescriptor, usize>>,
    calls: Mutex<Vec<QueryDescriptor>>,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, query: QueryDescriptor, payload: Value) {
        self.responses.insert(query, payload);
    }

    pub fn with_response(mut self, query: QueryDescriptor, payload: Value) -> Self {
        self.insert(query, payload);
        self
    }

    /// Make `query` fail its first `attempts` fetches
    pub fn fail_first(self, query: QueryDescriptor, attempts: usize) -> Self {
        self.pending_failures
            .lock()
            .expect("failure table poisoned")
            .insert(query, attempts);
        self
    }

    /// Every query fetched so far, in call order
    pub fn calls(&self) -> Vec<QueryDescriptor> {
        self.calls.lock().expect("call log poisoned").clone()
    }

    pub fn call_count(&self, query: &QueryDescriptor) -> usize {
        self.calls
            .lock()
            .expect("call log poisoned")
            .iter()
            .filter(|q| *q == query)
            .count()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn fetch(&self, query: &QueryDescriptor) -> Result<Value, TransportError> {
        self.calls
            .lock()
            .expect("call log poisoned")
            .push(query.clone());

        {
            let mut failures = self.pending_failures.lock().expect("failure table poisoned");
            if let Some(left) = failures.get_mut(query) {
                if *left > 0 {
                    *left -= 1;
                    return Err(TransportError::Unavailable(format!("{} (scripted failure)", query)));
                }
            }
        }

        self.responses
            .get(query)
            .cloned()
            .ok_or_else(|| TransportError::Unavailable(format!("{} (no recorded response)", query)))
    }
}
