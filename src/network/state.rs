use log::debug;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

use super::{CatalogInsert, Frontier, PaperCatalog, RelationGraph, TermCounts, TermIndex, WordIndex};
use crate::common::{Paper, PaperRef};
use crate::error::{NetworkError, Result};
use crate::query::RelationKind;
use crate::remote::Envelope;

/// Everything a crawl accumulates, owned by the single exploration task
#[derive(Debug, Default)]
pub struct CrawlState {
    pub catalog: PaperCatalog,
    pub relations: RelationGraph,
    pub words: WordIndex,
    pub terms: TermIndex,
    pub frontier: Frontier,
    /// Papers whose references were queried
    pub explored: HashSet<String>,
    /// Papers whose citations were queried
    pub citations_explored: HashSet<String>,
    /// Queries dropped after exhausting their retries
    pub unresolved_queries: usize,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalogue a paper, counting its title words if it is new
    pub fn add_paper(&mut self, paper: Paper) -> bool {
        let title = paper.title.clone();
        match self.catalog.insert(paper) {
            CatalogInsert::Added => {
                self.words.add_title(&title);
                true
            }
            CatalogInsert::Duplicate | CatalogInsert::Collision => false,
        }
    }

    /// Fold relation payloads into the catalog and graph.
    ///
    /// With `discover` set, unknown papers are catalogued; otherwise only edges
    /// between already-known papers are recorded. Returns the ids listed in the
    /// payloads (known or new).
    pub fn merge_relation_payloads(&mut self, payloads: Vec<Value>, discover: bool) -> Result<HashSet<String>> {
        let mut found = HashSet::new();
        for payload in payloads {
            let envelope = Envelope::parse(payload)?;
            let Some((kind, papers)) = envelope.related_papers() else {
                continue;
            };
            let requester = envelope
                .request()
                .and_then(|echo| echo.paper_id())
                .ok_or_else(|| NetworkError::IncompleteEnvelope("relation payload without request echo".into()))?;

            for paper in papers {
                let id = paper.id.clone();
                if discover {
                    self.add_paper(paper);
                } else if !self.catalog.contains(&id) {
                    continue;
                }
                match kind {
                    RelationKind::References => self.relations.add(&requester, &id),
                    RelationKind::Citations => self.relations.add(&id, &requester),
                };
                found.insert(id);
            }
        }
        Ok(found)
    }

    /// Fold mined-term payloads into the term index.
    ///
    /// Pages of one paper within the batch are combined; papers already
    /// indexed are left untouched. Returns the number of papers added.
    pub fn merge_term_payloads(&mut self, payloads: Vec<Value>) -> Result<usize> {
        let mut batch: HashMap<String, TermCounts> = HashMap::new();
        for payload in payloads {
            let envelope = Envelope::parse(payload)?;
            let id = envelope
                .request()
                .and_then(|echo| echo.paper_id())
                .ok_or_else(|| NetworkError::IncompleteEnvelope("mined-terms payload without request echo".into()))?;
            batch.entry(id).or_default().extend(envelope.mined_terms());
        }

        let mut added = 0;
        for (id, terms) in batch {
            if self.terms.insert(&id, terms) {
                added += 1;
            } else {
                debug!("Mined terms for {} already indexed", id);
            }
        }
        Ok(added)
    }

    pub fn mark_explored<'a, I: IntoIterator<Item = &'a String>>(&mut self, ids: I) {
        for id in ids {
            self.explored.insert(id.clone());
        }
        let explored = &self.explored;
        self.frontier.retain(|id| !explored.contains(id));
    }

    /// Queue every found paper not explored yet, then re-sort the frontier
    pub fn enqueue_unexplored(&mut self, found: &HashSet<String>) {
        for id in found {
            if self.explored.contains(id) {
                continue;
            }
            if let Some(paper) = self.catalog.get(id) {
                self.frontier.push(id, paper.cited_count);
            }
        }
        self.frontier.sort();
    }

    /// References for catalogued ids, skipping unknown ones
    pub fn paper_refs<'a, I: IntoIterator<Item = &'a String>>(&self, ids: I) -> Vec<PaperRef> {
        ids.into_iter()
            .filter_map(|id| self.catalog.paper_ref(id))
            .collect()
    }

    pub fn papers_found(&self) -> usize {
        self.catalog.len()
    }

    pub fn papers_explored(&self) -> usize {
        self.explored.len()
    }

    pub fn relations_found(&self) -> usize {
        self.relations.len()
    }
}
