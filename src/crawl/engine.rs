use log::{debug, info, warn};
use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use super::config::{CrawlConfig, ExploredTarget};
use super::progress::{ProgressEvent, ProgressListener};
use super::relevance::{average_relevance, rank_by_relevance};
use crate::common::{artifact_file_name, format_elapsed, write_json, BuildStats, PaperRef};
use crate::error::Result;
use crate::network::CrawlState;
use crate::query::{BatchOutcome, QueryClient, RelationKind, Transport};
use crate::weighting::{build_artifact, NetworkArtifact};

/// Result of a finished build
#[derive(Debug)]
pub struct CrawlReport {
    pub initial: PaperRef,
    pub artifact: NetworkArtifact,
    pub stats: BuildStats,
    /// Where the artifact was written, when an output directory was set
    pub output_path: Option<PathBuf>,
}

/// Runs the staged exploration around one initial paper.
///
/// Stages run strictly in order and each one mutates the shared
/// [`CrawlState`] only after its query rounds settle:
///
/// 0. reference expansion from the frontier
/// 1. mined terms for every catalogued paper
/// 2. relevance ranking against the initial paper
/// 3. citation expansion of the most relevant papers
/// 4. relation backfill between known papers
/// 5. mined terms for papers found since stage 1
pub struct FrontierEngine<'a> {
    config: &'a CrawlConfig,
    client: QueryClient,
    listener: &'a dyn ProgressListener,
    state: CrawlState,
}

impl<'a> FrontierEngine<'a> {
    pub fn new(
        config: &'a CrawlConfig,
        transport: Arc<dyn Transport>,
        listener: &'a dyn ProgressListener,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            client: QueryClient::new(transport, config.query.clone()),
            listener,
            state: CrawlState::new(),
        })
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    /// Run every stage; `None` when the initial paper cannot be found
    pub async fn run(mut self) -> Result<Option<CrawlReport>> {
        let total = Instant::now();
        let Some(initial) = self.locate().await? else {
            return Ok(None);
        };
        info!("Initial paper: {}", initial);

        self.expand_references().await?;
        self.enrich_terms(1).await?;
        let candidates = self.rank_candidates(&initial);
        self.expand_citations(candidates).await?;
        self.backfill_relations().await?;
        self.enrich_terms(5).await?;

        let start = Instant::now();
        info!("Stage 6: weighting {} relation(s)", self.state.relations_found());
        let artifact = build_artifact(&self.state, self.config.same_author_weight);
        info!("Stage 6 done in {}", format_elapsed(start.elapsed()));

        let output_path = match &self.config.output_dir {
            Some(dir) => {
                let path = dir.join(artifact_file_name(
                    &initial,
                    self.config.reference_threshold,
                    self.config.explored_threshold,
                    self.config.papers_threshold,
                ));
                write_json(&path, &artifact)?;
                info!("Network written to {}", path.display());
                Some(path)
            }
            None => None,
        };
        self.listener.on_network(&artifact);

        let stats = BuildStats {
            papers_found: self.state.papers_found(),
            papers_explored: self.state.papers_explored(),
            relations_found: self.state.relations_found(),
            papers_with_terms: self.state.terms.len(),
            unresolved_queries: self.state.unresolved_queries,
        };
        info!("Network built in {}", format_elapsed(total.elapsed()));

        Ok(Some(CrawlReport {
            initial,
            artifact,
            stats,
            output_path,
        }))
    }

    /// Search for the initial id and seed the catalog and frontier with it
    async fn locate(&mut self) -> Result<Option<PaperRef>> {
        let config = self.config;
        let results = self.client.search_papers(&config.initial_paper_id).await?;
        let count = results.len();

        let Some(paper) = results
            .into_iter()
            .find(|paper| paper.id == config.initial_paper_id)
        else {
            warn!(
                "Could not find initial paper {} in {} search result(s)",
                config.initial_paper_id, count
            );
            return Ok(None);
        };

        let initial = paper.key();
        let cited_count = paper.cited_count;
        self.state.add_paper(paper);
        self.state.frontier.push(&initial.id, cited_count);
        Ok(Some(initial))
    }

    async fn expand_references(&mut self) -> Result<()> {
        let start = Instant::now();
        info!("Stage 0: looking for referenced papers");

        while self.state.papers_found() < self.config.reference_threshold && !self.state.frontier.is_empty() {
            let batch = self.state.frontier.take_front(self.config.ref_buffer_size);
            let found = self.expand(&batch, RelationKind::References, true).await?;
            self.state.mark_explored(&batch);
            self.state.enqueue_unexplored(&found);
            self.emit_exploration(0);
        }

        self.log_exploration();
        info!("Stage 0 done in {}", format_elapsed(start.elapsed()));
        Ok(())
    }

    /// Mined terms for catalogued papers not indexed yet
    async fn enrich_terms(&mut self, stage: u8) -> Result<()> {
        let start = Instant::now();
        let pending: Vec<String> = self
            .state
            .catalog
            .iter()
            .filter(|paper| !self.state.terms.contains(&paper.id))
            .map(|paper| paper.id.clone())
            .collect();
        info!("Stage {}: requesting mined terms for {} paper(s)", stage, pending.len());

        let mut requested = 0;
        for chunk in pending.chunks(self.config.terms_buffer_size) {
            let refs = self.state.paper_refs(chunk);
            let outcome = self.client.mined_terms_payloads(&refs).await?;
            self.note_unresolved(&outcome);
            self.state.merge_term_payloads(outcome.payloads)?;

            requested += chunk.len();
            debug!("Requested mined terms for {} / {} paper(s)", requested, pending.len());
            self.listener.on_progress(&ProgressEvent::TermEnrichment {
                phase: 1,
                papers_known: pending.len(),
                papers_explored_for_terms: requested,
            });
        }

        info!("Stage {} done in {}", stage, format_elapsed(start.elapsed()));
        Ok(())
    }

    /// Relevance-ordered ids followed by the initial paper
    fn rank_candidates(&self, initial: &PaperRef) -> VecDeque<String> {
        let start = Instant::now();
        info!("Stage 2: ranking papers by shared mined terms");

        let ranked = rank_by_relevance(&self.state, &initial.id);
        info!("Average paper relevance: {:.3}", average_relevance(&ranked));

        let mut candidates: VecDeque<String> = ranked.into_iter().map(|(id, _)| id).collect();
        candidates.push_back(initial.id.clone());
        info!("Stage 2 done in {}", format_elapsed(start.elapsed()));
        candidates
    }

    async fn expand_citations(&mut self, mut candidates: VecDeque<String>) -> Result<()> {
        let start = Instant::now();
        info!("Stage 3: looking for relevant citations");

        while self.state.papers_found() < self.config.papers_threshold && !candidates.is_empty() {
            let take = self.config.cit_buffer_size.min(candidates.len());
            let batch: Vec<String> = candidates.drain(..take).collect();

            let citing: Vec<String> = batch
                .iter()
                .filter(|id| !self.state.citations_explored.contains(*id))
                .cloned()
                .collect();
            let referencing: Vec<String> = batch
                .iter()
                .filter(|id| !self.state.explored.contains(*id))
                .cloned()
                .collect();

            let mut found = HashSet::new();
            if !citing.is_empty() {
                found.extend(self.expand(&citing, RelationKind::Citations, true).await?);
            }
            if !referencing.is_empty() {
                found.extend(self.expand(&referencing, RelationKind::References, true).await?);
            }

            self.state.citations_explored.extend(citing);
            self.state.mark_explored(&referencing);
            self.state.enqueue_unexplored(&found);
            self.emit_exploration(3);
        }

        self.log_exploration();
        info!("Stage 3 done in {}", format_elapsed(start.elapsed()));
        Ok(())
    }

    /// References of frontier papers, keeping only edges between known papers
    async fn backfill_relations(&mut self) -> Result<()> {
        let start = Instant::now();
        info!(
            "Stage 4: looking for relations between known papers (target {})",
            self.config.explored_threshold
        );

        while !self.state.frontier.is_empty() {
            if let ExploredTarget::Count(target) = self.config.explored_threshold {
                if self.state.papers_explored() >= target {
                    break;
                }
            }
            let batch = self.state.frontier.take_front(self.config.ref_buffer_size);
            self.expand(&batch, RelationKind::References, false).await?;
            self.state.mark_explored(&batch);
            self.emit_exploration(4);
        }

        self.log_exploration();
        info!("Stage 4 done in {}", format_elapsed(start.elapsed()));
        Ok(())
    }

    async fn expand(&mut self, ids: &[String], kind: RelationKind, discover: bool) -> Result<HashSet<String>> {
        let refs = self.state.paper_refs(ids);
        let outcome = self.client.relation_payloads(&refs, &[kind]).await?;
        self.note_unresolved(&outcome);
        self.state.merge_relation_payloads(outcome.payloads, discover)
    }

    fn note_unresolved(&mut self, outcome: &BatchOutcome) {
        if outcome.is_complete() {
            return;
        }
        warn!("{} query(ies) dropped after retries", outcome.unresolved.len());
        for query in &outcome.unresolved {
            debug!("  unresolved: {}", query);
        }
        self.state.unresolved_queries += outcome.unresolved.len();
    }

    fn emit_exploration(&self, phase: u8) {
        self.listener.on_progress(&ProgressEvent::Exploration {
            phase,
            papers_found: self.state.papers_found(),
            papers_explored: self.state.papers_explored(),
            relations_found: self.state.relations_found(),
        });
    }

    fn log_exploration(&self) {
        info!(
            "Explored {} / {} paper(s), {} relation(s)",
            self.state.papers_explored(),
            self.state.papers_found(),
            self.state.relations_found()
        );
    }
}

/// Build the weighted citation network around `config.initial_paper_id`.
///
/// Returns `Ok(None)` when the search does not return the initial paper. A
/// payload carrying a service error code aborts the build before anything is
/// written.
pub async fn build_paper_network(
    config: &CrawlConfig,
    transport: Arc<dyn Transport>,
    listener: &dyn ProgressListener,
) -> Result<Option<NetworkArtifact>> {
    let report = FrontierEngine::new(config, transport, listener)?.run().await?;
    Ok(report.map(|report| report.artifact))
}
