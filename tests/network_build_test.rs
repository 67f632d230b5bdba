use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

use epmc_paper_network::common::PaperRef;
use epmc_paper_network::crawl::{
    build_paper_network, CrawlConfig, ExploredTarget, FrontierEngine, ProgressEvent, ProgressListener,
    SilentListener,
};
use epmc_paper_network::query::{MemoryTransport, QueryDescriptor, RelationKind};
use epmc_paper_network::weighting::NetworkArtifact;
use epmc_paper_network::NetworkError;

fn med(id: &str) -> PaperRef {
    PaperRef::new("MED", id).unwrap()
}

fn echo(id: &str) -> Value {
    json!({ "id": id, "source": "MED" })
}

fn summary(id: &str, title: &str, authors: &str, cited: u64) -> Value {
    json!({ "id": id, "source": "MED", "title": title, "authorString": authors,
            "pubYear": "2015", "citedByCount": cited })
}

/// Scripted Europe PMC answers, one result page per query
struct Service {
    transport: MemoryTransport,
}

impl Service {
    fn new() -> Self {
        Self {
            transport: MemoryTransport::new(),
        }
    }

    fn search(mut self, query: &str, results: Vec<Value>) -> Self {
        self.transport.insert(
            QueryDescriptor::Profile {
                query: query.to_string(),
            },
            json!({ "profileList": { "pubType": [ { "name": "ALL", "count": results.len() } ] } }),
        );
        self.transport.insert(
            QueryDescriptor::Search {
                query: query.to_string(),
                page: 1,
                page_size: 1000,
            },
            json!({ "hitCount": results.len(), "resultList": { "result": results } }),
        );
        self
    }

    fn relations(mut self, id: &str, kind: RelationKind, papers: Vec<Value>) -> Self {
        let hits = papers.len();
        self.transport.insert(
            QueryDescriptor::relation_count(med(id), kind),
            json!({ "hitCount": hits, "request": echo(id) }),
        );

        let mut page = json!({ "hitCount": hits, "request": echo(id) });
        if !papers.is_empty() {
            match kind {
                RelationKind::References => page["referenceList"] = json!({ "reference": papers }),
                RelationKind::Citations => page["citationList"] = json!({ "citation": papers }),
            }
        }
        self.transport.insert(
            QueryDescriptor::Relations {
                paper: med(id),
                kind,
                page: 1,
                page_size: 1000,
            },
            page,
        );
        self
    }

    fn references(self, id: &str, papers: Vec<Value>) -> Self {
        self.relations(id, RelationKind::References, papers)
    }

    fn citations(self, id: &str, papers: Vec<Value>) -> Self {
        self.relations(id, RelationKind::Citations, papers)
    }

    fn terms(mut self, id: &str, terms: &[(&str, u64)]) -> Self {
        self.transport.insert(
            QueryDescriptor::mined_terms_count(med(id)),
            json!({ "hitCount": terms.len(), "request": echo(id) }),
        );
        let summary: Vec<Value> = terms
            .iter()
            .map(|(term, count)| json!({ "term": term, "count": count }))
            .collect();
        self.transport.insert(
            QueryDescriptor::MinedTerms {
                paper: med(id),
                page: 1,
                page_size: 1000,
            },
            json!({ "request": echo(id), "semanticTypeList": { "semanticType": [ { "tmSummary": summary } ] } }),
        );
        self
    }

    /// A paper with no relations and no mined terms
    fn isolated(self, id: &str) -> Self {
        self.references(id, vec![])
            .citations(id, vec![])
            .terms(id, &[])
    }

    fn build(self) -> Arc<MemoryTransport> {
        Arc::new(self.transport)
    }
}

#[derive(Default)]
struct RecordingListener {
    events: Mutex<Vec<ProgressEvent>>,
    networks: Mutex<Vec<NetworkArtifact>>,
}

impl RecordingListener {
    fn phases(&self) -> Vec<u8> {
        self.events.lock().unwrap().iter().map(|e| e.phase()).collect()
    }
}

impl ProgressListener for RecordingListener {
    fn on_progress(&self, event: &ProgressEvent) {
        self.events.lock().unwrap().push(event.clone());
    }

    fn on_network(&self, artifact: &NetworkArtifact) {
        self.networks.lock().unwrap().push(artifact.clone());
    }
}

fn small_config(id: &str) -> CrawlConfig {
    let mut config = CrawlConfig::new(id);
    config.reference_threshold = 100;
    config.papers_threshold = 100;
    config.explored_threshold = ExploredTarget::Count(100);
    config.query.concurrency = 4;
    config
}

/// 1 references 2 and 3, 2 references 3, 4 cites 1
fn small_network() -> Service {
    Service::new()
        .search(
            "1",
            vec![
                summary("10", "Unrelated hit", "Nobody N", 0),
                summary("1", "Malaria vaccine trial", "Smith J, Doe A", 3),
            ],
        )
        .references(
            "1",
            vec![
                summary("2", "Malaria genome", "Smith J", 10),
                summary("3", "Protein folding", "Lee K", 5),
            ],
        )
        .references("2", vec![summary("3", "Protein folding", "Lee K", 5)])
        .references("3", vec![])
        .references(
            "4",
            vec![
                summary("1", "Malaria vaccine trial", "Smith J, Doe A", 3),
                summary("99", "Never catalogued", "Stranger S", 0),
            ],
        )
        .citations("1", vec![summary("4", "Vaccine review", "Roe R", 1)])
        .citations("2", vec![])
        .citations("3", vec![])
        .terms("1", &[("A", 5), ("B", 1)])
        .terms("2", &[("A", 10)])
        .terms("3", &[("B", 2)])
        .terms("4", &[])
}

#[tokio::test]
async fn test_seed_without_references_yields_single_paper() {
    let dir = tempdir().unwrap();
    let transport = Service::new()
        .search("1", vec![summary("1", "Lonely paper", "Smith J", 0)])
        .isolated("1")
        .build();

    let mut config = CrawlConfig::new("1");
    config.output_dir = Some(dir.path().to_path_buf());

    let artifact = build_paper_network(&config, transport, &SilentListener)
        .await
        .unwrap()
        .expect("initial paper should be found");

    assert_eq!(artifact.papers.len(), 1);
    assert!(artifact.links.is_empty());
    assert!(artifact.papers["1"].links.is_empty());

    let path = dir.path().join("papers_initMED-1_ref2000_expl5000_find5000.json");
    let written: NetworkArtifact = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(written, artifact);
}

#[tokio::test]
async fn test_multi_stage_crawl_builds_weighted_network() {
    let listener = RecordingListener::default();
    let config = small_config("1");

    let report = FrontierEngine::new(&config, small_network().build(), &listener)
        .unwrap()
        .run()
        .await
        .unwrap()
        .unwrap();
    let artifact = &report.artifact;

    assert_eq!(report.initial, med("1"));
    assert_eq!(artifact.papers.len(), 4);
    assert_eq!(artifact.links.len(), 4);
    assert_eq!(artifact.papers["1"].links, vec!["2", "3"]);
    assert_eq!(artifact.papers["4"].links, vec!["1"]);
    assert!(!artifact.papers.contains_key("99"));

    // malaria 4/2 + term A 10/5 + Smith J
    assert!((artifact.weight_of("1", "2").unwrap() - 5.0).abs() < 1e-9);
    // vaccine 4/2 only
    assert!((artifact.weight_of("4", "1").unwrap() - 2.0).abs() < 1e-9);
    assert_eq!(artifact.weight_of("2", "3"), Some(0.0));

    assert_eq!(report.stats.papers_found, 4);
    assert_eq!(report.stats.papers_explored, 4);
    assert_eq!(report.stats.papers_with_terms, 4);
    assert_eq!(report.stats.unresolved_queries, 0);
    assert!(report.output_path.is_none());

    assert_eq!(listener.phases(), vec![0, 0, 1, 3, 3, 4, 1]);
    assert_eq!(listener.networks.lock().unwrap().as_slice(), &[artifact.clone()]);
}

#[tokio::test]
async fn test_progress_snapshots_track_the_crawl() {
    let listener = RecordingListener::default();
    build_paper_network(&small_config("1"), small_network().build(), &listener)
        .await
        .unwrap()
        .unwrap();

    let events = listener.events.lock().unwrap();
    assert_eq!(
        events[0],
        ProgressEvent::Exploration {
            phase: 0,
            papers_found: 3,
            papers_explored: 1,
            relations_found: 2,
        }
    );
    assert_eq!(
        events[2],
        ProgressEvent::TermEnrichment {
            phase: 1,
            papers_known: 3,
            papers_explored_for_terms: 3,
        }
    );
    assert_eq!(
        events.last(),
        Some(&ProgressEvent::TermEnrichment {
            phase: 1,
            papers_known: 1,
            papers_explored_for_terms: 1,
        })
    );
}

#[tokio::test]
async fn test_zero_reference_threshold_skips_reference_expansion() {
    let listener = RecordingListener::default();
    let mut config = small_config("1");
    config.reference_threshold = 0;

    let artifact = build_paper_network(&config, small_network().build(), &listener)
        .await
        .unwrap()
        .unwrap();

    let phases = listener.phases();
    assert!(!phases.contains(&0));
    assert_eq!(phases[0], 1);
    // the seed's own references are still found during citation expansion
    assert!(artifact.weight_of("1", "2").is_some());
    assert!(artifact.weight_of("4", "1").is_some());
}

#[tokio::test]
async fn test_error_payload_aborts_without_output() {
    let dir = tempdir().unwrap();
    let mut service = Service::new().search("1", vec![summary("1", "Broken paper", "Smith J", 0)]);
    service.transport.insert(
        QueryDescriptor::relation_count(med("1"), RelationKind::References),
        json!({ "hitCount": 3, "request": echo("1") }),
    );
    service.transport.insert(
        QueryDescriptor::Relations {
            paper: med("1"),
            kind: RelationKind::References,
            page: 1,
            page_size: 1000,
        },
        json!({ "errCode": 500, "errMsg": "internal error" }),
    );

    let mut config = CrawlConfig::new("1");
    config.output_dir = Some(dir.path().to_path_buf());

    let err = build_paper_network(&config, service.build(), &SilentListener)
        .await
        .unwrap_err();
    assert!(matches!(err, NetworkError::RemoteData { .. }));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_missing_initial_paper_returns_none() {
    let dir = tempdir().unwrap();
    let transport = Service::new()
        .search("1", vec![summary("10", "Close but not it", "Smith J", 0)])
        .build();

    let mut config = CrawlConfig::new("1");
    config.output_dir = Some(dir.path().to_path_buf());
    let listener = RecordingListener::default();

    let result = build_paper_network(&config, transport, &listener).await.unwrap();
    assert!(result.is_none());
    assert!(listener.phases().is_empty());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_dropped_queries_are_reported_not_fatal() {
    let page = QueryDescriptor::Relations {
        paper: med("1"),
        kind: RelationKind::References,
        page: 1,
        page_size: 1000,
    };
    let service = Service::new()
        .search("1", vec![summary("1", "Flaky paper", "Smith J", 0)])
        .isolated("1");
    let transport = Arc::new(service.transport.fail_first(page.clone(), 10));

    let config = small_config("1");
    let report = FrontierEngine::new(&config, transport.clone(), &SilentListener)
        .unwrap()
        .run()
        .await
        .unwrap()
        .unwrap();

    assert_eq!(report.stats.unresolved_queries, 1);
    assert_eq!(report.artifact.papers.len(), 1);
    assert_eq!(transport.call_count(&page), config.query.relation_retry);
}

#[tokio::test]
async fn test_drain_frontier_explores_everything() {
    let mut config = small_config("1");
    config.explored_threshold = ExploredTarget::DrainFrontier;
    config.reference_threshold = 2;

    let listener = RecordingListener::default();
    let report = FrontierEngine::new(&config, small_network().build(), &listener)
        .unwrap()
        .run()
        .await
        .unwrap()
        .unwrap();

    // stage 0 stops after the seed; the rest are reached by later stages
    assert_eq!(listener.phases().iter().filter(|p| **p == 0).count(), 1);
    assert_eq!(report.stats.papers_explored, 4);
    assert!(report.artifact.weight_of("2", "3").is_some());
}

#[tokio::test]
async fn test_invalid_config_is_rejected_before_any_query() {
    let transport = Arc::new(MemoryTransport::new());
    let mut config = CrawlConfig::new("1");
    config.ref_buffer_size = 0;

    let err = build_paper_network(&config, transport.clone(), &SilentListener)
        .await
        .unwrap_err();
    assert!(matches!(err, NetworkError::InvalidArgument(_)));
    assert!(transport.calls().is_empty());
}
