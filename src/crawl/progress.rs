use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, warn};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use crate::weighting::NetworkArtifact;

/// Snapshot emitted after every inner iteration of a stage
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProgressEvent {
    /// Relation stages (phases 0, 3 and 4)
    Exploration {
        phase: u8,
        papers_found: usize,
        papers_explored: usize,
        relations_found: usize,
    },
    /// Mined-term stages (phase 1)
    TermEnrichment {
        phase: u8,
        papers_known: usize,
        papers_explored_for_terms: usize,
    },
}

impl ProgressEvent {
    pub fn phase(&self) -> u8 {
        match self {
            ProgressEvent::Exploration { phase, .. } | ProgressEvent::TermEnrichment { phase, .. } => *phase,
        }
    }
}

/// Receives progress; fire-and-forget, failures must not reach the crawl
pub trait ProgressListener: Send + Sync {
    fn on_progress(&self, event: &ProgressEvent);

    /// The finished network, forwarded in full
    fn on_network(&self, _artifact: &NetworkArtifact) {}
}

/// Discards everything
pub struct SilentListener;

impl ProgressListener for SilentListener {
    fn on_progress(&self, _event: &ProgressEvent) {}
}

/// Terminal spinner showing the latest snapshot
pub struct ConsoleListener {
    spinner: ProgressBar,
}

impl ConsoleListener {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] phase {prefix} | {msg}")
                .expect("Failed to create progress style"),
        );
        spinner.enable_steady_tick(Duration::from_millis(120));
        Self { spinner }
    }
}

impl Default for ConsoleListener {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressListener for ConsoleListener {
    fn on_progress(&self, event: &ProgressEvent) {
        self.spinner.set_prefix(event.phase().to_string());
        let message = match event {
            ProgressEvent::Exploration {
                papers_found,
                papers_explored,
                relations_found,
                ..
            } => format!(
                "{} papers | {} explored | {} relations",
                papers_found, papers_explored, relations_found
            ),
            ProgressEvent::TermEnrichment {
                papers_known,
                papers_explored_for_terms,
                ..
            } => format!("mined terms {}/{}", papers_explored_for_terms, papers_known),
        };
        debug!("{}", message);
        self.spinner.set_message(message);
    }

    fn on_network(&self, artifact: &NetworkArtifact) {
        self.spinner.finish_with_message(format!(
            "network ready: {} papers, {} links",
            artifact.papers.len(),
            artifact.links.len()
        ));
    }
}

/// Writes one JSON document per line: every snapshot, then the network
pub struct JsonLinesListener {
    writer: Mutex<BufWriter<File>>,
}

impl JsonLinesListener {
    pub fn create(path: &Path) -> std::io::Result<Self> {
        Ok(Self {
            writer: Mutex::new(BufWriter::new(File::create(path)?)),
        })
    }

    fn write_line<T: Serialize>(&self, value: &T) {
        let Ok(mut writer) = self.writer.lock() else {
            warn!("Progress sink poisoned, dropping message");
            return;
        };
        let result = serde_json::to_writer(&mut *writer, value)
            .map_err(std::io::Error::from)
            .and_then(|_| writeln!(writer))
            .and_then(|_| writer.flush());
        if let Err(e) = result {
            warn!("Failed to write progress message: {}", e);
        }
    }
}

impl ProgressListener for JsonLinesListener {
    fn on_progress(&self, event: &ProgressEvent) {
        self.write_line(event);
    }

    fn on_network(&self, artifact: &NetworkArtifact) {
        self.write_line(artifact);
    }
}

/// Fans every message out to several listeners
#[derive(Default)]
pub struct MultiListener {
    listeners: Vec<Box<dyn ProgressListener>>,
}

impl MultiListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, listener: Box<dyn ProgressListener>) -> Self {
        self.listeners.push(listener);
        self
    }
}

impl ProgressListener for MultiListener {
    fn on_progress(&self, event: &ProgressEvent) {
        for listener in &self.listeners {
            listener.on_progress(event);
        }
    }

    fn on_network(&self, artifact: &NetworkArtifact) {
        for listener in &self.listeners {
            listener.on_network(artifact);
        }
    }
}
