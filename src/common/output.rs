use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use super::PaperRef;
use crate::error::Result;

/// `papers_init{src}-{id}_ref{R}_expl{E}_find{P}.json`
pub fn artifact_file_name(
    initial: &PaperRef,
    reference_threshold: usize,
    explored_threshold: impl std::fmt::Display,
    papers_threshold: usize,
) -> String {
    format!(
        "papers_init{}-{}_ref{}_expl{}_find{}.json",
        initial.source, initial.id, reference_threshold, explored_threshold, papers_threshold
    )
}

/// Serialize `value` as a single JSON document at `path`
pub fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}
