//! Model-builder collaborator seam.
//!
//! dir2dac stops at canonical statement text; turning that text plus the
//! configuration's reference metadata into a dacpac artifact is the job of
//! an external model builder behind the `ModelBuilder` trait.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::Configuration;

/// Canonical statement text blocks produced from one batch of raw input,
/// in original statement order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementBatch {
    pub statements: Vec<String>,
}

impl StatementBatch {
    /// The batch as one canonical text block
    pub fn text(&self) -> String {
        self.statements.join("\n")
    }
}

/// Consumes canonical statements and reference metadata, producing the
/// final artifact. Files are delivered in enumeration order; batches within
/// a file are delivered in source order, since later batches may reference
/// objects defined in earlier ones.
pub trait ModelBuilder {
    fn begin(&mut self, config: &Configuration) -> Result<()>;
    fn add_file(&mut self, path: &Path, batches: Vec<StatementBatch>) -> Result<()>;
    fn finish(&mut self) -> Result<()>;
}

/// Builder that retains everything handed to it; used by tests and by the
/// CLI summary output
#[derive(Debug, Default)]
pub struct CollectingModelBuilder {
    pub files: Vec<(PathBuf, Vec<StatementBatch>)>,
    pub required_sqlcmd_vars: Vec<String>,
    pub finished: bool,
}

impl CollectingModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batch_count(&self) -> usize {
        self.files.iter().map(|(_, batches)| batches.len()).sum()
    }

    pub fn statement_count(&self) -> usize {
        self.files
            .iter()
            .flat_map(|(_, batches)| batches.iter())
            .map(|batch| batch.statements.len())
            .sum()
    }
}

impl ModelBuilder for CollectingModelBuilder {
    fn begin(&mut self, config: &Configuration) -> Result<()> {
        self.required_sqlcmd_vars = config.required_sqlcmd_vars();
        Ok(())
    }

    fn add_file(&mut self, path: &Path, batches: Vec<StatementBatch>) -> Result<()> {
        self.files.push((path.to_path_buf(), batches));
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}
