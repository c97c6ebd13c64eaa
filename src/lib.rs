//! dir2dac: compiles a directory of SQL scripts into canonical T-SQL statements
//!
//! The library parses a `/key=value` CLI mini-language into a typed
//! `Configuration`, then normalizes each source script's GO batches into
//! canonical statement text. Artifact assembly is delegated to a
//! `ModelBuilder` collaborator.

pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod source;

use std::path::PathBuf;

use anyhow::Result;
use rayon::prelude::*;

pub use error::Dir2DacError;

use config::Configuration;
use model::{ModelBuilder, StatementBatch};
use parser::DdlScriptParser;

/// Minimum number of files to benefit from parallel processing.
/// Below this threshold, sequential processing is faster due to rayon overhead.
const PARALLEL_THRESHOLD: usize = 8;

/// Enumerate, parse, and normalize all configured source scripts, feeding
/// the results to the model builder in deterministic order.
pub fn compile(
    config: &Configuration,
    builder: &mut dyn ModelBuilder,
    verbose: bool,
) -> Result<()> {
    let files = source::enumerate_sql_files(&config.source_paths)?;
    if verbose {
        println!("Found {} SQL files", files.len());
    }

    let ddl_parser = DdlScriptParser::new(config.sql_server_version);

    // Per-file parses are independent; batch order within a file is preserved
    let parsed: Vec<(PathBuf, Vec<StatementBatch>)> = if files.len() >= PARALLEL_THRESHOLD {
        let results: Vec<Result<(PathBuf, Vec<StatementBatch>), Dir2DacError>> = files
            .par_iter()
            .map(|file| ddl_parser.parse_file(file).map(|b| (file.clone(), b)))
            .collect();
        results.into_iter().collect::<Result<_, _>>()?
    } else {
        let mut sequential = Vec::with_capacity(files.len());
        for file in &files {
            sequential.push((file.clone(), ddl_parser.parse_file(file)?));
        }
        sequential
    };

    builder.begin(config)?;
    for (path, batches) in parsed {
        if verbose {
            println!("Parsed {} ({} batches)", path.display(), batches.len());
        }
        builder.add_file(&path, batches)?;
    }
    builder.finish()?;

    Ok(())
}
