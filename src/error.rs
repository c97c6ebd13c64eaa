//! Error types for dir2dac

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while parsing arguments or DDL scripts
#[derive(Error, Debug)]
pub enum Dir2DacError {
    #[error("Malformed argument token: {token} (expected /key=value)")]
    TokenFormatError { token: String },

    #[error("Unrecognized argument key: /{key}")]
    UnknownKeyError { key: String },

    #[error("Unrecognized database option: {name}")]
    UnknownModelOptionError { name: String },

    #[error("Invalid value for database option {name}: {value} (expected {expected})")]
    OptionCoercionError {
        name: String,
        value: String,
        expected: &'static str,
    },

    #[error("Reference kind {kind} takes {expected} arguments, got {actual}")]
    ReferenceArityError {
        kind: String,
        expected: usize,
        actual: usize,
    },

    #[error("Unrecognized reference kind: {kind}")]
    UnknownReferenceKindError { kind: String },

    #[error("Unrecognized SQL Server version: {version}")]
    UnknownServerVersionError { version: String },

    #[error("SQL parse error in batch {batch} at line {line}: {message}")]
    SqlParseError {
        batch: usize,
        line: usize,
        message: String,
    },

    #[error("Failed to read SQL file: {path}")]
    SqlFileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to enumerate source path: {path}")]
    SourcePathError {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Invalid source filter pattern: {pattern}")]
    InvalidFilterError {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
}
