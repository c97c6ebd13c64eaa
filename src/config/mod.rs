//! Command-line configuration for dir2dac.
//!
//! The CLI surface is a delimiter-based mini-language of `/key=value=...`
//! tokens (keys case-insensitive):
//!
//! ```text
//! /sourcePath=<path>[=<filter>]                          (repeatable)
//! /precompare=<path>  /postcompare=<path>
//! /dp=<outputPath>
//! /sv=<versionToken>                                     (SQL90..SQL160)
//! /do=<optionName>=<rawValue>                            (repeatable)
//! /r=this=<file>=<logicalName>
//! /r=other=<file>=<logicalName>=<dbVar>
//! /r=otherserver=<file>=<logicalName>=<dbVar>=<serverVar>
//! /r=master=<file>   /r=msdb=<file>
//! ```

mod options;
mod reference;
mod tokenizer;

use std::path::PathBuf;

pub use options::{default_schema, OptionKind, OptionSchema, OptionValue, SetOutcome, SqlModelOptions};
pub use reference::{Reference, ReferenceData, SystemDatabase};
pub use tokenizer::split_token;

use crate::error::Dir2DacError;

/// Filter applied when a `/sourcePath=` token omits one
pub const DEFAULT_SOURCE_FILTER: &str = "*.sql";

/// Target SQL Server version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SqlServerVersion {
    Sql90,  // SQL Server 2005
    Sql100, // SQL Server 2008
    Sql110, // SQL Server 2012
    Sql120, // SQL Server 2014
    Sql130, // SQL Server 2016
    Sql140, // SQL Server 2017
    Sql150, // SQL Server 2019
    Sql160, // SQL Server 2022
}

impl Default for SqlServerVersion {
    fn default() -> Self {
        SqlServerVersion::Sql160
    }
}

impl std::str::FromStr for SqlServerVersion {
    type Err = Dir2DacError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sql90" => Ok(SqlServerVersion::Sql90),
            "sql100" => Ok(SqlServerVersion::Sql100),
            "sql110" => Ok(SqlServerVersion::Sql110),
            "sql120" => Ok(SqlServerVersion::Sql120),
            "sql130" => Ok(SqlServerVersion::Sql130),
            "sql140" => Ok(SqlServerVersion::Sql140),
            "sql150" => Ok(SqlServerVersion::Sql150),
            "sql160" => Ok(SqlServerVersion::Sql160),
            _ => Err(Dir2DacError::UnknownServerVersionError {
                version: s.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for SqlServerVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SqlServerVersion::Sql90 => "SQL90",
            SqlServerVersion::Sql100 => "SQL100",
            SqlServerVersion::Sql110 => "SQL110",
            SqlServerVersion::Sql120 => "SQL120",
            SqlServerVersion::Sql130 => "SQL130",
            SqlServerVersion::Sql140 => "SQL140",
            SqlServerVersion::Sql150 => "SQL150",
            SqlServerVersion::Sql160 => "SQL160",
        };
        write!(f, "{}", name)
    }
}

/// A directory to enumerate SQL scripts from, with a filename filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePathEntry {
    pub path: PathBuf,
    pub filter: String,
}

/// Policy for `/do=` option names absent from the schema.
///
/// Observed behavior of the original tool is ambiguous here, so the policy
/// is an explicit caller choice rather than a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownOptionPolicy {
    Reject,
    Ignore,
}

/// Parsed invocation configuration, immutable after parse
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    /// Source directories in insertion order; order drives file enumeration
    pub source_paths: Vec<SourcePathEntry>,
    pub pre_compare_script: Option<PathBuf>,
    pub post_compare_script: Option<PathBuf>,
    /// Output path for the produced dacpac
    pub dacpac_path: Option<PathBuf>,
    pub sql_server_version: SqlServerVersion,
    pub model_options: SqlModelOptions,
    /// References in insertion order
    pub references: Vec<Reference>,
}

fn single_value(token: &str, values: &[String]) -> Result<String, Dir2DacError> {
    if values.len() != 1 {
        return Err(Dir2DacError::TokenFormatError {
            token: token.to_string(),
        });
    }
    Ok(values[0].clone())
}

impl Configuration {
    /// Parse CLI tokens with the default schema, rejecting unknown `/do=` names.
    pub fn from_args<I, S>(args: I) -> Result<Self, Dir2DacError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_args_with(args, UnknownOptionPolicy::Reject, default_schema())
    }

    /// Parse CLI tokens with an explicit unknown-option policy and schema.
    pub fn from_args_with<I, S>(
        args: I,
        policy: UnknownOptionPolicy,
        schema: &OptionSchema,
    ) -> Result<Self, Dir2DacError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Configuration::default();

        for raw in args {
            let raw = raw.as_ref();
            let (key, values) = split_token(raw)?;

            match key.to_ascii_lowercase().as_str() {
                "sourcepath" => {
                    if values.len() > 2 {
                        return Err(Dir2DacError::TokenFormatError {
                            token: raw.to_string(),
                        });
                    }
                    let filter = values
                        .get(1)
                        .cloned()
                        .unwrap_or_else(|| DEFAULT_SOURCE_FILTER.to_string());
                    config.source_paths.push(SourcePathEntry {
                        path: PathBuf::from(&values[0]),
                        filter,
                    });
                }
                "precompare" => {
                    config.pre_compare_script = Some(PathBuf::from(single_value(raw, &values)?));
                }
                "postcompare" => {
                    config.post_compare_script = Some(PathBuf::from(single_value(raw, &values)?));
                }
                "dp" => {
                    config.dacpac_path = Some(PathBuf::from(single_value(raw, &values)?));
                }
                "sv" => {
                    config.sql_server_version = single_value(raw, &values)?.parse()?;
                }
                "do" | "databaseoption" => {
                    if values.len() != 2 {
                        return Err(Dir2DacError::TokenFormatError {
                            token: raw.to_string(),
                        });
                    }
                    let outcome = config.model_options.set(schema, &values[0], &values[1])?;
                    if outcome == SetOutcome::Unknown && policy == UnknownOptionPolicy::Reject {
                        return Err(Dir2DacError::UnknownModelOptionError {
                            name: values[0].clone(),
                        });
                    }
                }
                "r" => {
                    let reference = Reference::from_segments(&values[0], &values[1..])?;
                    config.references.push(reference);
                }
                _ => {
                    return Err(Dir2DacError::UnknownKeyError { key });
                }
            }
        }

        Ok(config)
    }

    /// SQLCMD variable names required across all references, first-seen order,
    /// deduplicated
    pub fn required_sqlcmd_vars(&self) -> Vec<String> {
        let mut vars: Vec<String> = Vec::new();
        for reference in &self.references {
            for var in reference.data().required_sqlcmd_vars {
                if !vars.contains(&var) {
                    vars.push(var);
                }
            }
        }
        vars
    }
}
