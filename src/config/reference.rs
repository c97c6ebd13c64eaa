//! External package references (`/r=` tokens).
//!
//! Each reference declares a dacpac dependency together with the derived
//! metadata the model builder records: ordered name/value items and the
//! SQLCMD variable names the target name substitutes at deploy time.

use crate::error::Dir2DacError;

/// System databases referencable without a SQLCMD variable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemDatabase {
    Master,
    Msdb,
}

impl SystemDatabase {
    pub fn name(&self) -> &'static str {
        match self {
            SystemDatabase::Master => "master",
            SystemDatabase::Msdb => "msdb",
        }
    }
}

/// A declared external dependency of the produced package
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// Same-project self reference
    This {
        file_name: String,
        logical_name: String,
    },
    /// Another database in the same server context
    Other {
        file_name: String,
        logical_name: String,
        database_variable: String,
    },
    /// A database on another server. The server variable is opaque and may
    /// itself contain a comma (`server,port`); it is never split.
    OtherServer {
        file_name: String,
        logical_name: String,
        database_variable: String,
        server_variable: String,
    },
    /// master / msdb system reference with fixed naming
    System {
        file_name: String,
        database: SystemDatabase,
    },
}

/// Derived metadata view shared by all reference variants
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceData {
    /// Ordered name/value pairs: FileName, LogicalName, then ExternalParts
    /// for variants that have one
    pub items: Vec<(String, String)>,
    /// SQLCMD variable names the deployment must supply
    pub required_sqlcmd_vars: Vec<String>,
}

fn expect_arity(kind: &str, expected: usize, args: &[String]) -> Result<(), Dir2DacError> {
    if args.len() != expected {
        return Err(Dir2DacError::ReferenceArityError {
            kind: kind.to_string(),
            expected,
            actual: args.len(),
        });
    }
    Ok(())
}

impl Reference {
    /// Build a reference from its kind tag and the remaining value segments
    /// of a `/r=` token. The tag is case-insensitive; arity is exact.
    pub fn from_segments(kind: &str, args: &[String]) -> Result<Self, Dir2DacError> {
        match kind.to_ascii_lowercase().as_str() {
            "this" => {
                expect_arity(kind, 2, args)?;
                Ok(Reference::This {
                    file_name: args[0].clone(),
                    logical_name: args[1].clone(),
                })
            }
            "other" => {
                expect_arity(kind, 3, args)?;
                Ok(Reference::Other {
                    file_name: args[0].clone(),
                    logical_name: args[1].clone(),
                    database_variable: args[2].clone(),
                })
            }
            "otherserver" => {
                expect_arity(kind, 4, args)?;
                Ok(Reference::OtherServer {
                    file_name: args[0].clone(),
                    logical_name: args[1].clone(),
                    database_variable: args[2].clone(),
                    server_variable: args[3].clone(),
                })
            }
            "master" => {
                expect_arity(kind, 1, args)?;
                Ok(Reference::System {
                    file_name: args[0].clone(),
                    database: SystemDatabase::Master,
                })
            }
            "msdb" => {
                expect_arity(kind, 1, args)?;
                Ok(Reference::System {
                    file_name: args[0].clone(),
                    database: SystemDatabase::Msdb,
                })
            }
            _ => Err(Dir2DacError::UnknownReferenceKindError {
                kind: kind.to_string(),
            }),
        }
    }

    /// Path to the referenced dacpac file
    pub fn file_name(&self) -> &str {
        match self {
            Reference::This { file_name, .. }
            | Reference::Other { file_name, .. }
            | Reference::OtherServer { file_name, .. }
            | Reference::System { file_name, .. } => file_name,
        }
    }

    /// Produce the metadata view recorded in the package model
    pub fn data(&self) -> ReferenceData {
        match self {
            Reference::This {
                file_name,
                logical_name,
            } => ReferenceData {
                items: vec![
                    ("FileName".to_string(), file_name.clone()),
                    ("LogicalName".to_string(), logical_name.clone()),
                ],
                required_sqlcmd_vars: Vec::new(),
            },
            Reference::Other {
                file_name,
                logical_name,
                database_variable,
            } => ReferenceData {
                items: vec![
                    ("FileName".to_string(), file_name.clone()),
                    ("LogicalName".to_string(), logical_name.clone()),
                    (
                        "ExternalParts".to_string(),
                        format!("[$({})]", database_variable),
                    ),
                ],
                required_sqlcmd_vars: vec![database_variable.clone()],
            },
            Reference::OtherServer {
                file_name,
                logical_name,
                database_variable,
                server_variable,
            } => ReferenceData {
                items: vec![
                    ("FileName".to_string(), file_name.clone()),
                    ("LogicalName".to_string(), logical_name.clone()),
                    (
                        "ExternalParts".to_string(),
                        format!("[$({})].[$({})]", server_variable, database_variable),
                    ),
                ],
                required_sqlcmd_vars: vec![database_variable.clone(), server_variable.clone()],
            },
            Reference::System {
                file_name,
                database,
            } => ReferenceData {
                items: vec![
                    ("FileName".to_string(), file_name.clone()),
                    ("LogicalName".to_string(), format!("{}.dacpac", database.name())),
                    ("ExternalParts".to_string(), format!("[{}]", database.name())),
                ],
                // System database names are fixed, never substitutable
                required_sqlcmd_vars: Vec::new(),
            },
        }
    }
}
