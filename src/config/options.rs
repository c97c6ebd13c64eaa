//! Typed database model options (`/do=name=value` tokens).
//!
//! Each option name maps to a statically known value kind. The schema is an
//! explicit table rather than a lookup baked into the parsing code, so tests
//! can inject alternate schemas.

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;

use crate::error::Dir2DacError;

/// The declared value kind of a model option
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    Bool,
    Int,
    String,
}

impl OptionKind {
    fn expected(&self) -> &'static str {
        match self {
            OptionKind::Bool => "true or false",
            OptionKind::Int => "an integer",
            OptionKind::String => "a string",
        }
    }
}

/// A coerced option value
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
    String(String),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Int(i) => write!(f, "{}", i),
            OptionValue::String(s) => write!(f, "{}", s),
        }
    }
}

/// Name-to-kind table for recognized model options.
///
/// Lookups are case-insensitive; the canonical spelling is the one stored in
/// the table and is the key under which coerced values are filed.
#[derive(Debug, Clone)]
pub struct OptionSchema {
    entries: Vec<(String, OptionKind)>,
}

impl OptionSchema {
    pub fn new<'a>(entries: impl IntoIterator<Item = (&'a str, OptionKind)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, kind)| (name.to_string(), kind))
                .collect(),
        }
    }

    /// Look up an option by name, returning its canonical spelling and kind.
    pub fn kind_of(&self, name: &str) -> Option<(&str, OptionKind)> {
        self.entries
            .iter()
            .find(|(canonical, _)| canonical.eq_ignore_ascii_case(name))
            .map(|(canonical, kind)| (canonical.as_str(), *kind))
    }
}

/// The fixed production schema, mirroring the DacFx model option surface.
static DEFAULT_SCHEMA: Lazy<OptionSchema> = Lazy::new(|| {
    use OptionKind::*;
    OptionSchema::new([
        ("AnsiNullDefaultOn", Bool),
        ("AnsiNullsOn", Bool),
        ("AnsiPaddingOn", Bool),
        ("AnsiWarningsOn", Bool),
        ("ArithAbortOn", Bool),
        ("AutoClose", Bool),
        ("AutoCreateStatistics", Bool),
        ("AutoShrink", Bool),
        ("AutoUpdateStatistics", Bool),
        ("ChangeTrackingEnabled", Bool),
        ("ChangeTrackingRetentionPeriod", Int),
        ("Collation", String),
        ("CompatibilityLevel", Int),
        ("ConcatNullYieldsNullOn", Bool),
        ("DbChainingOn", Bool),
        ("FullTextEnabled", Bool),
        ("NumericRoundAbortOn", Bool),
        ("PageVerifyMode", String),
        ("QuotedIdentifierOn", Bool),
        ("ReadOnly", Bool),
        ("RecoveryMode", String),
        ("RecursiveTriggersOn", Bool),
        ("Trustworthy", Bool),
        ("TwoDigitYearCutoff", Int),
        ("VardecimalStorageFormatOn", Bool),
    ])
});

/// The fixed production option schema
pub fn default_schema() -> &'static OptionSchema {
    &DEFAULT_SCHEMA
}

/// Outcome of a coercion attempt: the name may be absent from the schema,
/// in which case the caller decides whether to reject or ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetOutcome {
    Set,
    Unknown,
}

/// Bag of coerced model option values, keyed by canonical option name
#[derive(Debug, Clone, Default)]
pub struct SqlModelOptions {
    values: BTreeMap<String, OptionValue>,
}

impl SqlModelOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Coerce a raw value against the schema and store it.
    ///
    /// Last write wins for repeated names. A name absent from the schema is
    /// reported as `SetOutcome::Unknown`, not an error at this layer.
    pub fn set(
        &mut self,
        schema: &OptionSchema,
        name: &str,
        raw: &str,
    ) -> Result<SetOutcome, Dir2DacError> {
        let Some((canonical, kind)) = schema.kind_of(name) else {
            return Ok(SetOutcome::Unknown);
        };

        let value = match kind {
            OptionKind::Bool => {
                if raw.eq_ignore_ascii_case("true") {
                    OptionValue::Bool(true)
                } else if raw.eq_ignore_ascii_case("false") {
                    OptionValue::Bool(false)
                } else {
                    return Err(Dir2DacError::OptionCoercionError {
                        name: canonical.to_string(),
                        value: raw.to_string(),
                        expected: kind.expected(),
                    });
                }
            }
            OptionKind::Int => match raw.parse::<i64>() {
                Ok(i) => OptionValue::Int(i),
                Err(_) => {
                    return Err(Dir2DacError::OptionCoercionError {
                        name: canonical.to_string(),
                        value: raw.to_string(),
                        expected: kind.expected(),
                    })
                }
            },
            OptionKind::String => OptionValue::String(raw.to_string()),
        };

        self.values.insert(canonical.to_string(), value);
        Ok(SetOutcome::Set)
    }

    /// Case-insensitive value lookup
    pub fn get(&self, name: &str) -> Option<&OptionValue> {
        self.values
            .iter()
            .find(|(canonical, _)| canonical.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name) {
            Some(OptionValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(OptionValue::Int(i)) => Some(*i),
            _ => None,
        }
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(OptionValue::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate stored values by canonical name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}
