//! Schema violations reported while resolving block attributes.
//!
//! Violations are diagnostics: the offending value is left in place and the
//! caller decides what to do with the report.

use serde::Serialize;
use thiserror::Error;

/// What went wrong with a single attribute value.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViolationKind {
    #[error("required value is missing")]
    MissingRequired,

    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("'{value}' is not one of {allowed:?}")]
    NotAllowed { value: String, allowed: Vec<String> },

    #[error("length {length} is below the minimum of {min}")]
    TooShort { length: usize, min: usize },

    #[error("length {length} exceeds the maximum of {max}")]
    TooLong { length: usize, max: usize },

    #[error("{value} is outside the range {min:?}..={max:?}")]
    OutOfRange {
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
    },

    #[error("nested record is not an object")]
    MalformedNested,

    #[error("component type '{component}' is not registered")]
    UnknownComponent { component: String },
}

/// A violation located at an attribute path within a block.
///
/// `path` is the attribute name, or `parent[index].child` for values inside
/// repeatable components.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[error("{type_id} {path}: {kind}")]
pub struct SchemaViolation {
    pub type_id: String,
    pub path: String,
    pub kind: ViolationKind,
}

impl SchemaViolation {
    pub fn new(type_id: &str, path: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            type_id: type_id.to_string(),
            path: path.into(),
            kind,
        }
    }

    /// Re-anchor a violation found in a nested record onto its parent block.
    pub(crate) fn nested_under(mut self, type_id: &str, prefix: &str) -> Self {
        self.type_id = type_id.to_string();
        self.path = format!("{prefix}.{}", self.path);
        self
    }
}
