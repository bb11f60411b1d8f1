//! Error types for tree mutation.

use std::fmt;
use thiserror::Error;

/// Errors surfaced by [`update`](crate::update) and path resolution.
///
/// A failed update reports exactly one of these two kinds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The path could not be walked against the tree's actual shape.
    #[error(transparent)]
    Addressing(#[from] AddressingError),

    /// A schema-bound location rejected the new value.
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
}

/// A path segment could not be resolved against the node at that point.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressingError {
    /// Sequence index outside `[-len, len - 1]`.
    #[error("Index {index} is out of range for sequence of length {len} at {}", location(path))]
    IndexOutOfRange {
        path: String,
        index: i64,
        len: usize,
    },

    /// A key segment addressed a sequence.
    #[error("Cannot use key '{key}' on sequence at {}", location(path))]
    KeyOnSequence { path: String, key: String },

    /// A segment tried to descend into a leaf.
    #[error("Cannot address '{segment}' inside {kind} value at {}", location(path))]
    NotAContainer {
        path: String,
        segment: String,
        kind: &'static str,
    },

    /// A read-only walk hit an absent key.
    #[error("Key '{key}' not found at {}", location(path))]
    KeyNotFound { path: String, key: String },

    /// The path has no segments, so there is no parent to resolve.
    #[error("Empty path has no parent container")]
    EmptyPath,

    /// The path text contains an empty segment (e.g. `a..b`).
    #[error("Empty segment in path '{path}'")]
    EmptySegment { path: String },

    /// The path is deeper than the configured limit.
    #[error("Path has {depth} segments (max depth: {max_depth})")]
    PathTooDeep { depth: usize, max_depth: usize },
}

fn location(path: &str) -> &str {
    if path.is_empty() { "<root>" } else { path }
}

/// Structured validation failure kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationKind {
    /// Type mismatch
    TypeMismatch { expected: String, got: String },

    /// A required field is absent
    MissingRequiredField { field: String },

    /// A field the schema does not declare
    UnknownField { field: String },

    /// Value not in enum
    InvalidEnumValue { value: String, allowed: Vec<String> },

    /// Number out of range
    NumberOutOfRange {
        value: f64,
        minimum: Option<f64>,
        maximum: Option<f64>,
    },

    /// String length invalid
    StringLengthInvalid {
        length: usize,
        min_length: Option<usize>,
        max_length: Option<usize>,
    },

    /// String doesn't match pattern
    StringPatternMismatch { value: String, pattern: String },

    /// Sequence length invalid
    ArrayLengthInvalid {
        length: usize,
        min_items: Option<usize>,
        max_items: Option<usize>,
    },

    /// Anything that doesn't fit the variants above.
    ///
    /// Prefer adding a structured variant over reaching for this one.
    Other { message: String },
}

impl ViolationKind {
    /// Format a human-readable message from this kind
    pub fn message(&self) -> String {
        match self {
            ViolationKind::TypeMismatch { expected, got } => {
                format!("Expected {}, got {}", expected, got)
            }
            ViolationKind::MissingRequiredField { field } => {
                format!("Missing required field '{}'", field)
            }
            ViolationKind::UnknownField { field } => format!("Unknown field '{}'", field),
            ViolationKind::InvalidEnumValue { value, allowed } => {
                format!(
                    "Value must be one of: {}, got '{}'",
                    allowed.join(", "),
                    value
                )
            }
            ViolationKind::NumberOutOfRange {
                value,
                minimum,
                maximum,
            } => {
                if let Some(min) = minimum {
                    format!("Number {} is less than minimum {}", value, min)
                } else if let Some(max) = maximum {
                    format!("Number {} is greater than maximum {}", value, max)
                } else {
                    format!("Number {} is out of range", value)
                }
            }
            ViolationKind::StringLengthInvalid {
                length,
                min_length,
                max_length,
            } => {
                if let Some(min) = min_length {
                    format!("String length {} is less than minimum {}", length, min)
                } else if let Some(max) = max_length {
                    format!("String length {} is greater than maximum {}", length, max)
                } else {
                    format!("String length {} is invalid", length)
                }
            }
            ViolationKind::StringPatternMismatch { value, pattern } => {
                format!("String '{}' does not match pattern '{}'", value, pattern)
            }
            ViolationKind::ArrayLengthInvalid {
                length,
                min_items,
                max_items,
            } => {
                if let Some(min) = min_items {
                    format!("Sequence length {} is less than minimum {}", length, min)
                } else if let Some(max) = max_items {
                    format!("Sequence length {} is greater than maximum {}", length, max)
                } else {
                    format!("Sequence length {} is invalid", length)
                }
            }
            ViolationKind::Other { message } => message.clone(),
        }
    }
}

/// A candidate node that does not conform to a bound schema.
#[derive(Debug, Clone, PartialEq, Error)]
pub struct ValidationFailure {
    /// Name of the schema that rejected the value
    pub schema: String,
    /// Location of the offending node (e.g. `["modules", "0"]`)
    pub path: Vec<String>,
    /// What went wrong
    pub kind: ViolationKind,
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Validation error in {} at {}: {}",
            self.schema,
            location(&self.path.join(".")),
            self.kind.message()
        )
    }
}

impl ValidationFailure {
    pub fn new(schema: impl Into<String>, path: Vec<String>, kind: ViolationKind) -> Self {
        Self {
            schema: schema.into(),
            path,
            kind,
        }
    }

    /// Get the human-readable message for this failure
    pub fn message(&self) -> String {
        self.kind.message()
    }

    /// Re-anchor the failure path under `prefix`.
    ///
    /// Validators report paths relative to the node they were handed; the
    /// update operation prefixes the location of that node in the tree.
    pub fn rooted_at(mut self, prefix: &[String]) -> Self {
        if !prefix.is_empty() {
            let mut path = prefix.to_vec();
            path.append(&mut self.path);
            self.path = path;
        }
        self
    }
}
