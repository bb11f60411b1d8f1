//! Schema type definitions
//!
//! Each schema type struct contains:
//! - annotations: Common metadata like description and documentation
//! - type-specific fields: Constraints and validation rules specific to that type

use conftree::Node;
use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::Schema;

/// Annotations that can be attached to any schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaAnnotations {
    /// Short description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Detailed documentation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,

    /// Tags for categorization (e.g., "since: 1.2")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<HashMap<String, serde_json::Value>>,
}

/// Boolean type schema
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BooleanSchema {
    pub annotations: SchemaAnnotations,
}

/// Number type schema (integer or float)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberSchema {
    pub annotations: SchemaAnnotations,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

/// String type schema
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringSchema {
    pub annotations: SchemaAnnotations,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Pattern>,
}

/// A string pattern, compiled once when the schema is built.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

/// Null type schema
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NullSchema {
    pub annotations: SchemaAnnotations,
}

/// Enum type schema
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnumSchema {
    pub annotations: SchemaAnnotations,
    pub values: Vec<serde_json::Value>,
}

/// Any type schema (no validation)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnySchema {
    pub annotations: SchemaAnnotations,
}

/// AnyOf schema (validates if any subschema matches)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnyOfSchema {
    pub annotations: SchemaAnnotations,
    pub schemas: Vec<Schema>,
}

/// Array type schema
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArraySchema {
    pub annotations: SchemaAnnotations,
    pub items: Option<Box<Schema>>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
}

/// A declared property of an object schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    pub schema: Schema,

    /// Value used when the field is absent. A field without a default is
    /// required.
    pub default: Option<Node>,
}

impl FieldSchema {
    pub fn required(schema: Schema) -> Self {
        Self {
            schema,
            default: None,
        }
    }

    pub fn with_default(schema: Schema, default: Node) -> Self {
        Self {
            schema,
            default: Some(default),
        }
    }

    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Object type schema: a named record of declared fields.
///
/// Maps validated against an object schema come back bound to it, so later
/// updates inside them are checked too.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectSchema {
    pub annotations: SchemaAnnotations,

    /// Record name used in failure messages
    pub name: String,

    /// Declared fields, in declaration order
    pub properties: IndexMap<String, FieldSchema>,

    /// Schema for keys that are not declared
    pub additional_properties: Option<Box<Schema>>,

    /// If true, keys that are not declared are rejected (unless
    /// `additional_properties` is set)
    pub closed: bool,
}

impl ObjectSchema {
    /// An empty, closed record.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            annotations: SchemaAnnotations::default(),
            name: name.into(),
            properties: IndexMap::new(),
            additional_properties: None,
            closed: true,
        }
    }

    /// Declare a required field.
    pub fn field(mut self, name: impl Into<String>, schema: Schema) -> Self {
        self.properties
            .insert(name.into(), FieldSchema::required(schema));
        self
    }

    /// Declare a field with a default value.
    pub fn optional(mut self, name: impl Into<String>, schema: Schema, default: Node) -> Self {
        self.properties
            .insert(name.into(), FieldSchema::with_default(schema, default));
        self
    }

    /// Accept undeclared keys without checking them.
    pub fn open(mut self) -> Self {
        self.closed = false;
        self
    }

    /// Accept undeclared keys, checking them against `schema`.
    pub fn additional(mut self, schema: Schema) -> Self {
        self.additional_properties = Some(Box::new(schema));
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.annotations.description = Some(description.into());
        self
    }

    pub fn get_field(&self, name: &str) -> Option<&FieldSchema> {
        self.properties.get(name)
    }

    /// Whether an undeclared key is acceptable.
    pub fn accepts_undeclared(&self) -> bool {
        !self.closed || self.additional_properties.is_some()
    }
}
