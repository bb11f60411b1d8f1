//! Schema definitions
//!
//! A [`Schema`] describes the shape of a configuration value. Schemas are
//! either built in code with the constructors below or read from a YAML
//! definition with [`Schema::from_yaml`]:
//!
//! ```yaml
//! object:
//!   name: Module
//!   properties:
//!     name: string
//!     classes:
//!       arrayOf: string
//!     version:
//!       schema: number
//!       default: 1
//! ```

mod annotations;
mod helpers;
mod parser;
mod parsers;
mod types;

use std::sync::Arc;

pub use types::{
    AnyOfSchema, AnySchema, ArraySchema, BooleanSchema, EnumSchema, FieldSchema, NullSchema,
    NumberSchema, ObjectSchema, Pattern, SchemaAnnotations, StringSchema,
};

use crate::error::SchemaResult;
use yaml_rust2::{Yaml, YamlLoader};

/// A schema for one configuration value.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Any(AnySchema),
    Boolean(BooleanSchema),
    Number(NumberSchema),
    String(StringSchema),
    Null(NullSchema),
    Enum(EnumSchema),
    AnyOf(AnyOfSchema),
    Array(ArraySchema),
    /// Shared so that validated maps can carry the object schema as their
    /// binding.
    Object(Arc<ObjectSchema>),
}

impl Schema {
    pub fn any() -> Self {
        Schema::Any(AnySchema::default())
    }

    pub fn boolean() -> Self {
        Schema::Boolean(BooleanSchema::default())
    }

    pub fn number() -> Self {
        Schema::Number(NumberSchema::default())
    }

    pub fn string() -> Self {
        Schema::String(StringSchema::default())
    }

    pub fn null() -> Self {
        Schema::Null(NullSchema::default())
    }

    /// A schema accepting exactly the given values.
    pub fn enumeration<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<serde_json::Value>,
    {
        Schema::Enum(EnumSchema {
            annotations: SchemaAnnotations::default(),
            values: values.into_iter().map(Into::into).collect(),
        })
    }

    pub fn any_of(schemas: Vec<Schema>) -> Self {
        Schema::AnyOf(AnyOfSchema {
            annotations: SchemaAnnotations::default(),
            schemas,
        })
    }

    /// A sequence whose items all match `items`.
    pub fn array_of(items: Schema) -> Self {
        Schema::Array(ArraySchema {
            items: Some(Box::new(items)),
            ..Default::default()
        })
    }

    pub fn object(schema: ObjectSchema) -> Self {
        Schema::Object(Arc::new(schema))
    }

    /// Get the annotations for this schema
    pub fn annotations(&self) -> &SchemaAnnotations {
        match self {
            Schema::Any(s) => &s.annotations,
            Schema::Boolean(s) => &s.annotations,
            Schema::Number(s) => &s.annotations,
            Schema::String(s) => &s.annotations,
            Schema::Null(s) => &s.annotations,
            Schema::Enum(s) => &s.annotations,
            Schema::AnyOf(s) => &s.annotations,
            Schema::Array(s) => &s.annotations,
            Schema::Object(s) => &s.annotations,
        }
    }

    /// Short name of the schema kind, used as the expected type in
    /// mismatch failures.
    pub fn type_name(&self) -> &str {
        match self {
            Schema::Any(_) => "any",
            Schema::Boolean(_) => "boolean",
            Schema::Number(_) => "number",
            Schema::String(_) => "string",
            Schema::Null(_) => "null",
            Schema::Enum(_) => "enum",
            Schema::AnyOf(_) => "anyOf",
            Schema::Array(_) => "array",
            Schema::Object(s) => s.name.as_str(),
        }
    }

    /// Parse a schema from a YAML value.
    pub fn from_yaml(yaml: &Yaml) -> SchemaResult<Schema> {
        parser::from_yaml(yaml)
    }

    /// Parse a schema from the first document of a YAML string.
    pub fn from_yaml_str(text: &str) -> SchemaResult<Schema> {
        let docs = YamlLoader::load_from_str(text)?;
        match docs.first() {
            Some(yaml) => parser::from_yaml(yaml),
            None => Err(crate::error::SchemaError::invalid("Empty schema document")),
        }
    }
}

impl From<ObjectSchema> for Schema {
    fn from(schema: ObjectSchema) -> Self {
        Schema::object(schema)
    }
}
