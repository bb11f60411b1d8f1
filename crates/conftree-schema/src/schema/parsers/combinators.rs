//! Combinator schema parsers
//!
//! This module handles parsing of schema combinators:
//! - anyOf: Validates if any subschema matches
//! - maybeArrayOf: Expands to anyOf(T, arrayOf(T))
//!
//! anyOf supports inline array form and explicit object form with annotations.

use crate::error::{SchemaError, SchemaResult};
use yaml_rust2::Yaml;

use crate::schema::Schema;
use crate::schema::annotations::parse_annotations;
use crate::schema::helpers::get_hash_value;
use crate::schema::parser::from_yaml;
use crate::schema::types::{AnyOfSchema, SchemaAnnotations};

/// Parse an anyOf schema
///
/// Validates if any of the subschemas matches. Supports:
/// - Inline form: anyOf: [schema1, schema2, ...]
/// - Explicit form: anyOf: { schemas: [...], description: "..." }
pub(in crate::schema) fn parse_anyof_schema(yaml: &Yaml) -> SchemaResult<Schema> {
    let annotations = parse_annotations(yaml)?;

    let items = if let Some(schemas_yaml) = get_hash_value(yaml, "schemas") {
        schemas_yaml
            .as_vec()
            .ok_or_else(|| SchemaError::invalid("anyOf schemas must be an array"))?
    } else {
        yaml.as_vec()
            .ok_or_else(|| SchemaError::invalid("Expected array for anyOf"))?
    };

    let schemas = items.iter().map(from_yaml).collect::<SchemaResult<Vec<_>>>()?;
    if schemas.is_empty() {
        return Err(SchemaError::invalid("anyOf needs at least one schema"));
    }

    Ok(Schema::AnyOf(AnyOfSchema {
        annotations,
        schemas,
    }))
}

/// Parse a maybeArrayOf schema
///
/// `maybeArrayOf: T` accepts either a single `T` or a sequence of them.
pub(in crate::schema) fn parse_maybe_arrayof_schema(yaml: &Yaml) -> SchemaResult<Schema> {
    let inner = from_yaml(yaml)?;
    Ok(Schema::AnyOf(AnyOfSchema {
        annotations: SchemaAnnotations::default(),
        schemas: vec![inner.clone(), Schema::array_of(inner)],
    }))
}
