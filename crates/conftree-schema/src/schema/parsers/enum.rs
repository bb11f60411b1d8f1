//! Enum schema parser
//!
//! This module handles parsing of enum schemas which define a fixed set
//! of allowed values. Supports both inline and explicit forms:
//! - Inline: enum: [val1, val2, val3]
//! - Explicit: enum: { values: [...], description: "..." }

use crate::error::{SchemaError, SchemaResult};
use yaml_rust2::Yaml;

use crate::schema::Schema;
use crate::schema::annotations::parse_annotations;
use crate::schema::helpers::{get_hash_value, yaml_to_json_value};
use crate::schema::types::EnumSchema;

/// Parse an enum schema
///
/// Handles both inline array form and explicit object form with annotations
pub(in crate::schema) fn parse_enum_schema(yaml: &Yaml) -> SchemaResult<Schema> {
    let annotations = parse_annotations(yaml)?;

    let items = if let Some(values_yaml) = get_hash_value(yaml, "values") {
        values_yaml
            .as_vec()
            .ok_or_else(|| SchemaError::invalid("enum values must be an array"))?
    } else {
        yaml.as_vec()
            .ok_or_else(|| SchemaError::invalid("Expected array for inline enum"))?
    };

    let values = items
        .iter()
        .map(yaml_to_json_value)
        .collect::<SchemaResult<Vec<_>>>()?;

    Ok(Schema::Enum(EnumSchema {
        annotations,
        values,
    }))
}
