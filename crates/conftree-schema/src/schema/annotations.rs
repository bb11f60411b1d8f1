//! Schema annotation parsing
//!
//! Annotations (description, documentation, tags) can be attached to any
//! schema type in its explicit form.

use crate::error::SchemaResult;
use yaml_rust2::Yaml;

use super::helpers::{get_hash_string, get_hash_tags};
use super::types::SchemaAnnotations;

/// Parse common annotations from a schema object
///
/// Non-mapping forms (e.g. the inline `enum: [a, b]`) carry no annotations.
pub(super) fn parse_annotations(yaml: &Yaml) -> SchemaResult<SchemaAnnotations> {
    if yaml.as_hash().is_none() {
        return Ok(SchemaAnnotations::default());
    }
    Ok(SchemaAnnotations {
        description: get_hash_string(yaml, "description")?,
        documentation: get_hash_string(yaml, "documentation")?,
        tags: get_hash_tags(yaml)?,
    })
}
