//! Object schema parser
//!
//! Format:
//! ```yaml
//! object:
//!   name: Server              # used in failure messages
//!   closed: true              # default
//!   properties:
//!     host: string            # required: no default
//!     port:
//!       schema: number
//!       default: 8080
//!   additionalProperties: string
//! ```
//!
//! A property is required exactly when it declares no `default`. Defaults
//! are checked against the property schema when the schema is read.

use crate::error::{SchemaError, SchemaResult};
use conftree::{Conformance, node_from_yaml};
use indexmap::IndexMap;
use yaml_rust2::Yaml;

use crate::schema::Schema;
use crate::schema::annotations::parse_annotations;
use crate::schema::helpers::{get_hash_bool, get_hash_string, get_hash_value};
use crate::schema::parser::from_yaml;
use crate::schema::types::{FieldSchema, ObjectSchema};
use crate::validator;

const ANONYMOUS: &str = "object";

pub(in crate::schema) fn parse_object_schema(yaml: &Yaml) -> SchemaResult<Schema> {
    if !matches!(yaml, Yaml::Null | Yaml::Hash(_)) {
        return Err(SchemaError::invalid("Options for object must be an object"));
    }

    let name = get_hash_string(yaml, "name")?.unwrap_or_else(|| ANONYMOUS.to_string());
    let closed = get_hash_bool(yaml, "closed")?.unwrap_or(true);

    let mut properties = IndexMap::new();
    if let Some(props_yaml) = get_hash_value(yaml, "properties") {
        let entries = props_yaml
            .as_hash()
            .ok_or_else(|| SchemaError::invalid("properties must be an object"))?;
        for (key, value) in entries {
            let key = key
                .as_str()
                .ok_or_else(|| SchemaError::invalid("property name must be a string"))?;
            properties.insert(key.to_string(), parse_field(key, value)?);
        }
    }

    let additional_properties = match get_hash_value(yaml, "additionalProperties") {
        Some(additional) => Some(Box::new(from_yaml(additional)?)),
        None => None,
    };

    Ok(Schema::object(ObjectSchema {
        annotations: parse_annotations(yaml)?,
        name,
        properties,
        additional_properties,
        closed,
    }))
}

/// A property is either a bare schema or `{schema, default}`.
fn parse_field(key: &str, yaml: &Yaml) -> SchemaResult<FieldSchema> {
    let Some(schema_yaml) = get_hash_value(yaml, "schema") else {
        if get_hash_value(yaml, "default").is_some() {
            return Err(SchemaError::MissingField {
                field: format!("{}.schema", key),
            });
        }
        return Ok(FieldSchema::required(from_yaml(yaml)?));
    };

    let schema = from_yaml(schema_yaml)?;
    let Some(default_yaml) = get_hash_value(yaml, "default") else {
        return Ok(FieldSchema::required(schema));
    };

    let default = validator::validate(
        node_from_yaml(default_yaml.clone()),
        &schema,
        Conformance::FillDefaults,
    )
    .map_err(|failure| {
        SchemaError::invalid(format!(
            "Default for '{}' does not match its schema: {}",
            key,
            failure.message()
        ))
    })?;
    Ok(FieldSchema::with_default(schema, default))
}
