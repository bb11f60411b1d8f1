//! Helper functions for parsing YAML schemas
//!
//! Utilities for extracting typed values from YAML mappings, with errors
//! naming the offending field.

use crate::error::{SchemaError, SchemaResult};
use std::collections::HashMap;
use yaml_rust2::Yaml;

/// Look up `key` in a YAML mapping.
pub(super) fn get_hash_value<'a>(yaml: &'a Yaml, key: &str) -> Option<&'a Yaml> {
    yaml.as_hash()?.get(&Yaml::String(key.to_string()))
}

/// Get a string value from a hash by key
pub(super) fn get_hash_string(yaml: &Yaml, key: &str) -> SchemaResult<Option<String>> {
    if let Some(value) = get_hash_value(yaml, key) {
        if let Some(s) = value.as_str() {
            return Ok(Some(s.to_string()));
        }
        return Err(SchemaError::invalid(format!(
            "Field '{}' must be a string",
            key
        )));
    }
    Ok(None)
}

/// Get a number value from a hash by key
pub(super) fn get_hash_number(yaml: &Yaml, key: &str) -> SchemaResult<Option<f64>> {
    if let Some(value) = get_hash_value(yaml, key) {
        match value {
            Yaml::Integer(i) => return Ok(Some(*i as f64)),
            Yaml::Real(_) => {
                if let Some(f) = value.as_f64() {
                    return Ok(Some(f));
                }
            }
            _ => {}
        }
        return Err(SchemaError::invalid(format!(
            "Field '{}' must be a number",
            key
        )));
    }
    Ok(None)
}

/// Get a usize value from a hash by key
pub(super) fn get_hash_usize(yaml: &Yaml, key: &str) -> SchemaResult<Option<usize>> {
    if let Some(value) = get_hash_value(yaml, key) {
        if let Some(i) = value.as_i64()
            && let Ok(n) = usize::try_from(i)
        {
            return Ok(Some(n));
        }
        return Err(SchemaError::invalid(format!(
            "Field '{}' must be a non-negative integer",
            key
        )));
    }
    Ok(None)
}

/// Get a boolean value from a hash by key
pub(super) fn get_hash_bool(yaml: &Yaml, key: &str) -> SchemaResult<Option<bool>> {
    if let Some(value) = get_hash_value(yaml, key) {
        if let Some(b) = value.as_bool() {
            return Ok(Some(b));
        }
        return Err(SchemaError::invalid(format!(
            "Field '{}' must be a boolean",
            key
        )));
    }
    Ok(None)
}

/// Get tags (a hash of key-value pairs) from a schema
pub(super) fn get_hash_tags(
    yaml: &Yaml,
) -> SchemaResult<Option<HashMap<String, serde_json::Value>>> {
    if let Some(value) = get_hash_value(yaml, "tags") {
        let entries = value
            .as_hash()
            .ok_or_else(|| SchemaError::invalid("tags must be an object"))?;

        let mut tags = HashMap::new();
        for (key, value) in entries {
            let key = key
                .as_str()
                .ok_or_else(|| SchemaError::invalid("tag key must be a string"))?;
            tags.insert(key.to_string(), yaml_to_json_value(value)?);
        }
        return Ok(Some(tags));
    }
    Ok(None)
}

/// Convert a scalar yaml-rust2 value to serde_json::Value (for enum values and tags)
pub(super) fn yaml_to_json_value(yaml: &Yaml) -> SchemaResult<serde_json::Value> {
    match yaml {
        Yaml::String(s) => Ok(serde_json::Value::String(s.clone())),
        Yaml::Integer(i) => Ok(serde_json::Value::Number((*i).into())),
        Yaml::Real(r) => {
            if let Some(f) = yaml.as_f64()
                && let Some(n) = serde_json::Number::from_f64(f)
            {
                return Ok(serde_json::Value::Number(n));
            }
            Err(SchemaError::invalid(format!("Invalid number: {}", r)))
        }
        Yaml::Boolean(b) => Ok(serde_json::Value::Bool(*b)),
        Yaml::Null => Ok(serde_json::Value::Null),
        _ => Err(SchemaError::invalid(
            "Unsupported YAML type for JSON conversion",
        )),
    }
}
