//! Schema parser entry point
//!
//! A schema is either a bare type name (`string`) or a single-key mapping
//! whose key names the type and whose value configures it
//! (`arrayOf: string`, `object: {...}`).

use crate::error::{SchemaError, SchemaResult};
use yaml_rust2::Yaml;

use super::Schema;
use super::parsers::{
    parse_any_schema, parse_anyof_schema, parse_array_schema, parse_arrayof_schema,
    parse_boolean_schema, parse_enum_schema, parse_maybe_arrayof_schema, parse_null_schema,
    parse_number_schema, parse_object_schema, parse_string_schema,
};

/// Parse a schema from YAML
pub(in crate::schema) fn from_yaml(yaml: &Yaml) -> SchemaResult<Schema> {
    match yaml {
        Yaml::String(name) => parse_short_form(name),
        Yaml::Hash(hash) => {
            let mut entries = hash.iter();
            let (Some((key, value)), None) = (entries.next(), entries.next()) else {
                return Err(SchemaError::invalid(
                    "Schema object must have exactly one key naming its type",
                ));
            };
            let key = key
                .as_str()
                .ok_or_else(|| SchemaError::invalid("Schema type must be a string"))?;
            parse_long_form(key, value)
        }
        _ => Err(SchemaError::invalid(
            "Expected a schema type name or a schema object",
        )),
    }
}

/// `string`, `number`, ...
fn parse_short_form(name: &str) -> SchemaResult<Schema> {
    match name {
        "any" => Ok(Schema::any()),
        "boolean" => Ok(Schema::boolean()),
        "number" => Ok(Schema::number()),
        "string" => Ok(Schema::string()),
        "null" => Ok(Schema::null()),
        other => Err(SchemaError::InvalidType(other.to_string())),
    }
}

/// `type: <options>`
fn parse_long_form(key: &str, value: &Yaml) -> SchemaResult<Schema> {
    match key {
        "any" => parse_any_schema(value),
        "boolean" => parse_boolean_schema(value),
        "number" => parse_number_schema(value),
        "string" => parse_string_schema(value),
        "null" => parse_null_schema(value),
        "enum" => parse_enum_schema(value),
        "anyOf" => parse_anyof_schema(value),
        "array" => parse_array_schema(value),
        "arrayOf" => parse_arrayof_schema(value),
        "maybeArrayOf" => parse_maybe_arrayof_schema(value),
        "object" => parse_object_schema(value),
        other => Err(SchemaError::InvalidType(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_forms() {
        assert_eq!(Schema::from_yaml_str("string").unwrap(), Schema::string());
        assert_eq!(Schema::from_yaml_str("any").unwrap(), Schema::any());
        assert_eq!(Schema::from_yaml_str("null").unwrap(), Schema::null());
    }

    #[test]
    fn test_unknown_type() {
        let err = Schema::from_yaml_str("widget").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidType(ref t) if t == "widget"));

        let err = Schema::from_yaml_str("widget: {}").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidType(ref t) if t == "widget"));
    }

    #[test]
    fn test_long_form_needs_exactly_one_key() {
        let err = Schema::from_yaml_str("string: {}\nnumber: {}").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidStructure { .. }));
        assert!(Schema::from_yaml_str("[string]").is_err());
    }
}
