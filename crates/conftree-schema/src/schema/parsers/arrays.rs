//! Array schema parser
//!
//! This module handles parsing of array schemas which validate sequences.
//! Arrays can have:
//! - items: Schema for sequence elements
//! - minItems/maxItems: Length constraints
//!
//! Also handles the arrayOf shorthand syntax:
//! - arrayOf: <schema> - Simple form
//! - arrayOf: { schema: <schema>, length: N } - Fixed-length sequences

use crate::error::{SchemaError, SchemaResult};
use yaml_rust2::Yaml;

use crate::schema::Schema;
use crate::schema::annotations::parse_annotations;
use crate::schema::helpers::{get_hash_usize, get_hash_value};
use crate::schema::parser::from_yaml;
use crate::schema::types::ArraySchema;

/// Parse an array schema
///
/// Format:
/// ```yaml
/// array:
///   items: <schema>
///   minItems: 1
///   maxItems: 10
/// ```
pub(in crate::schema) fn parse_array_schema(yaml: &Yaml) -> SchemaResult<Schema> {
    if !matches!(yaml, Yaml::Null | Yaml::Hash(_)) {
        return Err(SchemaError::invalid("Options for array must be an object"));
    }
    let annotations = parse_annotations(yaml)?;
    let items = match get_hash_value(yaml, "items") {
        Some(items_yaml) => Some(Box::new(from_yaml(items_yaml)?)),
        None => None,
    };
    let min_items = get_hash_usize(yaml, "minItems")?;
    let max_items = get_hash_usize(yaml, "maxItems")?;

    Ok(Schema::Array(ArraySchema {
        annotations,
        items,
        min_items,
        max_items,
    }))
}

/// Parse arrayOf schema (shorthand)
///
/// Simple form:
/// ```yaml
/// arrayOf: string
/// ```
///
/// Complex form with length:
/// ```yaml
/// arrayOf:
///   schema: string
///   length: 2
/// ```
///
/// The `length` property sets both minItems and maxItems to the same value.
pub(in crate::schema) fn parse_arrayof_schema(yaml: &Yaml) -> SchemaResult<Schema> {
    if let Some(schema_yaml) = get_hash_value(yaml, "schema") {
        let items = Some(Box::new(from_yaml(schema_yaml)?));
        let length = get_hash_usize(yaml, "length")?;

        Ok(Schema::Array(ArraySchema {
            annotations: parse_annotations(yaml)?,
            items,
            min_items: length,
            max_items: length,
        }))
    } else {
        // The entire value is the item schema
        Ok(Schema::array_of(from_yaml(yaml)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_schema() {
        let result = Schema::from_yaml_str("array:\n  items: number\n  minItems: 1").unwrap();
        let Schema::Array(s) = result else {
            panic!("Expected Array schema");
        };
        assert_eq!(s.items.as_deref(), Some(&Schema::number()));
        assert_eq!(s.min_items, Some(1));
        assert_eq!(s.max_items, None);
    }

    #[test]
    fn test_arrayof_simple() {
        assert_eq!(
            Schema::from_yaml_str("arrayOf: string").unwrap(),
            Schema::array_of(Schema::string())
        );
    }

    #[test]
    fn test_arrayof_with_length() {
        let result = Schema::from_yaml_str("arrayOf:\n  schema: number\n  length: 2").unwrap();
        let Schema::Array(s) = result else {
            panic!("Expected Array schema");
        };
        assert_eq!(s.min_items, Some(2));
        assert_eq!(s.max_items, Some(2));
    }

    #[test]
    fn test_arrayof_nested_object() {
        let result = Schema::from_yaml_str(
            r#"
arrayOf:
  object:
    name: Module
    properties:
      name: string
"#,
        )
        .unwrap();
        let Schema::Array(s) = result else {
            panic!("Expected Array schema");
        };
        assert_eq!(s.items.map(|i| i.type_name().to_string()).as_deref(), Some("Module"));
    }
}
