//! Primitive schema parsers
//!
//! Long forms of the scalar types. The value may be null (`boolean:`) or a
//! mapping with annotations and type-specific constraints:
//!
//! ```yaml
//! number:
//!   minimum: 1
//!   maximum: 65535
//! string:
//!   pattern: "^[a-z]+$"
//!   minLength: 1
//! ```

use crate::error::{SchemaError, SchemaResult};
use yaml_rust2::Yaml;

use crate::schema::Schema;
use crate::schema::annotations::parse_annotations;
use crate::schema::helpers::{get_hash_number, get_hash_string, get_hash_usize};
use crate::schema::types::{
    AnySchema, BooleanSchema, NullSchema, NumberSchema, Pattern, StringSchema,
};

fn check_options(yaml: &Yaml, type_name: &str) -> SchemaResult<()> {
    match yaml {
        Yaml::Null | Yaml::Hash(_) => Ok(()),
        _ => Err(SchemaError::invalid(format!(
            "Options for {} must be an object",
            type_name
        ))),
    }
}

pub(in crate::schema) fn parse_any_schema(yaml: &Yaml) -> SchemaResult<Schema> {
    check_options(yaml, "any")?;
    Ok(Schema::Any(AnySchema {
        annotations: parse_annotations(yaml)?,
    }))
}

pub(in crate::schema) fn parse_boolean_schema(yaml: &Yaml) -> SchemaResult<Schema> {
    check_options(yaml, "boolean")?;
    Ok(Schema::Boolean(BooleanSchema {
        annotations: parse_annotations(yaml)?,
    }))
}

pub(in crate::schema) fn parse_null_schema(yaml: &Yaml) -> SchemaResult<Schema> {
    check_options(yaml, "null")?;
    Ok(Schema::Null(NullSchema {
        annotations: parse_annotations(yaml)?,
    }))
}

pub(in crate::schema) fn parse_number_schema(yaml: &Yaml) -> SchemaResult<Schema> {
    check_options(yaml, "number")?;
    let minimum = get_hash_number(yaml, "minimum")?;
    let maximum = get_hash_number(yaml, "maximum")?;
    if let (Some(min), Some(max)) = (minimum, maximum)
        && min > max
    {
        return Err(SchemaError::invalid(format!(
            "minimum {} is greater than maximum {}",
            min, max
        )));
    }

    Ok(Schema::Number(NumberSchema {
        annotations: parse_annotations(yaml)?,
        minimum,
        maximum,
    }))
}

pub(in crate::schema) fn parse_string_schema(yaml: &Yaml) -> SchemaResult<Schema> {
    check_options(yaml, "string")?;
    let pattern = get_hash_string(yaml, "pattern")?
        .map(|pattern| {
            Pattern::new(&pattern).map_err(|e| {
                SchemaError::invalid(format!("Invalid pattern '{}': {}", pattern, e))
            })
        })
        .transpose()?;

    Ok(Schema::String(StringSchema {
        annotations: parse_annotations(yaml)?,
        min_length: get_hash_usize(yaml, "minLength")?,
        max_length: get_hash_usize(yaml, "maxLength")?,
        pattern,
    }))
}
