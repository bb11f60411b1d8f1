// Validation of configuration trees against schemas

use crate::schema::{
    AnyOfSchema, ArraySchema, EnumSchema, NumberSchema, ObjectSchema, Schema, StringSchema,
};
use conftree::{
    Conformance, MapNode, Node, Scalar, SchemaRef, ValidationFailure, ViolationKind,
};
use indexmap::IndexMap;
use std::sync::Arc;

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationFailure>;

/// Validates a node against a schema.
///
/// Returns the conformed node: absent fields filled in as `conformance`
/// asks, and every map matched by an object schema bound to it.
pub fn validate(node: Node, schema: &Schema, conformance: Conformance) -> ValidationResult<Node> {
    let mut context = ValidationContext::new(schema.type_name(), conformance);
    validate_generic(node, schema, &mut context)
}

/// Validation context tracks state during validation
pub(crate) struct ValidationContext<'a> {
    /// Name of the innermost object schema being validated
    schema_name: &'a str,
    /// Current instance path (e.g., ["modules", "0", "name"])
    instance_path: Vec<String>,
    conformance: Conformance,
}

impl<'a> ValidationContext<'a> {
    pub(crate) fn new(schema_name: &'a str, conformance: Conformance) -> Self {
        Self {
            schema_name,
            instance_path: Vec::new(),
            conformance,
        }
    }

    /// Build a failure located at the current instance path
    pub(crate) fn failure(&self, kind: ViolationKind) -> ValidationFailure {
        ValidationFailure::new(self.schema_name, self.instance_path.clone(), kind)
    }

    pub(crate) fn type_mismatch(&self, expected: &str, got: &Node) -> ValidationFailure {
        self.failure(ViolationKind::TypeMismatch {
            expected: expected.to_string(),
            got: got.kind_name().to_string(),
        })
    }

    /// Execute a function with a new instance path segment
    pub(crate) fn with_instance_path<F, R>(&mut self, segment: impl Into<String>, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        self.instance_path.push(segment.into());
        let result = f(self);
        self.instance_path.pop();
        result
    }

    /// Execute a function with another object schema as the failure source
    fn with_schema_name<'b, F, R>(&mut self, name: &'b str, f: F) -> R
    where
        F: FnOnce(&mut ValidationContext<'b>) -> R,
        'a: 'b,
    {
        let mut inner = ValidationContext {
            schema_name: name,
            instance_path: std::mem::take(&mut self.instance_path),
            conformance: self.conformance,
        };
        let result = f(&mut inner);
        self.instance_path = inner.instance_path;
        result
    }

    /// Execute a function under a different conformance
    fn with_conformance<F, R>(&mut self, conformance: Conformance, f: F) -> R
    where
        F: FnOnce(&mut Self) -> R,
    {
        let saved = std::mem::replace(&mut self.conformance, conformance);
        let result = f(self);
        self.conformance = saved;
        result
    }
}

/// Main validation dispatcher
pub(crate) fn validate_generic(
    value: Node,
    schema: &Schema,
    context: &mut ValidationContext,
) -> ValidationResult<Node> {
    // A missing leaf is "not yet assigned", which every schema allows.
    if value.is_missing() {
        return Ok(value);
    }

    match schema {
        Schema::Any(_) => Ok(value),
        Schema::Boolean(_) => match value.as_scalar() {
            Some(Scalar::Bool(_)) => Ok(value),
            _ => Err(context.type_mismatch("boolean", &value)),
        },
        Schema::Number(s) => validate_number(value, s, context),
        Schema::String(s) => validate_string(value, s, context),
        Schema::Null(_) => {
            if value.is_null() {
                Ok(value)
            } else {
                Err(context.type_mismatch("null", &value))
            }
        }
        Schema::Enum(s) => validate_enum(value, s, context),
        Schema::AnyOf(s) => validate_any_of(value, s, context),
        Schema::Array(s) => validate_array(value, s, context),
        Schema::Object(s) => {
            let Node::Map(map) = value else {
                return Err(context.type_mismatch("object", &value));
            };
            let mut map = context.with_schema_name(&s.name, |ctx| validate_object(map, s, ctx))?;
            let binding: SchemaRef = Arc::clone(s) as SchemaRef;
            map.bind(binding);
            Ok(Node::Map(map))
        }
    }
}

/// Validate a number value
fn validate_number(
    value: Node,
    schema: &NumberSchema,
    context: &mut ValidationContext,
) -> ValidationResult<Node> {
    let Some(num) = value.as_scalar().and_then(Scalar::as_f64) else {
        return Err(context.type_mismatch("number", &value));
    };

    if let Some(min) = schema.minimum
        && num < min
    {
        return Err(context.failure(ViolationKind::NumberOutOfRange {
            value: num,
            minimum: Some(min),
            maximum: None,
        }));
    }

    if let Some(max) = schema.maximum
        && num > max
    {
        return Err(context.failure(ViolationKind::NumberOutOfRange {
            value: num,
            minimum: None,
            maximum: Some(max),
        }));
    }

    Ok(value)
}

/// Validate a string value
fn validate_string(
    value: Node,
    schema: &StringSchema,
    context: &mut ValidationContext,
) -> ValidationResult<Node> {
    let Some(s) = value.as_str() else {
        return Err(context.type_mismatch("string", &value));
    };
    let length = s.chars().count();

    if let Some(min) = schema.min_length
        && length < min
    {
        return Err(context.failure(ViolationKind::StringLengthInvalid {
            length,
            min_length: Some(min),
            max_length: None,
        }));
    }

    if let Some(max) = schema.max_length
        && length > max
    {
        return Err(context.failure(ViolationKind::StringLengthInvalid {
            length,
            min_length: None,
            max_length: Some(max),
        }));
    }

    if let Some(pattern) = &schema.pattern
        && !pattern.is_match(s)
    {
        return Err(context.failure(ViolationKind::StringPatternMismatch {
            value: s.to_string(),
            pattern: pattern.as_str().to_string(),
        }));
    }

    Ok(value)
}

/// Validate an enum value
fn validate_enum(
    value: Node,
    schema: &EnumSchema,
    context: &mut ValidationContext,
) -> ValidationResult<Node> {
    let json_value = value.as_scalar().map(scalar_to_json_value);

    if let Some(json_value) = &json_value
        && schema.values.iter().any(|allowed| allowed == json_value)
    {
        return Ok(value);
    }

    Err(context.failure(ViolationKind::InvalidEnumValue {
        value: json_value.map_or_else(|| value.kind_name().to_string(), |v| format!("{}", v)),
        allowed: schema.values.iter().map(|v| format!("{}", v)).collect(),
    }))
}

/// Validate anyOf (at least one schema must match)
///
/// The first matching subschema conforms the value. When none matches,
/// the failure from the first subschema is reported.
fn validate_any_of(
    value: Node,
    schema: &AnyOfSchema,
    context: &mut ValidationContext,
) -> ValidationResult<Node> {
    let mut first_failure = None;

    for subschema in &schema.schemas {
        match validate_generic(value.clone(), subschema, context) {
            Ok(conformed) => return Ok(conformed),
            Err(failure) => {
                first_failure.get_or_insert(failure);
            }
        }
    }

    Err(first_failure.unwrap_or_else(|| {
        context.failure(ViolationKind::Other {
            message: "anyOf has no schemas".to_string(),
        })
    }))
}

/// Validate a sequence value
fn validate_array(
    value: Node,
    schema: &ArraySchema,
    context: &mut ValidationContext,
) -> ValidationResult<Node> {
    let Node::Sequence(items) = value else {
        return Err(context.type_mismatch("array", &value));
    };

    if let Some(min) = schema.min_items
        && items.len() < min
    {
        return Err(context.failure(ViolationKind::ArrayLengthInvalid {
            length: items.len(),
            min_items: Some(min),
            max_items: None,
        }));
    }

    if let Some(max) = schema.max_items
        && items.len() > max
    {
        return Err(context.failure(ViolationKind::ArrayLengthInvalid {
            length: items.len(),
            min_items: None,
            max_items: Some(max),
        }));
    }

    let Some(item_schema) = &schema.items else {
        return Ok(Node::Sequence(items));
    };

    let mut out = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        out.push(context.with_instance_path(i.to_string(), |ctx| {
            validate_generic(item, item_schema, ctx)
        })?);
    }
    Ok(Node::Sequence(out))
}

/// Validate a map against an object schema
///
/// Declared fields come first, in declaration order, followed by any
/// accepted undeclared keys in their original order. The result is not
/// bound; the caller holds the shared handle to bind it with.
pub(crate) fn validate_object(
    map: MapNode,
    schema: &ObjectSchema,
    context: &mut ValidationContext,
) -> ValidationResult<MapNode> {
    let mut entries = map.into_entries();
    let mut out = IndexMap::with_capacity(entries.len().max(schema.properties.len()));

    for (name, field) in &schema.properties {
        let conformed = match entries.shift_remove(name) {
            Some(value) => context.with_instance_path(name.as_str(), |ctx| {
                validate_generic(value, &field.schema, ctx)
            })?,
            None => match &field.default {
                // Defaults complete themselves from their own schema.
                Some(default) => context.with_instance_path(name.as_str(), |ctx| {
                    ctx.with_conformance(Conformance::FillDefaults, |ctx| {
                        validate_generic(default.clone(), &field.schema, ctx)
                    })
                })?,
                None if context.conformance == Conformance::FillDefaults => Node::missing(),
                None => {
                    return Err(context.failure(ViolationKind::MissingRequiredField {
                        field: name.clone(),
                    }));
                }
            },
        };
        out.insert(name.clone(), conformed);
    }

    for (key, value) in entries {
        let conformed = if let Some(additional) = &schema.additional_properties {
            context.with_instance_path(key.as_str(), |ctx| {
                validate_generic(value, additional, ctx)
            })?
        } else if schema.closed {
            return Err(context.failure(ViolationKind::UnknownField { field: key }));
        } else {
            value
        };
        out.insert(key, conformed);
    }

    Ok(MapNode::from_entries(out))
}

/// Schema governing `field` of `object`.
///
/// `Ok(None)` when an open object leaves the field unconstrained.
pub(crate) fn field_schema<'s>(
    object: &'s ObjectSchema,
    field: &str,
    context: &ValidationContext,
) -> ValidationResult<Option<&'s Schema>> {
    match (object.properties.get(field), &object.additional_properties) {
        (Some(declared), _) => Ok(Some(&declared.schema)),
        (None, Some(additional)) => Ok(Some(&**additional)),
        (None, None) if object.closed => Err(context.failure(ViolationKind::UnknownField {
            field: field.to_string(),
        })),
        (None, None) => Ok(None),
    }
}

/// Validate a value written `path` below a node described by `schema`.
///
/// Array items and object fields are descended one segment at a time. A
/// union descends into its first alternative of a fitting shape.
pub(crate) fn validate_at_path(
    value: Node,
    schema: &Schema,
    path: &[String],
    context: &mut ValidationContext,
) -> ValidationResult<Node> {
    let Some((segment, rest)) = path.split_first() else {
        return validate_generic(value, schema, context);
    };

    match schema {
        Schema::Array(array) => match &array.items {
            Some(items) => context.with_instance_path(segment.as_str(), |ctx| {
                validate_at_path(value, items, rest, ctx)
            }),
            None => Ok(value),
        },
        Schema::Object(object) => context.with_schema_name(&object.name, |ctx| {
            match field_schema(object, segment, ctx)? {
                Some(field) => ctx.with_instance_path(segment.as_str(), |ctx| {
                    validate_at_path(value, field, rest, ctx)
                }),
                None => Ok(value),
            }
        }),
        Schema::AnyOf(any_of) => {
            let is_index = segment.parse::<i64>().is_ok();
            let container = any_of
                .schemas
                .iter()
                .find(|alternative| is_index && matches!(alternative, Schema::Array(_)))
                .or_else(|| {
                    any_of
                        .schemas
                        .iter()
                        .find(|alternative| matches!(alternative, Schema::Object(_)))
                });
            match container {
                Some(alternative) => validate_at_path(value, alternative, path, context),
                None => Ok(value),
            }
        }
        // Nothing lives below a leaf schema; resolution rejects such paths
        // before a write reaches this point.
        _ => Ok(value),
    }
}

/// Convert a scalar to a JSON value for enum comparison
fn scalar_to_json_value(scalar: &Scalar) -> serde_json::Value {
    match scalar {
        Scalar::Null => serde_json::Value::Null,
        Scalar::Bool(b) => serde_json::Value::Bool(*b),
        Scalar::Integer(n) => serde_json::Value::Number((*n).into()),
        Scalar::Float(f) => serde_json::Number::from_f64(*f)
            .map_or(serde_json::Value::Null, serde_json::Value::Number),
        Scalar::String(s) => serde_json::Value::String(s.clone()),
    }
}
