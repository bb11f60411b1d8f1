//! Object schemas as tree bindings.
//!
//! [`ObjectSchema`] implements [`SchemaDescriptor`], so maps validated
//! against it carry it as their binding and `conftree::update` checks every
//! later write through it. Writes that land deeper, below sequences or
//! leaves inside the map, are checked through [`SchemaDescriptor::validate_at`].

use crate::schema::ObjectSchema;
use crate::validator::{
    ValidationContext, ValidationResult, field_schema, validate_at_path, validate_generic,
    validate_object,
};
use conftree::{
    Conformance, IntoNode, Node, SchemaDescriptor, SchemaRef, ValidationFailure, ViolationKind,
};
use std::sync::Arc;

impl SchemaDescriptor for ObjectSchema {
    fn name(&self) -> &str {
        &self.name
    }

    fn default_for(&self, field: &str) -> Result<Node, ValidationFailure> {
        let context = ValidationContext::new(&self.name, Conformance::FillDefaults);
        match self.properties.get(field) {
            Some(declared) => match &declared.default {
                Some(default) => {
                    let mut context = context;
                    context.with_instance_path(field, |ctx| {
                        validate_generic(default.clone(), &declared.schema, ctx)
                    })
                }
                None => Ok(Node::missing()),
            },
            None if self.accepts_undeclared() => Ok(Node::missing()),
            None => Err(context.failure(ViolationKind::UnknownField {
                field: field.to_string(),
            })),
        }
    }

    fn validate(
        &self,
        candidate: Node,
        conformance: Conformance,
    ) -> Result<Node, ValidationFailure> {
        let mut context = ValidationContext::new(&self.name, conformance);
        match candidate {
            Node::Map(map) => validate_object(map, self, &mut context).map(Node::Map),
            other if other.is_missing() => Ok(other),
            other => Err(context.type_mismatch(&self.name, &other)),
        }
    }

    fn validate_field(
        &self,
        field: &str,
        candidate: Node,
        conformance: Conformance,
    ) -> Result<Node, ValidationFailure> {
        let mut context = ValidationContext::new(&self.name, conformance);
        match field_schema(self, field, &context)? {
            Some(schema) => {
                context.with_instance_path(field, |ctx| validate_generic(candidate, schema, ctx))
            }
            None => Ok(candidate),
        }
    }

    fn validate_at(
        &self,
        path: &[String],
        candidate: Node,
        conformance: Conformance,
    ) -> Result<Node, ValidationFailure> {
        let Some((field, rest)) = path.split_first() else {
            return self.validate(candidate, conformance);
        };
        let mut context = ValidationContext::new(&self.name, conformance);
        match field_schema(self, field, &context)? {
            Some(schema) => context.with_instance_path(field.as_str(), |ctx| {
                validate_at_path(candidate, schema, rest, ctx)
            }),
            None => Ok(candidate),
        }
    }
}

/// Build a tree from `data`, validated against and bound to `schema`.
pub fn structured(
    schema: &Arc<ObjectSchema>,
    data: impl IntoNode,
    conformance: Conformance,
) -> ValidationResult<Node> {
    let binding: SchemaRef = Arc::clone(schema) as SchemaRef;
    conftree::conform(&binding, data.into_node(), conformance)
}

/// A fresh bound tree holding every default, with required fields missing.
pub fn instantiate(schema: &Arc<ObjectSchema>) -> ValidationResult<Node> {
    structured(schema, Node::empty_map(), Conformance::FillDefaults)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use conftree::Scalar;

    fn server() -> Arc<ObjectSchema> {
        Arc::new(
            ObjectSchema::new("Server")
                .field("host", Schema::string())
                .optional("port", Schema::number(), Node::from(Scalar::Integer(80))),
        )
    }

    #[test]
    fn test_instantiate_fills_defaults() {
        let node = instantiate(&server()).unwrap();
        assert!(node.get("host").unwrap().is_missing());
        assert_eq!(node.get("port").and_then(Node::as_i64), Some(80));
        assert_eq!(node.schema().map(|s| s.name()), Some("Server"));
    }

    #[test]
    fn test_default_for() {
        let schema = server();
        assert!(schema.default_for("host").unwrap().is_missing());
        assert_eq!(schema.default_for("port").unwrap().as_i64(), Some(80));

        let failure = schema.default_for("user").unwrap_err();
        assert_eq!(failure.schema, "Server");
        assert!(failure.path.is_empty());
        assert_eq!(
            failure.kind,
            ViolationKind::UnknownField {
                field: "user".to_string()
            }
        );

        let open = ObjectSchema::new("Open").open();
        assert!(open.default_for("anything").unwrap().is_missing());
    }

    #[test]
    fn test_validate_field() {
        let schema = server();
        let ok = schema
            .validate_field("port", 8080i64.into_node(), Conformance::Strict)
            .unwrap();
        assert_eq!(ok.as_i64(), Some(8080));

        let failure = schema
            .validate_field("port", "eighty".into_node(), Conformance::Strict)
            .unwrap_err();
        assert_eq!(failure.path, vec!["port"]);
        assert_eq!(
            failure.to_string(),
            "Validation error in Server at port: Expected number, got string"
        );

        let failure = schema
            .validate_field("user", "root".into_node(), Conformance::FillDefaults)
            .unwrap_err();
        assert!(matches!(failure.kind, ViolationKind::UnknownField { .. }));
    }

    #[test]
    fn test_validate_field_additional_properties() {
        let schema = ObjectSchema::new("Env").additional(Schema::string());
        assert!(
            schema
                .validate_field("PATH", "/bin".into_node(), Conformance::Strict)
                .is_ok()
        );
        let failure = schema
            .validate_field("PATH", 1i64.into_node(), Conformance::Strict)
            .unwrap_err();
        assert_eq!(failure.path, vec!["PATH"]);
    }

    #[test]
    fn test_validate_at_descends_through_arrays() {
        let schema = ObjectSchema::new("Package")
            .field("tags", Schema::array_of(Schema::string()))
            .field(
                "modules",
                Schema::array_of(ObjectSchema::new("Module").field("name", Schema::string()).into()),
            );
        let at = |text: &str| -> Vec<String> { text.split('.').map(String::from).collect() };

        assert!(
            schema
                .validate_at(&at("tags.0"), "x".into_node(), Conformance::Strict)
                .is_ok()
        );
        let failure = schema
            .validate_at(&at("tags.0"), 1i64.into_node(), Conformance::Strict)
            .unwrap_err();
        assert_eq!(failure.schema, "Package");
        assert_eq!(failure.path, vec!["tags", "0"]);

        let module = schema
            .validate_at(
                &at("modules.0"),
                Node::empty_map(),
                Conformance::FillDefaults,
            )
            .unwrap();
        assert_eq!(module.schema().map(|s| s.name()), Some("Module"));
        assert!(module.get("name").unwrap().is_missing());

        let failure = schema
            .validate_at(&at("modules.0.name"), 1i64.into_node(), Conformance::Strict)
            .unwrap_err();
        assert_eq!(failure.schema, "Module");
        assert_eq!(failure.path, vec!["modules", "0", "name"]);

        let failure = schema
            .validate_at(&at("other.0"), 1i64.into_node(), Conformance::Strict)
            .unwrap_err();
        assert!(matches!(failure.kind, ViolationKind::UnknownField { .. }));
    }

    #[test]
    fn test_validate_missing_candidate() {
        let node = server()
            .validate(Node::missing(), Conformance::Strict)
            .unwrap();
        assert!(node.is_missing());

        let failure = server()
            .validate(Node::null(), Conformance::Strict)
            .unwrap_err();
        assert_eq!(
            failure.kind,
            ViolationKind::TypeMismatch {
                expected: "Server".to_string(),
                got: "null".to_string()
            }
        );
    }

    #[test]
    fn test_structured_strict() {
        let failure = structured(&server(), serde_json::json!({"port": 1}), Conformance::Strict)
            .unwrap_err();
        insta::assert_snapshot!(
            failure.to_string(),
            @"Validation error in Server at <root>: Missing required field 'host'"
        );

        let node = structured(
            &server(),
            serde_json::json!({"host": "localhost"}),
            Conformance::Strict,
        )
        .unwrap();
        assert_eq!(node.get("port").and_then(Node::as_i64), Some(80));
    }
}
