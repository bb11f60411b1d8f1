//! The validation capability that schema-bound maps carry.
//!
//! The tree does not own schema definitions. A schema component implements
//! [`SchemaDescriptor`] and hands out bound maps; the update operation calls
//! back into the binding whenever a mutation lands on (or inside) one.

use crate::error::ValidationFailure;
use crate::types::Node;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a schema descriptor, as stored on bound maps.
pub type SchemaRef = Arc<dyn SchemaDescriptor>;

/// How strictly a candidate must match its schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Conformance {
    /// Replace semantics: required fields must be present.
    #[default]
    Strict,

    /// Merge semantics: absent fields are completed from their defaults,
    /// required ones materializing as the missing marker.
    FillDefaults,
}

/// A structured schema bound to a map node.
///
/// Implementations are authoritative and opaque: the core propagates their
/// failures verbatim and never interprets them.
pub trait SchemaDescriptor: fmt::Debug + Send + Sync {
    /// Display name used in failure messages.
    fn name(&self) -> &str;

    /// Default node for `field`.
    ///
    /// Declared fields without a default yield the missing marker. Fields the
    /// schema does not declare are an `UnknownField` failure for closed
    /// schemas.
    fn default_for(&self, field: &str) -> Result<Node, ValidationFailure>;

    /// Conform a whole map to this schema.
    ///
    /// Nested structured values come back bound; the returned top-level map
    /// is bound to `self` by [`conform`].
    fn validate(&self, candidate: Node, conformance: Conformance)
    -> Result<Node, ValidationFailure>;

    /// Conform a value about to be written to `field` of a map bound to
    /// this schema.
    fn validate_field(
        &self,
        field: &str,
        candidate: Node,
        conformance: Conformance,
    ) -> Result<Node, ValidationFailure>;

    /// Conform a value about to be written at `path` below a map bound to
    /// this schema, where the containers in between carry no binding of
    /// their own (sequence elements, leaves walked through).
    ///
    /// Failure paths are relative to the bound map. The default checks
    /// direct fields only and leaves deeper locations unconstrained.
    fn validate_at(
        &self,
        path: &[String],
        candidate: Node,
        conformance: Conformance,
    ) -> Result<Node, ValidationFailure> {
        match path {
            [] => self.validate(candidate, conformance),
            [field] => self.validate_field(field, candidate, conformance),
            _ => Ok(candidate),
        }
    }
}

/// Validate `candidate` against `schema` and bind the result.
pub fn conform(
    schema: &SchemaRef,
    candidate: Node,
    conformance: Conformance,
) -> Result<Node, ValidationFailure> {
    let mut node = schema.validate(candidate, conformance)?;
    if let Node::Map(map) = &mut node {
        map.bind(Arc::clone(schema));
    }
    Ok(node)
}
