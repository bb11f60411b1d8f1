//! Core type definitions for configuration trees.

use crate::schema::SchemaRef;
use indexmap::IndexMap;

/// Literal that raw data uses to spell the missing marker.
pub const MISSING_LITERAL: &str = "???";

/// A scalar payload carried by a leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl Scalar {
    /// Human-readable type name, used in validation messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Null => "null",
            Scalar::Bool(_) => "boolean",
            Scalar::Integer(_) => "integer",
            Scalar::Float(_) => "float",
            Scalar::String(_) => "string",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value, widening integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Integer(n) => Some(*n as f64),
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// State of a leaf node.
///
/// `Missing` means "declared but not yet assigned". It is distinct from an
/// explicit `Scalar::Null` payload and is always eligible to be overwritten.
#[derive(Debug, Clone, PartialEq)]
pub enum Leaf {
    Missing,
    Scalar(Scalar),
}

/// One element of a configuration tree.
///
/// The set of node kinds is closed: resolution, merging and validation all
/// dispatch on it with exhaustive matches.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Keyed children in insertion order, optionally bound to a schema.
    Map(MapNode),

    /// Positional children. Only ever resized by replacing the whole node.
    Sequence(Vec<Node>),

    /// A leaf: a scalar payload or the missing marker.
    Value(Leaf),
}

/// An insertion-ordered map of child nodes.
///
/// A map may carry a schema binding. Bound maps are produced by a schema
/// validator; mutations targeting them are validated against the binding.
#[derive(Debug, Clone, Default)]
pub struct MapNode {
    entries: IndexMap<String, Node>,
    schema: Option<SchemaRef>,
}

// Bindings are capability data, not content: two maps holding the same
// entries compare equal whether or not either one is bound.
impl PartialEq for MapNode {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl MapNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an unbound map from entries.
    pub fn from_entries(entries: IndexMap<String, Node>) -> Self {
        Self {
            entries,
            schema: None,
        }
    }

    /// Create a map bound to `schema`.
    pub fn bound(entries: IndexMap<String, Node>, schema: SchemaRef) -> Self {
        Self {
            entries,
            schema: Some(schema),
        }
    }

    /// The schema this map is bound to, if any.
    pub fn schema(&self) -> Option<&SchemaRef> {
        self.schema.as_ref()
    }

    /// Attach (or replace) the schema binding.
    pub fn bind(&mut self, schema: SchemaRef) {
        self.schema = Some(schema);
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries.get_mut(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert a child. An existing key keeps its position and gets the new value.
    pub fn insert(&mut self, key: impl Into<String>, value: Node) -> Option<Node> {
        self.entries.insert(key.into(), value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn entries(&self) -> &IndexMap<String, Node> {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut IndexMap<String, Node> {
        &mut self.entries
    }

    /// Consume the map, dropping any binding.
    pub fn into_entries(self) -> IndexMap<String, Node> {
        self.entries
    }
}

impl Node {
    /// An empty, unbound map.
    pub fn empty_map() -> Self {
        Node::Map(MapNode::new())
    }

    /// A leaf in the missing state.
    pub fn missing() -> Self {
        Node::Value(Leaf::Missing)
    }

    /// A leaf holding an explicit null.
    pub fn null() -> Self {
        Node::Value(Leaf::Scalar(Scalar::Null))
    }

    pub fn scalar(scalar: Scalar) -> Self {
        Node::Value(Leaf::Scalar(scalar))
    }

    pub fn map(entries: IndexMap<String, Node>) -> Self {
        Node::Map(MapNode::from_entries(entries))
    }

    pub fn sequence(items: Vec<Node>) -> Self {
        Node::Sequence(items)
    }

    pub fn is_map(&self) -> bool {
        matches!(self, Node::Map(_))
    }

    pub fn is_sequence(&self) -> bool {
        matches!(self, Node::Sequence(_))
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Node::Value(_))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Node::Value(Leaf::Missing))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Value(Leaf::Scalar(Scalar::Null)))
    }

    pub fn as_map(&self) -> Option<&MapNode> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut MapNode> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// The scalar payload; `None` for containers and missing leaves.
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Value(Leaf::Scalar(scalar)) => Some(scalar),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.as_scalar().and_then(Scalar::as_str)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_scalar().and_then(Scalar::as_i64)
    }

    /// Look up a map child by key.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Number of children for containers, `0` for leaves.
    pub fn len(&self) -> usize {
        match self {
            Node::Map(map) => map.len(),
            Node::Sequence(items) => items.len(),
            Node::Value(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Schema binding of a map node.
    pub fn schema(&self) -> Option<&SchemaRef> {
        self.as_map().and_then(MapNode::schema)
    }

    /// Human-readable kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Map(_) => "map",
            Node::Sequence(_) => "sequence",
            Node::Value(Leaf::Missing) => "missing",
            Node::Value(Leaf::Scalar(scalar)) => scalar.type_name(),
        }
    }
}

impl From<Scalar> for Node {
    fn from(scalar: Scalar) -> Self {
        Node::scalar(scalar)
    }
}

impl From<MapNode> for Node {
    fn from(map: MapNode) -> Self {
        Node::Map(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationFailure;
    use crate::schema::{Conformance, SchemaDescriptor};
    use std::sync::Arc;

    #[derive(Debug)]
    struct Opaque;

    impl SchemaDescriptor for Opaque {
        fn name(&self) -> &str {
            "Opaque"
        }

        fn default_for(&self, _field: &str) -> Result<Node, ValidationFailure> {
            Ok(Node::missing())
        }

        fn validate(&self, candidate: Node, _: Conformance) -> Result<Node, ValidationFailure> {
            Ok(candidate)
        }

        fn validate_field(
            &self,
            _field: &str,
            candidate: Node,
            _: Conformance,
        ) -> Result<Node, ValidationFailure> {
            Ok(candidate)
        }
    }

    fn string(s: &str) -> Node {
        Node::scalar(Scalar::String(s.to_string()))
    }

    #[test]
    fn test_missing_is_not_null() {
        assert!(Node::missing().is_missing());
        assert!(!Node::missing().is_null());
        assert!(Node::null().is_null());
        assert_ne!(Node::missing(), Node::null());
        assert_eq!(Node::missing().as_scalar(), None);
    }

    #[test]
    fn test_map_insert_overwrites_in_place() {
        let mut map = MapNode::new();
        map.insert("a", string("1"));
        map.insert("b", string("2"));
        let previous = map.insert("a", string("3"));

        assert_eq!(previous, Some(string("1")));
        assert_eq!(map.len(), 2);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map.get("a"), Some(&string("3")));
    }

    #[test]
    fn test_equality_ignores_binding() {
        let mut entries = IndexMap::new();
        entries.insert("name".to_string(), string("foo"));

        let bound = Node::Map(MapNode::bound(entries.clone(), Arc::new(Opaque)));
        let plain = Node::map(entries);

        assert!(bound.schema().is_some());
        assert!(plain.schema().is_none());
        assert_eq!(bound, plain);
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(Node::empty_map().kind_name(), "map");
        assert_eq!(Node::sequence(vec![]).kind_name(), "sequence");
        assert_eq!(Node::missing().kind_name(), "missing");
        assert_eq!(Node::scalar(Scalar::Integer(1)).kind_name(), "integer");
        assert_eq!(Node::scalar(Scalar::Float(1.5)).kind_name(), "float");
    }

    #[test]
    fn test_structural_queries() {
        let seq = Node::sequence(vec![string("a"), string("b")]);
        assert!(seq.is_sequence());
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.as_sequence().map(<[Node]>::len), Some(2));
        assert!(string("a").is_empty());
        assert_eq!(Node::scalar(Scalar::Integer(4)).as_i64(), Some(4));
        assert_eq!(Scalar::Integer(4).as_f64(), Some(4.0));
    }
}
