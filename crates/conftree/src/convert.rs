//! Conversion from raw nested data to [`Node`] trees.
//!
//! Raw data arrives already parsed, either as `yaml_rust2::Yaml`, as
//! `serde_json::Value`, or as plain Rust values. Mappings become maps,
//! sequences become sequences, and everything else becomes a leaf. The
//! string `"???"` becomes the missing marker. Conversion never consults
//! schemas; conformance is checked when a value is written into the tree.

use crate::types::{Leaf, MISSING_LITERAL, MapNode, Node, Scalar};
use indexmap::IndexMap;
use yaml_rust2::Yaml;

/// Conversion into a [`Node`].
///
/// This is what [`update`](crate::update) accepts as the new value.
pub trait IntoNode {
    fn into_node(self) -> Node;
}

/// Convert a YAML value to a `Node`.
///
/// Mapping keys that are scalars are stringified (`1` becomes `"1"`);
/// composite keys are dropped with a warning. Aliases and bad values
/// become null.
pub fn node_from_yaml(yaml: Yaml) -> Node {
    match yaml {
        Yaml::Hash(hash) => {
            let mut entries = IndexMap::with_capacity(hash.len());
            for (key, value) in hash {
                match yaml_key(&key) {
                    Some(key) => {
                        entries.insert(key, node_from_yaml(value));
                    }
                    None => {
                        tracing::warn!(?key, "Skipping mapping entry with a non-scalar key");
                    }
                }
            }
            Node::Map(MapNode::from_entries(entries))
        }
        Yaml::Array(items) => Node::Sequence(items.into_iter().map(node_from_yaml).collect()),
        Yaml::String(s) => string_node(s),
        Yaml::Integer(n) => Node::scalar(Scalar::Integer(n)),
        Yaml::Real(ref s) => match yaml.as_f64() {
            Some(f) => Node::scalar(Scalar::Float(f)),
            None => string_node(s.clone()),
        },
        Yaml::Boolean(b) => Node::scalar(Scalar::Bool(b)),
        Yaml::Null | Yaml::Alias(_) | Yaml::BadValue => Node::null(),
    }
}

fn yaml_key(key: &Yaml) -> Option<String> {
    match key {
        Yaml::String(s) | Yaml::Real(s) => Some(s.clone()),
        Yaml::Integer(n) => Some(n.to_string()),
        Yaml::Boolean(b) => Some(b.to_string()),
        Yaml::Null => Some("null".to_string()),
        Yaml::Array(_) | Yaml::Hash(_) | Yaml::Alias(_) | Yaml::BadValue => None,
    }
}

/// Convert a JSON value to a `Node`.
///
/// Object keys keep their written order; the workspace builds `serde_json`
/// with `preserve_order`.
pub fn node_from_json(value: serde_json::Value) -> Node {
    match value {
        serde_json::Value::Object(object) => Node::Map(MapNode::from_entries(
            object
                .into_iter()
                .map(|(key, value)| (key, node_from_json(value)))
                .collect(),
        )),
        serde_json::Value::Array(items) => {
            Node::Sequence(items.into_iter().map(node_from_json).collect())
        }
        serde_json::Value::String(s) => string_node(s),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Node::scalar(Scalar::Integer(i)),
            None => Node::scalar(Scalar::Float(n.as_f64().unwrap_or(f64::NAN))),
        },
        serde_json::Value::Bool(b) => Node::scalar(Scalar::Bool(b)),
        serde_json::Value::Null => Node::null(),
    }
}

fn string_node(s: String) -> Node {
    if s == MISSING_LITERAL {
        Node::missing()
    } else {
        Node::scalar(Scalar::String(s))
    }
}

impl IntoNode for Node {
    fn into_node(self) -> Node {
        self
    }
}

impl IntoNode for MapNode {
    fn into_node(self) -> Node {
        Node::Map(self)
    }
}

impl IntoNode for Leaf {
    fn into_node(self) -> Node {
        Node::Value(self)
    }
}

impl IntoNode for Scalar {
    fn into_node(self) -> Node {
        match self {
            Scalar::String(s) => string_node(s),
            other => Node::scalar(other),
        }
    }
}

impl IntoNode for Yaml {
    fn into_node(self) -> Node {
        node_from_yaml(self)
    }
}

impl IntoNode for serde_json::Value {
    fn into_node(self) -> Node {
        node_from_json(self)
    }
}

impl IntoNode for &str {
    fn into_node(self) -> Node {
        string_node(self.to_string())
    }
}

impl IntoNode for String {
    fn into_node(self) -> Node {
        string_node(self)
    }
}

impl IntoNode for i64 {
    fn into_node(self) -> Node {
        Node::scalar(Scalar::Integer(self))
    }
}

impl IntoNode for i32 {
    fn into_node(self) -> Node {
        Node::scalar(Scalar::Integer(i64::from(self)))
    }
}

impl IntoNode for f64 {
    fn into_node(self) -> Node {
        Node::scalar(Scalar::Float(self))
    }
}

impl IntoNode for bool {
    fn into_node(self) -> Node {
        Node::scalar(Scalar::Bool(self))
    }
}

impl IntoNode for () {
    fn into_node(self) -> Node {
        Node::null()
    }
}

impl<T: IntoNode> IntoNode for Option<T> {
    fn into_node(self) -> Node {
        match self {
            Some(value) => value.into_node(),
            None => Node::null(),
        }
    }
}

impl<T: IntoNode> IntoNode for Vec<T> {
    fn into_node(self) -> Node {
        Node::Sequence(self.into_iter().map(IntoNode::into_node).collect())
    }
}

impl<T: IntoNode> IntoNode for IndexMap<String, T> {
    fn into_node(self) -> Node {
        Node::Map(MapNode::from_entries(
            self.into_iter()
                .map(|(key, value)| (key, value.into_node()))
                .collect(),
        ))
    }
}
