//! Materialization of trees back into raw data.
//!
//! A [`Node`] can be turned back into a `yaml_rust2::Yaml` or a
//! `serde_json::Value`, e.g. to write a resolved configuration to disk or to
//! hand it to code that expects plain nested data. Schema bindings are
//! dropped; missing leaves become the literal `"???"`, so materializing and
//! converting back yields an equal tree.
//!
//! # Depth Limiting
//!
//! Materialization enforces a maximum depth to prevent stack overflow on
//! deeply nested trees. The default limit is 256 levels.
//!
//! # Example
//!
//! ```rust
//! use conftree::{MaterializeOptions, Node, update};
//!
//! let mut cfg = Node::empty_map();
//! update(&mut cfg, "a.b", 1, true).unwrap();
//!
//! let json = cfg.to_json().unwrap();
//! assert_eq!(json["a"]["b"], 1);
//!
//! let options = MaterializeOptions { max_depth: 1 };
//! assert!(cfg.to_yaml_with_options(&options).is_err());
//! ```

use crate::types::{Leaf, MISSING_LITERAL, Node, Scalar};
use thiserror::Error;
use yaml_rust2::Yaml;
use yaml_rust2::yaml::Hash;

/// Options for materialization.
#[derive(Debug, Clone)]
pub struct MaterializeOptions {
    /// Maximum nesting depth (default: 256).
    ///
    /// Materialization fails with [`MaterializeError::NestingTooDeep`] if
    /// the tree exceeds this depth.
    pub max_depth: usize,
}

impl Default for MaterializeOptions {
    fn default() -> Self {
        Self { max_depth: 256 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MaterializeError {
    #[error("Config nesting too deep (max depth: {max_depth}) at path: {}", path.join("."))]
    NestingTooDeep { max_depth: usize, path: Vec<String> },
}

/// Target representation for materialization.
trait RawBuilder {
    type Output;

    fn missing() -> Self::Output;
    fn scalar(scalar: &Scalar) -> Self::Output;
    fn sequence(items: Vec<Self::Output>) -> Self::Output;
    fn map(entries: Vec<(String, Self::Output)>) -> Self::Output;
}

struct YamlBuilder;

impl RawBuilder for YamlBuilder {
    type Output = Yaml;

    fn missing() -> Yaml {
        Yaml::String(MISSING_LITERAL.to_string())
    }

    fn scalar(scalar: &Scalar) -> Yaml {
        match scalar {
            Scalar::Null => Yaml::Null,
            Scalar::Bool(b) => Yaml::Boolean(*b),
            Scalar::Integer(n) => Yaml::Integer(*n),
            Scalar::Float(f) => Yaml::Real(yaml_float(*f)),
            Scalar::String(s) => Yaml::String(s.clone()),
        }
    }

    fn sequence(items: Vec<Yaml>) -> Yaml {
        Yaml::Array(items)
    }

    fn map(entries: Vec<(String, Yaml)>) -> Yaml {
        let mut hash = Hash::new();
        for (key, value) in entries {
            hash.insert(Yaml::String(key), value);
        }
        Yaml::Hash(hash)
    }
}

/// Spell a float the way YAML 1.2 reads it back.
fn yaml_float(f: f64) -> String {
    if f.is_nan() {
        ".nan".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { ".inf" } else { "-.inf" }.to_string()
    } else {
        format!("{:?}", f)
    }
}

struct JsonBuilder;

impl RawBuilder for JsonBuilder {
    type Output = serde_json::Value;

    fn missing() -> serde_json::Value {
        serde_json::Value::String(MISSING_LITERAL.to_string())
    }

    fn scalar(scalar: &Scalar) -> serde_json::Value {
        match scalar {
            Scalar::Null => serde_json::Value::Null,
            Scalar::Bool(b) => serde_json::Value::Bool(*b),
            Scalar::Integer(n) => serde_json::Value::from(*n),
            // JSON has no spelling for NaN or infinities.
            Scalar::Float(f) => serde_json::Number::from_f64(*f)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Scalar::String(s) => serde_json::Value::String(s.clone()),
        }
    }

    fn sequence(items: Vec<serde_json::Value>) -> serde_json::Value {
        serde_json::Value::Array(items)
    }

    fn map(entries: Vec<(String, serde_json::Value)>) -> serde_json::Value {
        serde_json::Value::Object(entries.into_iter().collect())
    }
}

impl Node {
    /// Materialize as YAML with default options.
    pub fn to_yaml(&self) -> Result<Yaml, MaterializeError> {
        self.to_yaml_with_options(&MaterializeOptions::default())
    }

    pub fn to_yaml_with_options(
        &self,
        options: &MaterializeOptions,
    ) -> Result<Yaml, MaterializeError> {
        materialize_node::<YamlBuilder>(self, 0, options, &mut Vec::new())
    }

    /// Materialize as JSON with default options.
    ///
    /// Non-finite floats become `null`.
    pub fn to_json(&self) -> Result<serde_json::Value, MaterializeError> {
        self.to_json_with_options(&MaterializeOptions::default())
    }

    pub fn to_json_with_options(
        &self,
        options: &MaterializeOptions,
    ) -> Result<serde_json::Value, MaterializeError> {
        materialize_node::<JsonBuilder>(self, 0, options, &mut Vec::new())
    }
}

fn materialize_node<B: RawBuilder>(
    node: &Node,
    depth: usize,
    options: &MaterializeOptions,
    path: &mut Vec<String>,
) -> Result<B::Output, MaterializeError> {
    if depth > options.max_depth {
        return Err(MaterializeError::NestingTooDeep {
            max_depth: options.max_depth,
            path: path.clone(),
        });
    }

    match node {
        Node::Value(Leaf::Missing) => Ok(B::missing()),
        Node::Value(Leaf::Scalar(scalar)) => Ok(B::scalar(scalar)),
        Node::Sequence(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                path.push(i.to_string());
                out.push(materialize_node::<B>(item, depth + 1, options, path)?);
                path.pop();
            }
            Ok(B::sequence(out))
        }
        Node::Map(map) => {
            let mut out = Vec::with_capacity(map.len());
            for (key, child) in map.iter() {
                path.push(key.to_string());
                let value = materialize_node::<B>(child, depth + 1, options, path)?;
                out.push((key.to_string(), value));
                path.pop();
            }
            Ok(B::map(out))
        }
    }
}
