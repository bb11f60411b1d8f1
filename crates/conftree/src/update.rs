//! Path-addressed mutation.
//!
//! [`update`] is the entry point for changing a tree: it resolves the path
//! (creating intermediate maps), converts the new value, merges or replaces
//! it against what is already there, validates the result when the location
//! is schema-bound, and finally writes it into the parent. A location below
//! a bound map but inside unbound containers (a sequence element, say) is
//! checked by the nearest bound map above it.
//!
//! A failed update leaves the target untouched. Intermediate maps created
//! while resolving the path are kept.
//!
//! # Example
//!
//! ```rust
//! use conftree::{Node, update};
//!
//! let mut cfg = Node::empty_map();
//! update(&mut cfg, "server.port", 8080, true).unwrap();
//! assert_eq!(cfg.get("server").and_then(|s| s.get("port")).and_then(Node::as_i64), Some(8080));
//! ```

use crate::convert::IntoNode;
use crate::error::{AddressingError, ConfigError};
use crate::merge::{self, MergeMode};
use crate::path::{self, BoundAncestor, Path, Resolve, Segment};
use crate::schema::{self, Conformance, SchemaRef};
use crate::types::Node;
use tracing::debug;

/// Options for [`update_with_options`].
#[derive(Debug, Clone)]
pub struct UpdateOptions {
    /// Character that separates path segments (default: `.`).
    pub separator: char,

    /// Maximum number of path segments (default: 256).
    pub max_depth: usize,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            separator: Path::DEFAULT_SEPARATOR,
            max_depth: 256,
        }
    }
}

/// Set the node at `path` to `value`, merging when `merge` is true.
pub fn update(
    root: &mut Node,
    path: &str,
    value: impl IntoNode,
    merge: bool,
) -> Result<(), ConfigError> {
    update_with_options(root, path, value, merge, &UpdateOptions::default())
}

/// [`update`] with custom options.
pub fn update_with_options(
    root: &mut Node,
    path: &str,
    value: impl IntoNode,
    merge: bool,
    options: &UpdateOptions,
) -> Result<(), ConfigError> {
    let parsed = Path::parse_with_separator(path, options.separator)?;
    if parsed.len() > options.max_depth {
        return Err(AddressingError::PathTooDeep {
            depth: parsed.len(),
            max_depth: options.max_depth,
        }
        .into());
    }

    let mode = MergeMode::from_flag(merge);
    debug!(path = %parsed, merge, "Updating node");

    let result = if parsed.is_root() {
        update_root(root, value.into_node(), mode)
    } else {
        update_at(root, &parsed, value.into_node(), mode)
    };

    if let Err(err) = &result {
        debug!(path = %parsed, error = %err, "Update failed");
    }
    result
}

fn update_root(root: &mut Node, incoming: Node, mode: MergeMode) -> Result<(), ConfigError> {
    let binding = root.schema().cloned();
    let candidate = merge::apply(Some(root.clone()), incoming, mode);
    *root = match &binding {
        Some(schema) => schema::conform(schema, candidate, mode.conformance())?,
        None => candidate,
    };
    Ok(())
}

fn update_at(
    root: &mut Node,
    path: &Path,
    incoming: Node,
    mode: MergeMode,
) -> Result<(), ConfigError> {
    let (parent, last, ancestor) =
        path::resolve_bound(root, path, Resolve::CreateIntermediate)?;
    let parent_path = path.prefix(path.len() - 1);
    let conformance = mode.conformance();

    match parent {
        Node::Map(map) => {
            let key = last.as_key();
            let parent_schema = map.schema().cloned();
            let existing = match (map.get(key), &parent_schema) {
                (Some(node), _) => Some(node.clone()),
                (None, Some(schema)) => Some(
                    schema
                        .default_for(key)
                        .map_err(|e| e.rooted_at(&parent_path))?,
                ),
                (None, None) => None,
            };
            let binding = existing.as_ref().and_then(Node::schema).cloned();
            let candidate = merge::apply(existing, incoming, mode);

            let written = match &parent_schema {
                Some(schema) => schema
                    .validate_field(key, candidate, conformance)
                    .map_err(|e| e.rooted_at(&parent_path))?,
                None => validate_target(
                    candidate,
                    binding.as_ref(),
                    ancestor.as_ref(),
                    path,
                    conformance,
                )?,
            };
            map.insert(key, written);
            Ok(())
        }
        Node::Sequence(items) => {
            let position = sequence_position(items, last, &parent_path)?;
            let existing = items[position].clone();
            let binding = existing.schema().cloned();
            let candidate = merge::apply(Some(existing), incoming, mode);
            items[position] = validate_target(
                candidate,
                binding.as_ref(),
                ancestor.as_ref(),
                path,
                conformance,
            )?;
            Ok(())
        }
        Node::Value(_) => Err(AddressingError::NotAContainer {
            path: parent_path.join("."),
            segment: last.as_key().to_string(),
            kind: parent.kind_name(),
        }
        .into()),
    }
}

fn sequence_position(
    items: &[Node],
    last: &Segment,
    parent_path: &[String],
) -> Result<usize, AddressingError> {
    let Some(index) = last.index() else {
        return Err(AddressingError::KeyOnSequence {
            path: parent_path.join("."),
            key: last.as_key().to_string(),
        });
    };
    path::normalize_index(index, items.len()).ok_or_else(|| AddressingError::IndexOutOfRange {
        path: parent_path.join("."),
        index,
        len: items.len(),
    })
}

/// Validate a candidate written into an unbound container.
///
/// The binding of the node being replaced wins; otherwise the nearest bound
/// map above decides what the location accepts.
fn validate_target(
    candidate: Node,
    binding: Option<&SchemaRef>,
    ancestor: Option<&BoundAncestor>,
    path: &Path,
    conformance: Conformance,
) -> Result<Node, ConfigError> {
    match (binding, ancestor) {
        (Some(schema), _) => schema::conform(schema, candidate, conformance)
            .map_err(|e| e.rooted_at(&path.prefix(path.len())).into()),
        (None, Some(bound)) => bound.conform_at(path, path.len(), candidate, conformance),
        (None, None) => Ok(candidate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::node_from_yaml;
    use crate::error::{ValidationFailure, ViolationKind};
    use crate::schema::SchemaDescriptor;
    use crate::types::MapNode;
    use std::sync::Arc;
    use yaml_rust2::YamlLoader;

    fn yaml(text: &str) -> Node {
        let docs = YamlLoader::load_from_str(text).expect("parse failed");
        node_from_yaml(docs.into_iter().next().expect("empty document"))
    }

    /// A flat record schema: every field is a scalar, fields without a
    /// default are required.
    #[derive(Debug)]
    struct Record {
        name: &'static str,
        fields: Vec<(&'static str, Option<Node>)>,
    }

    impl Record {
        fn fail(&self, path: Vec<String>, kind: ViolationKind) -> ValidationFailure {
            ValidationFailure::new(self.name, path, kind)
        }

        fn declared(&self, field: &str) -> Option<&Option<Node>> {
            self.fields
                .iter()
                .find(|(name, _)| *name == field)
                .map(|(_, default)| default)
        }
    }

    impl SchemaDescriptor for Record {
        fn name(&self) -> &str {
            self.name
        }

        fn default_for(&self, field: &str) -> Result<Node, ValidationFailure> {
            match self.declared(field) {
                Some(default) => Ok(default.clone().unwrap_or_else(Node::missing)),
                None => Err(self.fail(
                    vec![],
                    ViolationKind::UnknownField {
                        field: field.to_string(),
                    },
                )),
            }
        }

        fn validate(
            &self,
            candidate: Node,
            conformance: Conformance,
        ) -> Result<Node, ValidationFailure> {
            let Node::Map(map) = candidate else {
                return Err(self.fail(
                    vec![],
                    ViolationKind::TypeMismatch {
                        expected: self.name.to_string(),
                        got: candidate.kind_name().to_string(),
                    },
                ));
            };
            let mut out = MapNode::new();
            for (field, default) in &self.fields {
                let value = match (map.get(field), default, conformance) {
                    (Some(value), _, _) => value.clone(),
                    (None, Some(default), _) => default.clone(),
                    (None, None, Conformance::FillDefaults) => Node::missing(),
                    (None, None, Conformance::Strict) => {
                        return Err(self.fail(
                            vec![],
                            ViolationKind::MissingRequiredField {
                                field: field.to_string(),
                            },
                        ));
                    }
                };
                out.insert(*field, value);
            }
            for key in map.keys() {
                if self.declared(key).is_none() {
                    return Err(self.fail(
                        vec![],
                        ViolationKind::UnknownField {
                            field: key.to_string(),
                        },
                    ));
                }
            }
            Ok(Node::Map(out))
        }

        fn validate_field(
            &self,
            field: &str,
            candidate: Node,
            _conformance: Conformance,
        ) -> Result<Node, ValidationFailure> {
            if self.declared(field).is_none() {
                return Err(self.fail(
                    vec![],
                    ViolationKind::UnknownField {
                        field: field.to_string(),
                    },
                ));
            }
            if candidate.is_map() || candidate.is_sequence() {
                return Err(self.fail(
                    vec![field.to_string()],
                    ViolationKind::TypeMismatch {
                        expected: "scalar".to_string(),
                        got: candidate.kind_name().to_string(),
                    },
                ));
            }
            Ok(candidate)
        }
    }

    fn server_schema() -> SchemaRef {
        Arc::new(Record {
            name: "Server",
            fields: vec![("host", None), ("port", Some(yaml("80")))],
        })
    }

    /// `{server: <bound Server>}` with host unset.
    fn bound_config() -> Node {
        let server =
            schema::conform(&server_schema(), yaml("{}"), Conformance::FillDefaults).unwrap();
        let mut root = MapNode::new();
        root.insert("server", server);
        Node::Map(root)
    }

    #[test]
    fn test_update_root_merge_and_replace() {
        let mut cfg = yaml("{a: 1}");
        update(&mut cfg, "", yaml("{b: 2}"), true).unwrap();
        assert_eq!(cfg, yaml("{a: 1, b: 2}"));

        update(&mut cfg, "", yaml("{c: 3}"), false).unwrap();
        assert_eq!(cfg, yaml("{c: 3}"));
    }

    #[test]
    fn test_update_map_key_overwrites_in_place() {
        let mut cfg = yaml("{a: 1, b: 2, c: 3}");
        update(&mut cfg, "b", 20, true).unwrap();
        let keys: Vec<_> = cfg.as_map().unwrap().keys().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(cfg.get("b").and_then(Node::as_i64), Some(20));
    }

    #[test]
    fn test_update_custom_separator() {
        let mut cfg = Node::empty_map();
        let options = UpdateOptions {
            separator: '/',
            ..Default::default()
        };
        update_with_options(&mut cfg, "a/b.c", 1, true, &options).unwrap();
        assert_eq!(cfg, yaml("{a: {b.c: 1}}"));
    }

    #[test]
    fn test_update_path_too_deep() {
        let mut cfg = Node::empty_map();
        let options = UpdateOptions {
            max_depth: 2,
            ..Default::default()
        };
        let err = update_with_options(&mut cfg, "a.b.c", 1, true, &options).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Addressing(AddressingError::PathTooDeep {
                depth: 3,
                max_depth: 2
            })
        );
        assert_eq!(cfg, Node::empty_map());
    }

    #[test]
    fn test_update_key_on_sequence_parent() {
        let mut cfg = yaml("{a: [1, 2]}");
        let err = update(&mut cfg, "a.x", 1, true).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Addressing(AddressingError::KeyOnSequence { .. })
        ));
        assert_eq!(cfg, yaml("{a: [1, 2]}"));
    }

    #[test]
    fn test_update_bound_field_fills_from_default() {
        let mut cfg = bound_config();
        assert!(cfg.get("server").unwrap().get("host").unwrap().is_missing());

        update(&mut cfg, "server.host", "localhost", false).unwrap();
        let server = cfg.get("server").unwrap();
        assert_eq!(server, &yaml("{host: localhost, port: 80}"));
        assert!(server.schema().is_some(), "binding survives a field write");
    }

    #[test]
    fn test_update_bound_field_rejects_unknown_key() {
        let mut cfg = bound_config();
        let err = update(&mut cfg, "server.user", "root", true).unwrap_err();
        let ConfigError::Validation(failure) = err else {
            panic!("expected validation failure, got {:?}", err);
        };
        assert_eq!(failure.path, vec!["server"]);
        assert_eq!(
            failure.kind,
            ViolationKind::UnknownField {
                field: "user".into()
            }
        );
        assert_eq!(cfg, bound_config());
    }

    #[test]
    fn test_update_bound_map_replace_is_strict() {
        let mut cfg = bound_config();
        let err = update(&mut cfg, "server", yaml("{port: 8080}"), false).unwrap_err();
        let ConfigError::Validation(failure) = err else {
            panic!("expected validation failure, got {:?}", err);
        };
        assert_eq!(failure.schema, "Server");
        assert_eq!(failure.path, vec!["server"]);
        assert_eq!(
            failure.kind,
            ViolationKind::MissingRequiredField {
                field: "host".into()
            }
        );
        assert_eq!(cfg, bound_config(), "target untouched after a failed update");
    }

    #[test]
    fn test_update_bound_map_merge_keeps_binding() {
        let mut cfg = bound_config();
        update(&mut cfg, "server", yaml("{port: 8080}"), true).unwrap();
        let server = cfg.get("server").unwrap();
        assert_eq!(server, &yaml("{host: '???', port: 8080}"));
        assert!(server.schema().is_some());

        update(&mut cfg, "server", yaml("{host: example.org}"), false).unwrap();
        assert_eq!(
            cfg.get("server").unwrap(),
            &yaml("{host: example.org, port: 80}")
        );
    }

    #[test]
    fn test_update_bound_root() {
        let mut cfg =
            schema::conform(&server_schema(), yaml("{host: a}"), Conformance::Strict).unwrap();
        update(&mut cfg, "", yaml("{port: 1}"), true).unwrap();
        assert_eq!(cfg, yaml("{host: a, port: 1}"));

        let err = update(&mut cfg, "", yaml("{port: 2}"), false).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert_eq!(cfg, yaml("{host: a, port: 1}"));
    }

    #[test]
    fn test_update_index_segment_on_created_map() {
        let mut cfg = yaml("{a: {}}");
        update(&mut cfg, "a.b.c.9", 1, true).unwrap();
        assert_eq!(cfg, yaml("{a: {b: {c: {'9': 1}}}}"));
    }

    #[test]
    fn test_update_sequence_element() {
        let mut cfg = yaml("{a: [{x: 1}, 2]}");
        update(&mut cfg, "a.0", yaml("{y: 2}"), true).unwrap();
        update(&mut cfg, "a.-1", 3, true).unwrap();
        assert_eq!(cfg, yaml("{a: [{x: 1, y: 2}, 3]}"));

        let err = update(&mut cfg, "a.2", 4, true).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Addressing(AddressingError::IndexOutOfRange { index: 2, len: 2, .. })
        ));
    }

    /// Every field holds a sequence of strings.
    #[derive(Debug)]
    struct StringLists;

    impl SchemaDescriptor for StringLists {
        fn name(&self) -> &str {
            "StringLists"
        }

        fn default_for(&self, _field: &str) -> Result<Node, ValidationFailure> {
            Ok(Node::sequence(vec![]))
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

        fn validate_at(
            &self,
            path: &[String],
            candidate: Node,
            _: Conformance,
        ) -> Result<Node, ValidationFailure> {
            if path.len() == 2 && candidate.as_str().is_none() {
                return Err(ValidationFailure::new(
                    "StringLists",
                    path.to_vec(),
                    ViolationKind::TypeMismatch {
                        expected: "string".into(),
                        got: candidate.kind_name().into(),
                    },
                ));
            }
            Ok(candidate)
        }
    }

    #[test]
    fn test_update_sequence_element_checked_by_bound_ancestor() {
        let schema: SchemaRef = Arc::new(StringLists);
        let lists = schema::conform(&schema, yaml("{tags: [a, b]}"), Conformance::Strict).unwrap();
        let mut root = MapNode::new();
        root.insert("lists", lists);
        let mut cfg = Node::Map(root);

        update(&mut cfg, "lists.tags.-1", "c", false).unwrap();
        assert_eq!(cfg, yaml("{lists: {tags: [a, c]}}"));

        let err = update(&mut cfg, "lists.tags.1", 3, true).unwrap_err();
        let ConfigError::Validation(failure) = err else {
            panic!("expected validation failure, got {:?}", err);
        };
        assert_eq!(failure.path, vec!["lists", "tags", "1"]);

        let err = update(&mut cfg, "lists.tags.0.x", 1, true).unwrap_err();
        let ConfigError::Validation(failure) = err else {
            panic!("expected validation failure, got {:?}", err);
        };
        assert_eq!(failure.path, vec!["lists", "tags", "0"]);
        assert_eq!(cfg, yaml("{lists: {tags: [a, c]}}"));
    }
}
