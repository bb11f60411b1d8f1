//! Merge and replace semantics.
//!
//! | existing           | incoming     | merge                    | replace  |
//! |--------------------|--------------|--------------------------|----------|
//! | absent / missing   | any          | incoming                 | incoming |
//! | value              | any          | incoming                 | incoming |
//! | map                | map          | key-wise merge           | incoming |
//! | map                | non-map      | incoming                 | incoming |
//! | sequence           | any          | incoming                 | incoming |
//!
//! Only map-on-map nesting recurses. Sequences have no stable element
//! identity, so assigning one always replaces it wholesale, even when merging.

use crate::schema::Conformance;
use crate::types::{MapNode, Node};
use indexmap::map::Entry;

/// How a new value is combined with what is already in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
    /// Maps merge key-wise; everything else is replaced.
    #[default]
    Merge,

    /// The new value replaces the old one outright.
    Replace,
}

impl MergeMode {
    pub fn from_flag(merge: bool) -> Self {
        if merge {
            MergeMode::Merge
        } else {
            MergeMode::Replace
        }
    }

    /// Schema conformance that goes with this mode.
    pub fn conformance(self) -> Conformance {
        match self {
            MergeMode::Merge => Conformance::FillDefaults,
            MergeMode::Replace => Conformance::Strict,
        }
    }
}

/// Combine `incoming` with the `existing` node at the same location.
pub fn apply(existing: Option<Node>, incoming: Node, mode: MergeMode) -> Node {
    match (existing, incoming, mode) {
        (Some(Node::Map(existing)), Node::Map(incoming), MergeMode::Merge) => {
            Node::Map(merge_maps(existing, incoming))
        }
        (_, incoming, _) => incoming,
    }
}

/// Key-wise merge. The result keeps `existing`'s key order and binding, with
/// keys new in `incoming` appended in their own order.
fn merge_maps(existing: MapNode, incoming: MapNode) -> MapNode {
    let mut result = existing;
    for (key, value) in incoming.into_entries() {
        match result.entries_mut().entry(key) {
            Entry::Occupied(mut slot) => {
                let current = std::mem::replace(slot.get_mut(), Node::missing());
                *slot.get_mut() = apply(Some(current), value, MergeMode::Merge);
            }
            Entry::Vacant(slot) => {
                slot.insert(apply(None, value, MergeMode::Merge));
            }
        }
    }
    result
}

/// Fold layers left to right with merge semantics.
///
/// The first layer has the lowest priority. No layers yield an empty map.
pub fn merge_layers<I>(layers: I) -> Node
where
    I: IntoIterator<Item = Node>,
{
    layers
        .into_iter()
        .fold(None, |acc, layer| Some(apply(acc, layer, MergeMode::Merge)))
        .unwrap_or_else(Node::empty_map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::node_from_yaml;
    use yaml_rust2::YamlLoader;

    fn yaml(text: &str) -> Node {
        let docs = YamlLoader::load_from_str(text).expect("parse failed");
        node_from_yaml(docs.into_iter().next().expect("empty document"))
    }

    fn keys(node: &Node) -> Vec<&str> {
        node.as_map().unwrap().keys().collect()
    }

    #[test]
    fn test_absent_takes_incoming() {
        for mode in [MergeMode::Merge, MergeMode::Replace] {
            assert_eq!(apply(None, yaml("{a: 1}"), mode), yaml("{a: 1}"));
        }
    }

    #[test]
    fn test_missing_is_always_overwritten() {
        let incoming = [yaml("1"), yaml("{a: 1}"), yaml("[1, 2]"), yaml("null")];
        for node in incoming {
            for mode in [MergeMode::Merge, MergeMode::Replace] {
                assert_eq!(apply(Some(Node::missing()), node.clone(), mode), node);
            }
        }
    }

    #[test]
    fn test_map_merge_is_key_wise() {
        let merged = apply(Some(yaml("{a: 1, b: 2}")), yaml("{b: 3, c: 4}"), MergeMode::Merge);
        assert_eq!(merged, yaml("{a: 1, b: 3, c: 4}"));
        assert_eq!(keys(&merged), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_map_merge_recurses_into_maps() {
        let existing = yaml("{a: {b: {c: 1, d: 2}}, x: 1}");
        let incoming = yaml("{a: {b: {d: 3, e: 4}, f: 5}}");
        let merged = apply(Some(existing), incoming, MergeMode::Merge);
        assert_eq!(merged, yaml("{a: {b: {c: 1, d: 3, e: 4}, f: 5}, x: 1}"));
    }

    #[test]
    fn test_map_replace() {
        let replaced = apply(Some(yaml("{a: {b: 1}}")), yaml("{a: {c: 2}}"), MergeMode::Replace);
        assert_eq!(replaced, yaml("{a: {c: 2}}"));
    }

    #[test]
    fn test_nested_sequence_replaced_under_merge() {
        let merged = apply(
            Some(yaml("{list: [{a: 1}], keep: true}")),
            yaml("{list: [{b: 2}]}"),
            MergeMode::Merge,
        );
        assert_eq!(merged, yaml("{list: [{b: 2}], keep: true}"));
    }

    #[test]
    fn test_sequence_assignment_is_wholesale() {
        let existing = yaml("[1, 2, 3]");
        let incoming = yaml("[4]");
        let merged = apply(Some(existing.clone()), incoming.clone(), MergeMode::Merge);
        let replaced = apply(Some(existing), incoming.clone(), MergeMode::Replace);
        assert_eq!(merged, incoming);
        assert_eq!(replaced, incoming);
    }

    #[test]
    fn test_kind_change_takes_incoming() {
        assert_eq!(apply(Some(yaml("{a: 1}")), yaml("5"), MergeMode::Merge), yaml("5"));
        assert_eq!(apply(Some(yaml("5")), yaml("{a: 1}"), MergeMode::Merge), yaml("{a: 1}"));
        assert_eq!(apply(Some(yaml("[1]")), yaml("{a: 1}"), MergeMode::Merge), yaml("{a: 1}"));
    }

    #[test]
    fn test_merge_layers() {
        let merged = merge_layers([
            yaml("{a: 1, nested: {x: 1}}"),
            yaml("{b: 2, nested: {y: 2}}"),
            yaml("{a: 3, list: [1]}"),
        ]);
        assert_eq!(merged, yaml("{a: 3, nested: {x: 1, y: 2}, b: 2, list: [1]}"));
        assert_eq!(keys(&merged), vec!["a", "nested", "b", "list"]);
        assert_eq!(merge_layers(Vec::new()), Node::empty_map());
    }

    #[test]
    fn test_from_flag() {
        assert_eq!(MergeMode::from_flag(true), MergeMode::Merge);
        assert_eq!(MergeMode::from_flag(false), MergeMode::Replace);
        assert_eq!(MergeMode::Merge.conformance(), Conformance::FillDefaults);
        assert_eq!(MergeMode::Replace.conformance(), Conformance::Strict);
    }
}
