//! Dotted paths and the resolver that walks them.
//!
//! A path such as `a.b.-1` is split on a separator into segments. Segments
//! that parse as signed integers address sequence positions (negative values
//! count from the end); everything else addresses map keys. Against a map an
//! index segment falls back to its text, since map keys are always strings.
//!
//! [`resolve`] walks a mutable tree to the parent of the final segment. With
//! [`Resolve::CreateIntermediate`] it creates the maps it needs on the way;
//! sequences are never extended. [`select`] is the read-only counterpart.

use crate::error::{AddressingError, ConfigError};
use crate::schema::{Conformance, SchemaRef};
use crate::types::Node;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// One step of a path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Addresses a map child.
    Key(String),

    /// Addresses a sequence position. `text` is the segment as written and
    /// is used as the key when the segment meets a map.
    Index { index: i64, text: String },
}

impl Segment {
    /// Classify a single segment.
    pub fn parse(text: &str) -> Self {
        match text.parse::<i64>() {
            Ok(index) => Segment::Index {
                index,
                text: text.to_string(),
            },
            Err(_) => Segment::Key(text.to_string()),
        }
    }

    /// The segment as a map key.
    pub fn as_key(&self) -> &str {
        match self {
            Segment::Key(key) => key,
            Segment::Index { text, .. } => text,
        }
    }

    pub fn index(&self) -> Option<i64> {
        match self {
            Segment::Index { index, .. } => Some(*index),
            Segment::Key(_) => None,
        }
    }

    pub fn is_key(&self) -> bool {
        matches!(self, Segment::Key(_))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_key())
    }
}

/// An ordered list of segments. The empty path addresses the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub const DEFAULT_SEPARATOR: char = '.';

    /// The empty path.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a `.`-separated path.
    pub fn parse(text: &str) -> Result<Self, AddressingError> {
        Self::parse_with_separator(text, Self::DEFAULT_SEPARATOR)
    }

    /// Parse a path split on `separator`. The empty string is the root path.
    pub fn parse_with_separator(text: &str, separator: char) -> Result<Self, AddressingError> {
        if text.is_empty() {
            return Ok(Self::root());
        }
        let segments = text
            .split(separator)
            .map(|part| {
                if part.is_empty() {
                    Err(AddressingError::EmptySegment {
                        path: text.to_string(),
                    })
                } else {
                    Ok(Segment::parse(part))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn push(&mut self, segment: Segment) {
        self.segments.push(segment);
    }

    /// The first `depth` segments as strings.
    pub fn prefix(&self, depth: usize) -> Vec<String> {
        self.segments[..depth.min(self.segments.len())]
            .iter()
            .map(|segment| segment.as_key().to_string())
            .collect()
    }

    /// The first `depth` segments joined with `.`, for error messages.
    fn location(&self, depth: usize) -> String {
        self.prefix(depth).join(".")
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = AddressingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

/// Whether resolution may add structure to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolve {
    /// Never mutate; absent keys are an error.
    ReadOnly,

    /// Create maps for absent keys, and turn leaves that must be walked
    /// through by a key into maps.
    CreateIntermediate,
}

/// Map a possibly-negative index onto `0..len`.
pub fn normalize_index(index: i64, len: usize) -> Option<usize> {
    if index >= 0 {
        usize::try_from(index).ok().filter(|i| *i < len)
    } else {
        let back = usize::try_from(index.unsigned_abs()).ok()?;
        len.checked_sub(back)
    }
}

/// The nearest schema-bound map at or above a resolved location.
#[derive(Debug, Clone)]
pub(crate) struct BoundAncestor {
    pub schema: SchemaRef,

    /// Number of path segments from the root to the bound map.
    pub depth: usize,
}

impl BoundAncestor {
    fn of(node: &Node, depth: usize) -> Option<Self> {
        node.schema().map(|schema| Self {
            schema: Arc::clone(schema),
            depth,
        })
    }

    /// Conform `candidate` for the location named by the first `end`
    /// segments of `path`, re-rooting failures at the tree root.
    pub(crate) fn conform_at(
        &self,
        path: &Path,
        end: usize,
        candidate: Node,
        conformance: Conformance,
    ) -> Result<Node, ConfigError> {
        let location = path.prefix(end);
        let (above, relative) = location.split_at(self.depth.min(location.len()));
        self.schema
            .validate_at(relative, candidate, conformance)
            .map_err(|e| e.rooted_at(above).into())
    }
}

/// Walk `root` to the direct parent of the final segment of `path`.
///
/// The returned parent is guaranteed to accept the final segment: a map (the
/// key may still be absent) or a sequence with the index in range. The
/// target itself is never touched.
pub fn resolve<'n, 'p>(
    root: &'n mut Node,
    path: &'p Path,
    mode: Resolve,
) -> Result<(&'n mut Node, &'p Segment), ConfigError> {
    resolve_bound(root, path, mode).map(|(parent, last, _)| (parent, last))
}

/// [`resolve`], also reporting the nearest bound map at or above the parent.
///
/// Leaves walked through below a bound map are replaced with whatever that
/// map's schema makes of an empty map at their location.
pub(crate) fn resolve_bound<'n, 'p>(
    root: &'n mut Node,
    path: &'p Path,
    mode: Resolve,
) -> Result<(&'n mut Node, &'p Segment, Option<BoundAncestor>), ConfigError> {
    let segments = path.segments();
    let Some((last, parents)) = segments.split_last() else {
        return Err(AddressingError::EmptyPath.into());
    };

    let first = &segments[0];
    if root.is_value() && first.is_key() && mode == Resolve::CreateIntermediate {
        tracing::trace!("Replacing {} root with a map", root.kind_name());
        *root = Node::empty_map();
    }

    let mut ancestor = None;
    let mut current = root;
    for (depth, segment) in parents.iter().enumerate() {
        if let Some(bound) = BoundAncestor::of(current, depth) {
            ancestor = Some(bound);
        }
        let step = Step {
            segment,
            next: &segments[depth + 1],
            depth,
        };
        current = child_mut(current, &step, mode, path, ancestor.as_ref())?;
    }
    if let Some(bound) = BoundAncestor::of(current, parents.len()) {
        ancestor = Some(bound);
    }

    check_final(current, last, path, parents.len())?;
    Ok((current, last, ancestor))
}

/// A non-final segment, the one after it, and its position in the path.
struct Step<'p> {
    segment: &'p Segment,
    next: &'p Segment,
    depth: usize,
}

/// An empty map for the child at `step`, conformed by the nearest bound map
/// when there is one.
fn fresh_map(
    path: &Path,
    step: &Step<'_>,
    ancestor: Option<&BoundAncestor>,
) -> Result<Node, ConfigError> {
    match ancestor {
        Some(bound) => bound.conform_at(
            path,
            step.depth + 1,
            Node::empty_map(),
            Conformance::FillDefaults,
        ),
        None => Ok(Node::empty_map()),
    }
}

/// Step from `node` into the child addressed by `step.segment`, preparing
/// the child to be walked by `step.next`.
fn child_mut<'n>(
    node: &'n mut Node,
    step: &Step<'_>,
    mode: Resolve,
    path: &Path,
    ancestor: Option<&BoundAncestor>,
) -> Result<&'n mut Node, ConfigError> {
    let walk_through = step.next.is_key() && mode == Resolve::CreateIntermediate;
    let depth = step.depth;
    match node {
        Node::Map(map) => {
            let key = step.segment.as_key();

            if !map.contains_key(key) {
                if mode == Resolve::ReadOnly {
                    return Err(AddressingError::KeyNotFound {
                        path: path.location(depth),
                        key: key.to_string(),
                    }
                    .into());
                }
                let created = match map.schema() {
                    Some(schema) => schema
                        .default_for(key)
                        .map_err(|e| e.rooted_at(&path.prefix(depth)))?,
                    None => fresh_map(path, step, ancestor)?,
                };
                tracing::trace!(key, "Creating intermediate node");
                map.insert(key, created);
            }

            let entries = map.entries_mut();
            let Some(child) = entries.get_mut(key) else {
                return Err(AddressingError::KeyNotFound {
                    path: path.location(depth),
                    key: key.to_string(),
                }
                .into());
            };

            if child.is_value() && walk_through {
                *child = fresh_map(path, step, ancestor)?;
            }
            Ok(child)
        }
        Node::Sequence(items) => {
            let Some(index) = step.segment.index() else {
                return Err(AddressingError::KeyOnSequence {
                    path: path.location(depth),
                    key: step.segment.as_key().to_string(),
                }
                .into());
            };
            let len = items.len();
            let Some(position) = normalize_index(index, len) else {
                return Err(AddressingError::IndexOutOfRange {
                    path: path.location(depth),
                    index,
                    len,
                }
                .into());
            };

            let child = &mut items[position];
            if child.is_value() && walk_through {
                *child = fresh_map(path, step, ancestor)?;
            }
            Ok(child)
        }
        Node::Value(_) => Err(AddressingError::NotAContainer {
            path: path.location(depth),
            segment: step.segment.as_key().to_string(),
            kind: node.kind_name(),
        }
        .into()),
    }
}

fn check_final(node: &Node, last: &Segment, path: &Path, depth: usize) -> Result<(), ConfigError> {
    match node {
        Node::Map(_) => Ok(()),
        Node::Sequence(items) => match last.index() {
            Some(index) if normalize_index(index, items.len()).is_some() => Ok(()),
            Some(index) => Err(AddressingError::IndexOutOfRange {
                path: path.location(depth),
                index,
                len: items.len(),
            }
            .into()),
            None => Err(AddressingError::KeyOnSequence {
                path: path.location(depth),
                key: last.as_key().to_string(),
            }
            .into()),
        },
        Node::Value(_) => Err(AddressingError::NotAContainer {
            path: path.location(depth),
            segment: last.as_key().to_string(),
            kind: node.kind_name(),
        }
        .into()),
    }
}

/// Look up the node at `path` without mutating anything.
///
/// Absent keys, and missing or null leaves on the way, yield `Ok(None)`.
/// Shape mismatches (a key against a sequence, an out-of-range index,
/// descending into a scalar) are addressing errors.
pub fn select<'n>(root: &'n Node, path: &Path) -> Result<Option<&'n Node>, AddressingError> {
    let mut current = root;
    for (depth, segment) in path.segments().iter().enumerate() {
        current = match current {
            Node::Map(map) => match map.get(segment.as_key()) {
                Some(child) => child,
                None => return Ok(None),
            },
            Node::Sequence(items) => {
                let Some(index) = segment.index() else {
                    return Err(AddressingError::KeyOnSequence {
                        path: path.location(depth),
                        key: segment.as_key().to_string(),
                    });
                };
                match normalize_index(index, items.len()) {
                    Some(position) => &items[position],
                    None => {
                        return Err(AddressingError::IndexOutOfRange {
                            path: path.location(depth),
                            index,
                            len: items.len(),
                        });
                    }
                }
            }
            Node::Value(_) if current.is_missing() || current.is_null() => return Ok(None),
            Node::Value(_) => {
                return Err(AddressingError::NotAContainer {
                    path: path.location(depth),
                    segment: segment.as_key().to_string(),
                    kind: current.kind_name(),
                });
            }
        };
    }
    Ok(Some(current))
}
