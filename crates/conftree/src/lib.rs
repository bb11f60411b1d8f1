//! Hierarchical, path-addressable configuration trees.
//!
//! A configuration is a tree of [`Node`]s: maps with ordered string keys,
//! sequences, and leaves holding a scalar or the *missing* marker (`???`).
//! Trees are mutated through [`update`], which addresses a location with a
//! dotted path such as `modules.0.name` and either merges the new value into
//! what is already there or replaces it.
//!
//! # Key Features
//!
//! - **Path addressing**: integer segments index sequences, negative ones
//!   from the end; absent intermediate maps are created on demand
//! - **Explicit merge semantics**: maps merge key-wise, everything else is
//!   replaced; sequences are always assigned wholesale
//! - **Schema-checked writes**: maps bound to a [`SchemaDescriptor`] validate
//!   every mutation that lands on or inside them, and a rejected update
//!   leaves the target untouched
//!
//! # Architecture
//!
//! - [`Node`], [`MapNode`], [`Leaf`], [`Scalar`]: the tree model
//! - [`Path`] and [`resolve`]: parsing and walking dotted paths
//! - [`IntoNode`]: conversion from YAML, JSON and plain Rust values
//! - [`MergeMode`] and [`apply`]: merge versus replace
//! - [`SchemaDescriptor`]: the validation capability carried by bound maps
//!
//! # Example
//!
//! ```rust
//! use conftree::{Node, select, update, Path};
//!
//! let mut cfg = Node::empty_map();
//! update(&mut cfg, "a.b", 1, true).unwrap();
//! update(&mut cfg, "a", serde_json::json!({"c": 2}), true).unwrap();
//!
//! let b = select(&cfg, &Path::parse("a.b").unwrap()).unwrap();
//! assert_eq!(b.and_then(Node::as_i64), Some(1));
//!
//! // Replacing drops the sibling keys.
//! update(&mut cfg, "a", serde_json::json!({"c": 3}), false).unwrap();
//! assert!(cfg.get("a").unwrap().get("b").is_none());
//! ```

mod convert;
mod error;
mod materialize;
mod merge;
mod path;
mod schema;
mod types;
mod update;

pub use types::{
    Leaf,
    MISSING_LITERAL,
    MapNode,
    Node,
    Scalar,
};

pub use error::{
    AddressingError,
    ConfigError,
    ValidationFailure,
    ViolationKind,
};

pub use schema::{
    Conformance,
    SchemaDescriptor,
    SchemaRef,
    conform,
};

pub use path::{
    Path,
    Resolve,
    Segment,
    normalize_index,
    resolve,
    select,
};

pub use convert::{
    IntoNode,
    node_from_json,
    node_from_yaml,
};

pub use merge::{
    MergeMode,
    apply,
    merge_layers,
};

pub use update::{
    UpdateOptions,
    update,
    update_with_options,
};

pub use materialize::{
    MaterializeError,
    MaterializeOptions,
};
