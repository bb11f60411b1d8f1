//! Structured schemas for `conftree` configuration trees.
//!
//! An [`ObjectSchema`] declares the fields of a record, their schemas and
//! their defaults. Trees built with [`structured`] or [`instantiate`] are
//! bound to their schema, so every later `conftree::update` inside them is
//! validated:
//!
//! ```rust
//! use conftree::{Node, update};
//! use conftree_schema::{ObjectSchema, Schema, instantiate};
//! use std::sync::Arc;
//!
//! let module = ObjectSchema::new("Module")
//!     .field("name", Schema::string())
//!     .field("classes", Schema::array_of(Schema::string()));
//! let package = Arc::new(
//!     ObjectSchema::new("Package").field("modules", Schema::array_of(module.into())),
//! );
//!
//! let mut cfg = instantiate(&package).unwrap();
//! let modules = serde_json::json!([{"name": "foo"}]);
//!
//! // Merging completes the record; `classes` is left missing.
//! update(&mut cfg, "modules", modules.clone(), true).unwrap();
//! assert!(cfg.get("modules").unwrap().as_sequence().unwrap()[0]
//!     .get("classes")
//!     .unwrap()
//!     .is_missing());
//!
//! // Replacing demands every required field.
//! assert!(update(&mut cfg, "modules", modules, false).is_err());
//! ```

pub mod error;
pub mod schema;
pub mod validator;

mod descriptor;

pub use error::{SchemaError, SchemaResult};
pub use schema::{
    AnyOfSchema, AnySchema, ArraySchema, BooleanSchema, EnumSchema, FieldSchema, NullSchema,
    NumberSchema, ObjectSchema, Pattern, Schema, SchemaAnnotations, StringSchema,
};
pub use validator::{ValidationResult, validate};
pub use descriptor::{instantiate, structured};
