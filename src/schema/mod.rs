//! Directive schema for bindable records
//!
//! Each record type declares its fields once. The declaration is parsed into
//! immutable [`FieldDescriptor`]s, checked for consistency and cached for
//! the lifetime of the process.
//!
//! # Design Principles
//!
//! - Every directive is checked when the schema is built
//! - Constraints are typed per field kind
//! - A misconfigured record never binds
//! - Descriptors are never mutated after construction

mod builder;
mod directive;
mod errors;
mod registry;
mod types;

pub use builder::{Accessor, FieldBinding, FieldSpec, RecordSchema, SchemaBuilder, Slot};
pub use directive::{split_list, DirectiveKey, Directives, LIST_SEPARATOR};
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use registry::SchemaRegistry;
pub use types::{
    BlobEncoding, Bound, Constraints, FieldDescriptor, FieldKind, FileRules, FloatWidth,
    Numeric, NumericRules, Pattern, Requiredness, TextRules,
};
