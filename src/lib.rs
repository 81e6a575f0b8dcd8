//! formbind - declarative request decoding and validation
//!
//! A record type lists its fields once with per-field directives. Requests
//! in any of the supported encodings (query string, URL-encoded form,
//! multipart form, JSON object) are decoded into that record, coerced field
//! by field and validated, yielding the populated record or the first error.

pub mod bind;
pub mod cli;
pub mod http_server;
pub mod schema;

pub use bind::{decode, decode_into, Bind, BindError, FieldError};
pub use http_server::Bound;
pub use schema::{SchemaBuilder, SchemaError};
