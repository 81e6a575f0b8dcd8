//! # HTTP Adapter
//!
//! Connects request bodies to the binding core and hosts the demo server.
//!
//! # Endpoints
//!
//! - `/` - basic record
//! - `/upload` - file upload record
//! - `/label` - base64 record

pub mod config;
pub mod decode;
pub mod demo_routes;
pub mod extractor;
pub mod server;

pub use config::{BindConfig, ServerConfig};
pub use decode::{collect_multipart, flatten_json, parse_query, parse_urlencoded};
pub use demo_routes::{demo_routes, demo_schemas, BasicParam, FileParam, LabelParam};
pub use extractor::Bound;
pub use server::HttpServer;
