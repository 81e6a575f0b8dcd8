//! # Demo Routes
//!
//! Three records exercising every field kind:
//!
//! - `/` - scalars, enumerations, patterns, sequences and a default
//! - `/upload` - a size-limited file upload
//! - `/label` - a base64 blob

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;

use crate::bind::{Bind, BindError};
use crate::schema::{FieldDescriptor, SchemaBuilder, SchemaRegistry, SchemaResult};

use super::extractor::Bound;

const NAME_PATTERN: &str = "^[a-zA-Z_][a-zA-Z_]*$";

/// Record bound by `/`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BasicParam {
    pub name: String,
    pub age: i64,
    pub passed: bool,
    pub score: f32,
    pub area: f64,
    pub side: String,
    pub friends: Vec<String>,
    pub scores: Vec<f32>,
    pub extra_info: String,
}

impl Bind for BasicParam {
    fn describe(schema: &mut SchemaBuilder<Self>) {
        schema
            .text("name", |r| &mut r.name)
            .directives(&format!(r#"valid:"required" regexp:"{}""#, NAME_PATTERN));
        schema
            .int("age", |r| &mut r.age)
            .directives(r#"valid:"required" range:"18|25""#);
        schema.bool("passed", |r| &mut r.passed).required();
        schema.float32("score", |r| &mut r.score).required().min("60.0");
        schema.float64("area", |r| &mut r.area).required().max("200.0");
        schema
            .text("side", |r| &mut r.side)
            .required()
            .values(["front", "back"]);
        schema
            .text_seq("friends", |r| &mut r.friends)
            .required()
            .pattern(NAME_PATTERN);
        schema
            .float32_seq("scores", |r| &mut r.scores)
            .required()
            .range(60, 100);
        schema
            .text("extra_info", |r| &mut r.extra_info)
            .optional()
            .default_value("hello");
    }
}

/// Record bound by `/upload`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileParam {
    pub image: Vec<u8>,
    pub name: String,
}

impl Bind for FileParam {
    fn describe(schema: &mut SchemaBuilder<Self>) {
        schema
            .bytes("image", |r| &mut r.image)
            .required()
            .file()
            .max_size(61440);
        schema
            .text("name", |r| &mut r.name)
            .required()
            .pattern(NAME_PATTERN);
    }
}

/// Record bound by `/label`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelParam {
    pub label: Vec<u8>,
}

impl Bind for LabelParam {
    fn describe(schema: &mut SchemaBuilder<Self>) {
        schema.bytes("label", |r| &mut r.label).required().base64();
    }
}

/// Build demo routes
pub fn demo_routes() -> Router {
    Router::new()
        .route("/", any(basic_handler))
        .route("/upload", any(upload_handler))
        .route("/label", any(label_handler))
}

/// Field descriptors of every demo record, keyed by route
#[derive(Debug, Serialize)]
pub struct DemoSchemas {
    #[serde(rename = "/")]
    pub basic: Vec<FieldDescriptor>,
    #[serde(rename = "/upload")]
    pub upload: Vec<FieldDescriptor>,
    #[serde(rename = "/label")]
    pub label: Vec<FieldDescriptor>,
}

pub fn demo_schemas() -> SchemaResult<DemoSchemas> {
    Ok(DemoSchemas {
        basic: descriptors::<BasicParam>()?,
        upload: descriptors::<FileParam>()?,
        label: descriptors::<LabelParam>()?,
    })
}

fn descriptors<T: Bind>() -> SchemaResult<Vec<FieldDescriptor>> {
    let schema = SchemaRegistry::global().get_or_build::<T>()?;
    Ok(schema.descriptors().cloned().collect())
}

fn failure(err: BindError) -> Response {
    let status = StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::BAD_REQUEST);
    (status, Json(json!({ "msg": err.to_string() }))).into_response()
}

async fn basic_handler(result: Result<Bound<BasicParam>, BindError>) -> Response {
    match result {
        Ok(Bound(param)) => Json(param).into_response(),
        Err(err) => failure(err),
    }
}

async fn upload_handler(result: Result<Bound<FileParam>, BindError>) -> Response {
    match result {
        Ok(Bound(param)) => Json(json!({ "image_size": param.image.len() })).into_response(),
        Err(err) => failure(err),
    }
}

async fn label_handler(result: Result<Bound<LabelParam>, BindError>) -> Response {
    match result {
        Ok(Bound(param)) => {
            Json(json!({ "label": String::from_utf8_lossy(&param.label) })).into_response()
        }
        Err(err) => failure(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldKind;

    #[test]
    fn test_demo_schemas_build() {
        let schemas = serde_json::to_value(demo_schemas().unwrap()).unwrap();
        assert_eq!(schemas["/"].as_array().unwrap().len(), 9);
        assert_eq!(schemas["/upload"][0]["kind"], "file");
        assert_eq!(schemas["/label"][0]["kind"], "base64");
    }

    #[test]
    fn test_basic_param_descriptors() {
        let schema = SchemaRegistry::global().get_or_build::<BasicParam>().unwrap();
        let scores = schema.field("scores").unwrap();
        assert_eq!(scores.kind().to_string(), "[]float32");
        let extra = schema.field("extra_info").unwrap();
        assert_eq!(extra.default(), Some("hello"));
        assert_eq!(schema.field("age").unwrap().kind(), FieldKind::Int);
    }
}
