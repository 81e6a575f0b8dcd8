//! # Binding Extractor
//!
//! `Bound<T>` decodes a request into any [`Bind`] record:
//!
//! - `GET`: query string, skipping malformed pairs
//! - `application/json`: flattened JSON object; the query is ignored
//! - `multipart/form-data`: body parts, then query values
//! - `application/x-www-form-urlencoded`: body values, then query values

use axum::body::Bytes;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{debug, error};

use crate::bind::{self, Bind, BindError, FileLookup, FormData};

use super::config::BindConfig;
use super::decode::{collect_multipart, flatten_json, parse_query, parse_urlencoded};

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";
pub const CONTENT_TYPE_MULTIPART: &str = "multipart/form-data";

/// A decoded and validated record
#[derive(Debug, Clone, PartialEq)]
pub struct Bound<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for Bound<T>
where
    S: Send + Sync,
    T: Bind + Send,
{
    type Rejection = BindError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let config = req
            .extensions()
            .get::<BindConfig>()
            .cloned()
            .unwrap_or_default();
        let raw_query = req.uri().query().unwrap_or("").to_string();

        if req.method() == Method::GET {
            let query = parse_query(raw_query.as_bytes());
            return bind::decode(&query, None).map(Bound);
        }

        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| filter_flags(v.as_bytes()));
        let content_type = match content_type {
            None => return Err(BindError::EmptyContentType),
            Some(ct) if ct.is_empty() => return Err(BindError::EmptyContentType),
            Some(ct) => ct,
        };
        debug!(method = %req.method(), content_type = %content_type, "binding request");

        match content_type.as_str() {
            CONTENT_TYPE_JSON => {
                let body = read_body(req, state).await?;
                let values = flatten_json(&body)?;
                bind::decode(&values, None).map(Bound)
            }
            CONTENT_TYPE_MULTIPART => {
                let query = parse_urlencoded(raw_query.as_bytes())?;
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(|e| BindError::ParseMultipart(e.body_text()))?;
                let (mut values, files) = collect_multipart(multipart, &config).await?;
                values.merge(query);
                bind::decode(&values, Some(&files as &dyn FileLookup)).map(Bound)
            }
            CONTENT_TYPE_FORM => {
                let query = parse_urlencoded(raw_query.as_bytes())?;
                let body = read_body(req, state).await?;
                let mut values: FormData = parse_urlencoded(&body)?;
                values.merge(query);
                bind::decode(&values, None).map(Bound)
            }
            _ => Err(BindError::UnsupportedContentType),
        }
    }
}

async fn read_body<S: Send + Sync>(req: Request, state: &S) -> Result<Bytes, BindError> {
    Bytes::from_request(req, state)
        .await
        .map_err(|e| BindError::ParseForm(e.body_text()))
}

/// Media type without parameters, lowercased
fn filter_flags(raw: &[u8]) -> String {
    let end = raw
        .iter()
        .position(|b| *b == b';' || *b == b' ')
        .unwrap_or(raw.len());
    String::from_utf8_lossy(&raw[..end]).to_ascii_lowercase()
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

impl IntoResponse for BindError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = match &self {
            BindError::Schema(e) => {
                error!(code = e.code().code(), error = %e, "record schema misconfigured");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}
