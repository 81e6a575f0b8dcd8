//! # Binding Errors

use thiserror::Error;

use crate::schema::{FieldKind, SchemaError};

/// Result type for decode operations
pub type BindResult<T> = Result<T, BindError>;

/// A failure attributed to a single field
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    // Resolution
    #[error("not found")]
    MissingRequired,

    #[error("file expected")]
    FileTypeInvalid,

    // Coercion
    #[error("corrupted file")]
    CorruptedFile,

    #[error("{expected} expected")]
    ParamInvalid { expected: FieldKind },

    #[error("invalid base64 string")]
    InvalidBase64,

    // Validation
    #[error("invalid utf8 string")]
    InvalidUtf8,

    #[error("blank string")]
    BlankString,

    #[error("{value} is not in [{}]", .allowed.join(" "))]
    InvalidEnumeration { value: String, allowed: Vec<String> },

    #[error("wrong format, should match regexp `{pattern}`")]
    WrongFormat { pattern: String },

    #[error("greater than {max}")]
    GreaterThanMax { max: String },

    #[error("smaller than {min}")]
    SmallerThanMin { min: String },

    #[error("not in range ({lo}, {hi})")]
    NotInRange { lo: String, hi: String },

    #[error("file larger than {limit} bytes")]
    FileTooLarge { limit: u64 },
}

impl FieldError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            FieldError::MissingRequired => "BIND_MISSING_REQUIRED",
            FieldError::FileTypeInvalid => "BIND_FILE_TYPE_INVALID",
            FieldError::CorruptedFile => "BIND_CORRUPTED_FILE",
            FieldError::ParamInvalid { .. } => "BIND_PARAM_INVALID",
            FieldError::InvalidBase64 => "BIND_INVALID_BASE64",
            FieldError::InvalidUtf8 => "BIND_INVALID_UTF8",
            FieldError::BlankString => "BIND_BLANK_STRING",
            FieldError::InvalidEnumeration { .. } => "BIND_INVALID_ENUMERATION",
            FieldError::WrongFormat { .. } => "BIND_WRONG_FORMAT",
            FieldError::GreaterThanMax { .. } => "BIND_GREATER_THAN_MAX",
            FieldError::SmallerThanMin { .. } => "BIND_SMALLER_THAN_MIN",
            FieldError::NotInRange { .. } => "BIND_NOT_IN_RANGE",
            FieldError::FileTooLarge { .. } => "BIND_FILE_TOO_LARGE",
        }
    }
}

/// Decode errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BindError {
    // Transport
    #[error("empty Content-Type")]
    EmptyContentType,

    #[error("unsupported Content-Type")]
    UnsupportedContentType,

    #[error("parse form failed: {0}")]
    ParseForm(String),

    #[error("parse multipart form failed: {0}")]
    ParseMultipart(String),

    #[error("decode json failed: {0}")]
    DecodeJson(String),

    // Field
    #[error("{field}: {source}")]
    Field { field: String, source: FieldError },

    // Configuration
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl BindError {
    /// Wraps a field failure with the field's wire name
    pub fn field(field: impl Into<String>, source: FieldError) -> Self {
        BindError::Field {
            field: field.into(),
            source,
        }
    }

    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            BindError::EmptyContentType => 415,
            BindError::UnsupportedContentType => 415,
            BindError::ParseForm(_) => 400,
            BindError::ParseMultipart(_) => 400,
            BindError::DecodeJson(_) => 400,
            BindError::Field { .. } => 422,
            BindError::Schema(_) => 500,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            BindError::EmptyContentType => "BIND_EMPTY_CONTENT_TYPE",
            BindError::UnsupportedContentType => "BIND_UNSUPPORTED_CONTENT_TYPE",
            BindError::ParseForm(_) => "BIND_PARSE_FORM",
            BindError::ParseMultipart(_) => "BIND_PARSE_MULTIPART",
            BindError::DecodeJson(_) => "BIND_DECODE_JSON",
            BindError::Field { source, .. } => source.code(),
            BindError::Schema(e) => e.code().code(),
        }
    }

    /// Wire name of the failing field, if any
    pub fn field_name(&self) -> Option<&str> {
        match self {
            BindError::Field { field, .. } => Some(field),
            BindError::Schema(e) => e.field(),
            _ => None,
        }
    }

    /// The underlying field failure, if any
    pub fn field_error(&self) -> Option<&FieldError> {
        match self {
            BindError::Field { source, .. } => Some(source),
            _ => None,
        }
    }
}
