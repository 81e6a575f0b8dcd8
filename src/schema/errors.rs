//! Schema error types
//!
//! Schema errors are configuration errors: they describe a record type whose
//! directives cannot be turned into field descriptors. They are raised once,
//! when the schema is built, and never depend on request data.
//!
//! Error codes:
//! - BIND_SCHEMA_INVALID_DIRECTIVE
//! - BIND_SCHEMA_INVALID_REQUIREDNESS
//! - BIND_SCHEMA_INVALID_CONSTRAINT
//! - BIND_SCHEMA_INVALID_DEFAULT
//! - BIND_SCHEMA_KIND_MISMATCH
//! - BIND_SCHEMA_DUPLICATE_FIELD

use std::fmt;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Directive string is malformed, or a key is unknown or repeated
    InvalidDirective,
    /// `valid` directive missing or not `required`/`optional`
    InvalidRequiredness,
    /// A constraint parameter does not parse as its expected type
    InvalidConstraintTag,
    /// Default value does not coerce under the field kind
    InvalidDefault,
    /// Constraint or blob type not applicable to the field kind
    KindMismatch,
    /// Two fields share one wire name
    DuplicateField,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::InvalidDirective => "BIND_SCHEMA_INVALID_DIRECTIVE",
            SchemaErrorCode::InvalidRequiredness => "BIND_SCHEMA_INVALID_REQUIREDNESS",
            SchemaErrorCode::InvalidConstraintTag => "BIND_SCHEMA_INVALID_CONSTRAINT",
            SchemaErrorCode::InvalidDefault => "BIND_SCHEMA_INVALID_DEFAULT",
            SchemaErrorCode::KindMismatch => "BIND_SCHEMA_KIND_MISMATCH",
            SchemaErrorCode::DuplicateField => "BIND_SCHEMA_DUPLICATE_FIELD",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error with the owning field and a human-readable message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaError {
    code: SchemaErrorCode,
    field: Option<String>,
    message: String,
}

impl SchemaError {
    /// Create an error with an explicit code and message
    pub fn new(code: SchemaErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            field: None,
            message: message.into(),
        }
    }

    /// Malformed directive string
    pub fn invalid_directive(reason: impl Into<String>) -> Self {
        Self::new(SchemaErrorCode::InvalidDirective, reason)
    }

    /// `valid` directive missing or unrecognized
    pub fn invalid_requiredness() -> Self {
        Self::new(
            SchemaErrorCode::InvalidRequiredness,
            "invalid `valid` tag, must be `required` or `optional`",
        )
    }

    /// `max` does not parse at the field's numeric width
    pub fn invalid_max() -> Self {
        Self::new(
            SchemaErrorCode::InvalidConstraintTag,
            "invalid `max` tag, must be int or float",
        )
    }

    /// `min` does not parse at the field's numeric width
    pub fn invalid_min() -> Self {
        Self::new(
            SchemaErrorCode::InvalidConstraintTag,
            "invalid `min` tag, must be int or float",
        )
    }

    /// `range` is not an ordered `lo|hi` pair
    pub fn invalid_range() -> Self {
        Self::new(
            SchemaErrorCode::InvalidConstraintTag,
            "invalid `range` tag, must be (int|int) or (float|float)",
        )
    }

    /// `max_size` is not a byte count
    pub fn invalid_max_size() -> Self {
        Self::new(
            SchemaErrorCode::InvalidConstraintTag,
            "invalid `max_size` tag, must be int",
        )
    }

    /// `regexp` does not compile
    pub fn invalid_pattern(reason: impl fmt::Display) -> Self {
        Self::new(
            SchemaErrorCode::InvalidConstraintTag,
            format!("invalid `regexp` tag: {}", reason),
        )
    }

    /// `default` rejected for the field kind
    pub fn invalid_default(reason: impl Into<String>) -> Self {
        Self::new(
            SchemaErrorCode::InvalidDefault,
            format!("invalid `default` tag: {}", reason.into()),
        )
    }

    /// Directive not applicable to the field kind
    pub fn kind_mismatch(directive: &str, kind: impl fmt::Display) -> Self {
        Self::new(
            SchemaErrorCode::KindMismatch,
            format!("`{}` tag not applicable to {} field", directive, kind),
        )
    }

    /// Wire name declared twice
    pub fn duplicate_field(name: &str) -> Self {
        Self::new(
            SchemaErrorCode::DuplicateField,
            format!("field `{}` declared more than once", name),
        )
        .for_field(name)
    }

    /// Attach the owning field's wire name
    pub fn for_field(mut self, name: impl Into<String>) -> Self {
        self.field = Some(name.into());
        self
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the owning field, if known
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns the error message without the field prefix
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{}: {}", field, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(SchemaErrorCode::InvalidDirective.code(), "BIND_SCHEMA_INVALID_DIRECTIVE");
        assert_eq!(SchemaErrorCode::InvalidConstraintTag.code(), "BIND_SCHEMA_INVALID_CONSTRAINT");
        assert_eq!(SchemaErrorCode::DuplicateField.code(), "BIND_SCHEMA_DUPLICATE_FIELD");
    }

    #[test]
    fn test_display_prefixes_field() {
        let err = SchemaError::invalid_max().for_field("age");
        assert_eq!(err.to_string(), "age: invalid `max` tag, must be int or float");
        assert_eq!(err.field(), Some("age"));
        assert_eq!(err.code(), SchemaErrorCode::InvalidConstraintTag);
    }

    #[test]
    fn test_display_without_field() {
        let err = SchemaError::invalid_requiredness();
        assert_eq!(
            err.to_string(),
            "invalid `valid` tag, must be `required` or `optional`"
        );
    }
}
