//! Field descriptor types
//!
//! Supported field kinds:
//! - int: 64-bit signed integer
//! - bool: Boolean
//! - float32 / float64: IEEE-754 floating point at the declared width
//! - string: UTF-8 text
//! - []string, []float32, []float64: ordered sequences
//! - file / base64: byte blobs read from an upload or decoded from text
//!
//! Descriptors are produced by [`SchemaBuilder`](super::SchemaBuilder) and are
//! immutable afterwards.

use std::fmt;

use regex::Regex;
use serde::{Serialize, Serializer};

use super::errors::{SchemaError, SchemaResult};

/// Missing-value policy of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Requiredness {
    /// Absence is an error
    Required,
    /// Absence falls back to the default, or leaves the field untouched
    Optional,
}

impl Requiredness {
    /// Parses the `valid` directive value
    pub fn parse(value: &str) -> SchemaResult<Self> {
        match value {
            "required" => Ok(Requiredness::Required),
            "optional" => Ok(Requiredness::Optional),
            _ => Err(SchemaError::invalid_requiredness()),
        }
    }
}

/// Width of a floating point field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatWidth {
    F32,
    F64,
}

/// How a byte blob arrives on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobEncoding {
    /// Uploaded file part
    File,
    /// Standard base64 text
    Base64,
}

/// Declared kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Int,
    Bool,
    Float32,
    Float64,
    String,
    StringSeq,
    FloatSeq(FloatWidth),
    ByteBlob(BlobEncoding),
}

impl FieldKind {
    /// Returns the kind name used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Int => "int",
            FieldKind::Bool => "bool",
            FieldKind::Float32 => "float32",
            FieldKind::Float64 => "float64",
            FieldKind::String => "string",
            FieldKind::StringSeq => "[]string",
            FieldKind::FloatSeq(FloatWidth::F32) => "[]float32",
            FieldKind::FloatSeq(FloatWidth::F64) => "[]float64",
            FieldKind::ByteBlob(BlobEncoding::File) => "file",
            FieldKind::ByteBlob(BlobEncoding::Base64) => "base64",
        }
    }

    /// True for kinds that take every raw value rather than the first
    pub fn is_sequence(&self) -> bool {
        matches!(self, FieldKind::StringSeq | FieldKind::FloatSeq(_))
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl Serialize for FieldKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.type_name())
    }
}

/// Numbers a field can hold, parsed at their own width
pub trait Numeric: std::str::FromStr + PartialOrd + Copy {
    /// Parses `text`, rejecting values that do not fit the width
    fn parse_text(text: &str) -> Option<Self>;
}

impl Numeric for i64 {
    fn parse_text(text: &str) -> Option<Self> {
        text.parse().ok()
    }
}

macro_rules! impl_numeric_float {
    ($($ty:ty),*) => {
        $(
            impl Numeric for $ty {
                // Overflow parses to infinity; only a spelled-out infinity may.
                fn parse_text(text: &str) -> Option<Self> {
                    let value: $ty = text.parse().ok()?;
                    if value.is_infinite() && !is_infinity_literal(text) {
                        return None;
                    }
                    Some(value)
                }
            }
        )*
    };
}

impl_numeric_float!(f32, f64);

fn is_infinity_literal(text: &str) -> bool {
    let unsigned = text.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(text);
    unsigned.eq_ignore_ascii_case("inf") || unsigned.eq_ignore_ascii_case("infinity")
}

/// A numeric limit together with the text it was declared as.
///
/// Messages quote `literal`, so `min:"60.0"` reports `smaller than 60.0`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bound<N> {
    pub value: N,
    pub literal: String,
}

impl<N: Numeric> Bound<N> {
    /// Parses a bound at the field's own width. NaN is not a bound.
    pub fn parse(literal: &str) -> Option<Self> {
        let trimmed = literal.trim();
        N::parse_text(trimmed)
            .filter(|value| value.partial_cmp(value).is_some())
            .map(|value| Bound {
                value,
                literal: trimmed.to_string(),
            })
    }
}

/// Inclusive numeric limits. `range` is checked independently of `min`/`max`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericRules<N> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<Bound<N>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<Bound<N>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<(Bound<N>, Bound<N>)>,
}

impl<N> NumericRules<N> {
    /// True when no bound is declared
    pub fn is_empty(&self) -> bool {
        self.max.is_none() && self.min.is_none() && self.range.is_none()
    }
}

impl<N> Default for NumericRules<N> {
    fn default() -> Self {
        Self {
            max: None,
            min: None,
            range: None,
        }
    }
}

/// A compiled `regexp` directive that must match the whole value
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    anchored: Regex,
}

impl Pattern {
    /// Compiles `source` so that it only matches complete strings
    pub fn compile(source: &str) -> SchemaResult<Self> {
        let anchored = Regex::new(&format!("^(?:{})$", source))
            .map_err(SchemaError::invalid_pattern)?;
        Ok(Self {
            source: source.to_string(),
            anchored,
        })
    }

    /// The pattern as declared
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_full_match(&self, text: &str) -> bool {
        self.anchored.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.source)
    }
}

/// String constraints, applied after the UTF-8 and blank checks
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextRules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<Pattern>,
}

/// Upload constraints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FileRules {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u64>,
}

/// Constraint parameters, carrying only what the field kind can use
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "rules", rename_all = "snake_case")]
pub enum Constraints {
    /// bool and base64 fields take no constraints
    None,
    Int(NumericRules<i64>),
    Float32(NumericRules<f32>),
    Float64(NumericRules<f64>),
    Text(TextRules),
    File(FileRules),
}

impl Constraints {
    pub fn int(&self) -> Option<&NumericRules<i64>> {
        match self {
            Constraints::Int(rules) => Some(rules),
            _ => None,
        }
    }

    pub fn float32(&self) -> Option<&NumericRules<f32>> {
        match self {
            Constraints::Float32(rules) => Some(rules),
            _ => None,
        }
    }

    pub fn float64(&self) -> Option<&NumericRules<f64>> {
        match self {
            Constraints::Float64(rules) => Some(rules),
            _ => None,
        }
    }

    pub fn text(&self) -> Option<&TextRules> {
        match self {
            Constraints::Text(rules) => Some(rules),
            _ => None,
        }
    }

    pub fn file(&self) -> Option<&FileRules> {
        match self {
            Constraints::File(rules) => Some(rules),
            _ => None,
        }
    }
}

/// Immutable per-field metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    name: String,
    requiredness: Requiredness,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<String>,
    kind: FieldKind,
    constraints: Constraints,
}

impl FieldDescriptor {
    pub(crate) fn new(
        name: String,
        requiredness: Requiredness,
        default: Option<String>,
        kind: FieldKind,
        constraints: Constraints,
    ) -> Self {
        Self {
            name,
            requiredness,
            default,
            kind,
            constraints,
        }
    }

    /// Wire key
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn requiredness(&self) -> Requiredness {
        self.requiredness
    }

    pub fn is_required(&self) -> bool {
        self.requiredness == Requiredness::Required
    }

    /// Literal used when the field is optional and absent
    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }
}
