//! Raw value coercion
//!
//! Scalars take the first raw value, sequences take all of them in order.
//! Strings stay as bytes here; UTF-8 is checked by the validator.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::schema::{BlobEncoding, FieldKind, FloatWidth, Numeric};

use super::errors::FieldError;
use super::source::{FilePart, RawSource};

/// A coerced field value
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Int(i64),
    Bool(bool),
    Float32(f32),
    Float64(f64),
    Text(Vec<u8>),
    TextSeq(Vec<Vec<u8>>),
    Float32Seq(Vec<f32>),
    Float64Seq(Vec<f64>),
    Bytes(Vec<u8>),
}

/// Converts a resolved source into the field's typed value
pub fn coerce(kind: FieldKind, source: &RawSource<'_>) -> Result<TypedValue, FieldError> {
    let values: &[Vec<u8>] = match source {
        RawSource::Files(parts) => return coerce_files(kind, parts),
        RawSource::Text(values) => values,
    };
    let invalid = || FieldError::ParamInvalid { expected: kind };

    match kind {
        FieldKind::StringSeq => return Ok(TypedValue::TextSeq(values.to_vec())),
        FieldKind::FloatSeq(FloatWidth::F32) => {
            return parse_all(values).map(TypedValue::Float32Seq).ok_or_else(invalid)
        }
        FieldKind::FloatSeq(FloatWidth::F64) => {
            return parse_all(values).map(TypedValue::Float64Seq).ok_or_else(invalid)
        }
        _ => {}
    }

    let first = values.first().ok_or_else(invalid)?;
    match kind {
        FieldKind::Int => parse(first).map(TypedValue::Int).ok_or_else(invalid),
        FieldKind::Float32 => parse(first).map(TypedValue::Float32).ok_or_else(invalid),
        FieldKind::Float64 => parse(first).map(TypedValue::Float64).ok_or_else(invalid),
        FieldKind::Bool => parse_bool(first).map(TypedValue::Bool).ok_or_else(invalid),
        FieldKind::String => Ok(TypedValue::Text(first.clone())),
        FieldKind::ByteBlob(BlobEncoding::Base64) => STANDARD
            .decode(first)
            .map(TypedValue::Bytes)
            .map_err(|_| FieldError::InvalidBase64),
        FieldKind::ByteBlob(BlobEncoding::File) => Err(FieldError::FileTypeInvalid),
        FieldKind::StringSeq | FieldKind::FloatSeq(_) => Err(invalid()),
    }
}

fn coerce_files(kind: FieldKind, parts: &[FilePart]) -> Result<TypedValue, FieldError> {
    if kind != FieldKind::ByteBlob(BlobEncoding::File) {
        return Err(FieldError::ParamInvalid { expected: kind });
    }
    let part = parts.first().ok_or(FieldError::CorruptedFile)?;
    part.read_all().map(TypedValue::Bytes).map_err(|e| {
        tracing::debug!(file = ?part.file_name, error = %e, "file part unreadable");
        FieldError::CorruptedFile
    })
}

/// Decimal parse at the width of `N`; overflow is a failure, not infinity
fn parse<N: Numeric>(raw: &[u8]) -> Option<N> {
    N::parse_text(std::str::from_utf8(raw).ok()?)
}

fn parse_all<N: Numeric>(values: &[Vec<u8>]) -> Option<Vec<N>> {
    values.iter().map(|v| parse(v)).collect()
}

/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`
fn parse_bool(raw: &[u8]) -> Option<bool> {
    match raw {
        b"1" | b"t" | b"T" | b"TRUE" | b"true" | b"True" => Some(true),
        b"0" | b"f" | b"F" | b"FALSE" | b"false" | b"False" => Some(false),
        _ => None,
    }
}
