//! Constraint evaluation
//!
//! Evaluation order, first failure wins:
//! - string: utf8, blank, values, regexp
//! - number: max, min, range (all inclusive, checked independently)
//! - sequence: each element in index order
//! - file: max_size
//!
//! Bounds are reported with the literal text they were declared as.

use crate::schema::{Constraints, FieldDescriptor, NumericRules, TextRules};

use super::coerce::TypedValue;
use super::errors::FieldError;

/// Applies the descriptor's constraints to a coerced value
pub fn validate(field: &FieldDescriptor, value: &TypedValue) -> Result<(), FieldError> {
    let constraints = field.constraints();
    match value {
        TypedValue::Int(n) => check_bounds(constraints.int(), n),
        TypedValue::Float32(n) => check_bounds(constraints.float32(), n),
        TypedValue::Float64(n) => check_bounds(constraints.float64(), n),
        TypedValue::Float32Seq(items) => items
            .iter()
            .try_for_each(|n| check_bounds(constraints.float32(), n)),
        TypedValue::Float64Seq(items) => items
            .iter()
            .try_for_each(|n| check_bounds(constraints.float64(), n)),
        TypedValue::Text(raw) => check_text(constraints.text(), raw),
        TypedValue::TextSeq(items) => items
            .iter()
            .try_for_each(|raw| check_text(constraints.text(), raw)),
        TypedValue::Bytes(bytes) => check_file(constraints, bytes),
        TypedValue::Bool(_) => Ok(()),
    }
}

fn check_bounds<N: PartialOrd>(rules: Option<&NumericRules<N>>, n: &N) -> Result<(), FieldError> {
    let Some(rules) = rules else {
        return Ok(());
    };

    // Negated comparisons so NaN fails every bound.
    if let Some(max) = &rules.max {
        if !(*n <= max.value) {
            return Err(FieldError::GreaterThanMax {
                max: max.literal.clone(),
            });
        }
    }
    if let Some(min) = &rules.min {
        if !(*n >= min.value) {
            return Err(FieldError::SmallerThanMin {
                min: min.literal.clone(),
            });
        }
    }
    if let Some((lo, hi)) = &rules.range {
        if !(*n >= lo.value && *n <= hi.value) {
            return Err(FieldError::NotInRange {
                lo: lo.literal.clone(),
                hi: hi.literal.clone(),
            });
        }
    }
    Ok(())
}

fn check_text(rules: Option<&TextRules>, raw: &[u8]) -> Result<(), FieldError> {
    let text = std::str::from_utf8(raw).map_err(|_| FieldError::InvalidUtf8)?;
    if text.is_empty() {
        return Err(FieldError::BlankString);
    }

    let Some(rules) = rules else {
        return Ok(());
    };
    if let Some(allowed) = &rules.values {
        if !allowed.iter().any(|v| v == text) {
            return Err(FieldError::InvalidEnumeration {
                value: text.to_string(),
                allowed: allowed.clone(),
            });
        }
    }
    if let Some(pattern) = &rules.pattern {
        if !pattern.is_full_match(text) {
            return Err(FieldError::WrongFormat {
                pattern: pattern.as_str().to_string(),
            });
        }
    }
    Ok(())
}

fn check_file(constraints: &Constraints, bytes: &[u8]) -> Result<(), FieldError> {
    match constraints.file().and_then(|rules| rules.max_size) {
        Some(limit) if bytes.len() as u64 > limit => Err(FieldError::FileTooLarge { limit }),
        _ => Ok(()),
    }
}
