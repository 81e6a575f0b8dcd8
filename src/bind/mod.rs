//! Request binding core
//!
//! For each field of a record, in declaration order:
//!
//! 1. resolve its raw source from the lookups
//! 2. coerce the source into the field kind
//! 3. validate the coerced value
//! 4. commit it into the record
//!
//! The first failure aborts the decode and is reported against the field's
//! wire name. Nothing here is async; the HTTP adapter collects bodies first.

pub mod coerce;
pub mod errors;
pub mod source;
pub mod validator;

pub use coerce::TypedValue;
pub use errors::{BindError, BindResult, FieldError};
pub use source::{
    FileContent, FileData, FileLookup, FilePart, FormData, RawSource, Resolution, SpilledFile,
    ValueLookup,
};

use tracing::debug;

use crate::schema::{FieldDescriptor, RecordSchema, SchemaBuilder, SchemaRegistry, Slot};

/// A flat record that can be decoded from request values.
///
/// `describe` lists every field once; the resulting schema is built on
/// first use and shared for the rest of the process.
pub trait Bind: Default + 'static {
    fn describe(schema: &mut SchemaBuilder<Self>);
}

/// Decodes a fresh record of type `T`
pub fn decode<T: Bind>(values: &dyn ValueLookup, files: Option<&dyn FileLookup>) -> BindResult<T> {
    let mut record = T::default();
    decode_into(&mut record, values, files)?;
    Ok(record)
}

/// Decodes into an existing record. Skipped optional fields keep their value.
pub fn decode_into<T: Bind>(
    record: &mut T,
    values: &dyn ValueLookup,
    files: Option<&dyn FileLookup>,
) -> BindResult<()> {
    let schema = SchemaRegistry::global().get_or_build::<T>()?;
    decode_with_schema(&schema, record, values, files)
}

/// Decodes against an explicit schema, bypassing the registry
pub fn decode_with_schema<T>(
    schema: &RecordSchema<T>,
    record: &mut T,
    values: &dyn ValueLookup,
    files: Option<&dyn FileLookup>,
) -> BindResult<()> {
    for binding in schema.fields() {
        let field = binding.descriptor();
        bind_field(binding.slot(), field, record, values, files).map_err(|e| {
            debug!(field = field.name(), error = %e, "decode failed");
            BindError::field(field.name(), e)
        })?;
    }
    Ok(())
}

fn bind_field<T>(
    slot: Slot<T>,
    field: &FieldDescriptor,
    record: &mut T,
    values: &dyn ValueLookup,
    files: Option<&dyn FileLookup>,
) -> Result<(), FieldError> {
    let source = match source::resolve(field, values, files)? {
        Resolution::Found(source) => source,
        Resolution::Defaulted(source) => {
            debug!(field = field.name(), "absent, using default");
            source
        }
        Resolution::Skip => {
            debug!(field = field.name(), "absent, skipped");
            return Ok(());
        }
    };

    let value = coerce::coerce(field.kind(), &source)?;
    validator::validate(field, &value)?;
    commit(field, slot, record, value)
}

/// Writes a validated value into its slot
fn commit<T>(
    field: &FieldDescriptor,
    slot: Slot<T>,
    record: &mut T,
    value: TypedValue,
) -> Result<(), FieldError> {
    match (slot, value) {
        (Slot::Int(get), TypedValue::Int(n)) => *get(record) = n,
        (Slot::Bool(get), TypedValue::Bool(b)) => *get(record) = b,
        (Slot::Float32(get), TypedValue::Float32(n)) => *get(record) = n,
        (Slot::Float64(get), TypedValue::Float64(n)) => *get(record) = n,
        (Slot::Float32Seq(get), TypedValue::Float32Seq(items)) => *get(record) = items,
        (Slot::Float64Seq(get), TypedValue::Float64Seq(items)) => *get(record) = items,
        (Slot::Bytes(get), TypedValue::Bytes(bytes)) => *get(record) = bytes,
        (Slot::Text(get), TypedValue::Text(raw)) => {
            *get(record) = String::from_utf8(raw).map_err(|_| FieldError::InvalidUtf8)?
        }
        (Slot::TextSeq(get), TypedValue::TextSeq(items)) => {
            *get(record) = items
                .into_iter()
                .map(|raw| String::from_utf8(raw).map_err(|_| FieldError::InvalidUtf8))
                .collect::<Result<_, _>>()?
        }
        (slot, value) => {
            debug!(field = field.name(), slot = slot.type_name(), ?value, "value does not fit slot");
            return Err(FieldError::ParamInvalid {
                expected: field.kind(),
            });
        }
    }
    Ok(())
}
