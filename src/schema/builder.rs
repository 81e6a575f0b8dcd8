//! Per-record schema construction
//!
//! A record type lists its fields once through [`SchemaBuilder`]. Each field
//! is a typed *slot* (an accessor returning the record's storage for that
//! field) plus its directives. [`SchemaBuilder::build`] parses every
//! directive, checks it against the slot's kind and produces an immutable
//! [`RecordSchema`]. Nothing is re-parsed per decode.

use std::collections::HashSet;
use std::fmt;

use crate::bind::coerce;
use crate::bind::source::RawSource;
use crate::bind::validator;

use super::directive::{split_list, DirectiveKey, Directives, LIST_SEPARATOR};
use super::errors::{SchemaError, SchemaResult};
use super::types::{
    BlobEncoding, Bound, Constraints, FieldDescriptor, FieldKind, FileRules, FloatWidth,
    Numeric, NumericRules, Pattern, Requiredness, TextRules,
};

/// Accessor for one field of a record
pub type Accessor<T, V> = fn(&mut T) -> &mut V;

/// Typed storage of a field inside record `T`
pub enum Slot<T> {
    Int(Accessor<T, i64>),
    Bool(Accessor<T, bool>),
    Float32(Accessor<T, f32>),
    Float64(Accessor<T, f64>),
    Text(Accessor<T, String>),
    TextSeq(Accessor<T, Vec<String>>),
    Float32Seq(Accessor<T, Vec<f32>>),
    Float64Seq(Accessor<T, Vec<f64>>),
    Bytes(Accessor<T, Vec<u8>>),
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Slot<T> {}

impl<T> Slot<T> {
    /// Storage type name, for diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Slot::Int(_) => "i64",
            Slot::Bool(_) => "bool",
            Slot::Float32(_) => "f32",
            Slot::Float64(_) => "f64",
            Slot::Text(_) => "String",
            Slot::TextSeq(_) => "Vec<String>",
            Slot::Float32Seq(_) => "Vec<f32>",
            Slot::Float64Seq(_) => "Vec<f64>",
            Slot::Bytes(_) => "Vec<u8>",
        }
    }

    /// Derives the field kind from the storage type and the `type` directive
    fn kind(&self, blob_type: Option<&str>) -> SchemaResult<FieldKind> {
        let kind = match self {
            Slot::Bytes(_) => {
                return match blob_type {
                    Some("file") => Ok(FieldKind::ByteBlob(BlobEncoding::File)),
                    Some("base64") => Ok(FieldKind::ByteBlob(BlobEncoding::Base64)),
                    _ => Err(SchemaError::invalid_directive(
                        "invalid `type` tag, byte fields must be `file` or `base64`",
                    )),
                };
            }
            Slot::Int(_) => FieldKind::Int,
            Slot::Bool(_) => FieldKind::Bool,
            Slot::Float32(_) => FieldKind::Float32,
            Slot::Float64(_) => FieldKind::Float64,
            Slot::Text(_) => FieldKind::String,
            Slot::TextSeq(_) => FieldKind::StringSeq,
            Slot::Float32Seq(_) => FieldKind::FloatSeq(FloatWidth::F32),
            Slot::Float64Seq(_) => FieldKind::FloatSeq(FloatWidth::F64),
        };

        match blob_type {
            Some(_) => Err(SchemaError::kind_mismatch("type", kind)),
            None => Ok(kind),
        }
    }
}

/// A field under construction
pub struct FieldSpec<T> {
    name: String,
    slot: Slot<T>,
    directives: Directives,
    error: Option<SchemaError>,
}

impl<T> FieldSpec<T> {
    fn new(name: &str, slot: Slot<T>) -> Self {
        Self {
            name: name.to_string(),
            slot,
            directives: Directives::new(),
            error: None,
        }
    }

    /// Applies a directive string such as `valid:"required" min:"18"`
    pub fn directives(&mut self, input: &str) -> &mut Self {
        if self.error.is_none() {
            let merged = Directives::parse(input).and_then(|parsed| self.directives.merge(parsed));
            if let Err(e) = merged {
                self.error = Some(e);
            }
        }
        self
    }

    /// Overrides the wire key
    pub fn rename(&mut self, wire_name: &str) -> &mut Self {
        self.set(DirectiveKey::Form, wire_name)
    }

    pub fn required(&mut self) -> &mut Self {
        self.set(DirectiveKey::Valid, "required")
    }

    pub fn optional(&mut self) -> &mut Self {
        self.set(DirectiveKey::Valid, "optional")
    }

    pub fn default_value(&mut self, value: impl fmt::Display) -> &mut Self {
        self.set(DirectiveKey::Default, value.to_string())
    }

    /// Bytes come from an uploaded file part
    pub fn file(&mut self) -> &mut Self {
        self.set(DirectiveKey::Type, "file")
    }

    /// Bytes come from base64 text
    pub fn base64(&mut self) -> &mut Self {
        self.set(DirectiveKey::Type, "base64")
    }

    pub fn max_size(&mut self, bytes: u64) -> &mut Self {
        self.set(DirectiveKey::MaxSize, bytes.to_string())
    }

    pub fn min(&mut self, bound: impl fmt::Display) -> &mut Self {
        self.set(DirectiveKey::Min, bound.to_string())
    }

    pub fn max(&mut self, bound: impl fmt::Display) -> &mut Self {
        self.set(DirectiveKey::Max, bound.to_string())
    }

    pub fn range(&mut self, lo: impl fmt::Display, hi: impl fmt::Display) -> &mut Self {
        self.set(DirectiveKey::Range, format!("{}{}{}", lo, LIST_SEPARATOR, hi))
    }

    /// Closed set of accepted strings
    pub fn values<I, S>(&mut self, allowed: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed: Vec<String> = allowed.into_iter().map(|s| s.as_ref().to_string()).collect();
        if allowed.iter().any(|v| v.contains(LIST_SEPARATOR)) {
            if self.error.is_none() {
                self.error = Some(SchemaError::invalid_directive(format!(
                    "`values` entries cannot contain `{}`",
                    LIST_SEPARATOR
                )));
            }
            return self;
        }
        let separator = LIST_SEPARATOR.to_string();
        self.set(DirectiveKey::Values, allowed.join(separator.as_str()))
    }

    /// Regular expression the whole value must match
    pub fn pattern(&mut self, regexp: &str) -> &mut Self {
        self.set(DirectiveKey::Regexp, regexp)
    }

    fn set(&mut self, key: DirectiveKey, value: impl Into<String>) -> &mut Self {
        if self.error.is_none() {
            if let Err(e) = self.directives.insert(key, value) {
                self.error = Some(e);
            }
        }
        self
    }

    fn wire_name(&self) -> &str {
        self.directives.get(DirectiveKey::Form).unwrap_or(&self.name)
    }

    fn build(self) -> SchemaResult<FieldBinding<T>> {
        let wire_name = self.wire_name().to_string();
        if let Some(err) = self.error {
            return Err(err.for_field(wire_name));
        }

        let descriptor = describe_field(wire_name.clone(), &self.slot, &self.directives)
            .map_err(|e| e.for_field(wire_name))?;

        Ok(FieldBinding {
            descriptor,
            slot: self.slot,
        })
    }
}

/// Collects the fields of record type `T` in declaration order
pub struct SchemaBuilder<T> {
    fields: Vec<FieldSpec<T>>,
}

impl<T> SchemaBuilder<T> {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    pub fn int(&mut self, name: &str, slot: Accessor<T, i64>) -> &mut FieldSpec<T> {
        self.push(name, Slot::Int(slot))
    }

    pub fn bool(&mut self, name: &str, slot: Accessor<T, bool>) -> &mut FieldSpec<T> {
        self.push(name, Slot::Bool(slot))
    }

    pub fn float32(&mut self, name: &str, slot: Accessor<T, f32>) -> &mut FieldSpec<T> {
        self.push(name, Slot::Float32(slot))
    }

    pub fn float64(&mut self, name: &str, slot: Accessor<T, f64>) -> &mut FieldSpec<T> {
        self.push(name, Slot::Float64(slot))
    }

    pub fn text(&mut self, name: &str, slot: Accessor<T, String>) -> &mut FieldSpec<T> {
        self.push(name, Slot::Text(slot))
    }

    pub fn text_seq(&mut self, name: &str, slot: Accessor<T, Vec<String>>) -> &mut FieldSpec<T> {
        self.push(name, Slot::TextSeq(slot))
    }

    pub fn float32_seq(&mut self, name: &str, slot: Accessor<T, Vec<f32>>) -> &mut FieldSpec<T> {
        self.push(name, Slot::Float32Seq(slot))
    }

    pub fn float64_seq(&mut self, name: &str, slot: Accessor<T, Vec<f64>>) -> &mut FieldSpec<T> {
        self.push(name, Slot::Float64Seq(slot))
    }

    /// Byte blob; needs `file()` or `base64()`
    pub fn bytes(&mut self, name: &str, slot: Accessor<T, Vec<u8>>) -> &mut FieldSpec<T> {
        self.push(name, Slot::Bytes(slot))
    }

    fn push(&mut self, name: &str, slot: Slot<T>) -> &mut FieldSpec<T> {
        self.fields.push(FieldSpec::new(name, slot));
        let last = self.fields.len() - 1;
        &mut self.fields[last]
    }

    /// Parses and checks every field, stopping at the first misconfiguration
    pub fn build(self) -> SchemaResult<RecordSchema<T>> {
        let mut seen = HashSet::new();
        let mut fields = Vec::with_capacity(self.fields.len());

        for spec in self.fields {
            let binding = spec.build()?;
            if !seen.insert(binding.descriptor.name().to_string()) {
                return Err(SchemaError::duplicate_field(binding.descriptor.name()));
            }
            fields.push(binding);
        }

        Ok(RecordSchema { fields })
    }
}

impl<T> Default for SchemaBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A descriptor paired with the record storage it fills
pub struct FieldBinding<T> {
    descriptor: FieldDescriptor,
    slot: Slot<T>,
}

impl<T> FieldBinding<T> {
    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    pub fn slot(&self) -> Slot<T> {
        self.slot
    }
}

/// The immutable field table of one record type
pub struct RecordSchema<T> {
    fields: Vec<FieldBinding<T>>,
}

impl<T> RecordSchema<T> {
    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldBinding<T>] {
        &self.fields
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().map(|f| &f.descriptor)
    }

    /// Looks up a descriptor by wire name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.descriptors().find(|d| d.name() == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<T> fmt::Debug for RecordSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.descriptors()).finish()
    }
}

fn describe_field<T>(
    name: String,
    slot: &Slot<T>,
    directives: &Directives,
) -> SchemaResult<FieldDescriptor> {
    let requiredness = directives
        .get(DirectiveKey::Valid)
        .ok_or_else(SchemaError::invalid_requiredness)
        .and_then(Requiredness::parse)?;
    let kind = slot.kind(directives.get(DirectiveKey::Type))?;
    let constraints = parse_constraints(kind, directives)?;
    let default = directives.get(DirectiveKey::Default).map(str::to_string);

    let descriptor = FieldDescriptor::new(name, requiredness, default, kind, constraints);
    if let Some(default) = descriptor.default() {
        check_default(&descriptor, default)?;
    }
    Ok(descriptor)
}

/// Constraint keys each kind accepts
fn accepted_constraints(kind: FieldKind) -> &'static [DirectiveKey] {
    match kind {
        FieldKind::Int | FieldKind::Float32 | FieldKind::Float64 | FieldKind::FloatSeq(_) => {
            &[DirectiveKey::Min, DirectiveKey::Max, DirectiveKey::Range]
        }
        FieldKind::String | FieldKind::StringSeq => &[DirectiveKey::Values, DirectiveKey::Regexp],
        FieldKind::ByteBlob(BlobEncoding::File) => &[DirectiveKey::MaxSize],
        FieldKind::Bool | FieldKind::ByteBlob(BlobEncoding::Base64) => &[],
    }
}

fn is_constraint(key: DirectiveKey) -> bool {
    matches!(
        key,
        DirectiveKey::MaxSize
            | DirectiveKey::Min
            | DirectiveKey::Max
            | DirectiveKey::Range
            | DirectiveKey::Values
            | DirectiveKey::Regexp
    )
}

fn parse_constraints(kind: FieldKind, directives: &Directives) -> SchemaResult<Constraints> {
    let accepted = accepted_constraints(kind);
    if let Some(key) = directives
        .keys()
        .find(|key| is_constraint(*key) && !accepted.contains(key))
    {
        return Err(SchemaError::kind_mismatch(key.as_str(), kind));
    }

    Ok(match kind {
        FieldKind::Int => Constraints::Int(numeric_rules(directives)?),
        FieldKind::Float32 | FieldKind::FloatSeq(FloatWidth::F32) => {
            Constraints::Float32(numeric_rules(directives)?)
        }
        FieldKind::Float64 | FieldKind::FloatSeq(FloatWidth::F64) => {
            Constraints::Float64(numeric_rules(directives)?)
        }
        FieldKind::String | FieldKind::StringSeq => Constraints::Text(text_rules(directives)?),
        FieldKind::ByteBlob(BlobEncoding::File) => Constraints::File(file_rules(directives)?),
        FieldKind::Bool | FieldKind::ByteBlob(BlobEncoding::Base64) => Constraints::None,
    })
}

fn numeric_rules<N>(directives: &Directives) -> SchemaResult<NumericRules<N>>
where
    N: Numeric,
{
    let max = directives
        .get(DirectiveKey::Max)
        .map(|v| Bound::parse(v).ok_or_else(SchemaError::invalid_max))
        .transpose()?;
    let min = directives
        .get(DirectiveKey::Min)
        .map(|v| Bound::parse(v).ok_or_else(SchemaError::invalid_min))
        .transpose()?;
    let range = directives
        .get(DirectiveKey::Range)
        .map(parse_range)
        .transpose()?;

    Ok(NumericRules { max, min, range })
}

fn parse_range<N>(value: &str) -> SchemaResult<(Bound<N>, Bound<N>)>
where
    N: Numeric,
{
    let parts = split_list(value);
    let [lo, hi] = parts.as_slice() else {
        return Err(SchemaError::invalid_range());
    };
    let lo = Bound::parse(lo).ok_or_else(SchemaError::invalid_range)?;
    let hi = Bound::parse(hi).ok_or_else(SchemaError::invalid_range)?;
    if lo.value > hi.value {
        return Err(SchemaError::invalid_range());
    }
    Ok((lo, hi))
}

fn text_rules(directives: &Directives) -> SchemaResult<TextRules> {
    let values = directives
        .get(DirectiveKey::Values)
        .map(|v| split_list(v).into_iter().map(str::to_string).collect());
    let pattern = directives
        .get(DirectiveKey::Regexp)
        .map(Pattern::compile)
        .transpose()?;
    Ok(TextRules { values, pattern })
}

fn file_rules(directives: &Directives) -> SchemaResult<FileRules> {
    let max_size = directives
        .get(DirectiveKey::MaxSize)
        .map(|v| v.trim().parse::<u64>().map_err(|_| SchemaError::invalid_max_size()))
        .transpose()?;
    Ok(FileRules { max_size })
}

/// A default must be usable: optional field, coercible, and within the
/// field's own constraints.
fn check_default(descriptor: &FieldDescriptor, default: &str) -> SchemaResult<()> {
    if descriptor.is_required() {
        return Err(SchemaError::invalid_default("only optional fields take a default"));
    }
    if descriptor.kind() == FieldKind::ByteBlob(BlobEncoding::File) {
        return Err(SchemaError::invalid_default("file fields cannot take a default"));
    }

    let value = coerce::coerce(descriptor.kind(), &RawSource::literal(default))
        .map_err(|e| SchemaError::invalid_default(format!("`{}`: {}", default, e)))?;
    validator::validate(descriptor, &value)
        .map_err(|e| SchemaError::invalid_default(format!("`{}`: {}", default, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaErrorCode;

    #[derive(Default)]
    struct Sample {
        name: String,
        age: i64,
        score: f32,
        tags: Vec<String>,
        image: Vec<u8>,
        passed: bool,
    }

    #[test]
    fn test_builds_fields_in_declaration_order() {
        let mut builder = SchemaBuilder::<Sample>::new();
        builder.text("name", |s| &mut s.name).required();
        builder.int("age", |s| &mut s.age).required().range(18, 25);
        builder.float32("score", |s| &mut s.score).optional().default_value(60);

        let schema = builder.build().unwrap();
        let names: Vec<_> = schema.descriptors().map(|d| d.name()).collect();
        assert_eq!(names, vec!["name", "age", "score"]);

        let age = schema.field("age").unwrap();
        assert_eq!(age.kind(), FieldKind::Int);
        let range = age.constraints().int().unwrap().range.as_ref().unwrap();
        assert_eq!((range.0.value, range.1.value), (18, 25));

        let score = schema.field("score").unwrap();
        assert_eq!(score.default(), Some("60"));
        assert!(!score.is_required());
    }

    #[test]
    fn test_directive_string_and_rename() {
        let mut builder = SchemaBuilder::<Sample>::new();
        builder
            .text("name", |s| &mut s.name)
            .directives(r#"form:"user_name" valid:"required" regexp:"^[a-z]+$""#);

        let schema = builder.build().unwrap();
        let field = schema.field("user_name").unwrap();
        let rules = field.constraints().text().unwrap();
        assert_eq!(rules.pattern.as_ref().unwrap().as_str(), "^[a-z]+$");
        assert!(schema.field("name").is_none());
    }

    #[test]
    fn test_missing_requiredness_rejected() {
        let mut builder = SchemaBuilder::<Sample>::new();
        builder.text("name", |s| &mut s.name);
        let err = builder.build().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::InvalidRequiredness);
        assert_eq!(err.field(), Some("name"));
    }

    #[test]
    fn test_unrecognized_requiredness_rejected() {
        let mut builder = SchemaBuilder::<Sample>::new();
        builder.text("name", |s| &mut s.name).directives(r#"valid:"maybe""#);
        assert_eq!(
            builder.build().unwrap_err().to_string(),
            "name: invalid `valid` tag, must be `required` or `optional`"
        );
    }

    #[test]
    fn test_non_numeric_max_rejected() {
        let mut builder = SchemaBuilder::<Sample>::new();
        builder.int("age", |s| &mut s.age).directives(r#"valid:"required" max:"old""#);
        assert_eq!(
            builder.build().unwrap_err().to_string(),
            "age: invalid `max` tag, must be int or float"
        );
    }

    #[test]
    fn test_float_bound_on_int_field_rejected() {
        let mut builder = SchemaBuilder::<Sample>::new();
        builder.int("age", |s| &mut s.age).required().min("17.5");
        assert_eq!(
            builder.build().unwrap_err().code(),
            SchemaErrorCode::InvalidConstraintTag
        );
    }

    #[test]
    fn test_float_bound_beyond_width_rejected() {
        let mut builder = SchemaBuilder::<Sample>::new();
        builder.float32("score", |s| &mut s.score).required().max("1e40");
        let err = builder.build().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::InvalidConstraintTag);
        assert_eq!(err.to_string(), "score: invalid `max` tag, must be int or float");

        let mut builder = SchemaBuilder::<Sample>::new();
        builder.float32("score", |s| &mut s.score).required().range("0", "1e39");
        assert_eq!(
            builder.build().unwrap_err().code(),
            SchemaErrorCode::InvalidConstraintTag
        );
    }

    #[test]
    fn test_range_shape_checked() {
        for bad in ["18", "18|25|30", "a|b", "25|18"] {
            let mut builder = SchemaBuilder::<Sample>::new();
            builder
                .int("age", |s| &mut s.age)
                .required()
                .directives(&format!(r#"range:"{}""#, bad));
            let err = builder.build().unwrap_err();
            assert!(
                err.message().contains("invalid `range` tag"),
                "range {:?} gave {}",
                bad,
                err
            );
        }
    }

    #[test]
    fn test_malformed_max_size_is_hard_error() {
        let mut builder = SchemaBuilder::<Sample>::new();
        builder
            .bytes("image", |s| &mut s.image)
            .directives(r#"valid:"required" type:"file" max_size:"1kb""#);
        assert_eq!(
            builder.build().unwrap_err().to_string(),
            "image: invalid `max_size` tag, must be int"
        );
    }

    #[test]
    fn test_constraint_kind_consistency() {
        let mut builder = SchemaBuilder::<Sample>::new();
        builder.int("age", |s| &mut s.age).required().pattern("[0-9]+");
        let err = builder.build().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::KindMismatch);
        assert!(err.message().contains("`regexp`"));

        let mut builder = SchemaBuilder::<Sample>::new();
        builder.text("name", |s| &mut s.name).required().max(3);
        assert_eq!(builder.build().unwrap_err().code(), SchemaErrorCode::KindMismatch);

        let mut builder = SchemaBuilder::<Sample>::new();
        builder.bytes("image", |s| &mut s.image).required().base64().max_size(10);
        assert_eq!(builder.build().unwrap_err().code(), SchemaErrorCode::KindMismatch);

        let mut builder = SchemaBuilder::<Sample>::new();
        builder.bool("passed", |s| &mut s.passed).required().min(0);
        assert_eq!(builder.build().unwrap_err().code(), SchemaErrorCode::KindMismatch);
    }

    #[test]
    fn test_blob_type_required_for_bytes_only() {
        let mut builder = SchemaBuilder::<Sample>::new();
        builder.bytes("image", |s| &mut s.image).required();
        assert_eq!(builder.build().unwrap_err().code(), SchemaErrorCode::InvalidDirective);

        let mut builder = SchemaBuilder::<Sample>::new();
        builder.text("name", |s| &mut s.name).required().file();
        assert_eq!(builder.build().unwrap_err().code(), SchemaErrorCode::KindMismatch);
    }

    #[test]
    fn test_sequence_kinds() {
        let mut builder = SchemaBuilder::<Sample>::new();
        builder
            .text_seq("tags", |s| &mut s.tags)
            .required()
            .values(["rust", "go"]);
        let schema = builder.build().unwrap();
        let tags = schema.field("tags").unwrap();
        assert_eq!(tags.kind(), FieldKind::StringSeq);
        assert_eq!(
            tags.constraints().text().unwrap().values,
            Some(vec!["rust".to_string(), "go".to_string()])
        );
    }

    #[test]
    fn test_values_entry_with_separator_rejected() {
        let mut builder = SchemaBuilder::<Sample>::new();
        builder.text("name", |s| &mut s.name).required().values(["a|b"]);
        assert_eq!(builder.build().unwrap_err().code(), SchemaErrorCode::InvalidDirective);
    }

    #[test]
    fn test_default_checks() {
        let mut builder = SchemaBuilder::<Sample>::new();
        builder.float32("score", |s| &mut s.score).optional().default_value("sixty");
        assert_eq!(builder.build().unwrap_err().code(), SchemaErrorCode::InvalidDefault);

        let mut builder = SchemaBuilder::<Sample>::new();
        builder.int("age", |s| &mut s.age).required().default_value(20);
        assert_eq!(builder.build().unwrap_err().code(), SchemaErrorCode::InvalidDefault);

        let mut builder = SchemaBuilder::<Sample>::new();
        builder.int("age", |s| &mut s.age).optional().default_value(10).min(18);
        let err = builder.build().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::InvalidDefault);
        assert!(err.message().contains("smaller than 18"));

        let mut builder = SchemaBuilder::<Sample>::new();
        builder.bytes("image", |s| &mut s.image).optional().file().default_value("x");
        assert_eq!(builder.build().unwrap_err().code(), SchemaErrorCode::InvalidDefault);
    }

    #[test]
    fn test_duplicate_wire_name_rejected() {
        let mut builder = SchemaBuilder::<Sample>::new();
        builder.text("name", |s| &mut s.name).required();
        builder.int("age", |s| &mut s.age).required().rename("name");
        let err = builder.build().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::DuplicateField);
        assert_eq!(err.field(), Some("name"));
    }

    #[test]
    fn test_conflicting_directives_rejected() {
        let mut builder = SchemaBuilder::<Sample>::new();
        builder
            .int("age", |s| &mut s.age)
            .required()
            .directives(r#"valid:"optional""#);
        let err = builder.build().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::InvalidDirective);
        assert_eq!(err.field(), Some("age"));
    }
}
