//! Raw value lookups and per-field source resolution
//!
//! Encoding parsers hand the core two lookups keyed by wire name: one for
//! string values (carried as bytes so non-UTF-8 input reaches the
//! validator) and, for multipart bodies, one for file parts.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::schema::{BlobEncoding, FieldDescriptor, FieldKind};

use super::errors::FieldError;

/// Suffix tried when a plain key has no values
pub const SEQUENCE_SUFFIX: &str = "[]";

/// Multi-valued string lookup
pub trait ValueLookup {
    /// All values for `name`, in arrival order
    fn values(&self, name: &str) -> Option<&[Vec<u8>]>;
}

/// Multi-valued file lookup
pub trait FileLookup {
    fn files(&self, name: &str) -> Option<&[FilePart]>;
}

/// Named string values of one request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormData {
    values: HashMap<String, Vec<Vec<u8>>>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value after any existing ones for `name`
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<Vec<u8>>) {
        self.values.entry(name.into()).or_default().push(value.into());
    }

    /// Appends every value of `other`, keeping per-key order
    pub fn merge(&mut self, other: FormData) {
        for (name, values) in other.values {
            self.values.entry(name).or_default().extend(values);
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl ValueLookup for FormData {
    fn values(&self, name: &str) -> Option<&[Vec<u8>]> {
        self.values.get(name).map(Vec::as_slice)
    }
}

impl<K, V> FromIterator<(K, V)> for FormData
where
    K: Into<String>,
    V: Into<Vec<u8>>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = FormData::new();
        for (name, value) in iter {
            form.append(name, value);
        }
        form
    }
}

/// Named file parts of one request
#[derive(Debug, Default)]
pub struct FileData {
    files: HashMap<String, Vec<FilePart>>,
}

impl FileData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: impl Into<String>, part: FilePart) {
        self.files.entry(name.into()).or_default().push(part);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileLookup for FileData {
    fn files(&self, name: &str) -> Option<&[FilePart]> {
        self.files.get(name).map(Vec::as_slice)
    }
}

/// One uploaded file
#[derive(Debug)]
pub struct FilePart {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub content: FileContent,
}

impl FilePart {
    /// A part held in memory
    pub fn in_memory(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: Some(file_name.into()),
            content_type: None,
            content: FileContent::Memory(bytes.into()),
        }
    }

    /// Reads the whole content
    pub fn read_all(&self) -> io::Result<Vec<u8>> {
        match &self.content {
            FileContent::Memory(bytes) => Ok(bytes.clone()),
            FileContent::Disk(path) => fs::read(path),
            FileContent::Spilled(spilled) => fs::read(spilled.path()),
        }
    }
}

/// Where a file part's bytes live
#[derive(Debug)]
pub enum FileContent {
    Memory(Vec<u8>),
    /// A caller-owned file
    Disk(PathBuf),
    /// A temporary file removed on drop
    Spilled(SpilledFile),
}

/// Temporary file holding a spilled multipart part
#[derive(Debug)]
pub struct SpilledFile {
    path: PathBuf,
}

impl SpilledFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for SpilledFile {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to remove spilled part");
            }
        }
    }
}

/// The pre-coercion input of one field
#[derive(Debug, Clone)]
pub enum RawSource<'a> {
    Text(Cow<'a, [Vec<u8>]>),
    Files(&'a [FilePart]),
}

impl<'a> RawSource<'a> {
    /// A single owned string value
    pub fn literal(value: &str) -> RawSource<'static> {
        RawSource::Text(Cow::Owned(vec![value.as_bytes().to_vec()]))
    }
}

/// Outcome of resolving one field
#[derive(Debug)]
pub enum Resolution<'a> {
    /// Values present on the wire
    Found(RawSource<'a>),
    /// Absent; the default literal stands in
    Defaulted(RawSource<'static>),
    /// Absent and optional without default
    Skip,
}

/// Finds the raw source of `field`: plain key, then `key[]`, then files.
pub fn resolve<'a>(
    field: &FieldDescriptor,
    values: &'a dyn ValueLookup,
    files: Option<&'a dyn FileLookup>,
) -> Result<Resolution<'a>, FieldError> {
    let name = field.name();
    let text = non_empty(values.values(name))
        .or_else(|| non_empty(values.values(&format!("{}{}", name, SEQUENCE_SUFFIX))));

    if let Some(text) = text {
        if field.kind() == FieldKind::ByteBlob(BlobEncoding::File) {
            return Err(FieldError::FileTypeInvalid);
        }
        return Ok(Resolution::Found(RawSource::Text(Cow::Borrowed(text))));
    }

    if let Some(parts) = files.and_then(|f| non_empty(f.files(name))) {
        return Ok(Resolution::Found(RawSource::Files(parts)));
    }

    if field.is_required() {
        return Err(FieldError::MissingRequired);
    }
    Ok(match field.default() {
        Some(default) => Resolution::Defaulted(RawSource::literal(default)),
        None => Resolution::Skip,
    })
}

fn non_empty<T>(slice: Option<&[T]>) -> Option<&[T]> {
    slice.filter(|s| !s.is_empty())
}
