//! Directive micro-language
//!
//! A directive string is a whitespace-separated list of `key:"value"` pairs,
//! in the style of struct tags:
//!
//! ```text
//! form:"age" valid:"required" range:"18|25"
//! ```
//!
//! Values are double-quoted; `\"` and `\\` escape a quote and a backslash,
//! `\n`, `\r` and `\t` their control characters. Any other backslash is
//! kept as written so patterns such as `^\d+$` need no doubling.

use std::fmt;

use super::errors::{SchemaError, SchemaResult};

/// Separator inside `range` and `values`
pub const LIST_SEPARATOR: char = '|';

/// Recognized directive keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKey {
    /// Wire key
    Form,
    /// `required` or `optional`
    Valid,
    /// Literal used when optional and absent
    Default,
    /// `file` or `base64`
    Type,
    MaxSize,
    Min,
    Max,
    Range,
    Values,
    Regexp,
}

impl DirectiveKey {
    pub const ALL: [DirectiveKey; 10] = [
        DirectiveKey::Form,
        DirectiveKey::Valid,
        DirectiveKey::Default,
        DirectiveKey::Type,
        DirectiveKey::MaxSize,
        DirectiveKey::Min,
        DirectiveKey::Max,
        DirectiveKey::Range,
        DirectiveKey::Values,
        DirectiveKey::Regexp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DirectiveKey::Form => "form",
            DirectiveKey::Valid => "valid",
            DirectiveKey::Default => "default",
            DirectiveKey::Type => "type",
            DirectiveKey::MaxSize => "max_size",
            DirectiveKey::Min => "min",
            DirectiveKey::Max => "max",
            DirectiveKey::Range => "range",
            DirectiveKey::Values => "values",
            DirectiveKey::Regexp => "regexp",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.as_str() == name)
    }
}

impl fmt::Display for DirectiveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The raw directives of one field, in declaration order.
///
/// Each key appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directives {
    entries: Vec<(DirectiveKey, String)>,
}

impl Directives {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a directive string
    pub fn parse(input: &str) -> SchemaResult<Self> {
        let mut directives = Directives::new();
        let mut rest = input;

        loop {
            rest = rest.trim_start();
            if rest.is_empty() {
                break;
            }

            let colon = rest.find(':').ok_or_else(|| {
                SchemaError::invalid_directive(format!("expected `key:\"value\"` at `{}`", rest))
            })?;
            let name = &rest[..colon];
            if name.is_empty() || name.contains(|c: char| c.is_whitespace() || c == '"') {
                return Err(SchemaError::invalid_directive(format!(
                    "invalid directive key `{}`",
                    name
                )));
            }
            let key = DirectiveKey::from_name(name).ok_or_else(|| {
                SchemaError::invalid_directive(format!("unknown directive `{}`", name))
            })?;

            let (value, remainder) = parse_quoted(&rest[colon + 1..], key)?;
            directives.insert(key, value)?;
            rest = remainder;
        }

        Ok(directives)
    }

    /// Adds a directive, rejecting a key that is already present
    pub fn insert(&mut self, key: DirectiveKey, value: impl Into<String>) -> SchemaResult<()> {
        if self.contains(key) {
            return Err(SchemaError::invalid_directive(format!(
                "duplicate `{}` tag",
                key
            )));
        }
        self.entries.push((key, value.into()));
        Ok(())
    }

    /// Moves every directive of `other` into `self`
    pub fn merge(&mut self, other: Directives) -> SchemaResult<()> {
        for (key, value) in other.entries {
            self.insert(key, value)?;
        }
        Ok(())
    }

    pub fn get(&self, key: DirectiveKey) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: DirectiveKey) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = DirectiveKey> + '_ {
        self.entries.iter().map(|(k, _)| *k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Splits a `lo|hi` or `a|b|c` list
pub fn split_list(value: &str) -> Vec<&str> {
    value.split(LIST_SEPARATOR).collect()
}

/// Reads one double-quoted value, returning it and the unconsumed input.
fn parse_quoted(input: &str, key: DirectiveKey) -> SchemaResult<(String, &str)> {
    let body = input.strip_prefix('"').ok_or_else(|| {
        SchemaError::invalid_directive(format!("value of `{}` must be double-quoted", key))
    })?;

    let mut value = String::new();
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Ok((value, &body[i + 1..])),
            '\\' => match chars.next() {
                Some((_, '"')) => value.push('"'),
                Some((_, '\\')) => value.push('\\'),
                Some((_, 'n')) => value.push('\n'),
                Some((_, 'r')) => value.push('\r'),
                Some((_, 't')) => value.push('\t'),
                Some((_, other)) => {
                    value.push('\\');
                    value.push(other);
                }
                None => break,
            },
            c => value.push(c),
        }
    }

    Err(SchemaError::invalid_directive(format!(
        "unterminated value for `{}`",
        key
    )))
}
