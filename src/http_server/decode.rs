//! # Body Decoders
//!
//! Turn each supported wire encoding into the lookups the binding core
//! reads. Values stay as bytes; nothing here checks UTF-8.

use axum::extract::multipart::Field;
use axum::extract::Multipart;
use percent_encoding::percent_decode;
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

use crate::bind::{BindError, FileContent, FileData, FilePart, FormData, SpilledFile};

use super::config::BindConfig;

/// Parses `application/x-www-form-urlencoded` data, failing on the first
/// malformed pair
pub fn parse_urlencoded(input: &[u8]) -> Result<FormData, BindError> {
    let mut form = FormData::new();
    for pair in pairs(input) {
        let (key, value) = decode_pair(pair)?;
        form.append(key, value);
    }
    Ok(form)
}

/// Parses a `GET` query string. Malformed pairs are dropped.
pub fn parse_query(input: &[u8]) -> FormData {
    let mut form = FormData::new();
    for pair in pairs(input) {
        match decode_pair(pair) {
            Ok((key, value)) => form.append(key, value),
            Err(e) => debug!(error = %e, "skipping malformed query pair"),
        }
    }
    form
}

fn pairs(input: &[u8]) -> impl Iterator<Item = &[u8]> {
    input.split(|b| *b == b'&').filter(|pair| !pair.is_empty())
}

fn decode_pair(pair: &[u8]) -> Result<(String, Vec<u8>), BindError> {
    let (key, value) = match pair.iter().position(|b| *b == b'=') {
        Some(eq) => (&pair[..eq], &pair[eq + 1..]),
        None => (pair, &b""[..]),
    };
    let key = String::from_utf8(unescape(key)?)
        .map_err(|_| BindError::ParseForm("invalid utf8 in key".to_string()))?;
    Ok((key, unescape(value)?))
}

/// `+` becomes a space; every `%` must start a two-digit hex escape
fn unescape(raw: &[u8]) -> Result<Vec<u8>, BindError> {
    for (i, b) in raw.iter().enumerate() {
        if *b == b'%' {
            let escape = raw.get(i + 1..i + 3);
            if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
                let end = raw.len().min(i + 3);
                return Err(BindError::ParseForm(format!(
                    "invalid URL escape \"{}\"",
                    String::from_utf8_lossy(&raw[i..end])
                )));
            }
        }
    }
    let spaced: Vec<u8> = raw
        .iter()
        .map(|b| if *b == b'+' { b' ' } else { *b })
        .collect();
    Ok(percent_decode(&spaced).collect())
}

/// Flattens a top-level JSON object into named values.
///
/// Strings are taken as-is, numbers and booleans in their JSON text, arrays
/// become repeated values and `null` counts as absent.
pub fn flatten_json(input: &[u8]) -> Result<FormData, BindError> {
    let value: Value =
        serde_json::from_slice(input).map_err(|e| BindError::DecodeJson(e.to_string()))?;
    let Value::Object(object) = value else {
        return Err(BindError::DecodeJson("expected a JSON object".to_string()));
    };

    let mut form = FormData::new();
    for (key, value) in object {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = scalar_text(&key, item)? {
                        form.append(key.clone(), text);
                    }
                }
            }
            other => {
                if let Some(text) = scalar_text(&key, other)? {
                    form.append(key, text);
                }
            }
        }
    }
    Ok(form)
}

fn scalar_text(key: &str, value: Value) -> Result<Option<String>, BindError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Array(_) | Value::Object(_) => Err(BindError::DecodeJson(format!(
            "field `{}` is nested; only flat values are supported",
            key
        ))),
    }
}

/// Reads every part of a multipart body.
///
/// Parts with a file name become file parts; the rest are string values.
/// File content beyond `config.multipart_memory` bytes in total is spilled
/// to `config.spill_dir()`.
pub async fn collect_multipart(
    mut multipart: Multipart,
    config: &BindConfig,
) -> Result<(FormData, FileData), BindError> {
    let mut form = FormData::new();
    let mut files = FileData::new();
    let mut in_memory: u64 = 0;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_string) else {
            debug!("skipping unnamed multipart part");
            continue;
        };

        if field.file_name().is_none() {
            let bytes = field.bytes().await.map_err(multipart_error)?;
            form.append(name, bytes.to_vec());
            continue;
        }

        let part = read_file_part(field, config, &mut in_memory).await?;
        files.append(name, part);
    }

    Ok((form, files))
}

async fn read_file_part(
    mut field: Field<'_>,
    config: &BindConfig,
    in_memory: &mut u64,
) -> Result<FilePart, BindError> {
    let file_name = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);

    let mut buffer = Vec::new();
    let mut spill: Option<(SpilledFile, tokio::fs::File)> = None;

    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        if let Some((_, file)) = spill.as_mut() {
            file.write_all(&chunk).await.map_err(spill_error)?;
            continue;
        }

        let pending = *in_memory + buffer.len() as u64 + chunk.len() as u64;
        if pending <= config.multipart_memory {
            buffer.extend_from_slice(&chunk);
            continue;
        }

        let path = config
            .spill_dir()
            .join(format!("formbind-{}.part", Uuid::new_v4()));
        let mut file = tokio::fs::File::create(&path).await.map_err(spill_error)?;
        let spilled = SpilledFile::new(path);
        debug!(path = %spilled.path().display(), "spilling multipart part to disk");
        file.write_all(&buffer).await.map_err(spill_error)?;
        file.write_all(&chunk).await.map_err(spill_error)?;
        buffer = Vec::new();
        spill = Some((spilled, file));
    }

    let content = match spill {
        Some((spilled, mut file)) => {
            file.flush().await.map_err(spill_error)?;
            FileContent::Spilled(spilled)
        }
        None => {
            *in_memory += buffer.len() as u64;
            FileContent::Memory(buffer)
        }
    };

    Ok(FilePart {
        file_name,
        content_type,
        content,
    })
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> BindError {
    BindError::ParseMultipart(e.body_text())
}

fn spill_error(e: std::io::Error) -> BindError {
    BindError::ParseMultipart(format!("spill failed: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::ValueLookup;

    #[test]
    fn test_urlencoded_basic() {
        let form = parse_urlencoded(b"name=Tony&age=20&friends=a&friends=b").unwrap();
        assert_eq!(form.values("name").unwrap(), &[b"Tony".to_vec()]);
        assert_eq!(form.values("friends").unwrap().len(), 2);
    }

    #[test]
    fn test_urlencoded_escapes() {
        let form = parse_urlencoded(b"q=a+b%20c&tags%5B%5D=x&empty=&flag").unwrap();
        assert_eq!(form.values("q").unwrap(), &[b"a b c".to_vec()]);
        assert_eq!(form.values("tags[]").unwrap(), &[b"x".to_vec()]);
        assert_eq!(form.values("empty").unwrap(), &[Vec::<u8>::new()]);
        assert_eq!(form.values("flag").unwrap(), &[Vec::<u8>::new()]);
    }

    #[test]
    fn test_urlencoded_keeps_raw_bytes() {
        let form = parse_urlencoded(b"name=%C3%28").unwrap();
        assert_eq!(form.values("name").unwrap(), &[vec![0xc3u8, 0x28]]);
    }

    #[test]
    fn test_urlencoded_bad_escape() {
        let err = parse_urlencoded(b"name=%zz").unwrap_err();
        assert_eq!(err.to_string(), "parse form failed: invalid URL escape \"%zz\"");
        assert!(parse_urlencoded(b"name=abc%2").is_err());
    }

    #[test]
    fn test_query_skips_malformed_pairs() {
        let form = parse_query(b"name=Tony&bad=%zz&age=20&%g1=x");
        assert_eq!(form.values("name").unwrap(), &[b"Tony".to_vec()]);
        assert_eq!(form.values("age").unwrap(), &[b"20".to_vec()]);
        assert!(form.values("bad").is_none());
        assert_eq!(form.len(), 2);
    }

    #[test]
    fn test_json_flattening() {
        let form = flatten_json(
            br#"{"name":"Tony","age":20,"passed":true,"score":60.5,"scores":[60,99.5],"extra":null}"#,
        )
        .unwrap();
        assert_eq!(form.values("name").unwrap(), &[b"Tony".to_vec()]);
        assert_eq!(form.values("age").unwrap(), &[b"20".to_vec()]);
        assert_eq!(form.values("passed").unwrap(), &[b"true".to_vec()]);
        assert_eq!(form.values("score").unwrap(), &[b"60.5".to_vec()]);
        assert_eq!(
            form.values("scores").unwrap(),
            &[b"60".to_vec(), b"99.5".to_vec()]
        );
        assert!(form.values("extra").is_none());
    }

    #[test]
    fn test_json_rejects_nesting_and_non_objects() {
        assert!(flatten_json(br#"{"a":{"b":1}}"#).is_err());
        assert!(flatten_json(br#"{"a":[[1]]}"#).is_err());
        assert!(flatten_json(b"[1,2]").is_err());
        let err = flatten_json(b"{").unwrap_err();
        assert!(err.to_string().starts_with("decode json failed: "));
    }
}
