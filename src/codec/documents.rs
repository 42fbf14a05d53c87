//! Multi-document streams.

use crate::error::{ConvertError, Result};
use crate::kind::{GroupVersionKind, TypeMeta};
use serde::Deserialize;

const SEPARATOR: &[u8] = b"---";

/// Returns true if `line` is a document separator.
///
/// A separator is `---` at the start of a line followed only by whitespace
/// or a comment. Any other text after `---` is an error.
fn is_separator(line: &[u8], line_number: usize) -> Result<bool> {
    let rest = match line.strip_prefix(SEPARATOR) {
        Some(rest) => rest,
        None => return Ok(false),
    };
    let rest = trim_ascii_start(rest);
    if rest.is_empty() || rest.starts_with(b"#") {
        return Ok(true);
    }
    Err(ConvertError::malformed(format!(
        "unexpected content after document separator at line {}",
        line_number
    )))
}

fn trim_ascii_start(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    &bytes[start..]
}

fn is_blank(doc: &[u8]) -> bool {
    doc.iter().all(|b| b.is_ascii_whitespace())
}

/// Splits a stream into documents.
///
/// Every line of every returned document ends with `\n`. Documents with
/// nothing but whitespace are dropped.
pub fn split_documents(data: &[u8]) -> Result<Vec<Vec<u8>>> {
    let mut docs = Vec::new();
    let mut current = Vec::new();

    for (i, line) in data.split(|b| *b == b'\n').enumerate() {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if is_separator(line, i + 1)? {
            if !is_blank(&current) {
                docs.push(std::mem::take(&mut current));
            }
            current.clear();
            continue;
        }
        current.extend_from_slice(line);
        current.push(b'\n');
    }
    if !is_blank(&current) {
        // The last split piece adds a newline the input did not have.
        if data.ends_with(b"\n") {
            current.pop();
        }
        docs.push(current);
    }
    Ok(docs)
}

/// Joins documents into one stream, the inverse of [`split_documents`].
pub fn join_documents<D: AsRef<[u8]>>(docs: &[D]) -> Vec<u8> {
    let mut out = Vec::new();
    for (i, doc) in docs.iter().enumerate() {
        let doc = doc.as_ref();
        if i > 0 {
            out.extend_from_slice(SEPARATOR);
            out.push(b'\n');
        }
        out.extend_from_slice(doc);
        if !doc.ends_with(b"\n") {
            out.push(b'\n');
        }
    }
    out
}

/// Reads the identity header of a single document.
pub fn read_group_version_kind(data: &[u8]) -> Result<GroupVersionKind> {
    let header: TypeMeta = serde_yaml::from_slice(data)
        .map_err(|e| ConvertError::malformed(format!("cannot read object header: {}", e)))?;
    header.group_version_kind()
}

/// Reads the identity header of an already decoded object.
pub fn group_version_kind_from_value(value: &serde_json::Value) -> Result<GroupVersionKind> {
    let header = TypeMeta::deserialize(value)
        .map_err(|e| ConvertError::malformed(format!("cannot read object header: {}", e)))?;
    header.group_version_kind()
}
