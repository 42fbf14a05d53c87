//! Annotation keys and the `metadata.annotations` map of generic objects.

use crate::error::{ConvertError, Result};
use crate::kind::GroupVersionKind;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Returns the annotation key for a cache entry:
/// `<prefix>.<group>/<version>.<kind>`.
pub fn annotation_key(prefix: &str, gvk: &GroupVersionKind) -> String {
    format!("{}.{}/{}.{}", prefix, gvk.group, gvk.version, gvk.kind)
}

/// Parses a key written by [`annotation_key`].
///
/// Returns `None` for keys that do not carry the prefix.
pub fn parse_annotation_key(prefix: &str, key: &str) -> Option<Result<GroupVersionKind>> {
    let rest = key.strip_prefix(prefix)?.strip_prefix('.')?;
    let parsed = rest.split_once('/').and_then(|(group, rest)| {
        let (version, kind) = rest.split_once('.')?;
        if group.is_empty() || version.is_empty() || kind.is_empty() {
            return None;
        }
        Some(GroupVersionKind::new(group, version, kind))
    });
    Some(parsed.ok_or_else(|| {
        ConvertError::corruption(key, "key must be <prefix>.<group>/<version>.<kind>")
    }))
}

/// Returns the string values of `metadata.annotations`.
///
/// A missing map is empty; a value that is not a string is an error.
pub fn metadata_annotations(object: &Value) -> Result<BTreeMap<String, String>> {
    let annotations = match object.get("metadata").and_then(|m| m.get("annotations")) {
        None | Some(Value::Null) => return Ok(BTreeMap::new()),
        Some(Value::Object(map)) => map,
        Some(other) => {
            return Err(ConvertError::malformed(format!(
                "metadata.annotations must be a map, got {}",
                other
            )))
        }
    };

    annotations
        .iter()
        .map(|(k, v)| match v {
            Value::String(s) => Ok((k.clone(), s.clone())),
            other => Err(ConvertError::malformed(format!(
                "annotation {:?} must be a string, got {}",
                k, other
            ))),
        })
        .collect()
}

/// Replaces `metadata.annotations`, creating `metadata` when missing.
///
/// An empty map removes the annotations field.
pub fn set_metadata_annotations(
    object: &mut Value,
    annotations: &BTreeMap<String, String>,
) -> Result<()> {
    let root = object
        .as_object_mut()
        .ok_or_else(|| ConvertError::malformed("object must be a map"))?;
    let metadata = root
        .entry("metadata")
        .or_insert_with(|| Value::Object(Map::new()));
    if metadata.is_null() {
        *metadata = Value::Object(Map::new());
    }
    let metadata = metadata
        .as_object_mut()
        .ok_or_else(|| ConvertError::malformed("metadata must be a map"))?;

    if annotations.is_empty() {
        metadata.remove("annotations");
    } else {
        let map = annotations
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect::<Map<String, Value>>();
        metadata.insert("annotations".to_string(), Value::Object(map));
    }
    Ok(())
}
