//! Object identity: TypeMeta and GroupVersionKind.

use crate::error::{ConvertError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// TypeMeta is the header every serialized object carries.
///
/// The engine writes it whenever it materializes an object; it is never read
/// back to decide where an object lives in the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeMeta {
    #[serde(
        rename = "apiVersion",
        default,
        skip_serializing_if = "String::is_empty"
    )]
    pub api_version: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

impl TypeMeta {
    /// Creates a TypeMeta from an apiVersion and kind.
    pub fn new(api_version: impl Into<String>, kind: impl Into<String>) -> Self {
        TypeMeta {
            api_version: api_version.into(),
            kind: kind.into(),
        }
    }

    /// Parses the header into a GroupVersionKind.
    ///
    /// Fails if either field is empty or if apiVersion is not exactly
    /// `group/version` with both sides non-empty.
    pub fn group_version_kind(&self) -> Result<GroupVersionKind> {
        if self.api_version.is_empty() {
            return Err(ConvertError::malformed("empty apiVersion"));
        }
        if self.kind.is_empty() {
            return Err(ConvertError::malformed("empty kind"));
        }
        let (group, version) = parse_api_version(&self.api_version)?;
        Ok(GroupVersionKind::new(group, version, self.kind.as_str()))
    }
}

/// Splits an apiVersion of the form `group/version`.
pub fn parse_api_version(api_version: &str) -> Result<(&str, &str)> {
    let mut parts = api_version.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(group), Some(version), None) if !group.is_empty() && !version.is_empty() => {
            Ok((group, version))
        }
        _ => Err(ConvertError::malformed(format!(
            "badly formatted apiVersion {:?}, must be 'group/version'",
            api_version
        ))),
    }
}

/// GroupVersionKind identifies a Kind in the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GroupVersionKind {
    pub fn new(
        group: impl Into<String>,
        version: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        GroupVersionKind {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }

    /// Returns `group/version`.
    pub fn api_version(&self) -> String {
        format!("{}/{}", self.group, self.version)
    }

    /// Returns the TypeMeta describing this identity.
    pub fn type_meta(&self) -> TypeMeta {
        TypeMeta::new(self.api_version(), self.kind.as_str())
    }

    /// Returns true if any component is empty.
    pub fn is_empty(&self) -> bool {
        self.group.is_empty() || self.version.is_empty() || self.kind.is_empty()
    }

    /// Returns true if both identities live in the same group and version.
    pub fn same_group_version(&self, other: &GroupVersionKind) -> bool {
        self.group == other.group && self.version == other.version
    }
}

impl fmt::Display for GroupVersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}, Kind={}", self.group, self.version, self.kind)
    }
}
