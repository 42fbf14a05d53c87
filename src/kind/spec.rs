//! KindSpec: the unit of convertible state.

use super::meta::GroupVersionKind;
use super::traits::Kind;
use crate::error::{ConvertError, Result};
use serde::de::DeserializeOwned;
use std::fmt;

/// KindSpec is an ordered list of objects that together represent one
/// logical configuration object in one version.
///
/// Equality compares identities in order, never contents. Two specs with the
/// same Kinds in a different order are different specs. Use [`kinds`] to
/// compare contents.
///
/// [`kinds`]: KindSpec::kinds
#[derive(Debug, Clone, Default)]
pub struct KindSpec {
    kinds: Vec<Box<dyn Kind>>,
}

impl KindSpec {
    /// Creates an empty spec.
    pub fn new() -> Self {
        KindSpec { kinds: Vec::new() }
    }

    pub fn from_kinds(kinds: Vec<Box<dyn Kind>>) -> Self {
        KindSpec { kinds }
    }

    /// Appends an object.
    pub fn with_kind<T: Kind>(mut self, kind: T) -> Self {
        self.kinds.push(Box::new(kind));
        self
    }

    /// Appends the zero value of `T`, header set. Used to declare
    /// conversion specs.
    pub fn with_default<T: Kind + Default>(mut self) -> Self {
        let mut kind = T::default();
        kind.set_default_type_meta();
        self.kinds.push(Box::new(kind));
        self
    }

    pub fn push(&mut self, kind: Box<dyn Kind>) {
        self.kinds.push(kind);
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn kinds(&self) -> &[Box<dyn Kind>] {
        &self.kinds
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Kind> {
        self.kinds.iter().map(|k| k.as_ref())
    }

    pub fn into_kinds(self) -> Vec<Box<dyn Kind>> {
        self.kinds
    }

    pub fn first(&self) -> Option<&dyn Kind> {
        self.kinds.first().map(|k| k.as_ref())
    }

    /// Returns the first object of type `T`.
    pub fn get<T: Kind>(&self) -> Option<&T> {
        self.kinds.iter().find_map(|k| k.downcast_ref::<T>())
    }

    /// Removes and returns the first object of type `T`.
    pub fn take<T: Kind>(&mut self) -> Option<T> {
        let idx = self.kinds.iter().position(|k| k.is::<T>())?;
        self.kinds.remove(idx).downcast::<T>().ok()
    }

    /// Like [`take`](KindSpec::take) but fails with a Kind error naming
    /// `owner` when the object is missing.
    pub fn require<T: Kind>(&mut self, owner: &GroupVersionKind) -> Result<T> {
        self.take::<T>().ok_or_else(|| {
            ConvertError::kind(
                owner.to_string(),
                format!("input has no {}", std::any::type_name::<T>()),
            )
        })
    }

    /// Returns the identities of all objects, in order.
    pub fn identities(&self) -> Vec<GroupVersionKind> {
        self.kinds.iter().map(|k| k.group_version_kind()).collect()
    }

    /// Returns the identity of the first object, the spec's group/version.
    pub fn head(&self) -> Option<GroupVersionKind> {
        self.kinds.first().map(|k| k.group_version_kind())
    }

    /// Compares identities in order.
    pub fn matches(&self, other: &KindSpec) -> bool {
        self.kinds.len() == other.kinds.len()
            && self
                .kinds
                .iter()
                .zip(other.kinds.iter())
                .all(|(a, b)| a.group_version_kind() == b.group_version_kind())
    }

    /// Checks that every object has a complete identity and that all objects
    /// share one group/version. An empty spec is valid.
    pub fn validate(&self) -> Result<()> {
        let mut head: Option<GroupVersionKind> = None;
        for (i, kind) in self.kinds.iter().enumerate() {
            let gvk = kind.group_version_kind();
            if gvk.is_empty() {
                return Err(ConvertError::malformed(format!(
                    "object with incomplete identity {:?} at position {}",
                    gvk, i
                )));
            }
            match &head {
                None => head = Some(gvk),
                Some(h) if !h.same_group_version(&gvk) => {
                    return Err(ConvertError::malformed(format!(
                        "found multiple API versions in one spec: {} and {}",
                        h.api_version(),
                        gvk.api_version()
                    )));
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Writes the header of every object from its static identity.
    pub fn set_default_type_meta(&mut self) {
        for kind in self.kinds.iter_mut() {
            kind.set_default_type_meta();
        }
    }
}

impl PartialEq for KindSpec {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other)
    }
}

impl Eq for KindSpec {}

impl fmt::Display for KindSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, kind) in self.kinds.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", kind.group_version_kind())?;
        }
        Ok(())
    }
}

impl From<Box<dyn Kind>> for KindSpec {
    fn from(kind: Box<dyn Kind>) -> Self {
        KindSpec { kinds: vec![kind] }
    }
}

impl IntoIterator for KindSpec {
    type Item = Box<dyn Kind>;
    type IntoIter = std::vec::IntoIter<Box<dyn Kind>>;

    fn into_iter(self) -> Self::IntoIter {
        self.kinds.into_iter()
    }
}

/// Copies the fields `src` shares with `T` into a new `T` by name.
///
/// Fields of `src` unknown to `T` are dropped; fields of `T` missing in `src`
/// take their serde defaults. The result carries `T`'s header.
pub fn convert_fields<T>(src: &dyn Kind) -> Result<T>
where
    T: Kind + Default + DeserializeOwned,
{
    let mut value = src.to_value()?;
    if let serde_json::Value::Object(map) = &mut value {
        map.remove("apiVersion");
        map.remove("kind");
    }
    let mut out: T = serde_json::from_value(value).map_err(|e| {
        ConvertError::kind(
            src.group_version_kind().to_string(),
            format!("cannot copy fields into {}: {}", std::any::type_name::<T>(), e),
        )
    })?;
    out.set_default_type_meta();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::{Convertible, Defaultable, TypeMeta, Validatable};
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct K1 {
        #[serde(flatten)]
        type_meta: TypeMeta,
        #[serde(default)]
        a: String,
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct K2 {
        #[serde(flatten)]
        type_meta: TypeMeta,
        #[serde(default)]
        a: String,
        #[serde(default)]
        b: String,
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Other {
        #[serde(flatten)]
        type_meta: TypeMeta,
    }

    crate::impl_identity!(K1, "foo", "bar", "k1");
    crate::impl_identity!(K2, "foo", "bar", "k2");
    crate::impl_identity!(Other, "foo", "baz", "other");

    impl Convertible for K1 {}
    impl Defaultable for K1 {}
    impl Validatable for K1 {}
    impl Kind for K1 {}
    impl Convertible for K2 {}
    impl Defaultable for K2 {}
    impl Validatable for K2 {}
    impl Kind for K2 {}
    impl Convertible for Other {}
    impl Defaultable for Other {}
    impl Validatable for Other {}
    impl Kind for Other {}

    #[test]
    fn test_spec_equality_is_ordered() {
        let ab = KindSpec::new().with_default::<K1>().with_default::<K2>();
        let ab2 = KindSpec::new()
            .with_kind(K1 { a: "x".into(), ..Default::default() })
            .with_default::<K2>();
        let ba = KindSpec::new().with_default::<K2>().with_default::<K1>();

        assert_eq!(ab, ab2);
        assert_ne!(ab, ba);
        assert_ne!(ab, KindSpec::new().with_default::<K1>());
    }

    #[test]
    fn test_spec_validate() {
        assert!(KindSpec::new().validate().is_ok());
        assert!(KindSpec::new()
            .with_default::<K1>()
            .with_default::<K2>()
            .validate()
            .is_ok());

        let mixed = KindSpec::new().with_default::<K1>().with_default::<Other>();
        assert!(matches!(
            mixed.validate(),
            Err(ConvertError::MalformedInput { .. })
        ));
    }

    #[test]
    fn test_spec_take() {
        let mut spec = KindSpec::new()
            .with_kind(K1 { a: "a".into(), ..Default::default() })
            .with_default::<K2>();

        let k1 = spec.take::<K1>().unwrap();
        assert_eq!(k1.a, "a");
        assert_eq!(spec.len(), 1);
        assert!(spec.take::<K1>().is_none());
        assert!(spec.get::<K2>().is_some());
    }

    #[test]
    fn test_spec_display() {
        let spec = KindSpec::new().with_default::<K1>().with_default::<K2>();
        assert_eq!(spec.to_string(), "foo/bar, Kind=k1; foo/bar, Kind=k2");
    }

    #[test]
    fn test_convert_fields() {
        let k2 = K2 {
            type_meta: TypeMeta::new("foo/bar", "k2"),
            a: "A".into(),
            b: "B".into(),
        };
        let k1: K1 = convert_fields(&k2).unwrap();
        assert_eq!(k1.a, "A");
        assert_eq!(k1.type_meta, TypeMeta::new("foo/bar", "k1"));

        let back: K2 = convert_fields(&k1).unwrap();
        assert_eq!(back.a, "A");
        assert_eq!(back.b, "");
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let spec = KindSpec::new().with_kind(K1 { a: "a".into(), ..Default::default() });
        let mut copy = spec.clone();
        copy.kinds[0].downcast_mut::<K1>().unwrap().a = "changed".into();
        assert_eq!(spec.get::<K1>().unwrap().a, "a");
    }
}
