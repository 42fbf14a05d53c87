//! The round-trip cache and its annotation form.
//!
//! Conversions that drop fields store their richer input here; the reverse
//! conversion reads it back. Every value is deep-copied on the way in and
//! on the way out.

use super::converter::Converter;
use crate::codec::{annotation_key, parse_annotation_key};
use crate::error::{ConvertError, Result};
use crate::kind::{identity_of, GroupVersionKind, Kind, TypeMeta};
use std::collections::BTreeMap;
use std::sync::MutexGuard;
use tracing::{trace, warn};

type CacheMap = BTreeMap<GroupVersionKind, Box<dyn Kind>>;

impl Converter {
    fn cache_lock(&self) -> MutexGuard<'_, CacheMap> {
        // Entries are replaced whole, so a poisoned map is still consistent.
        self.cache.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Stores a deep copy of `kind`, replacing any entry with its identity.
    pub fn add_to_cache(&self, kind: &dyn Kind) {
        let gvk = kind.group_version_kind();
        trace!(kind = %gvk, "caching object");
        self.cache_lock().insert(gvk, kind.clone_kind());
    }

    /// Returns a deep copy of the cached object with the given identity.
    pub fn cached_kind(&self, gvk: &GroupVersionKind) -> Option<Box<dyn Kind>> {
        let kind = self.cache_lock().get(gvk).map(|k| k.clone_kind());
        trace!(kind = %gvk, hit = kind.is_some(), "cache lookup");
        kind
    }

    /// Returns a copy of the cached `T`, if any.
    pub fn cached<T: Kind + Default>(&self) -> Option<T> {
        self.cached_kind(&identity_of::<T>())
            .and_then(|k| k.downcast::<T>().ok())
    }

    pub fn clear_cache(&self) {
        self.cache_lock().clear();
    }

    pub fn cache_len(&self) -> usize {
        self.cache_lock().len()
    }

    /// Returns the identities currently cached, in order.
    pub fn cached_identities(&self) -> Vec<GroupVersionKind> {
        self.cache_lock().keys().cloned().collect()
    }

    /// Serializes every cache entry into an annotation.
    pub fn cache_to_annotations(&self) -> Result<BTreeMap<String, String>> {
        let cache = self.cache_lock();
        let mut annotations = BTreeMap::new();
        for (gvk, kind) in cache.iter() {
            let value = kind.to_value()?;
            let encoded =
                serde_json::to_string(&value).map_err(|e| ConvertError::Marshal(Box::new(e)))?;
            annotations.insert(annotation_key(&self.annotation_prefix, gvk), encoded);
        }
        Ok(annotations)
    }

    /// Loads cache entries from annotations written by
    /// [`cache_to_annotations`](Converter::cache_to_annotations).
    ///
    /// Keys without the annotation prefix are ignored. A corrupted entry is
    /// skipped; the others are still loaded and the errors are returned.
    pub fn annotations_to_cache(
        &self,
        annotations: &BTreeMap<String, String>,
    ) -> Vec<ConvertError> {
        let mut errors = Vec::new();
        for (key, value) in annotations {
            let gvk = match parse_annotation_key(&self.annotation_prefix, key) {
                Some(Ok(gvk)) => gvk,
                Some(Err(e)) => {
                    warn!(key = %key, error = %e, "dropping cache annotation");
                    errors.push(e);
                    continue;
                }
                None => continue,
            };
            match self.decode_entry(key, &gvk, value) {
                Ok(kind) => {
                    self.cache_lock().insert(gvk, kind);
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "dropping cache annotation");
                    errors.push(e);
                }
            }
        }
        errors
    }

    fn decode_entry(
        &self,
        key: &str,
        gvk: &GroupVersionKind,
        value: &str,
    ) -> Result<Box<dyn Kind>> {
        let value: serde_json::Value = serde_json::from_str(value)
            .map_err(|e| ConvertError::corruption(key, format!("invalid JSON: {}", e)))?;

        let header: TypeMeta = serde_json::from_value(value.clone())
            .map_err(|e| ConvertError::corruption(key, format!("invalid header: {}", e)))?;
        let declared = header
            .group_version_kind()
            .map_err(|e| ConvertError::corruption(key, e.to_string()))?;
        if declared != *gvk {
            return Err(ConvertError::corruption(
                key,
                format!("value declares {}", declared),
            ));
        }

        let mut kind = self
            .registry
            .new_object(gvk)
            .map_err(|e| ConvertError::corruption(key, e.to_string()))?;
        kind.load_value(value)
            .map_err(|e| ConvertError::corruption(key, e.to_string()))?;
        kind.set_default_type_meta();
        Ok(kind)
    }
}
