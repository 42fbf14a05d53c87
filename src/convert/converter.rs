//! The Converter: registry access, materialization and (de)serialization.

use crate::codec::{group_version_kind_from_value, join_documents, split_documents};
use crate::error::{BoxError, ConvertError, Result};
use crate::kind::{GroupVersionKind, Kind, KindSpec};
use crate::registry::Registry;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Default prefix of the cache annotation keys.
pub const DEFAULT_ANNOTATION_PREFIX: &str = "clusterlifecycle.x-k8s.io/converter-cache";

/// Turns a generic object into bytes.
pub type MarshalFn =
    Box<dyn Fn(&serde_json::Value) -> std::result::Result<Vec<u8>, BoxError> + Send + Sync>;

/// Turns bytes into a generic object.
pub type UnmarshalFn =
    Box<dyn Fn(&[u8]) -> std::result::Result<serde_json::Value, BoxError> + Send + Sync>;

/// Wire format used by the default marshal and unmarshal functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    Json,
    #[default]
    Yaml,
}

impl Format {
    /// Returns the marshal function writing this format.
    pub fn marshal_fn(self) -> MarshalFn {
        match self {
            Format::Json => Box::new(|value: &serde_json::Value| {
                serde_json::to_vec(value).map_err(|e| Box::new(e) as BoxError)
            }),
            Format::Yaml => Box::new(|value: &serde_json::Value| {
                serde_yaml::to_string(value)
                    .map(String::into_bytes)
                    .map_err(|e| Box::new(e) as BoxError)
            }),
        }
    }

    pub fn unmarshal_fn(self) -> UnmarshalFn {
        match self {
            Format::Json => Box::new(|data: &[u8]| {
                serde_json::from_slice(data).map_err(|e| Box::new(e) as BoxError)
            }),
            // YAML is a superset of JSON, so this also reads JSON input.
            Format::Yaml => Box::new(|data: &[u8]| {
                serde_yaml::from_slice(data).map_err(|e| Box::new(e) as BoxError)
            }),
        }
    }
}

/// ConverterBuilder is a builder for creating a Converter.
pub struct ConverterBuilder {
    registry: Arc<Registry>,
    format: Format,
    annotation_prefix: String,
    marshal: Option<MarshalFn>,
    unmarshal: Option<UnmarshalFn>,
}

impl ConverterBuilder {
    /// Creates a new ConverterBuilder over a registry.
    pub fn new(registry: Arc<Registry>) -> Self {
        ConverterBuilder {
            registry,
            format: Format::default(),
            annotation_prefix: DEFAULT_ANNOTATION_PREFIX.to_string(),
            marshal: None,
            unmarshal: None,
        }
    }

    /// Sets the format of the default marshal and unmarshal functions.
    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Sets the prefix of cache annotation keys.
    pub fn annotation_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.annotation_prefix = prefix.into();
        self
    }

    /// Overrides the marshal function.
    pub fn marshal_fn(mut self, f: MarshalFn) -> Self {
        self.marshal = Some(f);
        self
    }

    /// Overrides the unmarshal function.
    pub fn unmarshal_fn(mut self, f: UnmarshalFn) -> Self {
        self.unmarshal = Some(f);
        self
    }

    /// Builds the Converter.
    pub fn build(self) -> Converter {
        let format = self.format;
        Converter {
            registry: self.registry,
            cache: Mutex::new(BTreeMap::new()),
            marshal: self.marshal.unwrap_or_else(|| format.marshal_fn()),
            unmarshal: self.unmarshal.unwrap_or_else(|| format.unmarshal_fn()),
            annotation_prefix: self.annotation_prefix,
        }
    }
}

/// Converter materializes, converts and serializes Kinds of one registry.
///
/// Each converter owns its own round-trip cache; the registry is shared.
pub struct Converter {
    pub(crate) registry: Arc<Registry>,
    pub(crate) cache: Mutex<BTreeMap<GroupVersionKind, Box<dyn Kind>>>,
    marshal: MarshalFn,
    unmarshal: UnmarshalFn,
    pub(crate) annotation_prefix: String,
}

impl fmt::Debug for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Converter")
            .field("groups", &self.registry.groups().len())
            .field("cached", &self.cache_len())
            .field("annotation_prefix", &self.annotation_prefix)
            .finish()
    }
}

impl Converter {
    /// Creates a Converter with the default YAML format.
    pub fn new(registry: Arc<Registry>) -> Self {
        ConverterBuilder::new(registry).build()
    }

    /// Creates a new ConverterBuilder.
    pub fn builder(registry: Arc<Registry>) -> ConverterBuilder {
        ConverterBuilder::new(registry)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn annotation_prefix(&self) -> &str {
        &self.annotation_prefix
    }

    /// Returns a new zero value of a registered Kind with its header set.
    pub fn new_object(&self, gvk: &GroupVersionKind) -> Result<Box<dyn Kind>> {
        self.registry.new_object(gvk)
    }

    /// Reads only the identity header of a document.
    pub fn group_version_kind_from_bytes(&self, data: &[u8]) -> Result<GroupVersionKind> {
        let value = self.unmarshal_value(data)?;
        group_version_kind_from_value(&value)
    }

    /// Materializes a single document as the Kind its header names.
    ///
    /// The document is decoded once with the injected unmarshal function.
    /// The header of the result is rewritten from the registered identity.
    pub fn object_from_bytes(&self, data: &[u8]) -> Result<Box<dyn Kind>> {
        let value = self.unmarshal_value(data)?;
        let gvk = group_version_kind_from_value(&value)?;
        self.object_from_value(&gvk, value)
    }

    /// Materializes a document as the given Kind without reading its header.
    pub fn object_from_bytes_as(
        &self,
        gvk: &GroupVersionKind,
        data: &[u8],
    ) -> Result<Box<dyn Kind>> {
        let value = self.unmarshal_value(data)?;
        self.object_from_value(gvk, value)
    }

    fn object_from_value(
        &self,
        gvk: &GroupVersionKind,
        value: serde_json::Value,
    ) -> Result<Box<dyn Kind>> {
        let mut object = self.new_object(gvk)?;
        object
            .load_value(value)
            .map_err(|e| ConvertError::malformed(format!("cannot decode {}: {}", gvk, e)))?;
        object.set_default_type_meta();
        debug!(kind = %gvk, "materialized object");
        Ok(object)
    }

    /// Materializes every document of a stream into one KindSpec.
    ///
    /// All documents must share one group/version.
    pub fn read_kind_spec(&self, data: &[u8]) -> Result<KindSpec> {
        let mut spec = KindSpec::new();
        for doc in split_documents(data)? {
            spec.push(self.object_from_bytes(&doc)?);
        }
        if spec.is_empty() {
            return Err(ConvertError::malformed("no documents found"));
        }
        spec.validate()?;
        Ok(spec)
    }

    /// Runs the injected unmarshal function.
    pub fn unmarshal_value(&self, data: &[u8]) -> Result<serde_json::Value> {
        (self.unmarshal)(data).map_err(ConvertError::Unmarshal)
    }

    /// Runs the injected marshal function.
    pub fn marshal_value(&self, value: &serde_json::Value) -> Result<Vec<u8>> {
        (self.marshal)(value).map_err(ConvertError::Marshal)
    }

    /// Marshals a single object.
    pub fn marshal(&self, kind: &dyn Kind) -> Result<Vec<u8>> {
        self.marshal_value(&kind.to_value()?)
    }

    /// Marshals every object of a spec into one multi-document stream.
    pub fn marshal_spec(&self, spec: &KindSpec) -> Result<Vec<u8>> {
        let docs = spec
            .iter()
            .map(|k| self.marshal(k))
            .collect::<Result<Vec<_>>>()?;
        Ok(join_documents(&docs))
    }

    /// Applies defaults to, then validates, every object of a spec.
    ///
    /// Errors are reported with the identity of the failing object.
    pub fn default_and_validate(&self, spec: &mut KindSpec) -> Result<()> {
        let mut kinds = std::mem::take(spec).into_kinds();
        let mut result = Ok(());
        for kind in kinds.iter_mut() {
            let gvk = kind.group_version_kind();
            result = kind
                .apply_defaults()
                .and_then(|_| kind.validate())
                .map_err(|e| with_kind(&gvk, e));
            if result.is_err() {
                break;
            }
        }
        *spec = KindSpec::from_kinds(kinds);
        result
    }
}

fn with_kind(gvk: &GroupVersionKind, err: ConvertError) -> ConvertError {
    match err {
        ConvertError::Kind { .. } => err,
        other => ConvertError::kind(gvk.to_string(), other.to_string()),
    }
}
