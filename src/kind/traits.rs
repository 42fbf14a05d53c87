//! Capability traits composed into a Kind.

use super::meta::{GroupVersionKind, TypeMeta};
use super::spec::KindSpec;
use crate::convert::Converter;
use crate::error::{ConvertError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;
use std::fmt::Debug;

/// Identity gives access to the static identity of a Kind and to the
/// mutable header stored in the instance.
pub trait Identity {
    /// Returns the identity this type is registered under. Must not depend
    /// on instance data.
    fn group_version_kind(&self) -> GroupVersionKind;

    fn type_meta(&self) -> &TypeMeta;

    fn type_meta_mut(&mut self) -> &mut TypeMeta;

    /// Overwrites the header with the one derived from the static identity.
    fn set_default_type_meta(&mut self) {
        let tm = self.group_version_kind().type_meta();
        *self.type_meta_mut() = tm;
    }
}

/// Defaultable fills unset fields with their defaults.
pub trait Defaultable {
    fn apply_defaults(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Validatable checks the contents of an object.
pub trait Validatable {
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

/// Convertible describes how a Kind is reached from its neighbor versions.
///
/// The receiver is the registered zero value of the Kind that owns the
/// conversion. `convert_up` turns objects of the previous version (matching
/// `convert_up_spec`) into objects of this version. `convert_down` turns
/// objects of this version (matching `convert_down_spec`) into objects of the
/// previous version. An empty spec never matches, so Kinds without a
/// neighbor in one direction keep the defaults.
pub trait Convertible: Identity {
    fn convert_up(&self, _cv: &Converter, input: KindSpec) -> Result<KindSpec> {
        Err(ConvertError::kind(
            self.group_version_kind().to_string(),
            format!("no up conversion from [{}]", input),
        ))
    }

    fn convert_down(&self, _cv: &Converter, input: KindSpec) -> Result<KindSpec> {
        Err(ConvertError::kind(
            self.group_version_kind().to_string(),
            format!("no down conversion from [{}]", input),
        ))
    }

    fn convert_up_spec(&self) -> KindSpec {
        KindSpec::new()
    }

    fn convert_down_spec(&self) -> KindSpec {
        KindSpec::new()
    }

    /// Returns the hub conversions if this Kind lives in a spoke version.
    fn as_spoke(&self) -> Option<&dyn Spoke> {
        None
    }
}

/// Spoke is implemented by Kinds of a non-hub version in a hub-and-spoke
/// group. Conversions between two spokes always pass through the hub.
pub trait Spoke {
    /// Converts objects of this version (matching `convert_to_hub_spec`)
    /// into hub objects.
    fn convert_to_hub(&self, cv: &Converter, input: KindSpec) -> Result<KindSpec>;

    /// Converts hub objects (matching `convert_from_hub_spec`) into objects
    /// of this version.
    fn convert_from_hub(&self, cv: &Converter, input: KindSpec) -> Result<KindSpec>;

    fn convert_to_hub_spec(&self) -> KindSpec;

    fn convert_from_hub_spec(&self) -> KindSpec;
}

/// Object-safe helpers every Kind gets for free from its serde and `Default`
/// implementations.
pub trait KindObject: Any {
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Returns a deep copy.
    fn clone_kind(&self) -> Box<dyn Kind>;

    /// Returns a new zero value of the same type with its header set.
    fn new_kind(&self) -> Box<dyn Kind>;

    fn to_value(&self) -> Result<serde_json::Value>;

    /// Replaces the contents with the decoded value.
    fn load_value(&mut self, value: serde_json::Value) -> Result<()>;

    fn eq_kind(&self, other: &dyn Kind) -> bool;
}

impl<T> KindObject for T
where
    T: Kind + Clone + Default + PartialEq + Serialize + DeserializeOwned,
{
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn clone_kind(&self) -> Box<dyn Kind> {
        Box::new(self.clone())
    }

    fn new_kind(&self) -> Box<dyn Kind> {
        let mut kind = T::default();
        kind.set_default_type_meta();
        Box::new(kind)
    }

    fn to_value(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| ConvertError::Marshal(Box::new(e)))
    }

    fn load_value(&mut self, value: serde_json::Value) -> Result<()> {
        *self = serde_json::from_value(value).map_err(|e| ConvertError::Unmarshal(Box::new(e)))?;
        Ok(())
    }

    fn eq_kind(&self, other: &dyn Kind) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .map_or(false, |other| self == other)
    }
}

/// Kind is a named, versioned configuration type.
///
/// Implementors need `Clone + Default + PartialEq + Serialize +
/// Deserialize`, a `type_meta: TypeMeta` field (see [`impl_identity!`]), and
/// empty `Convertible`, `Defaultable` and `Validatable` impls where the
/// defaults suffice.
///
/// [`impl_identity!`]: crate::impl_identity
pub trait Kind:
    Identity + Convertible + Defaultable + Validatable + KindObject + Debug + Send + Sync
{
}

impl dyn Kind {
    pub fn downcast_ref<T: Kind>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }

    pub fn downcast_mut<T: Kind>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut::<T>()
    }

    pub fn is<T: Kind>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Unboxes the concrete value.
    pub fn downcast<T: Kind>(self: Box<Self>) -> Result<T> {
        let gvk = self.group_version_kind();
        self.into_any().downcast::<T>().map(|k| *k).map_err(|_| {
            ConvertError::kind(
                gvk.to_string(),
                format!("object is not a {}", std::any::type_name::<T>()),
            )
        })
    }
}

impl PartialEq for dyn Kind {
    fn eq(&self, other: &Self) -> bool {
        self.eq_kind(other)
    }
}

impl Clone for Box<dyn Kind> {
    fn clone(&self) -> Self {
        (**self).clone_kind()
    }
}

/// Returns the registered identity of `T`.
pub fn identity_of<T: Kind + Default>() -> GroupVersionKind {
    T::default().group_version_kind()
}

/// Implements [`Identity`] for a struct with a `type_meta: TypeMeta` field.
///
/// ```ignore
/// impl_identity!(InitConfiguration, GROUP, "v1beta2", "InitConfiguration");
/// ```
#[macro_export]
macro_rules! impl_identity {
    ($ty:ty, $group:expr, $version:expr, $kind:expr) => {
        impl $crate::kind::Identity for $ty {
            fn group_version_kind(&self) -> $crate::kind::GroupVersionKind {
                $crate::kind::GroupVersionKind::new($group, $version, $kind)
            }

            fn type_meta(&self) -> &$crate::kind::TypeMeta {
                &self.type_meta
            }

            fn type_meta_mut(&mut self) -> &mut $crate::kind::TypeMeta {
                &mut self.type_meta
            }
        }
    };
}
