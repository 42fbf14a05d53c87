//! # Kindconv
//!
//! Versioned configuration kinds with lossless up/down conversion across API
//! schema versions.
//!
//! Objects tagged with a group, version and kind are materialized into typed
//! values, converted one hop at a time along an ordered chain of versions,
//! and brought back without losing what an intermediate version could not
//! represent.
//!
//! ## Modules
//!
//! - [`kind`] - Kind capability traits, identities and the KindSpec unit of conversion
//! - [`registry`] - Static, validated description of Groups, Versions and Kinds
//! - [`convert`] - The Converter: traversal, round-trip cache and (de)serialization
//! - [`codec`] - Multi-document streams and cache annotations
//! - [`kubeadm`] - A sample registry of bootstrap configuration kinds
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use kindconv::convert::Converter;
//! use kindconv::kind::KindSpec;
//! use kindconv::kubeadm;
//!
//! # fn main() -> kindconv::Result<()> {
//! let cv = Converter::new(Arc::new(kubeadm::registry()?));
//! let data = b"apiVersion: kubeadm.k8s.io/v1beta2\nkind: ClusterConfiguration\n";
//! let object = cv.object_from_bytes(data)?;
//! let old = cv.convert_to(KindSpec::from(object), kubeadm::GROUP, "v1beta1")?;
//! println!("{}", String::from_utf8_lossy(&cv.marshal_spec(&old)?));
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod convert;
pub mod error;
pub mod kind;
pub mod kubeadm;
pub mod registry;

#[cfg(test)]
mod testing;

pub use convert::{Converter, ConverterBuilder, Format};
pub use error::{ConvertError, Result};
pub use kind::{GroupVersionKind, Kind, KindSpec, TypeMeta};
pub use registry::{Group, Registry, Version};
