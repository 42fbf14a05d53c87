//! Kubeadm module - A sample registry of bootstrap configuration kinds.
//!
//! Two versions of four kinds, enough to exercise lossy round trips through
//! the cache. Only a handful of fields of each kind are modeled.

pub mod defaults;
pub mod v1beta1;
pub mod v1beta2;


use crate::error::Result;
use crate::registry::{Group, Registry, Version};

pub const GROUP: &str = "kubeadm.k8s.io";

/// Returns the kubeadm group.
pub fn groups() -> Vec<Group> {
    vec![Group::new(GROUP)
        .added_in("v1.13")
        .version(
            Version::new(v1beta1::VERSION)
                .added_in("v1.13.0")
                .deprecated()
                .kind::<v1beta1::InitConfiguration>()
                .kind::<v1beta1::ClusterConfiguration>()
                .kind::<v1beta1::ClusterStatus>()
                .kind::<v1beta1::JoinConfiguration>(),
        )
        .version(
            Version::new(v1beta2::VERSION)
                .added_in("v1.15.0")
                .preferred()
                .kind::<v1beta2::InitConfiguration>()
                .kind::<v1beta2::ClusterConfiguration>()
                .kind::<v1beta2::ClusterStatus>()
                .kind::<v1beta2::JoinConfiguration>(),
        )]
}

/// Builds a validated registry of the kubeadm group.
pub fn registry() -> Result<Registry> {
    Registry::new(groups())
}
