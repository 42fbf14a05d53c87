//! kubeadm.k8s.io/v1beta1, the oldest sample version.
//!
//! Kinds here have no older neighbor, so they keep the default (empty)
//! conversions; v1beta2 owns both directions of the hop.

use super::defaults;
use super::GROUP;
use crate::error::{ConvertError, Result};
use crate::kind::{Convertible, Defaultable, Identity, Kind, TypeMeta, Validatable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const VERSION: &str = "v1beta1";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRegistrationOptions {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cri_socket: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub kubelet_extra_args: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct APIEndpoint {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub advertise_address: String,
    #[serde(default, skip_serializing_if = "defaults::is_zero")]
    pub bind_port: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitConfiguration {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub node_registration: NodeRegistrationOptions,
    #[serde(rename = "localAPIEndpoint", default)]
    pub local_api_endpoint: APIEndpoint,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Networking {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub service_subnet: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pod_subnet: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub dns_domain: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterConfiguration {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub networking: Networking,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kubernetes_version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub control_plane_endpoint: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub certificates_dir: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub image_repository: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cluster_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterStatus {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub api_endpoints: BTreeMap<String, APIEndpoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BootstrapTokenDiscovery {
    #[serde(default)]
    pub token: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_server_endpoint: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ca_cert_hashes: Vec<String>,
    #[serde(
        rename = "unsafeSkipCAVerification",
        default,
        skip_serializing_if = "std::ops::Not::not"
    )]
    pub unsafe_skip_ca_verification: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDiscovery {
    pub kube_config_path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discovery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bootstrap_token: Option<BootstrapTokenDiscovery>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<FileDiscovery>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub tls_bootstrap_token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinConfiguration {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub node_registration: NodeRegistrationOptions,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ca_cert_path: String,
    #[serde(default)]
    pub discovery: Discovery,
}

crate::impl_identity!(InitConfiguration, GROUP, VERSION, "InitConfiguration");
crate::impl_identity!(ClusterConfiguration, GROUP, VERSION, "ClusterConfiguration");
crate::impl_identity!(ClusterStatus, GROUP, VERSION, "ClusterStatus");
crate::impl_identity!(JoinConfiguration, GROUP, VERSION, "JoinConfiguration");

impl Convertible for InitConfiguration {}
impl Convertible for ClusterConfiguration {}
impl Convertible for ClusterStatus {}
impl Convertible for JoinConfiguration {}

impl Kind for InitConfiguration {}
impl Kind for ClusterConfiguration {}
impl Kind for ClusterStatus {}
impl Kind for JoinConfiguration {}

impl Defaultable for InitConfiguration {
    fn apply_defaults(&mut self) -> Result<()> {
        defaults::cri_socket(&mut self.node_registration.cri_socket);
        defaults::bind_port(&mut self.local_api_endpoint.bind_port);
        Ok(())
    }
}

impl Defaultable for ClusterConfiguration {
    fn apply_defaults(&mut self) -> Result<()> {
        defaults::cluster(
            &mut self.kubernetes_version,
            &mut self.certificates_dir,
            &mut self.image_repository,
            &mut self.cluster_name,
        );
        defaults::networking(&mut self.networking.service_subnet, &mut self.networking.dns_domain);
        Ok(())
    }
}

impl Defaultable for ClusterStatus {}

impl Defaultable for JoinConfiguration {
    fn apply_defaults(&mut self) -> Result<()> {
        defaults::cri_socket(&mut self.node_registration.cri_socket);
        defaults::ca_cert_path(&mut self.ca_cert_path);
        Ok(())
    }
}

impl Validatable for InitConfiguration {}

impl Validatable for ClusterConfiguration {
    fn validate(&self) -> Result<()> {
        if self.kubernetes_version.is_empty() {
            return Err(ConvertError::kind(
                self.group_version_kind().to_string(),
                "kubernetesVersion must be set",
            ));
        }
        Ok(())
    }
}

impl Validatable for ClusterStatus {
    fn validate(&self) -> Result<()> {
        for (node, endpoint) in &self.api_endpoints {
            defaults::validate_port(&self.group_version_kind(), node, endpoint.bind_port)?;
        }
        Ok(())
    }
}

impl Validatable for JoinConfiguration {
    fn validate(&self) -> Result<()> {
        match (&self.discovery.bootstrap_token, &self.discovery.file) {
            (Some(_), None) | (None, Some(_)) => Ok(()),
            _ => Err(ConvertError::kind(
                self.group_version_kind().to_string(),
                "exactly one of discovery.bootstrapToken and discovery.file must be set",
            )),
        }
    }
}
