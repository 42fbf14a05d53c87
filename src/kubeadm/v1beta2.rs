//! kubeadm.k8s.io/v1beta2, the preferred sample version.
//!
//! Adds `certificateKey` to InitConfiguration and `ignorePreflightErrors` to
//! the node registration options. Both are dropped on the way down to
//! v1beta1 and restored from the round-trip cache on the way back up.

use super::defaults;
use super::v1beta1;
use super::GROUP;
use crate::convert::Converter;
use crate::error::{ConvertError, Result};
use crate::kind::{
    convert_fields, Convertible, Defaultable, Identity, Kind, KindSpec, TypeMeta, Validatable,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const VERSION: &str = "v1beta2";

pub use v1beta1::{APIEndpoint, BootstrapTokenDiscovery, Discovery, FileDiscovery, Networking};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRegistrationOptions {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub cri_socket: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub kubelet_extra_args: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore_preflight_errors: Vec<String>,
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
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub certificate_key: String,
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

impl Kind for InitConfiguration {}
impl Kind for ClusterConfiguration {}
impl Kind for ClusterStatus {}
impl Kind for JoinConfiguration {}

impl Convertible for InitConfiguration {
    fn convert_up(&self, cv: &Converter, mut input: KindSpec) -> Result<KindSpec> {
        let old = input.require::<v1beta1::InitConfiguration>(&self.group_version_kind())?;
        let mut new: InitConfiguration = convert_fields(&old)?;
        if let Some(cached) = cv.cached::<InitConfiguration>() {
            new.certificate_key = cached.certificate_key;
            new.node_registration.ignore_preflight_errors =
                cached.node_registration.ignore_preflight_errors;
        }
        Ok(KindSpec::new().with_kind(new))
    }

    fn convert_down(&self, cv: &Converter, mut input: KindSpec) -> Result<KindSpec> {
        let new = input.require::<InitConfiguration>(&self.group_version_kind())?;
        cv.add_to_cache(&new);
        let old: v1beta1::InitConfiguration = convert_fields(&new)?;
        Ok(KindSpec::new().with_kind(old))
    }

    fn convert_up_spec(&self) -> KindSpec {
        KindSpec::new().with_default::<v1beta1::InitConfiguration>()
    }

    fn convert_down_spec(&self) -> KindSpec {
        KindSpec::new().with_default::<InitConfiguration>()
    }
}

impl Convertible for ClusterConfiguration {
    fn convert_up(&self, _cv: &Converter, mut input: KindSpec) -> Result<KindSpec> {
        let old = input.require::<v1beta1::ClusterConfiguration>(&self.group_version_kind())?;
        let new: ClusterConfiguration = convert_fields(&old)?;
        Ok(KindSpec::new().with_kind(new))
    }

    fn convert_down(&self, _cv: &Converter, mut input: KindSpec) -> Result<KindSpec> {
        let new = input.require::<ClusterConfiguration>(&self.group_version_kind())?;
        let old: v1beta1::ClusterConfiguration = convert_fields(&new)?;
        Ok(KindSpec::new().with_kind(old))
    }

    fn convert_up_spec(&self) -> KindSpec {
        KindSpec::new().with_default::<v1beta1::ClusterConfiguration>()
    }

    fn convert_down_spec(&self) -> KindSpec {
        KindSpec::new().with_default::<ClusterConfiguration>()
    }
}

impl Convertible for ClusterStatus {
    fn convert_up(&self, _cv: &Converter, mut input: KindSpec) -> Result<KindSpec> {
        let old = input.require::<v1beta1::ClusterStatus>(&self.group_version_kind())?;
        let new: ClusterStatus = convert_fields(&old)?;
        Ok(KindSpec::new().with_kind(new))
    }

    fn convert_down(&self, _cv: &Converter, mut input: KindSpec) -> Result<KindSpec> {
        let new = input.require::<ClusterStatus>(&self.group_version_kind())?;
        let old: v1beta1::ClusterStatus = convert_fields(&new)?;
        Ok(KindSpec::new().with_kind(old))
    }

    fn convert_up_spec(&self) -> KindSpec {
        KindSpec::new().with_default::<v1beta1::ClusterStatus>()
    }

    fn convert_down_spec(&self) -> KindSpec {
        KindSpec::new().with_default::<ClusterStatus>()
    }
}

impl Convertible for JoinConfiguration {
    fn convert_up(&self, cv: &Converter, mut input: KindSpec) -> Result<KindSpec> {
        let old = input.require::<v1beta1::JoinConfiguration>(&self.group_version_kind())?;
        let mut new: JoinConfiguration = convert_fields(&old)?;
        if let Some(cached) = cv.cached::<JoinConfiguration>() {
            new.node_registration.ignore_preflight_errors =
                cached.node_registration.ignore_preflight_errors;
        }
        Ok(KindSpec::new().with_kind(new))
    }

    fn convert_down(&self, cv: &Converter, mut input: KindSpec) -> Result<KindSpec> {
        let new = input.require::<JoinConfiguration>(&self.group_version_kind())?;
        cv.add_to_cache(&new);
        let old: v1beta1::JoinConfiguration = convert_fields(&new)?;
        Ok(KindSpec::new().with_kind(old))
    }

    fn convert_up_spec(&self) -> KindSpec {
        KindSpec::new().with_default::<v1beta1::JoinConfiguration>()
    }

    fn convert_down_spec(&self) -> KindSpec {
        KindSpec::new().with_default::<JoinConfiguration>()
    }
}

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

impl Validatable for InitConfiguration {
    fn validate(&self) -> Result<()> {
        let key = &self.certificate_key;
        if !key.is_empty() && (key.len() != 64 || !key.chars().all(|c| c.is_ascii_hexdigit())) {
            return Err(ConvertError::kind(
                self.group_version_kind().to_string(),
                "certificateKey must be 32 hex-encoded bytes",
            ));
        }
        Ok(())
    }
}

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
