//! Default values shared by the sample versions.

use crate::error::{ConvertError, Result};
use crate::kind::GroupVersionKind;

pub const DEFAULT_CRI_SOCKET: &str = "/var/run/dockershim.sock";
pub const DEFAULT_BIND_PORT: i32 = 6443;
pub const DEFAULT_KUBERNETES_VERSION: &str = "stable-1";
pub const DEFAULT_CERTIFICATES_DIR: &str = "/etc/kubernetes/pki";
pub const DEFAULT_IMAGE_REPOSITORY: &str = "k8s.gcr.io";
pub const DEFAULT_CLUSTER_NAME: &str = "kubernetes";
pub const DEFAULT_SERVICE_SUBNET: &str = "10.96.0.0/12";
pub const DEFAULT_DNS_DOMAIN: &str = "cluster.local";
pub const DEFAULT_CA_CERT_PATH: &str = "/etc/kubernetes/pki/ca.crt";

pub(crate) fn is_zero(v: &i32) -> bool {
    *v == 0
}

fn or_default(field: &mut String, value: &str) {
    if field.is_empty() {
        *field = value.to_string();
    }
}

pub(crate) fn cri_socket(socket: &mut String) {
    or_default(socket, DEFAULT_CRI_SOCKET);
}

pub(crate) fn bind_port(port: &mut i32) {
    if *port == 0 {
        *port = DEFAULT_BIND_PORT;
    }
}

pub(crate) fn ca_cert_path(path: &mut String) {
    or_default(path, DEFAULT_CA_CERT_PATH);
}

pub(crate) fn cluster(
    kubernetes_version: &mut String,
    certificates_dir: &mut String,
    image_repository: &mut String,
    cluster_name: &mut String,
) {
    or_default(kubernetes_version, DEFAULT_KUBERNETES_VERSION);
    or_default(certificates_dir, DEFAULT_CERTIFICATES_DIR);
    or_default(image_repository, DEFAULT_IMAGE_REPOSITORY);
    or_default(cluster_name, DEFAULT_CLUSTER_NAME);
}

pub(crate) fn networking(service_subnet: &mut String, dns_domain: &mut String) {
    or_default(service_subnet, DEFAULT_SERVICE_SUBNET);
    or_default(dns_domain, DEFAULT_DNS_DOMAIN);
}

pub(crate) fn validate_port(owner: &GroupVersionKind, node: &str, port: i32) -> Result<()> {
    if !(1..=65535).contains(&port) {
        return Err(ConvertError::kind(
            owner.to_string(),
            format!("apiEndpoints[{}].bindPort {} is out of range", node, port),
        ));
    }
    Ok(())
}
