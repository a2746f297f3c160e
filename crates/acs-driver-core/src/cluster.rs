//! Records threaded through lifecycle calls

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Host-owned cluster metadata
///
/// Passed into every lifecycle call and handed back as its result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterInfo {
    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub service_account_token: String,

    #[serde(default)]
    pub endpoint: String,

    #[serde(default)]
    pub root_ca_certificate: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub client_certificate: String,

    #[serde(default)]
    pub client_key: String,

    #[serde(default)]
    pub node_count: i64,

    #[serde(default)]
    pub metadata: HashMap<String, String>,

    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubernetesVersion {
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCount {
    #[serde(default)]
    pub count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadBalancerCapabilities {
    pub enabled: bool,
    pub provider: String,
    pub protocols_supported: Vec<String>,
    pub health_check_supported: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressCapabilities {
    pub ingress_provider: String,
    pub custom_default_backend: bool,
}

/// Kubernetes-level features of the provisioned cluster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct K8sCapabilities {
    #[serde(default)]
    pub l4_load_balancer: Option<LoadBalancerCapabilities>,

    #[serde(default)]
    pub ingress_controllers: Vec<IngressCapabilities>,

    #[serde(default)]
    pub node_pool_scaling_supported: bool,

    #[serde(default)]
    pub node_port_range: String,
}

/// Lifecycle operation a driver can advertise
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    GetVersion,
    SetVersion,
    GetClusterSize,
    SetClusterSize,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Capability::GetVersion => write!(f, "get-version"),
            Capability::SetVersion => write!(f, "set-version"),
            Capability::GetClusterSize => write!(f, "get-cluster-size"),
            Capability::SetClusterSize => write!(f, "set-cluster-size"),
        }
    }
}

/// Set of advertised capabilities
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Capabilities {
    capabilities: BTreeSet<Capability>,
}

impl Capabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, capability: Capability) {
        self.capabilities.insert(capability);
    }

    pub fn with(mut self, capability: Capability) -> Self {
        self.add(capability);
        self
    }

    pub fn contains(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.capabilities.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.capabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capabilities.is_empty()
    }
}

impl FromIterator<Capability> for Capabilities {
    fn from_iter<I: IntoIterator<Item = Capability>>(iter: I) -> Self {
        Self {
            capabilities: iter.into_iter().collect(),
        }
    }
}
