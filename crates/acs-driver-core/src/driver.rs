//! Cluster driver trait definition

use crate::cluster::{Capabilities, ClusterInfo, K8sCapabilities, KubernetesVersion, NodeCount};
use crate::error::Result;
use crate::options::{DriverFlags, DriverOptions};
use async_trait::async_trait;

/// Lifecycle contract the orchestration host drives
///
/// The host issues one call at a time per cluster and waits for it to
/// return. Implementations keep no state between calls.
#[async_trait]
pub trait ClusterDriver: Send + Sync {
    /// Returns the driver name (e.g., "cloudstack")
    fn name(&self) -> &str;

    /// Flags accepted when a cluster is created
    async fn get_driver_create_options(&self) -> Result<DriverFlags>;

    /// Flags accepted when a cluster is updated
    async fn get_driver_update_options(&self) -> Result<DriverFlags>;

    /// Provision the cluster described by `opts`
    async fn create(&self, opts: &DriverOptions, info: &ClusterInfo) -> Result<ClusterInfo>;

    async fn update(&self, info: ClusterInfo, opts: &DriverOptions) -> Result<ClusterInfo>;

    /// Confirm the cluster after creation
    async fn post_check(&self, info: ClusterInfo) -> Result<ClusterInfo>;

    async fn remove(&self, info: &ClusterInfo) -> Result<()>;

    async fn get_version(&self, info: &ClusterInfo) -> Result<KubernetesVersion>;

    async fn set_version(&self, info: &ClusterInfo, version: &KubernetesVersion) -> Result<()>;

    async fn get_cluster_size(&self, info: &ClusterInfo) -> Result<NodeCount>;

    async fn set_cluster_size(&self, info: &ClusterInfo, count: &NodeCount) -> Result<()>;

    async fn get_capabilities(&self) -> Result<Capabilities>;

    async fn get_k8s_capabilities(&self, opts: &DriverOptions) -> Result<K8sCapabilities>;

    async fn remove_legacy_service_account(&self, info: &ClusterInfo) -> Result<()>;

    async fn etcd_save(
        &self,
        info: &ClusterInfo,
        opts: &DriverOptions,
        snapshot_name: &str,
    ) -> Result<()>;

    async fn etcd_restore(
        &self,
        info: &ClusterInfo,
        opts: &DriverOptions,
        snapshot_name: &str,
    ) -> Result<()>;

    async fn etcd_remove_snapshot(
        &self,
        info: &ClusterInfo,
        opts: &DriverOptions,
        snapshot_name: &str,
    ) -> Result<()>;
}
