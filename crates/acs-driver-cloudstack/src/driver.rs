//! CloudStack cluster driver

use crate::settings::{self, Settings};
use crate::virtual_machine::DeployVirtualMachineParams;
use acs_driver_core::{
    Capabilities, Capability, ClusterDriver, ClusterInfo, DriverError, DriverFlags,
    DriverOptions, K8sCapabilities, KubernetesVersion, NodeCount, Result,
};
use async_trait::async_trait;

/// Lifecycle facade over the CloudStack API
///
/// Only `create` talks to CloudStack; the remaining operations answer
/// with fixed results or [`DriverError::NotImplemented`].
pub struct CloudStackDriver {
    capabilities: Capabilities,
}

impl CloudStackDriver {
    pub fn new() -> Self {
        let capabilities = Capabilities::new()
            .with(Capability::GetVersion)
            .with(Capability::SetVersion)
            .with(Capability::GetClusterSize);
        Self { capabilities }
    }
}

impl Default for CloudStackDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClusterDriver for CloudStackDriver {
    fn name(&self) -> &str {
        "cloudstack"
    }

    async fn get_driver_create_options(&self) -> Result<DriverFlags> {
        Ok(settings::create_flags())
    }

    async fn get_driver_update_options(&self) -> Result<DriverFlags> {
        Ok(settings::update_flags())
    }

    async fn create(&self, opts: &DriverOptions, _info: &ClusterInfo) -> Result<ClusterInfo> {
        let settings = Settings::from_options(opts)?;
        let client = settings
            .acs
            .config
            .connect()
            .map_err(|e| DriverError::Connection(e.to_string()))?;

        let params = DeployVirtualMachineParams::from_settings(&settings);
        tracing::info!(
            "Deploying instance {} in zone {} via {}",
            settings.cluster_name,
            settings.acs.zone_id,
            client.endpoint()
        );

        match client.deploy_virtual_machine(&params).await {
            Ok(vm) => {
                tracing::info!(
                    "Created instance {} ({}) address={}",
                    vm.name,
                    vm.id,
                    vm.address(settings.acs.use_private_ip).unwrap_or("-")
                );
            }
            Err(e) => {
                tracing::error!("Error creating the new instance: {}", e);
                return Err(e.into());
            }
        }

        Ok(ClusterInfo::default())
    }

    async fn update(&self, info: ClusterInfo, _opts: &DriverOptions) -> Result<ClusterInfo> {
        Ok(info)
    }

    async fn post_check(&self, info: ClusterInfo) -> Result<ClusterInfo> {
        Ok(info)
    }

    async fn remove(&self, _info: &ClusterInfo) -> Result<()> {
        Err(DriverError::NotImplemented)
    }

    async fn get_version(&self, _info: &ClusterInfo) -> Result<KubernetesVersion> {
        Ok(KubernetesVersion::default())
    }

    async fn set_version(&self, _info: &ClusterInfo, _version: &KubernetesVersion) -> Result<()> {
        Ok(())
    }

    async fn get_cluster_size(&self, _info: &ClusterInfo) -> Result<NodeCount> {
        Ok(NodeCount::default())
    }

    async fn set_cluster_size(&self, _info: &ClusterInfo, _count: &NodeCount) -> Result<()> {
        Err(DriverError::NotImplemented)
    }

    async fn get_capabilities(&self) -> Result<Capabilities> {
        Ok(self.capabilities.clone())
    }

    async fn get_k8s_capabilities(&self, _opts: &DriverOptions) -> Result<K8sCapabilities> {
        Ok(K8sCapabilities::default())
    }

    async fn remove_legacy_service_account(&self, _info: &ClusterInfo) -> Result<()> {
        Ok(())
    }

    async fn etcd_save(
        &self,
        _info: &ClusterInfo,
        _opts: &DriverOptions,
        _snapshot_name: &str,
    ) -> Result<()> {
        Err(DriverError::NotImplemented)
    }

    async fn etcd_restore(
        &self,
        _info: &ClusterInfo,
        _opts: &DriverOptions,
        _snapshot_name: &str,
    ) -> Result<()> {
        Ok(())
    }

    async fn etcd_remove_snapshot(
        &self,
        _info: &ClusterInfo,
        _opts: &DriverOptions,
        _snapshot_name: &str,
    ) -> Result<()> {
        Err(DriverError::NotImplemented)
    }
}
