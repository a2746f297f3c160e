//! Instance provisioning

use crate::api::VirtualMachine;
use crate::client::{CloudStackClient, Params};
use crate::error::{CloudStackError, Result};
use crate::settings::Settings;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Parameters of one `deployVirtualMachine` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployVirtualMachineParams {
    pub service_offering_id: String,
    pub template_id: String,
    pub zone_id: String,
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub network_ids: Vec<String>,
    pub project_id: Option<String>,
    pub keypair: Option<String>,
    pub user_data: Option<String>,
}

impl DeployVirtualMachineParams {
    pub fn new(
        service_offering_id: impl Into<String>,
        template_id: impl Into<String>,
        zone_id: impl Into<String>,
    ) -> Self {
        Self {
            service_offering_id: service_offering_id.into(),
            template_id: template_id.into(),
            zone_id: zone_id.into(),
            ..Default::default()
        }
    }

    /// Map create settings onto a deploy request
    ///
    /// Name and display name both carry the cluster name.
    pub fn from_settings(settings: &Settings) -> Self {
        let acs = &settings.acs;
        let mut params = Self::new(&acs.service_offering, &acs.template_id, &acs.zone_id);
        params.name = Some(settings.cluster_name.clone());
        params.display_name = Some(settings.cluster_name.clone());
        if !acs.network_id.is_empty() {
            params.network_ids = vec![acs.network_id.clone()];
        }
        params.project_id = non_empty(&acs.project_id);
        params.keypair = non_empty(&acs.ssh_key_pair);
        params.user_data = non_empty(&acs.user_data);
        params
    }

    /// Query parameters; user data is sent base64 encoded
    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        params.insert("serviceofferingid".into(), self.service_offering_id.clone());
        params.insert("templateid".into(), self.template_id.clone());
        params.insert("zoneid".into(), self.zone_id.clone());

        if let Some(name) = &self.name {
            params.insert("name".into(), name.clone());
        }
        if let Some(display_name) = &self.display_name {
            params.insert("displayname".into(), display_name.clone());
        }
        if !self.network_ids.is_empty() {
            params.insert("networkids".into(), self.network_ids.join(","));
        }
        if let Some(project_id) = &self.project_id {
            params.insert("projectid".into(), project_id.clone());
        }
        if let Some(keypair) = &self.keypair {
            params.insert("keypair".into(), keypair.clone());
        }
        if let Some(user_data) = &self.user_data {
            params.insert("userdata".into(), STANDARD.encode(user_data));
        }
        params
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

impl CloudStackClient {
    /// Deploy one virtual machine and wait for the job to finish
    pub async fn deploy_virtual_machine(
        &self,
        params: &DeployVirtualMachineParams,
    ) -> Result<VirtualMachine> {
        let result = self
            .request_async("deployVirtualMachine", params.to_params())
            .await?;
        let vm = result.get("virtualmachine").cloned().ok_or_else(|| {
            CloudStackError::UnexpectedResponse(
                "deployVirtualMachine job result has no virtualmachine".to_string(),
            )
        })?;
        Ok(serde_json::from_value(vm)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{AcsSettings, Settings};
    use crate::test_support::FakeCloudStack;

    fn settings() -> Settings {
        Settings {
            cluster_name: "N".to_string(),
            acs: AcsSettings {
                service_offering: "S".to_string(),
                template_id: "T".to_string(),
                zone_id: "Z".to_string(),
                network_id: "net-1".to_string(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Deploy parameters carry exactly the placement fields
    #[test]
    fn test_params_from_settings() {
        let params = DeployVirtualMachineParams::from_settings(&settings()).to_params();

        let keys: Vec<&str> = params.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "displayname",
                "name",
                "networkids",
                "serviceofferingid",
                "templateid",
                "zoneid"
            ]
        );
        assert_eq!(params["name"], "N");
        assert_eq!(params["displayname"], "N");
        assert_eq!(params["serviceofferingid"], "S");
        assert_eq!(params["templateid"], "T");
        assert_eq!(params["zoneid"], "Z");
        assert_eq!(params["networkids"], "net-1");
    }

    #[test]
    fn test_optional_params() {
        let mut settings = settings();
        settings.acs.project_id = "proj".to_string();
        settings.acs.ssh_key_pair = "ops".to_string();
        settings.acs.user_data = "#cloud-config".to_string();

        let params = DeployVirtualMachineParams::from_settings(&settings).to_params();

        assert_eq!(params["projectid"], "proj");
        assert_eq!(params["keypair"], "ops");
        assert_eq!(params["userdata"], "I2Nsb3VkLWNvbmZpZw==");
    }

    #[tokio::test]
    async fn test_deploy_virtual_machine() {
        let server = FakeCloudStack::serve(vec![
            (
                200,
                r#"{"deployvirtualmachineresponse":{"id":"vm-1","jobid":"job-1"}}"#,
            ),
            (
                200,
                r#"{"queryasyncjobresultresponse":{"jobid":"job-1","jobstatus":1,"jobresultcode":0,"jobresult":{"virtualmachine":{"id":"vm-1","name":"N","displayname":"N","state":"Running","zoneid":"Z","templateid":"T","serviceofferingid":"S","nic":[{"id":"nic-1","networkid":"net-1","ipaddress":"10.1.1.20","isdefault":true}]}}}}"#,
            ),
        ])
        .await;
        let client = CloudStackClient::new(server.endpoint(), "AK", "SK", true).unwrap();

        let vm = client
            .deploy_virtual_machine(&DeployVirtualMachineParams::from_settings(&settings()))
            .await
            .unwrap();

        assert_eq!(vm.id, "vm-1");
        assert_eq!(vm.state, "Running");
        assert_eq!(vm.private_ip(), Some("10.1.1.20"));

        let requests = server.requests();
        assert!(requests[0].contains("command=deployVirtualMachine"));
        assert!(requests[0].contains("networkids=net-1"));
        assert!(requests[1].contains("jobid=job-1"));
    }

    #[tokio::test]
    async fn test_deploy_without_job_id() {
        let server = FakeCloudStack::serve(vec![(
            200,
            r#"{"deployvirtualmachineresponse":{"id":"vm-1"}}"#,
        )])
        .await;
        let client = CloudStackClient::new(server.endpoint(), "AK", "SK", true).unwrap();

        let err = client
            .deploy_virtual_machine(&DeployVirtualMachineParams::new("S", "T", "Z"))
            .await
            .unwrap_err();
        assert!(matches!(err, CloudStackError::UnexpectedResponse(_)));
    }
}
