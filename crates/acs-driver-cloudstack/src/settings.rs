//! Settings extraction from the host's option bag

use crate::client::CloudStackClient;
use crate::error::Result;
use acs_driver_core::{DriverFlags, DriverOptions, Flag, OptionValue};

pub const CLUSTER_NAME: &str = "cluster-name";
pub const DESCRIPTION: &str = "description";
pub const ENDPOINT: &str = "cloudstack-endpoint";
pub const ACCESS_KEY: &str = "cloudstack-access";
pub const SECRET_KEY: &str = "cloudstack-secret";
pub const INSECURE: &str = "cloudstack-insecure";
pub const NODE_COUNT: &str = "node-count";
pub const SSH_KEY_PAIR: &str = "ssh-key-pair";
pub const PROJECT_ID: &str = "project-id";
pub const SERVICE_OFFERING_ID: &str = "service-offering-id";
pub const TEMPLATE_ID: &str = "template-id";
pub const ZONE_ID: &str = "zone-id";
pub const NETWORK_ID: &str = "network-id";
pub const USER_DATA: &str = "user-data";
pub const USE_PRIVATE_IP: &str = "use-private-ip";

/// Connection parameters for one CloudStack endpoint
#[derive(Clone, PartialEq, Eq)]
pub struct CloudConfig {
    pub endpoint: String,
    pub access: String,
    pub secret: String,
    /// TLS certificate validation, on unless explicitly disabled
    pub verify_ssl: bool,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            access: String::new(),
            secret: String::new(),
            verify_ssl: true,
        }
    }
}

impl std::fmt::Debug for CloudConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudConfig")
            .field("endpoint", &self.endpoint)
            .field("access", &self.access)
            .field("secret", &"<redacted>")
            .field("verify_ssl", &self.verify_ssl)
            .finish()
    }
}

impl CloudConfig {
    /// Build a client for this endpoint; performs no network I/O
    pub fn connect(&self) -> Result<CloudStackClient> {
        CloudStackClient::new(&self.endpoint, &self.access, &self.secret, self.verify_ssl)
    }
}

/// CloudStack-specific placement and access settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcsSettings {
    pub ssh_key_pair: String,
    pub project_id: String,
    pub use_private_ip: bool,
    pub service_offering: String,
    pub template_id: String,
    pub zone_id: String,
    pub network_id: String,
    pub user_data: String,
    pub config: CloudConfig,
}

/// Fully resolved configuration for one create call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub cluster_name: String,
    pub description: String,
    pub initial_node_count: i64,
    pub acs: AcsSettings,
}

impl Settings {
    /// Read every declared field from the option bag
    ///
    /// Absent options take the zero value of their type.
    pub fn from_options(opts: &DriverOptions) -> acs_driver_core::Result<Self> {
        let config = CloudConfig {
            endpoint: opts.get_string(&[ENDPOINT, "CloudstackEndPoint"]),
            access: opts.get_string(&[ACCESS_KEY]),
            secret: opts.get_string(&[SECRET_KEY]),
            verify_ssl: !opts.get_bool(&[INSECURE]),
        };

        let acs = AcsSettings {
            ssh_key_pair: opts.get_string(&[SSH_KEY_PAIR, "SSHKeyPair"]),
            project_id: opts.get_string(&[PROJECT_ID, "ProjectID"]),
            use_private_ip: opts.get_bool(&[USE_PRIVATE_IP, "UsePrivateIP"]),
            service_offering: opts.get_string(&[SERVICE_OFFERING_ID, "ServiceOffering"]),
            template_id: opts.get_string(&[TEMPLATE_ID, "TemplateID"]),
            zone_id: opts.get_string(&[ZONE_ID, "ZoneID"]),
            network_id: opts.get_string(&[NETWORK_ID, "NetworkID"]),
            user_data: opts.get_string(&[USER_DATA, "UserData"]),
            config,
        };

        Ok(Self {
            cluster_name: opts.get_string(&[CLUSTER_NAME, "ClusterName"]),
            description: opts.get_string(&[DESCRIPTION, "Description"]),
            initial_node_count: opts.get_int(&[NODE_COUNT, "InitialNodeCount"]),
            acs,
        })
    }
}

/// Flags shown to the user when creating a cluster
pub fn create_flags() -> DriverFlags {
    let mut flags = DriverFlags::new();
    flags.add(
        CLUSTER_NAME,
        Flag::string("Cluster name to be displayed in the orchestration UI"),
    );
    flags.add(ENDPOINT, Flag::string("Define CloudStack API endpoint"));
    flags.add(ACCESS_KEY, Flag::string("Access key to authenticate in CloudStack"));
    flags.add(SECRET_KEY, Flag::string("Secret key to authenticate in CloudStack"));
    flags.add(DESCRIPTION, Flag::string("Description to project"));
    flags.add(
        INSECURE,
        Flag::bool("Skip TLS certificate validation of the CloudStack endpoint")
            .with_default(OptionValue::Bool(false)),
    );
    flags.add(
        SERVICE_OFFERING_ID,
        Flag::string("Service offering used for the instance"),
    );
    flags.add(TEMPLATE_ID, Flag::string("Template the instance is deployed from"));
    flags.add(ZONE_ID, Flag::string("Zone the instance is deployed in"));
    flags.add(NETWORK_ID, Flag::string("Network the instance is attached to"));
    flags.add(PROJECT_ID, Flag::string("Project owning the instance"));
    flags.add(SSH_KEY_PAIR, Flag::string("SSH key pair registered in CloudStack"));
    flags.add(USER_DATA, Flag::string("User data passed to the instance"));
    flags.add(
        USE_PRIVATE_IP,
        Flag::bool("Address the instance by its private IP")
            .with_default(OptionValue::Bool(false)),
    );
    flags
}

/// Flags accepted when updating a cluster
pub fn update_flags() -> DriverFlags {
    let mut flags = DriverFlags::new();
    flags.add(NODE_COUNT, Flag::int("Number of nodes"));
    flags
}

#[cfg(test)]
mod tests {
    use super::*;
    use acs_driver_core::FlagType;

    /// A bag without node-count reads as zero nodes
    #[test]
    fn test_scenario_without_node_count() {
        let opts = DriverOptions::new()
            .with_string(CLUSTER_NAME, "demo")
            .with_string(ENDPOINT, "http://cs.local")
            .with_string(ACCESS_KEY, "AK")
            .with_string(SECRET_KEY, "SK");

        let settings = Settings::from_options(&opts).unwrap();

        assert_eq!(settings.cluster_name, "demo");
        assert_eq!(settings.initial_node_count, 0);
        assert_eq!(settings.acs.config.endpoint, "http://cs.local");
        assert_eq!(settings.acs.config.access, "AK");
        assert_eq!(settings.acs.config.secret, "SK");
        assert!(settings.acs.config.verify_ssl);
    }

    #[test]
    fn test_empty_bag_yields_zero_settings() {
        let settings = Settings::from_options(&DriverOptions::new()).unwrap();

        assert_eq!(settings, Settings::default());
    }

    /// Legacy option names are honoured
    #[test]
    fn test_legacy_names_are_read() {
        let opts = DriverOptions::new()
            .with_string("ClusterName", "old")
            .with_string("CloudstackEndPoint", "https://legacy")
            .with_int("InitialNodeCount", 4)
            .with_bool("UsePrivateIP", true);

        let settings = Settings::from_options(&opts).unwrap();

        assert_eq!(settings.cluster_name, "old");
        assert_eq!(settings.acs.config.endpoint, "https://legacy");
        assert_eq!(settings.initial_node_count, 4);
        assert!(settings.acs.use_private_ip);
    }

    #[test]
    fn test_insecure_disables_verification() {
        let opts = DriverOptions::new().with_bool(INSECURE, true);
        let settings = Settings::from_options(&opts).unwrap();

        assert!(!settings.acs.config.verify_ssl);
    }

    #[test]
    fn test_placement_fields() {
        let opts = DriverOptions::new()
            .with_string(SERVICE_OFFERING_ID, "S")
            .with_string(TEMPLATE_ID, "T")
            .with_string(ZONE_ID, "Z")
            .with_string(NETWORK_ID, "net")
            .with_string(PROJECT_ID, "proj")
            .with_string(SSH_KEY_PAIR, "ops")
            .with_string(USER_DATA, "#cloud-config");

        let acs = Settings::from_options(&opts).unwrap().acs;

        assert_eq!(acs.service_offering, "S");
        assert_eq!(acs.template_id, "T");
        assert_eq!(acs.zone_id, "Z");
        assert_eq!(acs.network_id, "net");
        assert_eq!(acs.project_id, "proj");
        assert_eq!(acs.ssh_key_pair, "ops");
        assert_eq!(acs.user_data, "#cloud-config");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = CloudConfig {
            secret: "top-secret".to_string(),
            ..Default::default()
        };

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("top-secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_declared_flags() {
        let create = create_flags();
        for name in [CLUSTER_NAME, ENDPOINT, ACCESS_KEY, SECRET_KEY, DESCRIPTION] {
            assert_eq!(create.get(name).unwrap().flag_type, FlagType::String);
        }
        assert_eq!(create.get(INSECURE).unwrap().flag_type, FlagType::Bool);

        let update = update_flags();
        assert_eq!(update.len(), 1);
        assert_eq!(update.get(NODE_COUNT).unwrap().flag_type, FlagType::Int);
    }
}
