//! CloudStack API response types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `queryAsyncJobResult`
#[derive(Debug, Clone, Deserialize)]
pub struct AsyncJobResult {
    #[serde(default)]
    pub jobid: String,

    #[serde(default)]
    pub jobstatus: i64,

    #[serde(default)]
    pub jobresultcode: i64,

    #[serde(default)]
    pub jobresult: Option<Value>,
}

/// Network interface of a virtual machine
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nic {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub networkid: String,

    #[serde(default)]
    pub ipaddress: Option<String>,

    #[serde(default)]
    pub isdefault: bool,
}

/// Instance descriptor returned by `deployVirtualMachine`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualMachine {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub displayname: String,

    #[serde(default)]
    pub state: String,

    #[serde(default)]
    pub zoneid: String,

    #[serde(default)]
    pub templateid: String,

    #[serde(default)]
    pub serviceofferingid: String,

    #[serde(default)]
    pub projectid: Option<String>,

    #[serde(default)]
    pub keypair: Option<String>,

    #[serde(default)]
    pub publicip: Option<String>,

    #[serde(default)]
    pub nic: Vec<Nic>,
}

impl VirtualMachine {
    /// Address of the default NIC
    pub fn private_ip(&self) -> Option<&str> {
        self.nic
            .iter()
            .find(|n| n.isdefault)
            .or_else(|| self.nic.first())
            .and_then(|n| n.ipaddress.as_deref())
    }

    /// Address the host should reach the instance on
    ///
    /// Falls back to the private address when no public IP is assigned.
    pub fn address(&self, use_private_ip: bool) -> Option<&str> {
        if use_private_ip {
            return self.private_ip();
        }
        self.publicip.as_deref().or_else(|| self.private_ip())
    }
}

/// Project descriptor returned by `createProject`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub displaytext: String,

    #[serde(default)]
    pub state: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vm_with_nics() -> VirtualMachine {
        serde_json::from_value(serde_json::json!({
            "id": "vm-1",
            "name": "demo",
            "publicip": "203.0.113.10",
            "nic": [
                {"id": "n2", "networkid": "net-b", "ipaddress": "10.0.1.5", "isdefault": false},
                {"id": "n1", "networkid": "net-a", "ipaddress": "10.0.0.5", "isdefault": true}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_private_ip_prefers_default_nic() {
        assert_eq!(vm_with_nics().private_ip(), Some("10.0.0.5"));
    }

    #[test]
    fn test_address_selection() {
        let vm = vm_with_nics();
        assert_eq!(vm.address(false), Some("203.0.113.10"));
        assert_eq!(vm.address(true), Some("10.0.0.5"));

        let no_public = VirtualMachine {
            publicip: None,
            ..vm
        };
        assert_eq!(no_public.address(false), Some("10.0.0.5"));
        assert_eq!(VirtualMachine::default().address(false), None);
    }
}
