//! NetBox API models
//!
//! These models match the NetBox REST API serializers for the IPAM and
//! virtualization endpoints the tools read.
//! See: netbox/netbox/ipam/api/serializers_/ip.py

use serde::{Deserialize, Serialize};

/// Choice field as NetBox renders it, e.g. `{"value": "active", "label": "Active"}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChoiceField {
    pub value: String,
    pub label: String,
}

impl ChoiceField {
    /// Build a choice from its value, deriving a capitalized label
    pub fn from_value(value: &str) -> Self {
        let mut chars = value.chars();
        let label = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
        Self {
            value: value.to_string(),
            label,
        }
    }
}

/// VRF model matching NetBox VRFSerializer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Vrf {
    pub id: u64,
    pub url: String,
    pub display: String,
    pub name: String,
    #[serde(default)]
    pub rd: Option<String>,
    #[serde(default)]
    pub tenant: Option<NestedTenant>,
    #[serde(default)]
    pub enforce_unique: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<NestedTag>,
    #[serde(default)]
    pub prefix_count: Option<u64>,
    #[serde(default)]
    pub ipaddress_count: Option<u64>,
}

/// Prefix model matching NetBox PrefixSerializer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Prefix {
    pub id: u64,
    pub url: String,
    pub display: String,
    pub prefix: String, // e.g., "192.168.1.0/24"
    pub vrf: Option<NestedVrf>,
    #[serde(default)]
    pub tenant: Option<NestedTenant>,
    pub status: ChoiceField,
    #[serde(default)]
    pub is_pool: bool,
    #[serde(default)]
    pub mark_utilized: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<NestedTag>,
    #[serde(default)]
    pub created: Option<String>, // ISO 8601 datetime
    #[serde(default)]
    pub last_updated: Option<String>, // ISO 8601 datetime
}

/// IP Address model matching NetBox IPAddressSerializer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IPAddress {
    pub id: u64,
    pub url: String,
    pub display: String,
    pub address: String, // e.g., "192.168.1.1/24"
    pub vrf: Option<NestedVrf>,
    #[serde(default)]
    pub tenant: Option<NestedTenant>,
    pub status: ChoiceField,
    #[serde(default)]
    pub assigned_object_type: Option<String>,
    #[serde(default)]
    pub assigned_object_id: Option<u64>,
    #[serde(default)]
    pub dns_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<NestedTag>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

/// Virtual machine model (from virtualization API)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VirtualMachine {
    pub id: u64,
    pub url: String,
    pub display: String,
    pub name: String,
    #[serde(default)]
    pub status: Option<ChoiceField>,
    #[serde(default)]
    pub primary_ip4: Option<NestedIPAddress>,
    #[serde(default)]
    pub primary_ip6: Option<NestedIPAddress>,
    #[serde(default)]
    pub description: String,
}

/// VM interface model (from virtualization API)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct VMInterface {
    pub id: u64,
    pub url: String,
    pub display: String,
    pub virtual_machine: NestedVirtualMachine,
    pub name: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub description: String,
}

fn default_true() -> bool {
    true
}

/// Request body for creating a VM interface
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateVMInterfaceRequest {
    pub virtual_machine: u64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Request body for creating an IP address
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CreateIPAddressRequest {
    pub address: String, // CIDR notation, e.g. "10.0.0.7/32"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vrf: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<IPAddressStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dns_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>, // Tag slugs
    /// e.g. [`VM_INTERFACE_OBJECT_TYPE`]; set together with `assigned_object_id`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_object_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_object_id: Option<u64>,
}

/// Content type of a VM interface, for `assigned_object_type`
pub const VM_INTERFACE_OBJECT_TYPE: &str = "virtualization.vminterface";

// Nested serializers (simplified versions for references)

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NestedVrf {
    pub id: u64,
    pub url: String,
    pub display: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NestedTenant {
    pub id: u64,
    pub url: String,
    pub display: String,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NestedTag {
    pub id: u64,
    pub url: String,
    pub display: String,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NestedVirtualMachine {
    pub id: u64,
    pub url: String,
    pub display: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NestedIPAddress {
    pub id: u64,
    pub url: String,
    pub display: String,
    pub address: String,
}

/// IP Address status choices
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum IPAddressStatus {
    Active,
    Reserved,
    Deprecated,
    Dhcp,
    #[serde(rename = "slaac")]
    Slaac,
}

impl IPAddressStatus {
    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            IPAddressStatus::Active => "active",
            IPAddressStatus::Reserved => "reserved",
            IPAddressStatus::Deprecated => "deprecated",
            IPAddressStatus::Dhcp => "dhcp",
            IPAddressStatus::Slaac => "slaac",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_deserializes_netbox_payload() {
        let payload = serde_json::json!({
            "id": 12,
            "url": "http://netbox/api/ipam/prefixes/12/",
            "display": "10.0.0.0/24",
            "family": {"value": 4, "label": "IPv4"},
            "prefix": "10.0.0.0/24",
            "vrf": {"id": 3, "url": "http://netbox/api/ipam/vrfs/3/", "display": "main", "name": "main"},
            "status": {"value": "reserved", "label": "Reserved"},
            "is_pool": false,
            "description": "",
            "children": 0,
            "_depth": 0
        });

        let prefix: Prefix = serde_json::from_value(payload).unwrap();
        assert_eq!(prefix.prefix, "10.0.0.0/24");
        assert_eq!(prefix.status.value, "reserved");
        assert_eq!(prefix.vrf.map(|v| v.id), Some(3));
        assert!(prefix.tags.is_empty());
    }

    #[test]
    fn test_create_request_skips_unset_fields() {
        let request = CreateIPAddressRequest {
            address: "10.0.0.7/32".to_string(),
            vrf: Some(3),
            status: Some(IPAddressStatus::Active),
            description: None,
            dns_name: None,
            tags: None,
            assigned_object_type: None,
            assigned_object_id: None,
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body, serde_json::json!({"address": "10.0.0.7/32", "vrf": 3, "status": "active"}));
    }

    #[test]
    fn test_create_request_with_interface_assignment() {
        let request = CreateIPAddressRequest {
            address: "10.0.0.7/32".to_string(),
            assigned_object_type: Some(VM_INTERFACE_OBJECT_TYPE.to_string()),
            assigned_object_id: Some(41),
            ..Default::default()
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "address": "10.0.0.7/32",
                "assigned_object_type": "virtualization.vminterface",
                "assigned_object_id": 41
            })
        );
    }

    #[test]
    fn test_vm_interface_deserializes_netbox_payload() {
        let payload = serde_json::json!({
            "id": 41,
            "url": "http://netbox/api/virtualization/interfaces/41/",
            "display": "NIC-web-01",
            "virtual_machine": {"id": 7, "url": "http://netbox/api/virtualization/virtual-machines/7/", "display": "web-01", "name": "web-01"},
            "name": "NIC-web-01",
            "mtu": null,
            "mode": null
        });

        let interface: VMInterface = serde_json::from_value(payload).unwrap();
        assert_eq!(interface.virtual_machine.id, 7);
        assert!(interface.enabled);
    }

    #[test]
    fn test_choice_field_label() {
        assert_eq!(ChoiceField::from_value("active").label, "Active");
        assert_eq!(ChoiceField::from_value("").label, "");
    }
}
