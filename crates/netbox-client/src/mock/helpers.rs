//! Helper functions for creating NetBox model records in tests

use crate::models::*;

/// Builds model records with URLs that point at the mock's base URL
pub struct Helpers {
    base_url: String,
}

impl Helpers {
    pub fn new(base_url: String) -> Self {
        Self { base_url }
    }

    /// Helper to create NestedVrf
    pub fn create_nested_vrf(&self, id: u64, name: &str) -> NestedVrf {
        NestedVrf {
            id,
            url: format!("{}/api/ipam/vrfs/{}/", self.base_url, id),
            display: name.to_string(),
            name: name.to_string(),
        }
    }

    /// Helper to create NestedTag from a slug
    pub fn create_nested_tag(&self, id: u64, slug: &str) -> NestedTag {
        NestedTag {
            id,
            url: format!("{}/api/extras/tags/{}/", self.base_url, id),
            display: slug.to_string(),
            name: slug.to_string(),
            slug: slug.to_string(),
        }
    }

    /// Helper to create NestedVirtualMachine
    pub fn create_nested_virtual_machine(&self, id: u64, name: &str) -> NestedVirtualMachine {
        NestedVirtualMachine {
            id,
            url: format!("{}/api/virtualization/virtual-machines/{}/", self.base_url, id),
            display: name.to_string(),
            name: name.to_string(),
        }
    }

    /// VRF record
    pub fn vrf(&self, id: u64, name: &str) -> Vrf {
        Vrf {
            id,
            url: format!("{}/api/ipam/vrfs/{}/", self.base_url, id),
            display: name.to_string(),
            name: name.to_string(),
            rd: None,
            tenant: None,
            enforce_unique: true,
            description: String::new(),
            tags: vec![],
            prefix_count: None,
            ipaddress_count: None,
        }
    }

    /// Prefix record; `vrf` is `(id, name)` of the owning VRF
    pub fn prefix(&self, id: u64, cidr: &str, status: &str, vrf: Option<(u64, &str)>) -> Prefix {
        Prefix {
            id,
            url: format!("{}/api/ipam/prefixes/{}/", self.base_url, id),
            display: cidr.to_string(),
            prefix: cidr.to_string(),
            vrf: vrf.map(|(vrf_id, name)| self.create_nested_vrf(vrf_id, name)),
            tenant: None,
            status: ChoiceField::from_value(status),
            is_pool: false,
            mark_utilized: false,
            description: String::new(),
            tags: vec![],
            created: Some(chrono::Utc::now().to_rfc3339()),
            last_updated: Some(chrono::Utc::now().to_rfc3339()),
        }
    }

    /// IP address record; `address` carries its mask, e.g. `10.0.0.5/24`
    pub fn ip_address(&self, id: u64, address: &str, vrf: Option<(u64, &str)>) -> IPAddress {
        IPAddress {
            id,
            url: format!("{}/api/ipam/ip-addresses/{}/", self.base_url, id),
            display: address.to_string(),
            address: address.to_string(),
            vrf: vrf.map(|(vrf_id, name)| self.create_nested_vrf(vrf_id, name)),
            tenant: None,
            status: ChoiceField::from_value("active"),
            assigned_object_type: None,
            assigned_object_id: None,
            dns_name: String::new(),
            description: String::new(),
            tags: vec![],
            created: Some(chrono::Utc::now().to_rfc3339()),
            last_updated: Some(chrono::Utc::now().to_rfc3339()),
        }
    }

    /// Virtual machine record
    pub fn virtual_machine(&self, id: u64, name: &str) -> VirtualMachine {
        VirtualMachine {
            id,
            url: format!("{}/api/virtualization/virtual-machines/{}/", self.base_url, id),
            display: name.to_string(),
            name: name.to_string(),
            status: Some(ChoiceField::from_value("active")),
            primary_ip4: None,
            primary_ip6: None,
            description: String::new(),
        }
    }

    /// VM interface record; `vm` is `(id, name)` of the owning machine
    pub fn vm_interface(&self, id: u64, name: &str, vm: (u64, &str)) -> VMInterface {
        VMInterface {
            id,
            url: format!("{}/api/virtualization/interfaces/{}/", self.base_url, id),
            display: name.to_string(),
            virtual_machine: self.create_nested_virtual_machine(vm.0, vm.1),
            name: name.to_string(),
            enabled: true,
            description: String::new(),
        }
    }
}
