//! VM address tool
//!
//! Suggests the next free address of a prefix for a virtual machine and,
//! when asked, assigns it: the address is created in the prefix's VRF on the
//! VM's `NIC-<name>` interface (created if missing) and becomes the VM's
//! primary address.

use crate::error::ToolsError;
use crate::inventory::{network_prefix, ui_url, Inventory};
use ipam_engine::{allocate, AllocationResult, NextAddress};
use serde::Serialize;
use tracing::info;

/// Address written to NetBox
#[derive(Debug, Clone, Serialize)]
pub struct CreatedAddress {
    pub id: u64,
    pub address: String,
    pub url: String,
    pub vm_id: u64,
    pub vm: String,
    pub interface: String,
}

/// Name of the interface an assigned address goes on
pub fn interface_name(vm_name: &str) -> String {
    format!("NIC-{}", vm_name)
}

/// Suggestion for one prefix
#[derive(Debug, Clone, Serialize)]
pub struct VmAddressReport {
    pub prefix_id: u64,
    pub vrf: Option<String>,
    pub skip_count: usize,
    pub allocation: AllocationResult,
    /// Set when the address was created
    pub created: Option<CreatedAddress>,
}

/// Find the next address; assign it to the VM `vm_name` when given
pub async fn suggest_vm_address(
    inventory: &Inventory,
    prefix_id: u64,
    skip_count: usize,
    vm_name: Option<&str>,
) -> Result<VmAddressReport, ToolsError> {
    let prefix = inventory.prefix(prefix_id).await?;
    let network = network_prefix(&prefix)?;
    let assigned = inventory.assigned_addresses(&network).await?;
    let allocation = allocate(&network, &assigned, skip_count);

    let created = match (vm_name, allocation.next) {
        (None, _) => None,
        (Some(_), NextAddress::NoneAvailable) => {
            return Err(ToolsError::NoAvailableIPs(network.to_string()));
        }
        (Some(vm_name), NextAddress::Available(address)) => {
            let vm = inventory.virtual_machine(vm_name).await?;
            let interface = inventory.vm_interface(&vm, &interface_name(&vm.name)).await?;

            let vrf_id = prefix.vrf.as_ref().map(|v| v.id);
            let ip = inventory
                .create_host_address(address, vrf_id, &vm.name, Some(interface.id))
                .await?;
            info!("Created {} on {} (NetBox ID {})", ip.address, interface.name, ip.id);

            inventory.set_primary_address(&vm, &ip, address).await?;
            info!("{} is now the primary address of {}", ip.address, vm.name);

            Some(CreatedAddress {
                id: ip.id,
                address: ip.address,
                url: ui_url(&ip.url),
                vm_id: vm.id,
                vm: vm.name,
                interface: interface.name,
            })
        }
    };

    Ok(VmAddressReport {
        prefix_id,
        vrf: prefix.vrf.map(|v| v.name),
        skip_count,
        allocation,
        created,
    })
}
