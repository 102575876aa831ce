//! Virtualization operations for MockNetBoxClient
//!
//! Virtual machines and their interfaces. Supported filters: `name` on both,
//! `virtual_machine_id` on interfaces.

use super::{filter_value, lock, MockNetBoxClient};
use crate::error::NetBoxError;
use crate::models::*;

pub fn query_virtual_machines(client: &MockNetBoxClient, filters: &[(&str, &str)], _fetch_all: bool) -> Result<Vec<VirtualMachine>, NetBoxError> {
    let name = filter_value(filters, "name");
    Ok(lock(&client.virtual_machines)
        .values()
        .filter(|vm| name.is_none_or(|n| vm.name == n))
        .cloned()
        .collect())
}

pub fn query_vm_interfaces(client: &MockNetBoxClient, filters: &[(&str, &str)], _fetch_all: bool) -> Result<Vec<VMInterface>, NetBoxError> {
    let vm_id = filter_value(filters, "virtual_machine_id")
        .map(|v| {
            v.parse::<u64>()
                .map_err(|_| NetBoxError::Api(format!("virtual_machine_id: invalid value {}", v)))
        })
        .transpose()?;
    let name = filter_value(filters, "name");

    Ok(lock(&client.vm_interfaces)
        .values()
        .filter(|iface| vm_id.is_none_or(|id| iface.virtual_machine.id == id))
        .filter(|iface| name.is_none_or(|n| iface.name == n))
        .cloned()
        .collect())
}

pub fn get_vm_interface(client: &MockNetBoxClient, id: u64) -> Result<VMInterface, NetBoxError> {
    lock(&client.vm_interfaces)
        .get(&id)
        .cloned()
        .ok_or_else(|| NetBoxError::NotFound(format!("VM interface {} not found", id)))
}

pub fn create_vm_interface(client: &MockNetBoxClient, request: CreateVMInterfaceRequest) -> Result<VMInterface, NetBoxError> {
    let vm = get_virtual_machine(client, request.virtual_machine)?;

    let mut interfaces = lock(&client.vm_interfaces);
    if interfaces
        .values()
        .any(|iface| iface.virtual_machine.id == vm.id && iface.name == request.name)
    {
        return Err(NetBoxError::Api(format!(
            "Interface {} already exists on virtual machine {}",
            request.name, vm.name
        )));
    }

    let mut interface = client.helpers().vm_interface(client.next_id(), &request.name, (vm.id, &vm.name));
    interface.description = request.description.unwrap_or_default();
    interfaces.insert(interface.id, interface.clone());
    Ok(interface)
}

/// NetBox only accepts a primary address that sits on one of the VM's interfaces
pub fn update_virtual_machine_primary_ip(
    client: &MockNetBoxClient,
    vm_id: u64,
    primary_ip4_id: Option<u64>,
    primary_ip6_id: Option<u64>,
) -> Result<VirtualMachine, NetBoxError> {
    let mut primaries = Vec::new();
    for ip_id in [primary_ip4_id, primary_ip6_id].into_iter().flatten() {
        let ip = lock(&client.ip_addresses)
            .get(&ip_id)
            .cloned()
            .ok_or_else(|| NetBoxError::NotFound(format!("IP address {} not found", ip_id)))?;
        let on_vm = ip
            .assigned_object_id
            .and_then(|iface_id| get_vm_interface(client, iface_id).ok())
            .is_some_and(|iface| iface.virtual_machine.id == vm_id);
        if !on_vm {
            return Err(NetBoxError::Api(format!(
                "IP address {} is not assigned to virtual machine {}",
                ip.address, vm_id
            )));
        }
        primaries.push(NestedIPAddress {
            id: ip.id,
            url: ip.url,
            display: ip.display,
            address: ip.address,
        });
    }

    let mut vms = lock(&client.virtual_machines);
    let vm = vms
        .get_mut(&vm_id)
        .ok_or_else(|| NetBoxError::NotFound(format!("Virtual machine {} not found", vm_id)))?;
    let mut primaries = primaries.into_iter();
    if primary_ip4_id.is_some() {
        vm.primary_ip4 = primaries.next();
    }
    if primary_ip6_id.is_some() {
        vm.primary_ip6 = primaries.next();
    }
    Ok(vm.clone())
}

fn get_virtual_machine(client: &MockNetBoxClient, id: u64) -> Result<VirtualMachine, NetBoxError> {
    lock(&client.virtual_machines)
        .get(&id)
        .cloned()
        .ok_or_else(|| NetBoxError::NotFound(format!("Virtual machine {} not found", id)))
}
