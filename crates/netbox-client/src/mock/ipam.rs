//! IPAM operations for MockNetBoxClient
//!
//! Handles VRFs, prefixes and IP addresses. Supported filters mirror the
//! NetBox ones the tools send: `vrf_id`, `parent`, `status`, `name`.

use super::{filter_value, lock, virtualization, MockNetBoxClient};
use crate::error::NetBoxError;
use crate::models::*;
use ipnet::IpNet;
use std::net::IpAddr;

pub fn query_vrfs(client: &MockNetBoxClient, filters: &[(&str, &str)], _fetch_all: bool) -> Result<Vec<Vrf>, NetBoxError> {
    let name = filter_value(filters, "name");
    Ok(lock(&client.vrfs)
        .values()
        .filter(|v| name.is_none_or(|n| v.name == n))
        .cloned()
        .collect())
}

pub fn get_vrf(client: &MockNetBoxClient, id: u64) -> Result<Vrf, NetBoxError> {
    lock(&client.vrfs)
        .get(&id)
        .cloned()
        .ok_or_else(|| NetBoxError::NotFound(format!("VRF {} not found", id)))
}

pub fn query_prefixes(client: &MockNetBoxClient, filters: &[(&str, &str)], _fetch_all: bool) -> Result<Vec<Prefix>, NetBoxError> {
    let vrf_id = parse_vrf_filter(filters)?;
    let status = filter_value(filters, "status");
    Ok(lock(&client.prefixes)
        .values()
        .filter(|p| vrf_id.is_none_or(|id| p.vrf.as_ref().map(|v| v.id) == Some(id)))
        .filter(|p| status.is_none_or(|s| p.status.value == s))
        .cloned()
        .collect())
}

pub fn get_prefix(client: &MockNetBoxClient, id: u64) -> Result<Prefix, NetBoxError> {
    lock(&client.prefixes)
        .get(&id)
        .cloned()
        .ok_or_else(|| NetBoxError::NotFound(format!("Prefix {} not found", id)))
}

pub fn query_ip_addresses(client: &MockNetBoxClient, filters: &[(&str, &str)], _fetch_all: bool) -> Result<Vec<IPAddress>, NetBoxError> {
    let vrf_id = parse_vrf_filter(filters)?;
    let parent = filter_value(filters, "parent")
        .map(|p| {
            p.parse::<IpNet>()
                .map_err(|e| NetBoxError::Api(format!("parent: invalid prefix {}: {}", p, e)))
        })
        .transpose()?;

    Ok(lock(&client.ip_addresses)
        .values()
        .filter(|ip| vrf_id.is_none_or(|id| ip.vrf.as_ref().map(|v| v.id) == Some(id)))
        .filter(|ip| parent.is_none_or(|net| host_of(&ip.address).is_some_and(|addr| net.contains(&addr))))
        .cloned()
        .collect())
}

pub fn create_ip_address(client: &MockNetBoxClient, request: CreateIPAddressRequest) -> Result<IPAddress, NetBoxError> {
    if host_of(&request.address).is_none() {
        return Err(NetBoxError::InvalidRequest(format!("Invalid IP address: {}", request.address)));
    }

    let vrf = match request.vrf {
        Some(vrf_id) => {
            let vrf = get_vrf(client, vrf_id)?;
            Some((vrf.id, vrf.name))
        }
        None => None,
    };

    let assignment = match (request.assigned_object_type.as_deref(), request.assigned_object_id) {
        (None, None) => None,
        (Some(VM_INTERFACE_OBJECT_TYPE), Some(interface_id)) => {
            virtualization::get_vm_interface(client, interface_id)?;
            Some(interface_id)
        }
        (object_type, object_id) => {
            return Err(NetBoxError::Api(format!(
                "Unsupported assignment: {:?} {:?}",
                object_type, object_id
            )));
        }
    };

    let id = client.next_id();
    let helpers = client.helpers();
    let mut ip = helpers.ip_address(id, &request.address, vrf.as_ref().map(|(vid, name)| (*vid, name.as_str())));
    if let Some(status) = &request.status {
        ip.status = ChoiceField::from_value(status.as_str());
    }
    ip.description = request.description.unwrap_or_default();
    ip.dns_name = request.dns_name.unwrap_or_default();
    if let Some(interface_id) = assignment {
        ip.assigned_object_type = Some(VM_INTERFACE_OBJECT_TYPE.to_string());
        ip.assigned_object_id = Some(interface_id);
    }
    ip.tags = request
        .tags
        .unwrap_or_default()
        .iter()
        .enumerate()
        .map(|(i, slug)| helpers.create_nested_tag(i as u64 + 1, slug))
        .collect();

    lock(&client.ip_addresses).insert(id, ip.clone());
    Ok(ip)
}

fn parse_vrf_filter(filters: &[(&str, &str)]) -> Result<Option<u64>, NetBoxError> {
    filter_value(filters, "vrf_id")
        .map(|v| {
            v.parse::<u64>()
                .map_err(|_| NetBoxError::Api(format!("vrf_id: invalid value {}", v)))
        })
        .transpose()
}

/// Host part of an address that may carry a mask
fn host_of(address: &str) -> Option<IpAddr> {
    address.split('/').next().and_then(|host| host.parse().ok())
}
