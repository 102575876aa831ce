//! Inventory adapter
//!
//! Reads NetBox records through [`NetBoxClientTrait`] and turns them into the
//! engine's types. Reads are retried on transient failures with a Fibonacci
//! backoff; writes are not, since NetBox may have applied them.

use crate::backoff::FibonacciBackoff;
use crate::config::RetryPolicy;
use crate::error::ToolsError;
use ipam_engine::{parse_host_address, InvalidPrefixError, NetworkPrefix, PoolPrefix, PrefixStatus, VrfPool};
use netbox_client::{
    CreateIPAddressRequest, CreateVMInterfaceRequest, IPAddress, IPAddressStatus, NetBoxClientTrait, NetBoxError,
    Prefix, VMInterface, VirtualMachine, Vrf, VM_INTERFACE_OBJECT_TYPE,
};
use std::collections::HashSet;
use std::future::Future;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// NetBox access used by the tools
#[derive(Clone)]
pub struct Inventory {
    client: Arc<dyn NetBoxClientTrait>,
    retry: RetryPolicy,
}

impl std::fmt::Debug for Inventory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Inventory")
            .field("base_url", &self.client.base_url())
            .field("retry", &self.retry)
            .finish()
    }
}

impl Inventory {
    pub fn new(client: Arc<dyn NetBoxClientTrait>, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// Check the token before doing any work
    pub async fn validate(&self) -> Result<(), ToolsError> {
        let client = &self.client;
        self.with_retry("validate token", || client.validate_token()).await?;
        Ok(())
    }

    /// All VRFs
    pub async fn vrfs(&self) -> Result<Vec<Vrf>, ToolsError> {
        let client = &self.client;
        Ok(self.with_retry("list VRFs", || client.query_vrfs(&[], true)).await?)
    }

    /// One prefix by NetBox ID
    pub async fn prefix(&self, id: u64) -> Result<Prefix, ToolsError> {
        let client = &self.client;
        Ok(self.with_retry("get prefix", || client.get_prefix(id)).await?)
    }

    /// Every prefix of a VRF, in NetBox order
    pub async fn vrf_prefixes(&self, vrf_id: u64) -> Result<Vec<Prefix>, ToolsError> {
        let client = &self.client;
        let vrf_id = vrf_id.to_string();
        let filters = [("vrf_id", vrf_id.as_str())];
        Ok(self.with_retry("list VRF prefixes", || client.query_prefixes(&filters, true)).await?)
    }

    /// A VRF and its prefixes as a collision pool
    pub async fn pool(&self, vrf_id: u64) -> Result<VrfPool, ToolsError> {
        let client = &self.client;
        let vrf = self.with_retry("get VRF", || client.get_vrf(vrf_id)).await?;
        let prefixes = self
            .vrf_prefixes(vrf_id)
            .await?
            .iter()
            .map(pool_prefix)
            .collect::<Result<Vec<_>, _>>()?;

        debug!("VRF {} ({}) has {} prefixes", vrf.name, vrf_id, prefixes.len());
        Ok(VrfPool::new(vrf.name, prefixes))
    }

    /// Addresses in use inside `prefix`, whatever VRF they belong to
    pub async fn assigned_addresses(&self, prefix: &NetworkPrefix) -> Result<HashSet<IpAddr>, ToolsError> {
        let client = &self.client;
        let cidr = prefix.to_string();
        let filters = [("parent", cidr.as_str())];
        let records = self
            .with_retry("list assigned addresses", || client.query_ip_addresses(&filters, true))
            .await?;

        let assigned = records
            .iter()
            .map(|ip| parse_host_address(&ip.address))
            .collect::<Result<HashSet<_>, _>>()?;
        debug!("{} addresses in use in {}", assigned.len(), cidr);
        Ok(assigned)
    }

    /// Names of every virtual machine
    pub async fn vm_names(&self) -> Result<Vec<String>, ToolsError> {
        let client = &self.client;
        let vms = self
            .with_retry("list virtual machines", || client.query_virtual_machines(&[], true))
            .await?;
        Ok(vms.into_iter().map(|vm| vm.name).collect())
    }

    /// The one virtual machine called `name`
    pub async fn virtual_machine(&self, name: &str) -> Result<VirtualMachine, ToolsError> {
        let client = &self.client;
        let filters = [("name", name)];
        let mut vms = self
            .with_retry("find virtual machine", || client.query_virtual_machines(&filters, false))
            .await?;

        match vms.len() {
            0 => Err(ToolsError::VmNotFound(name.to_string())),
            1 => Ok(vms.remove(0)),
            n => Err(ToolsError::InvalidArguments(format!(
                "{} virtual machines are named '{}'",
                n, name
            ))),
        }
    }

    /// Interface `name` of `vm`, created when missing
    pub async fn vm_interface(&self, vm: &VirtualMachine, name: &str) -> Result<VMInterface, ToolsError> {
        let client = &self.client;
        let vm_id = vm.id.to_string();
        let filters = [("virtual_machine_id", vm_id.as_str()), ("name", name)];
        let existing = self
            .with_retry("find VM interface", || client.query_vm_interfaces(&filters, false))
            .await?;

        if let Some(interface) = existing.into_iter().next() {
            debug!("Reusing interface {} ({}) of {}", interface.name, interface.id, vm.name);
            return Ok(interface);
        }

        let request = CreateVMInterfaceRequest {
            virtual_machine: vm.id,
            name: name.to_string(),
            description: None,
        };
        let interface = self.client.create_vm_interface(request).await?;
        info!("Created interface {} ({}) on {}", interface.name, interface.id, vm.name);
        Ok(interface)
    }

    /// Record `address` as an active host address, optionally on a VM interface
    pub async fn create_host_address(
        &self,
        address: IpAddr,
        vrf_id: Option<u64>,
        description: &str,
        interface_id: Option<u64>,
    ) -> Result<IPAddress, ToolsError> {
        let host_len = if address.is_ipv4() { 32 } else { 128 };
        let request = CreateIPAddressRequest {
            address: format!("{}/{}", address, host_len),
            vrf: vrf_id,
            status: Some(IPAddressStatus::Active),
            description: Some(description.to_string()),
            assigned_object_type: interface_id.map(|_| VM_INTERFACE_OBJECT_TYPE.to_string()),
            assigned_object_id: interface_id,
            ..Default::default()
        };
        Ok(self.client.create_ip_address(request).await?)
    }

    /// Make `ip` the primary address of `vm` for its family
    pub async fn set_primary_address(
        &self,
        vm: &VirtualMachine,
        ip: &IPAddress,
        address: IpAddr,
    ) -> Result<VirtualMachine, ToolsError> {
        let (ip4, ip6) = if address.is_ipv4() { (Some(ip.id), None) } else { (None, Some(ip.id)) };
        Ok(self.client.update_virtual_machine_primary_ip(vm.id, ip4, ip6).await?)
    }

    async fn with_retry<T, F, Fut>(&self, what: &str, mut call: F) -> Result<T, NetBoxError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, NetBoxError>>,
    {
        let mut backoff = FibonacciBackoff::new(self.retry.min_seconds, self.retry.max_seconds);
        let mut attempt = 1;

        loop {
            match call().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.retry.attempts => {
                    let delay = backoff.next_backoff();
                    warn!(
                        "{} failed (attempt {}/{}): {}; retrying in {}s",
                        what,
                        attempt,
                        self.retry.attempts,
                        e,
                        delay.as_secs()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Parse the CIDR of a NetBox prefix
pub fn network_prefix(prefix: &Prefix) -> Result<NetworkPrefix, InvalidPrefixError> {
    NetworkPrefix::parse(&prefix.prefix)
}

/// NetBox prefix as a collision pool entry
pub fn pool_prefix(prefix: &Prefix) -> Result<PoolPrefix, InvalidPrefixError> {
    Ok(PoolPrefix::new(
        network_prefix(prefix)?,
        PrefixStatus::from(prefix.status.value.as_str()),
    ))
}

/// NetBox web UI link for an API record URL
pub fn ui_url(api_url: &str) -> String {
    api_url.replacen("/api/", "/", 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ui_url() {
        assert_eq!(
            ui_url("http://netbox.test/api/ipam/prefixes/10/"),
            "http://netbox.test/ipam/prefixes/10/"
        );
    }
}
