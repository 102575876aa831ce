//! NetBox API client
//!
//! Implements the NetBox REST API client for the IPAM and virtualization reads
//! the tools rely on, plus IP address creation.
//! Based on NetBox API structure: /api/ipam/{vrfs,prefixes,ip-addresses}/ and
//! /api/virtualization/virtual-machines/

use crate::common::query::{get_resource, query_resources};
use crate::common::HttpClient;
use crate::error::NetBoxError;
use crate::models::*;
use crate::netbox_trait::NetBoxClientTrait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

const VRFS: &str = "ipam/vrfs";
const PREFIXES: &str = "ipam/prefixes";
const IP_ADDRESSES: &str = "ipam/ip-addresses";
const VIRTUAL_MACHINES: &str = "virtualization/virtual-machines";
const VM_INTERFACES: &str = "virtualization/interfaces";

/// NetBox API client
#[derive(Debug, Clone)]
pub struct NetBoxClient {
    http: HttpClient,
}

impl NetBoxClient {
    /// Create a new NetBox client
    ///
    /// # Arguments
    /// * `base_url` - NetBox base URL (e.g., "http://netbox:80")
    /// * `token` - API token for authentication
    pub fn new(base_url: String, token: String) -> Result<Self, NetBoxError> {
        Self::with_timeout(base_url, token, Duration::from_secs(30))
    }

    /// Create a new NetBox client with a custom request timeout
    pub fn with_timeout(base_url: String, token: String, timeout: Duration) -> Result<Self, NetBoxError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(NetBoxError::Http)?;

        Ok(Self {
            http: HttpClient::new(client, base_url, token),
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// Validate the API token by making a simple authenticated request.
    ///
    /// Uses the status endpoint, which is lightweight and requires
    /// authentication.
    ///
    /// # Returns
    /// * `Ok(())` - Token is valid and NetBox is reachable
    /// * `Err(NetBoxError)` - Token is invalid or NetBox is unreachable
    pub async fn validate_token(&self) -> Result<(), NetBoxError> {
        debug!("Validating NetBox token and connectivity");
        let _status: serde_json::Value = self.http.get("/api/status/").await?;
        debug!("Token validated successfully");
        Ok(())
    }

    /// Query VRFs
    pub async fn query_vrfs(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<Vrf>, NetBoxError> {
        debug!("Querying VRFs with filters: {:?}", filters);
        query_resources(&self.http, VRFS, filters, fetch_all).await
    }

    /// Get a VRF by ID
    pub async fn get_vrf(&self, id: u64) -> Result<Vrf, NetBoxError> {
        debug!("Fetching VRF {} from NetBox", id);
        get_resource(&self.http, VRFS, id).await
    }

    /// Query prefixes
    ///
    /// # Arguments
    /// * `filters` - NetBox filters, e.g. `[("vrf_id", "3")]`
    /// * `fetch_all` - Follow pagination to the last page
    pub async fn query_prefixes(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<Prefix>, NetBoxError> {
        debug!("Querying prefixes with filters: {:?}", filters);
        query_resources(&self.http, PREFIXES, filters, fetch_all).await
    }

    /// Get a prefix by ID
    ///
    /// # Returns
    /// * `Ok(Prefix)` - The prefix object
    /// * `Err(NetBoxError::NotFound)` - If no prefix has this ID
    pub async fn get_prefix(&self, id: u64) -> Result<Prefix, NetBoxError> {
        debug!("Fetching prefix {} from NetBox", id);
        get_resource(&self.http, PREFIXES, id).await
    }

    /// Query IP addresses
    ///
    /// Use the `parent` filter with a CIDR to get every address inside a prefix.
    pub async fn query_ip_addresses(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<IPAddress>, NetBoxError> {
        debug!("Querying IP addresses with filters: {:?}", filters);
        query_resources(&self.http, IP_ADDRESSES, filters, fetch_all).await
    }

    /// Create an IP address
    pub async fn create_ip_address(&self, request: CreateIPAddressRequest) -> Result<IPAddress, NetBoxError> {
        if request.address.is_empty() {
            return Err(NetBoxError::InvalidRequest("IP address must not be empty".to_string()));
        }

        let body = serde_json::to_value(&request)?;
        debug!("Creating IP address {} in NetBox", request.address);
        self.http.post(&format!("/api/{}/", IP_ADDRESSES), &body).await
    }

    /// Query virtual machines
    pub async fn query_virtual_machines(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<VirtualMachine>, NetBoxError> {
        debug!("Querying virtual machines with filters: {:?}", filters);
        query_resources(&self.http, VIRTUAL_MACHINES, filters, fetch_all).await
    }

    /// Query VM interfaces, e.g. `[("virtual_machine_id", "7"), ("name", "eth0")]`
    pub async fn query_vm_interfaces(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<VMInterface>, NetBoxError> {
        debug!("Querying VM interfaces with filters: {:?}", filters);
        query_resources(&self.http, VM_INTERFACES, filters, fetch_all).await
    }

    /// Create an interface on a virtual machine
    pub async fn create_vm_interface(&self, request: CreateVMInterfaceRequest) -> Result<VMInterface, NetBoxError> {
        if request.name.is_empty() {
            return Err(NetBoxError::InvalidRequest("Interface name must not be empty".to_string()));
        }

        let body = serde_json::to_value(&request)?;
        debug!("Creating interface {} on virtual machine {}", request.name, request.virtual_machine);
        self.http.post(&format!("/api/{}/", VM_INTERFACES), &body).await
    }

    /// Set the primary IPv4 and/or IPv6 address of a virtual machine
    ///
    /// Only the IDs given are sent; the other primary address is left alone.
    /// The addresses must already be assigned to one of the VM's interfaces.
    pub async fn update_virtual_machine_primary_ip(
        &self,
        vm_id: u64,
        primary_ip4_id: Option<u64>,
        primary_ip6_id: Option<u64>,
    ) -> Result<VirtualMachine, NetBoxError> {
        let mut body = serde_json::json!({});
        if let Some(ip4) = primary_ip4_id {
            body["primary_ip4"] = serde_json::Value::Number(ip4.into());
        }
        if let Some(ip6) = primary_ip6_id {
            body["primary_ip6"] = serde_json::Value::Number(ip6.into());
        }

        debug!("Updating primary IPs of virtual machine {}", vm_id);
        self.http.patch(&format!("/api/{}/{}/", VIRTUAL_MACHINES, vm_id), &body).await
    }
}

#[async_trait::async_trait]
impl NetBoxClientTrait for NetBoxClient {
    fn base_url(&self) -> &str {
        self.base_url()
    }

    async fn validate_token(&self) -> Result<(), NetBoxError> {
        self.validate_token().await
    }

    // IPAM Operations
    async fn query_vrfs(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<Vrf>, NetBoxError> {
        self.query_vrfs(filters, fetch_all).await
    }

    async fn get_vrf(&self, id: u64) -> Result<Vrf, NetBoxError> {
        self.get_vrf(id).await
    }

    async fn query_prefixes(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<Prefix>, NetBoxError> {
        self.query_prefixes(filters, fetch_all).await
    }

    async fn get_prefix(&self, id: u64) -> Result<Prefix, NetBoxError> {
        self.get_prefix(id).await
    }

    async fn query_ip_addresses(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<IPAddress>, NetBoxError> {
        self.query_ip_addresses(filters, fetch_all).await
    }

    async fn create_ip_address(&self, request: CreateIPAddressRequest) -> Result<IPAddress, NetBoxError> {
        self.create_ip_address(request).await
    }

    // Virtualization Operations
    async fn query_virtual_machines(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<VirtualMachine>, NetBoxError> {
        self.query_virtual_machines(filters, fetch_all).await
    }

    async fn query_vm_interfaces(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<VMInterface>, NetBoxError> {
        self.query_vm_interfaces(filters, fetch_all).await
    }

    async fn create_vm_interface(&self, request: CreateVMInterfaceRequest) -> Result<VMInterface, NetBoxError> {
        self.create_vm_interface(request).await
    }

    async fn update_virtual_machine_primary_ip(
        &self,
        vm_id: u64,
        primary_ip4_id: Option<u64>,
        primary_ip6_id: Option<u64>,
    ) -> Result<VirtualMachine, NetBoxError> {
        self.update_virtual_machine_primary_ip(vm_id, primary_ip4_id, primary_ip6_id).await
    }
}
