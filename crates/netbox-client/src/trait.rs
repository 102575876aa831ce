//! NetBoxClient trait for mocking
//!
//! This trait abstracts the NetBoxClient to enable mocking in unit tests.
//! The concrete NetBoxClient implements this trait, and tests can use mock implementations.

use crate::error::NetBoxError;
use crate::models::*;

/// Trait for NetBox API client operations
///
/// This trait enables mocking of NetBox API calls for unit testing.
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
///
/// Filters are passed through as NetBox query parameters (`vrf_id`, `parent`,
/// `status`, `name`, ...). With `fetch_all` every page is followed.
#[async_trait::async_trait]
pub trait NetBoxClientTrait: Send + Sync {
    /// Get the base URL
    fn base_url(&self) -> &str;

    /// Validate the API token
    async fn validate_token(&self) -> Result<(), NetBoxError>;

    // IPAM Operations
    async fn query_vrfs(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<Vrf>, NetBoxError>;
    async fn get_vrf(&self, id: u64) -> Result<Vrf, NetBoxError>;
    async fn query_prefixes(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<Prefix>, NetBoxError>;
    async fn get_prefix(&self, id: u64) -> Result<Prefix, NetBoxError>;
    async fn query_ip_addresses(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<IPAddress>, NetBoxError>;
    async fn create_ip_address(&self, request: CreateIPAddressRequest) -> Result<IPAddress, NetBoxError>;

    // Virtualization Operations
    async fn query_virtual_machines(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<VirtualMachine>, NetBoxError>;
    async fn query_vm_interfaces(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<VMInterface>, NetBoxError>;
    async fn create_vm_interface(&self, request: CreateVMInterfaceRequest) -> Result<VMInterface, NetBoxError>;
    async fn update_virtual_machine_primary_ip(
        &self,
        vm_id: u64,
        primary_ip4_id: Option<u64>,
        primary_ip6_id: Option<u64>,
    ) -> Result<VirtualMachine, NetBoxError>;
}
