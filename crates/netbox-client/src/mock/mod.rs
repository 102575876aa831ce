//! Mock NetBoxClient for unit testing
//!
//! This module provides a mock implementation of NetBoxClientTrait that can be used
//! in unit tests without requiring a running NetBox instance.
//!
//! The mock is organized into domain-specific modules:
//! - `ipam.rs` - IPAM operations (VRFs, prefixes, IP addresses)
//! - `virtualization.rs` - Virtual machines and their interfaces
//! - `helpers.rs` - Helper functions for creating model records
//!
//! Records are kept ordered by ID, so list calls return them in insertion
//! order when IDs come from [`MockNetBoxClient::next_id`]. Failures queued with
//! [`MockNetBoxClient::fail_next`] are returned by the next API calls, one per
//! call, before any data is touched.

mod helpers;
mod ipam;
mod virtualization;

use crate::error::NetBoxError;
use crate::models::*;
use crate::netbox_trait::NetBoxClientTrait;
use std::collections::{BTreeMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use helpers::Helpers;

/// Mock NetBoxClient for testing
///
/// This mock stores resources in memory and can be configured to return
/// specific responses for testing different scenarios.
#[derive(Debug, Clone)]
pub struct MockNetBoxClient {
    pub(crate) base_url: String,
    // In-memory storage for resources
    pub(crate) vrfs: Arc<Mutex<BTreeMap<u64, Vrf>>>,
    pub(crate) prefixes: Arc<Mutex<BTreeMap<u64, Prefix>>>,
    pub(crate) ip_addresses: Arc<Mutex<BTreeMap<u64, IPAddress>>>,
    pub(crate) virtual_machines: Arc<Mutex<BTreeMap<u64, VirtualMachine>>>,
    pub(crate) vm_interfaces: Arc<Mutex<BTreeMap<u64, VMInterface>>>,
    // Errors to hand out before serving data
    pub(crate) failures: Arc<Mutex<VecDeque<NetBoxError>>>,
    // Number of trait calls served, failures included
    pub(crate) calls: Arc<AtomicUsize>,
    // Counter for generating IDs
    pub(crate) next_id: Arc<Mutex<u64>>,
}

/// Lock a store, recovering the data if a test thread panicked while holding it
pub(crate) fn lock<T>(store: &Mutex<T>) -> MutexGuard<'_, T> {
    store.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockNetBoxClient {
    /// Create a new mock client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            vrfs: Arc::new(Mutex::new(BTreeMap::new())),
            prefixes: Arc::new(Mutex::new(BTreeMap::new())),
            ip_addresses: Arc::new(Mutex::new(BTreeMap::new())),
            virtual_machines: Arc::new(Mutex::new(BTreeMap::new())),
            vm_interfaces: Arc::new(Mutex::new(BTreeMap::new())),
            failures: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(AtomicUsize::new(0)),
            next_id: Arc::new(Mutex::new(1)),
        }
    }

    /// Add a VRF to the mock store (for test setup)
    pub fn add_vrf(&self, vrf: Vrf) {
        lock(&self.vrfs).insert(vrf.id, vrf);
    }

    /// Add a prefix to the mock store (for test setup)
    pub fn add_prefix(&self, prefix: Prefix) {
        lock(&self.prefixes).insert(prefix.id, prefix);
    }

    /// Add an IP address to the mock store (for test setup)
    pub fn add_ip_address(&self, ip: IPAddress) {
        lock(&self.ip_addresses).insert(ip.id, ip);
    }

    /// Add a virtual machine to the mock store (for test setup)
    pub fn add_virtual_machine(&self, vm: VirtualMachine) {
        lock(&self.virtual_machines).insert(vm.id, vm);
    }

    /// Add a VM interface to the mock store (for test setup)
    pub fn add_vm_interface(&self, interface: VMInterface) {
        lock(&self.vm_interfaces).insert(interface.id, interface);
    }

    /// Queue an error for the next API call
    pub fn fail_next(&self, error: NetBoxError) {
        lock(&self.failures).push_back(error);
    }

    /// Number of API calls served so far
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Snapshot of every stored IP address
    pub fn ip_addresses(&self) -> Vec<IPAddress> {
        lock(&self.ip_addresses).values().cloned().collect()
    }

    /// Snapshot of every stored virtual machine
    pub fn virtual_machines(&self) -> Vec<VirtualMachine> {
        lock(&self.virtual_machines).values().cloned().collect()
    }

    /// Snapshot of every stored VM interface
    pub fn vm_interfaces(&self) -> Vec<VMInterface> {
        lock(&self.vm_interfaces).values().cloned().collect()
    }

    /// Generate next ID
    pub fn next_id(&self) -> u64 {
        let mut id = lock(&self.next_id);
        let current = *id;
        *id += 1;
        current
    }

    /// Get helpers instance
    pub fn helpers(&self) -> Helpers {
        Helpers::new(self.base_url.clone())
    }

    /// Count the call and hand out a queued failure, if any
    pub(crate) fn begin_call(&self) -> Result<(), NetBoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match lock(&self.failures).pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Value of the first filter named `key`
pub(crate) fn filter_value<'a>(filters: &[(&str, &'a str)], key: &str) -> Option<&'a str> {
    filters.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

#[async_trait::async_trait]
impl NetBoxClientTrait for MockNetBoxClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn validate_token(&self) -> Result<(), NetBoxError> {
        self.begin_call()
    }

    // IPAM Operations - delegated to ipam module
    async fn query_vrfs(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<Vrf>, NetBoxError> {
        self.begin_call()?;
        ipam::query_vrfs(self, filters, fetch_all)
    }

    async fn get_vrf(&self, id: u64) -> Result<Vrf, NetBoxError> {
        self.begin_call()?;
        ipam::get_vrf(self, id)
    }

    async fn query_prefixes(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<Prefix>, NetBoxError> {
        self.begin_call()?;
        ipam::query_prefixes(self, filters, fetch_all)
    }

    async fn get_prefix(&self, id: u64) -> Result<Prefix, NetBoxError> {
        self.begin_call()?;
        ipam::get_prefix(self, id)
    }

    async fn query_ip_addresses(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<IPAddress>, NetBoxError> {
        self.begin_call()?;
        ipam::query_ip_addresses(self, filters, fetch_all)
    }

    async fn create_ip_address(&self, request: CreateIPAddressRequest) -> Result<IPAddress, NetBoxError> {
        self.begin_call()?;
        ipam::create_ip_address(self, request)
    }

    // Virtualization Operations - delegated to virtualization module
    async fn query_virtual_machines(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<VirtualMachine>, NetBoxError> {
        self.begin_call()?;
        virtualization::query_virtual_machines(self, filters, fetch_all)
    }

    async fn query_vm_interfaces(&self, filters: &[(&str, &str)], fetch_all: bool) -> Result<Vec<VMInterface>, NetBoxError> {
        self.begin_call()?;
        virtualization::query_vm_interfaces(self, filters, fetch_all)
    }

    async fn create_vm_interface(&self, request: CreateVMInterfaceRequest) -> Result<VMInterface, NetBoxError> {
        self.begin_call()?;
        virtualization::create_vm_interface(self, request)
    }

    async fn update_virtual_machine_primary_ip(
        &self,
        vm_id: u64,
        primary_ip4_id: Option<u64>,
        primary_ip6_id: Option<u64>,
    ) -> Result<VirtualMachine, NetBoxError> {
        self.begin_call()?;
        virtualization::update_virtual_machine_primary_ip(self, vm_id, primary_ip4_id, primary_ip6_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MockNetBoxClient {
        let mock = MockNetBoxClient::new("http://netbox.test");
        let h = mock.helpers();
        mock.add_vrf(h.vrf(1, "primary"));
        mock.add_vrf(h.vrf(2, "secondary"));
        mock.add_prefix(h.prefix(10, "10.0.0.0/24", "active", Some((1, "primary"))));
        mock.add_prefix(h.prefix(11, "10.0.1.0/24", "reserved", Some((1, "primary"))));
        mock.add_prefix(h.prefix(20, "10.0.0.0/25", "active", Some((2, "secondary"))));
        mock.add_ip_address(h.ip_address(100, "10.0.0.5/24", Some((1, "primary"))));
        mock.add_ip_address(h.ip_address(101, "10.0.0.9/32", None));
        mock.add_ip_address(h.ip_address(102, "10.0.1.1/24", Some((1, "primary"))));
        mock
    }

    #[tokio::test]
    async fn test_prefix_filters() {
        let mock = seeded();
        let primary = mock.query_prefixes(&[("vrf_id", "1")], true).await.unwrap();
        assert_eq!(primary.iter().map(|p| p.id).collect::<Vec<_>>(), vec![10, 11]);

        let reserved = mock.query_prefixes(&[("vrf_id", "1"), ("status", "reserved")], true).await.unwrap();
        assert_eq!(reserved.len(), 1);
        assert_eq!(reserved[0].prefix, "10.0.1.0/24");
    }

    #[tokio::test]
    async fn test_parent_filter_ignores_vrf() {
        let mock = seeded();
        let ips = mock.query_ip_addresses(&[("parent", "10.0.0.0/24")], true).await.unwrap();
        assert_eq!(ips.iter().map(|ip| ip.id).collect::<Vec<_>>(), vec![100, 101]);
    }

    #[tokio::test]
    async fn test_create_ip_address_links_vrf() {
        let mock = seeded();
        let ip = mock
            .create_ip_address(CreateIPAddressRequest {
                address: "10.0.0.6/32".to_string(),
                vrf: Some(1),
                status: Some(IPAddressStatus::Active),
                description: Some("web-01".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(ip.vrf.as_ref().map(|v| v.name.as_str()), Some("primary"));
        assert_eq!(ip.description, "web-01");
        assert_eq!(mock.ip_addresses().len(), 4);
    }

    #[tokio::test]
    async fn test_create_ip_address_unknown_vrf() {
        let mock = seeded();
        let err = mock
            .create_ip_address(CreateIPAddressRequest {
                address: "10.0.0.6/32".to_string(),
                vrf: Some(99),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, NetBoxError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_interface_filters_and_duplicate_name() {
        let mock = seeded();
        let h = mock.helpers();
        mock.add_virtual_machine(h.virtual_machine(30, "web-01"));
        mock.add_virtual_machine(h.virtual_machine(31, "web-02"));
        mock.add_vm_interface(h.vm_interface(40, "NIC-web-01", (30, "web-01")));

        let created = mock
            .create_vm_interface(CreateVMInterfaceRequest {
                virtual_machine: 31,
                name: "NIC-web-01".to_string(),
                description: None,
            })
            .await
            .unwrap();
        assert_eq!(created.virtual_machine.name, "web-02");

        let on_first = mock
            .query_vm_interfaces(&[("virtual_machine_id", "30"), ("name", "NIC-web-01")], true)
            .await
            .unwrap();
        assert_eq!(on_first.iter().map(|i| i.id).collect::<Vec<_>>(), vec![40]);

        let err = mock
            .create_vm_interface(CreateVMInterfaceRequest {
                virtual_machine: 30,
                name: "NIC-web-01".to_string(),
                description: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, NetBoxError::Api(_)));
    }

    #[tokio::test]
    async fn test_primary_ip_must_sit_on_the_vm() {
        let mock = seeded();
        let h = mock.helpers();
        mock.add_virtual_machine(h.virtual_machine(30, "web-01"));
        mock.add_vm_interface(h.vm_interface(40, "NIC-web-01", (30, "web-01")));

        // 101 is not assigned to any interface
        let err = mock.update_virtual_machine_primary_ip(30, Some(101), None).await.unwrap_err();
        assert!(matches!(err, NetBoxError::Api(_)));

        let ip = mock
            .create_ip_address(CreateIPAddressRequest {
                address: "10.0.0.6/32".to_string(),
                assigned_object_type: Some(VM_INTERFACE_OBJECT_TYPE.to_string()),
                assigned_object_id: Some(40),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(ip.assigned_object_id, Some(40));

        let vm = mock.update_virtual_machine_primary_ip(30, Some(ip.id), None).await.unwrap();
        assert_eq!(vm.primary_ip4.map(|p| p.id), Some(ip.id));
        assert!(vm.primary_ip6.is_none());
    }

    #[tokio::test]
    async fn test_fail_next_is_consumed_once() {
        let mock = seeded();
        mock.fail_next(NetBoxError::Server("503".to_string()));

        assert!(mock.get_prefix(10).await.is_err());
        assert_eq!(mock.get_prefix(10).await.unwrap().prefix, "10.0.0.0/24");
        assert_eq!(mock.call_count(), 2);
    }
}
