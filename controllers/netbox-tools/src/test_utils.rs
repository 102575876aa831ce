//! Test utilities for unit testing the tools
//!
//! This module provides helpers for creating test data and setting up test scenarios.

#[cfg(test)]
use crate::config::RetryPolicy;
#[cfg(test)]
use crate::inventory::Inventory;
#[cfg(test)]
use netbox_client::MockNetBoxClient;
#[cfg(test)]
use std::sync::Arc;

/// Retries without waiting
#[cfg(test)]
pub const TEST_RETRY: RetryPolicy = RetryPolicy {
    attempts: 3,
    min_seconds: 0,
    max_seconds: 0,
};

/// Empty mock plus an inventory reading from it
///
/// The mock shares its storage with the copy held by the inventory, so
/// records added afterwards are visible to the tools.
#[cfg(test)]
pub fn mock_inventory() -> (MockNetBoxClient, Inventory) {
    let mock = MockNetBoxClient::new("http://netbox.test");
    let inventory = Inventory::new(Arc::new(mock.clone()), TEST_RETRY);
    (mock, inventory)
}

/// Two VRFs with overlapping address space
///
/// `primary` (1): 10.0.0.0/24 active, 10.1.0.0/24 reserved, 10.2.0.0/16 container.
/// `secondary` (2): 10.0.0.0/25 reserved, 10.0.0.128/25 active,
/// 10.1.0.0/16 deprecated, 192.168.0.0/24 active.
#[cfg(test)]
pub fn seed_two_vrfs(mock: &MockNetBoxClient) {
    let h = mock.helpers();
    mock.add_vrf(h.vrf(1, "primary"));
    mock.add_vrf(h.vrf(2, "secondary"));

    let primary = Some((1, "primary"));
    mock.add_prefix(h.prefix(10, "10.0.0.0/24", "active", primary));
    mock.add_prefix(h.prefix(11, "10.1.0.0/24", "reserved", primary));
    mock.add_prefix(h.prefix(12, "10.2.0.0/16", "container", primary));

    let secondary = Some((2, "secondary"));
    mock.add_prefix(h.prefix(20, "10.0.0.0/25", "reserved", secondary));
    mock.add_prefix(h.prefix(21, "10.0.0.128/25", "active", secondary));
    mock.add_prefix(h.prefix(22, "10.1.0.0/16", "deprecated", secondary));
    mock.add_prefix(h.prefix(23, "192.168.0.0/24", "active", secondary));
}
