//! NetBox REST API Client
//!
//! A Rust client library for the parts of the NetBox REST API that the
//! IPAM tools read and write: VRFs, prefixes, IP addresses and virtual
//! machines.
//!
//! # Example
//!
//! ```no_run
//! use netbox_client::{CreateIPAddressRequest, IPAddressStatus, NetBoxClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create a client
//! let client = NetBoxClient::new(
//!     "http://netbox:80".to_string(),
//!     "your-api-token".to_string(),
//! )?;
//!
//! // Every prefix of VRF 3
//! let prefixes = client.query_prefixes(&[("vrf_id", "3")], true).await?;
//!
//! // Every address inside the first one, regardless of VRF
//! if let Some(prefix) = prefixes.first() {
//!     let used = client.query_ip_addresses(&[("parent", prefix.prefix.as_str())], true).await?;
//!     println!("{} has {} addresses in use", prefix.prefix, used.len());
//! }
//!
//! // Record a host address
//! let ip = client
//!     .create_ip_address(CreateIPAddressRequest {
//!         address: "10.0.0.7/32".to_string(),
//!         vrf: Some(3),
//!         status: Some(IPAddressStatus::Active),
//!         description: Some("web-01".to_string()),
//!         ..Default::default()
//!     })
//!     .await?;
//! println!("created {}", ip.address);
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **IPAM Operations**: Query VRFs, prefixes, IP addresses; create IP addresses
//! - **Virtualization**: Query virtual machines and their interfaces, create
//!   interfaces, set a VM's primary addresses
//! - **Pagination**: Support for fetching all pages of large result sets
//! - **Mocking**: `MockNetBoxClient` behind the `test-util` feature

pub mod client;
pub mod common;
pub mod error;
pub mod models;
#[path = "trait.rs"]
pub mod netbox_trait;
#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use client::NetBoxClient;
pub use common::{HttpClient, PaginatedResponse};
pub use error::NetBoxError;
pub use models::*;
pub use netbox_trait::NetBoxClientTrait;
#[cfg(any(test, feature = "test-util"))]
pub use mock::MockNetBoxClient;
