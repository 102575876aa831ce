//! IPAM engine
//!
//! Pure computations behind the NetBox operations tools:
//!
//! - **Address space model** ([`prefix`]): strict CIDR parsing, usable-host
//!   enumeration, containment and overlap.
//! - **Allocation** ([`allocation`]): utilization of a prefix and the next free
//!   address after a caller-chosen number of reserved hosts.
//! - **Collision validation** ([`collision`]): overlaps between the prefixes of
//!   two VRFs, split into active and reserved.
//! - **Serial allocation** ([`serial`]): asset serials parsed out of VM names
//!   and the numbers still issuable above the current watermark.
//!
//! Nothing here performs I/O, logs, or keeps state between calls. Callers
//! fetch snapshots from the inventory and pass them in.
//!
//! # Example
//!
//! ```
//! use ipam_engine::{allocate, NetworkPrefix};
//! use std::collections::HashSet;
//! use std::net::IpAddr;
//!
//! let prefix = NetworkPrefix::parse("10.0.0.0/29")?;
//! let assigned: HashSet<IpAddr> = HashSet::from([
//!     "10.0.0.1".parse::<IpAddr>()?,
//!     "10.0.0.2".parse::<IpAddr>()?,
//! ]);
//!
//! let result = allocate(&prefix, &assigned, 0);
//! assert_eq!(result.total, 8);
//! assert_eq!(result.available, 6);
//! assert_eq!(result.next.to_string(), "10.0.0.3");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod allocation;
#[cfg(test)]
mod allocation_test;
pub mod collision;
pub mod error;
pub mod prefix;
pub mod serial;

pub use allocation::{allocate, AllocationQuery, AllocationResult, NextAddress};
pub use collision::{validate, validate_with, CollisionMode, OverlapFinding, PoolPrefix, PrefixStatus, VrfPool};
pub use error::{EngineError, InvalidAddressError, InvalidGrammarError, InvalidPrefixError};
pub use prefix::{parse_host_address, Hosts, NetworkPrefix};
pub use serial::{
    advance, available_sequence, build_ledger, list_view, preview, wrap_index, ListRow, Occupant, Serial,
    SerialLedger, TagGrammar, DEFAULT_LIST_WINDOW, DEFAULT_TAG_PATTERN, MAX_SERIAL, TOTAL_SERIALS,
};
