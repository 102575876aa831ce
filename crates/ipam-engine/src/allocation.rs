//! Allocation engine
//!
//! Utilization statistics and next-free-address search for a single prefix.
//!
//! The skip count only moves the starting point of the candidate search. It
//! never changes `available`, which counts every assigned address inside the
//! prefix, reserved hosts included.

use crate::prefix::NetworkPrefix;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::net::IpAddr;

/// Outcome of the next-address search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "address")]
pub enum NextAddress {
    /// First free host after the skipped range
    Available(IpAddr),
    /// Every candidate host is assigned or skipped
    NoneAvailable,
}

impl NextAddress {
    /// The address, if one was found
    #[must_use]
    pub fn address(&self) -> Option<IpAddr> {
        match self {
            NextAddress::Available(addr) => Some(*addr),
            NextAddress::NoneAvailable => None,
        }
    }

    /// True when the prefix has no candidate left
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        matches!(self, NextAddress::NoneAvailable)
    }
}

impl fmt::Display for NextAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NextAddress::Available(addr) => write!(f, "{addr}"),
            NextAddress::NoneAvailable => f.write_str("None available"),
        }
    }
}

/// Utilization of one prefix plus the next address to hand out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationResult {
    /// The prefix that was analyzed
    pub prefix: NetworkPrefix,
    /// All addresses in the block, network and broadcast included
    pub total: u128,
    /// `total` minus the assigned addresses that fall inside the block
    pub available: u128,
    /// Next free host, or the exhaustion sentinel
    pub next: NextAddress,
}

/// Inputs of one allocation run
#[derive(Debug, Clone, Copy)]
pub struct AllocationQuery<'a> {
    /// Prefix to search
    pub prefix: &'a NetworkPrefix,
    /// Addresses already in use
    pub assigned: &'a HashSet<IpAddr>,
    /// Leading usable hosts treated as reserved
    pub skip_count: usize,
}

impl AllocationQuery<'_> {
    /// Run the query
    #[must_use]
    pub fn run(&self) -> AllocationResult {
        allocate(self.prefix, self.assigned, self.skip_count)
    }
}

/// Compute utilization and the next free address of `prefix`
///
/// Hosts are walked in ascending order. The first `skip_count` hosts are
/// passed over whether or not they are assigned; the first unassigned host
/// after them is offered. Addresses in `assigned` outside the prefix are
/// ignored for the count.
#[must_use]
pub fn allocate(prefix: &NetworkPrefix, assigned: &HashSet<IpAddr>, skip_count: usize) -> AllocationResult {
    let total = prefix.total_addresses();
    let in_prefix = assigned.iter().filter(|addr| prefix.contains(addr)).count();
    let available = total.saturating_sub(in_prefix as u128);

    let next = prefix
        .hosts()
        .skip(skip_count)
        .find(|host| !assigned.contains(host))
        .map_or(NextAddress::NoneAvailable, NextAddress::Available);

    AllocationResult {
        prefix: *prefix,
        total,
        available,
        next,
    }
}
