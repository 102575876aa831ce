//! Network address space model
//!
//! [`NetworkPrefix`] wraps an [`IpNet`] and adds the subnet semantics the rest
//! of the engine relies on: strict CIDR parsing, usable-host enumeration,
//! containment and overlap.

use crate::error::{InvalidAddressError, InvalidPrefixError};
use ipnet::{IpNet, Ipv4AddrRange, Ipv6AddrRange};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv6Addr};
use std::str::FromStr;

/// A CIDR block, IPv4 or IPv6
///
/// Construction is strict: the input must carry a prefix length, the address
/// must be valid for its family and no host bits may be set. Once built the
/// value never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NetworkPrefix(IpNet);

impl NetworkPrefix {
    /// Parse a CIDR string such as `10.0.0.0/24` or `2001:db8::/64`
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPrefixError`] when the prefix length is missing, the
    /// address is malformed, the length is out of range for the family, or
    /// host bits are set.
    pub fn parse(input: &str) -> Result<Self, InvalidPrefixError> {
        let (addr, len) = input
            .split_once('/')
            .ok_or_else(|| InvalidPrefixError::new(input, "missing prefix length"))?;

        let addr: IpAddr = addr
            .parse()
            .map_err(|e| InvalidPrefixError::new(input, format!("{e}")))?;
        if len.is_empty() || !len.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidPrefixError::new(input, format!("prefix length '{len}' is not a number")));
        }
        let len: u8 = len
            .parse()
            .map_err(|e| InvalidPrefixError::new(input, format!("prefix length: {e}")))?;

        let net = IpNet::new(addr, len).map_err(|e| {
            let family = if addr.is_ipv4() { "IPv4" } else { "IPv6" };
            InvalidPrefixError::new(input, format!("{e} for {family}"))
        })?;

        if net.trunc() != net {
            return Err(InvalidPrefixError::new(input, "host bits set"));
        }

        Ok(Self(net))
    }

    /// Network (base) address
    #[must_use]
    pub fn network(&self) -> IpAddr {
        self.0.network()
    }

    /// Prefix length in bits
    #[must_use]
    pub fn prefix_len(&self) -> u8 {
        self.0.prefix_len()
    }

    /// True for IPv4 prefixes
    #[must_use]
    pub fn is_ipv4(&self) -> bool {
        matches!(self.0, IpNet::V4(_))
    }

    /// The underlying `ipnet` value
    #[must_use]
    pub fn as_ipnet(&self) -> &IpNet {
        &self.0
    }

    /// Number of addresses in the block, network and broadcast included
    ///
    /// An IPv6 `/0` holds 2^128 addresses, one more than `u128` can hold; that
    /// single case saturates at `u128::MAX`.
    #[must_use]
    pub fn total_addresses(&self) -> u128 {
        let bits = u32::from(self.0.max_prefix_len() - self.0.prefix_len());
        1u128.checked_shl(bits).unwrap_or(u128::MAX)
    }

    /// Number of addresses [`hosts`](Self::hosts) yields
    #[must_use]
    pub fn host_count(&self) -> u128 {
        let total = self.total_addresses();
        match self.0 {
            IpNet::V4(net) if net.prefix_len() < 31 => total - 2,
            IpNet::V6(net) if net.prefix_len() < 127 => total - 1,
            _ => total,
        }
    }

    /// Usable host addresses in ascending order
    ///
    /// Every call returns a fresh iterator. IPv4 excludes the network and
    /// broadcast addresses except for `/31` (both addresses) and `/32` (the
    /// single address). IPv6 has no broadcast; only the subnet-router anycast
    /// address is excluded, again except for `/127` and `/128`.
    #[must_use]
    pub fn hosts(&self) -> Hosts {
        match self.0 {
            IpNet::V4(net) => Hosts::V4(net.hosts()),
            IpNet::V6(net) => {
                let network = net.network();
                let start = if net.prefix_len() < 127 {
                    Ipv6Addr::from(u128::from(network) + 1)
                } else {
                    network
                };
                Hosts::V6(Ipv6AddrRange::new(start, net.broadcast()))
            }
        }
    }

    /// True if `addr` falls inside the block. Mismatched families never match.
    #[must_use]
    pub fn contains(&self, addr: &IpAddr) -> bool {
        self.0.contains(addr)
    }

    /// True if the two blocks share at least one address
    ///
    /// CIDR blocks either nest or are disjoint, so this is "one contains the
    /// other's network address". Symmetric by construction.
    #[must_use]
    pub fn overlaps(&self, other: &NetworkPrefix) -> bool {
        self.0.contains(&other.0.network()) || other.0.contains(&self.0.network())
    }
}

impl fmt::Display for NetworkPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NetworkPrefix {
    type Err = InvalidPrefixError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for NetworkPrefix {
    type Error = InvalidPrefixError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NetworkPrefix> for String {
    fn from(prefix: NetworkPrefix) -> Self {
        prefix.to_string()
    }
}

/// Iterator over the usable hosts of a [`NetworkPrefix`]
#[derive(Debug, Clone)]
pub enum Hosts {
    /// IPv4 host range
    V4(Ipv4AddrRange),
    /// IPv6 host range
    V6(Ipv6AddrRange),
}

impl Iterator for Hosts {
    type Item = IpAddr;

    fn next(&mut self) -> Option<IpAddr> {
        match self {
            Hosts::V4(range) => range.next().map(IpAddr::V4),
            Hosts::V6(range) => range.next().map(IpAddr::V6),
        }
    }

    // Both ranges jump arithmetically, so `skip(n)` stays O(1).
    fn nth(&mut self, n: usize) -> Option<IpAddr> {
        match self {
            Hosts::V4(range) => range.nth(n).map(IpAddr::V4),
            Hosts::V6(range) => range.nth(n).map(IpAddr::V6),
        }
    }
}

/// Parse an in-use address as NetBox reports it
///
/// Accepts a bare address (`10.0.0.1`) or one carrying its interface mask
/// (`10.0.0.1/24`); the mask is validated and then dropped.
///
/// # Errors
///
/// Returns [`InvalidAddressError`] if either form fails to parse.
pub fn parse_host_address(input: &str) -> Result<IpAddr, InvalidAddressError> {
    if input.contains('/') {
        IpNet::from_str(input)
            .map(|net| net.addr())
            .map_err(|_| InvalidAddressError(input.to_string()))
    } else {
        IpAddr::from_str(input).map_err(|_| InvalidAddressError(input.to_string()))
    }
}
