//! Prefix collision validator
//!
//! Compares the prefixes of two VRFs and reports, for every prefix of the
//! first pool, which prefixes of the second pool it overlaps. Deprecated and
//! container prefixes are dropped from both sides before comparing.

use crate::prefix::NetworkPrefix;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a prefix in the inventory
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PrefixStatus {
    /// In use
    Active,
    /// Held back for future use
    Reserved,
    /// Being retired
    Deprecated,
    /// Aggregates child prefixes
    Container,
    /// Any status value this engine has no rule for
    Other(String),
}

impl PrefixStatus {
    /// Wire value as the inventory reports it
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            PrefixStatus::Active => "active",
            PrefixStatus::Reserved => "reserved",
            PrefixStatus::Deprecated => "deprecated",
            PrefixStatus::Container => "container",
            PrefixStatus::Other(value) => value,
        }
    }

    /// Statuses never taken into account by the validator
    #[must_use]
    pub fn is_excluded(&self) -> bool {
        matches!(self, PrefixStatus::Deprecated | PrefixStatus::Container)
    }
}

impl From<&str> for PrefixStatus {
    fn from(value: &str) -> Self {
        match value {
            "active" => PrefixStatus::Active,
            "reserved" => PrefixStatus::Reserved,
            "deprecated" => PrefixStatus::Deprecated,
            "container" => PrefixStatus::Container,
            other => PrefixStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for PrefixStatus {
    fn from(value: String) -> Self {
        PrefixStatus::from(value.as_str())
    }
}

impl From<PrefixStatus> for String {
    fn from(status: PrefixStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for PrefixStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A prefix together with its status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolPrefix {
    /// The block
    pub prefix: NetworkPrefix,
    /// Its lifecycle status
    pub status: PrefixStatus,
}

impl PoolPrefix {
    /// Pair a prefix with a status
    #[must_use]
    pub fn new(prefix: NetworkPrefix, status: PrefixStatus) -> Self {
        Self { prefix, status }
    }
}

/// The prefixes of one VRF, in inventory order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VrfPool {
    /// VRF name, for display only
    pub name: String,
    /// Member prefixes
    pub prefixes: Vec<PoolPrefix>,
}

impl VrfPool {
    /// Build a pool from a name and its prefixes
    pub fn new(name: impl Into<String>, prefixes: Vec<PoolPrefix>) -> Self {
        Self {
            name: name.into(),
            prefixes,
        }
    }

    /// Prefixes that take part in collision checks
    pub fn comparable(&self) -> impl Iterator<Item = &PoolPrefix> {
        self.prefixes.iter().filter(|entry| !entry.status.is_excluded())
    }
}

/// Overlaps found for one prefix of the first pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlapFinding {
    /// Prefix from the first pool
    pub prefix: NetworkPrefix,
    /// Its status
    pub status: PrefixStatus,
    /// Overlapping second-pool prefixes with any status other than reserved
    pub active_overlaps: Vec<PoolPrefix>,
    /// Overlapping second-pool prefixes with status reserved
    pub reserved_overlaps: Vec<PoolPrefix>,
}

impl OverlapFinding {
    /// True if anything in the second pool overlaps this prefix
    #[must_use]
    pub fn has_conflicts(&self) -> bool {
        !self.active_overlaps.is_empty() || !self.reserved_overlaps.is_empty()
    }
}

/// How much of the second pool is scanned per prefix
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionMode {
    /// Record every overlapping prefix
    #[default]
    AccumulateAll,
    /// Stop at the first overlapping prefix
    FirstMatch,
}

/// Compare two pools, recording every overlap
#[must_use]
pub fn validate(pool_a: &VrfPool, pool_b: &VrfPool) -> Vec<OverlapFinding> {
    validate_with(pool_a, pool_b, CollisionMode::AccumulateAll)
}

/// Compare two pools under the given [`CollisionMode`]
///
/// Findings follow the order of `pool_a`; overlap lists follow the order of
/// `pool_b`.
#[must_use]
pub fn validate_with(pool_a: &VrfPool, pool_b: &VrfPool, mode: CollisionMode) -> Vec<OverlapFinding> {
    let candidates: Vec<&PoolPrefix> = pool_b.comparable().collect();

    pool_a
        .comparable()
        .map(|entry| {
            let mut finding = OverlapFinding {
                prefix: entry.prefix,
                status: entry.status.clone(),
                active_overlaps: Vec::new(),
                reserved_overlaps: Vec::new(),
            };

            for other in candidates.iter().filter(|other| entry.prefix.overlaps(&other.prefix)) {
                if other.status == PrefixStatus::Reserved {
                    finding.reserved_overlaps.push((*other).clone());
                } else {
                    finding.active_overlaps.push((*other).clone());
                }
                if mode == CollisionMode::FirstMatch {
                    break;
                }
            }

            finding
        })
        .collect()
}
