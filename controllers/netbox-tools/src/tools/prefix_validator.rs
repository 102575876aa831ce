//! Prefix validator
//!
//! Checks every prefix of a primary VRF against the prefixes of a secondary
//! VRF and reports the overlaps, split by whether the other side is reserved.

use crate::error::ToolsError;
use crate::inventory::Inventory;
use ipam_engine::{validate_with, CollisionMode, NetworkPrefix, OverlapFinding, PoolPrefix, PrefixStatus};
use serde::Serialize;
use tracing::info;

/// Result of comparing two VRFs
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub primary: String,
    pub secondary: String,
    pub first_match: bool,
    pub findings: Vec<OverlapFinding>,
}

impl ValidationReport {
    /// Findings with at least one overlap
    pub fn conflicts(&self) -> impl Iterator<Item = &OverlapFinding> {
        self.findings.iter().filter(|f| f.has_conflicts())
    }
}

/// Compare `primary_id` against `secondary_id`
pub async fn validate_vrfs(
    inventory: &Inventory,
    primary_id: u64,
    secondary_id: u64,
    mode: CollisionMode,
) -> Result<ValidationReport, ToolsError> {
    let (primary, secondary) = futures::try_join!(inventory.pool(primary_id), inventory.pool(secondary_id))?;

    let findings = validate_with(&primary, &secondary, mode);
    let report = ValidationReport {
        primary: primary.name,
        secondary: secondary.name,
        first_match: mode == CollisionMode::FirstMatch,
        findings,
    };
    info!(
        "{} of {} prefixes in {} overlap {}",
        report.conflicts().count(),
        report.findings.len(),
        report.primary,
        report.secondary
    );
    Ok(report)
}

/// `10.0.0.0/25 (Reserved)`
pub fn label(prefix: &NetworkPrefix, status: &PrefixStatus) -> String {
    let status = status.as_str();
    let mut chars = status.chars();
    let capitalized: String = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    };
    format!("{} ({})", prefix, capitalized)
}

/// Labels of a list of overlapping prefixes
pub fn labels(entries: &[PoolPrefix]) -> Vec<String> {
    entries.iter().map(|p| label(&p.prefix, &p.status)).collect()
}
