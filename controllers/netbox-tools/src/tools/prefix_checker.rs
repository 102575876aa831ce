//! Prefix checker
//!
//! Utilization and next free address for one prefix, or for each prefix of a
//! VRF. Every address NetBox holds inside the prefix counts as in use, in
//! any VRF.

use crate::error::ToolsError;
use crate::inventory::{network_prefix, ui_url, Inventory};
use futures::stream::{self, StreamExt, TryStreamExt};
use ipam_engine::{AllocationQuery, AllocationResult};
use netbox_client::Prefix;
use serde::Serialize;
use tracing::info;

/// Prefixes whose addresses are fetched at the same time
const PREFIX_CONCURRENCY: usize = 8;

/// Stats of one NetBox prefix
#[derive(Debug, Clone, Serialize)]
pub struct PrefixReport {
    pub id: u64,
    /// NetBox web UI link
    pub url: String,
    pub vrf: Option<String>,
    pub status: String,
    pub skip_count: usize,
    pub allocation: AllocationResult,
}

/// Check a single prefix
pub async fn check_prefix(inventory: &Inventory, prefix_id: u64, skip_count: usize) -> Result<PrefixReport, ToolsError> {
    let prefix = inventory.prefix(prefix_id).await?;
    report(inventory, prefix, skip_count).await
}

/// Check every prefix of a VRF, in NetBox order
pub async fn check_vrf(inventory: &Inventory, vrf_id: u64, skip_count: usize) -> Result<Vec<PrefixReport>, ToolsError> {
    let prefixes = inventory.vrf_prefixes(vrf_id).await?;
    info!("Checking {} prefixes of VRF {}", prefixes.len(), vrf_id);

    stream::iter(prefixes)
        .map(|prefix| report(inventory, prefix, skip_count))
        .buffered(PREFIX_CONCURRENCY)
        .try_collect()
        .await
}

async fn report(inventory: &Inventory, prefix: Prefix, skip_count: usize) -> Result<PrefixReport, ToolsError> {
    let network = network_prefix(&prefix)?;
    let assigned = inventory.assigned_addresses(&network).await?;

    let allocation = AllocationQuery {
        prefix: &network,
        assigned: &assigned,
        skip_count,
    }
    .run();

    Ok(PrefixReport {
        id: prefix.id,
        url: ui_url(&prefix.url),
        vrf: prefix.vrf.map(|v| v.name),
        status: prefix.status.label,
        skip_count,
        allocation,
    })
}
