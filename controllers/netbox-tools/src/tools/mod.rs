//! The tools behind each command
//!
//! Every tool reads the inventory, runs the engine and returns a plain
//! serializable report; printing is left to [`crate::render`].

pub mod prefix_checker;
pub mod prefix_validator;
#[cfg(test)]
mod prefix_validator_test;
pub mod serial_checker;
pub mod vm_tool;
#[cfg(test)]
mod vm_tool_test;

use crate::error::ToolsError;
use crate::inventory::Inventory;
use serde::Serialize;

/// One VRF, for picking IDs
#[derive(Debug, Clone, Serialize)]
pub struct VrfSummary {
    pub id: u64,
    pub name: String,
    pub rd: Option<String>,
    pub prefix_count: Option<u64>,
}

/// Every VRF, sorted by name
pub async fn list_vrfs(inventory: &Inventory) -> Result<Vec<VrfSummary>, ToolsError> {
    let mut vrfs: Vec<VrfSummary> = inventory
        .vrfs()
        .await?
        .into_iter()
        .map(|vrf| VrfSummary {
            id: vrf.id,
            name: vrf.name,
            rd: vrf.rd,
            prefix_count: vrf.prefix_count,
        })
        .collect();
    vrfs.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    Ok(vrfs)
}
