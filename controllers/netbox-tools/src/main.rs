//! NetBox Tools
//!
//! Command-line IT-operations tools over a NetBox inventory:
//! - check-prefix: utilization and next free address of a prefix or a whole VRF
//! - validate-vrfs: prefixes of one VRF that overlap another VRF
//! - serial: next free asset serial in the virtual machine names
//! - vm-ip: next address for a VM, optionally assigned to it in NetBox
//!
//! Results go to stdout; logs go to stderr.

mod backoff;
mod cli;
mod config;
mod error;
mod inventory;
mod profile;
mod render;
mod session;
#[cfg(test)]
mod test_utils;
mod tools;

use crate::cli::{Cli, Commands, OutputFormat};
use crate::config::{SerialConfig, ToolsConfig};
use crate::error::ToolsError;
use crate::inventory::Inventory;
use crate::profile::ReservationProfile;
use crate::session::SessionStore;
use clap::Parser;
use ipam_engine::CollisionMode;
use netbox_client::NetBoxClient;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), ToolsError> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting NetBox Tools");

    let config = ToolsConfig::from_cli(&cli)?;

    info!("Configuration:");
    info!("  NetBox URL: {}", config.netbox_url);
    info!("  Retry attempts: {}", config.retry.attempts);

    let client = NetBoxClient::new(config.netbox_url.clone(), config.netbox_token.clone())?;
    let inventory = Inventory::new(Arc::new(client), config.retry);
    inventory.validate().await?;

    let output = run(cli.command, &inventory, cli.output).await?;
    println!("{}", output);

    Ok(())
}

/// Run one command and render its result
async fn run(command: Commands, inventory: &Inventory, format: OutputFormat) -> Result<String, ToolsError> {
    match command {
        Commands::Vrfs => {
            let vrfs = tools::list_vrfs(inventory).await?;
            render::render_vrfs(&vrfs, format)
        }

        Commands::CheckPrefix { prefix_id, vrf, profile, skip } => {
            let skip_count = profile.resolve(skip);
            let reports = match (prefix_id, vrf) {
                (Some(prefix_id), _) => {
                    vec![tools::prefix_checker::check_prefix(inventory, prefix_id, skip_count).await?]
                }
                (None, Some(vrf_id)) => tools::prefix_checker::check_vrf(inventory, vrf_id, skip_count).await?,
                (None, None) => {
                    return Err(ToolsError::InvalidArguments("either --prefix-id or --vrf is required".to_string()));
                }
            };
            render::render_prefix_reports(&reports, format)
        }

        Commands::ValidateVrfs { primary, secondary, first_match } => {
            let mode = if first_match { CollisionMode::FirstMatch } else { CollisionMode::AccumulateAll };
            let report = tools::prefix_validator::validate_vrfs(inventory, primary, secondary, mode).await?;
            render::render_validation(&report, format)
        }

        Commands::Serial { actions, index, window, pattern } => {
            let serial_config = SerialConfig::new(pattern.as_deref(), window)?;
            let store = SessionStore::new(serial_config.window);
            let views = tools::serial_checker::run_serial(inventory, &store, &serial_config, &actions, index).await?;
            render::render_serial(&views, format)
        }

        Commands::VmIp { prefix_id, skip, apply, vm_name } => {
            if !apply && vm_name.is_some() {
                warn!("--vm-name has no effect without --apply");
            }
            let skip_count = ReservationProfile::Vm.resolve(skip);
            let target = if apply { vm_name.as_deref() } else { None };
            let report = tools::vm_tool::suggest_vm_address(inventory, prefix_id, skip_count, target).await?;
            render::render_vm_address(&report, format)
        }
    }
}
