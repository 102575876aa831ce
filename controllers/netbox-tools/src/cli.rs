//! Command-line surface

use crate::profile::ReservationProfile;
use crate::session::SerialAction;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(name = "netbox-tools", version)]
#[command(about = "IPAM and asset-number tools over a NetBox inventory", long_about = None)]
pub struct Cli {
    /// NetBox base URL
    #[arg(long, env = "NETBOX_URL", default_value = "http://netbox.netbox:80")]
    pub netbox_url: String,

    /// NetBox API token
    #[arg(long, env = "NETBOX_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Attempts per NetBox call when it fails transiently
    #[arg(long, env = "NBTOOLS_RETRY_ATTEMPTS", default_value_t = 3)]
    pub retry_attempts: u32,

    /// Longest wait between two attempts, in seconds
    #[arg(long, env = "NBTOOLS_RETRY_MAX_SECONDS", default_value_t = 8)]
    pub retry_max_seconds: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List VRFs with their IDs
    Vrfs,

    /// Utilization and next free address of one prefix or of every prefix in a VRF
    CheckPrefix {
        /// NetBox prefix ID
        #[arg(long, conflicts_with = "vrf", required_unless_present = "vrf")]
        prefix_id: Option<u64>,

        /// NetBox VRF ID, checks all of its prefixes
        #[arg(long)]
        vrf: Option<u64>,

        /// Leading hosts kept out of allocation
        #[arg(long, value_enum, default_value_t = ReservationProfile::Gateway)]
        profile: ReservationProfile,

        /// Explicit number of leading hosts to skip (overrides --profile)
        #[arg(long)]
        skip: Option<usize>,
    },

    /// Report prefixes of one VRF that overlap prefixes of another
    ValidateVrfs {
        /// VRF whose prefixes are checked
        primary: u64,

        /// VRF they are checked against
        secondary: u64,

        /// Record only the first overlap per prefix
        #[arg(long)]
        first_match: bool,
    },

    /// Next free VM serial number
    Serial {
        /// Actions replayed in order against one session
        #[arg(value_enum, default_value = "check")]
        actions: Vec<SerialAction>,

        /// Starting preview index
        #[arg(long, default_value_t = 0)]
        index: usize,

        /// Serials listed past the highest one in use
        #[arg(long, env = "NBTOOLS_SERIAL_WINDOW")]
        window: Option<u16>,

        /// Name pattern; capture group 1 holds the serial digits
        #[arg(long, env = "NBTOOLS_SERIAL_PATTERN")]
        pattern: Option<String>,
    },

    /// Suggest, and optionally create, a VM address in a prefix
    VmIp {
        /// NetBox prefix ID
        #[arg(long)]
        prefix_id: u64,

        /// Leading hosts to skip (defaults to the VM profile)
        #[arg(long)]
        skip: Option<usize>,

        /// Create the address and make it the VM's primary address
        #[arg(long, requires = "vm_name")]
        apply: bool,

        /// VM that receives the address on its NIC-<name> interface
        #[arg(long)]
        vm_name: Option<String>,
    },
}

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned tables
    Table,
    /// Pretty-printed JSON
    Json,
}
