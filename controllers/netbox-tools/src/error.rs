//! Tool-specific error types.
//!
//! Wraps the client and engine errors and adds the failures that only the
//! command-line front-end can hit.

use ipam_engine::{EngineError, InvalidAddressError, InvalidGrammarError, InvalidPrefixError};
use netbox_client::NetBoxError;
use thiserror::Error;

/// Errors that can occur while running a tool.
#[derive(Debug, Error)]
pub enum ToolsError {
    /// NetBox API error
    #[error("NetBox error: {0}")]
    NetBox(#[from] NetBoxError),

    /// Inventory data the engine rejected
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// No available IPs in prefix
    #[error("No available IPs in prefix: {0}")]
    NoAvailableIPs(String),

    /// No virtual machine with this name
    #[error("Virtual machine not found: {0}")]
    VmNotFound(String),

    /// Command arguments that do not fit together
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Output could not be rendered
    #[error("Render error: {0}")]
    Render(#[from] serde_json::Error),
}

impl From<InvalidPrefixError> for ToolsError {
    fn from(error: InvalidPrefixError) -> Self {
        ToolsError::Engine(error.into())
    }
}

impl From<InvalidAddressError> for ToolsError {
    fn from(error: InvalidAddressError) -> Self {
        ToolsError::Engine(error.into())
    }
}

impl From<InvalidGrammarError> for ToolsError {
    fn from(error: InvalidGrammarError) -> Self {
        ToolsError::Engine(error.into())
    }
}
