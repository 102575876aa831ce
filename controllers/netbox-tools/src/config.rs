//! Typed configuration
//!
//! Flags and their environment fallbacks are parsed by clap; this module
//! checks them and turns them into the records the tools run with.

use crate::cli::Cli;
use crate::error::ToolsError;
use ipam_engine::{TagGrammar, DEFAULT_LIST_WINDOW};

/// Retry settings for NetBox calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per call, at least 1
    pub attempts: u32,
    /// First delay, in seconds
    pub min_seconds: u64,
    /// Delay cap, in seconds
    pub max_seconds: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            min_seconds: 1,
            max_seconds: 8,
        }
    }
}

/// Connection settings shared by every command
#[derive(Debug, Clone)]
pub struct ToolsConfig {
    pub netbox_url: String,
    pub netbox_token: String,
    pub retry: RetryPolicy,
}

impl ToolsConfig {
    /// Validate the global flags
    pub fn from_cli(cli: &Cli) -> Result<Self, ToolsError> {
        let netbox_url = cli.netbox_url.trim().to_string();
        if !(netbox_url.starts_with("http://") || netbox_url.starts_with("https://")) {
            return Err(ToolsError::InvalidConfig(format!(
                "NETBOX_URL must be an http(s) URL, got '{}'",
                netbox_url
            )));
        }

        let netbox_token = cli
            .token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ToolsError::InvalidConfig(
                "NETBOX_TOKEN environment variable is required".to_string()
            ))?
            .to_string();

        if cli.retry_attempts == 0 {
            return Err(ToolsError::InvalidConfig(
                "NBTOOLS_RETRY_ATTEMPTS must be at least 1".to_string()
            ));
        }

        Ok(Self {
            netbox_url,
            netbox_token,
            retry: RetryPolicy {
                attempts: cli.retry_attempts,
                max_seconds: cli.retry_max_seconds,
                ..RetryPolicy::default()
            },
        })
    }
}

/// Settings of the serial checker
#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub grammar: TagGrammar,
    pub window: u16,
}

impl SerialConfig {
    /// Compile the tag pattern, falling back to the built-in grammar
    pub fn new(pattern: Option<&str>, window: Option<u16>) -> Result<Self, ToolsError> {
        let grammar = match pattern {
            Some(pattern) => TagGrammar::new(pattern)?,
            None => TagGrammar::default(),
        };

        Ok(Self {
            grammar,
            window: window.unwrap_or(DEFAULT_LIST_WINDOW),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["netbox-tools"];
        argv.extend_from_slice(args);
        argv.push("vrfs");
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_valid_config() {
        let config = ToolsConfig::from_cli(&cli(&[
            "--netbox-url", "https://netbox.example.com",
            "--token", "abc",
            "--retry-attempts", "5",
        ]))
        .unwrap();

        assert_eq!(config.netbox_url, "https://netbox.example.com");
        assert_eq!(config.netbox_token, "abc");
        assert_eq!(config.retry.attempts, 5);
        assert_eq!(config.retry.min_seconds, 1);
    }

    #[test]
    fn test_blank_token_rejected() {
        let err = ToolsConfig::from_cli(&cli(&["--netbox-url", "http://netbox", "--token", "  "])).unwrap_err();
        assert!(matches!(err, ToolsError::InvalidConfig(_)));
    }

    #[test]
    fn test_non_http_url_rejected() {
        let err = ToolsConfig::from_cli(&cli(&["--netbox-url", "netbox:80", "--token", "abc"])).unwrap_err();
        assert!(matches!(err, ToolsError::InvalidConfig(_)));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let err = ToolsConfig::from_cli(&cli(&[
            "--netbox-url", "http://netbox",
            "--token", "abc",
            "--retry-attempts", "0",
        ]))
        .unwrap_err();
        assert!(matches!(err, ToolsError::InvalidConfig(_)));
    }

    #[test]
    fn test_serial_config_defaults_and_override() {
        let config = SerialConfig::new(None, None).unwrap();
        assert_eq!(config.window, DEFAULT_LIST_WINDOW);
        assert!(config.grammar.extract("AB12CDE0042").is_some());

        let config = SerialConfig::new(Some(r"^vm-(\d{4})$"), Some(10)).unwrap();
        assert_eq!(config.window, 10);
        assert!(config.grammar.extract("vm-0042").is_some());

        assert!(matches!(SerialConfig::new(Some("vm-(\\d{4}"), None), Err(ToolsError::Engine(_))));
    }
}
