//! Engine errors
//!
//! Only malformed input is an error here. Exhausted prefixes, empty pools and
//! empty ledgers are ordinary results and are modeled as data.

use thiserror::Error;

/// A CIDR string could not be parsed into a [`NetworkPrefix`](crate::NetworkPrefix)
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid prefix '{input}': {reason}")]
pub struct InvalidPrefixError {
    /// The rejected input, verbatim
    pub input: String,
    /// Why it was rejected
    pub reason: String,
}

impl InvalidPrefixError {
    pub(crate) fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// An in-use address string could not be parsed
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid address '{0}'")]
pub struct InvalidAddressError(pub String);

/// A serial tag pattern is unusable
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidGrammarError {
    /// The pattern is not a valid regular expression
    #[error("tag pattern does not compile: {0}")]
    Syntax(String),

    /// The pattern has no capture group for the serial digits
    #[error("tag pattern '{0}' has no capture group for the serial")]
    MissingCapture(String),
}

/// Errors raised by the engine
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// Malformed CIDR input
    #[error(transparent)]
    InvalidPrefix(#[from] InvalidPrefixError),

    /// Malformed address input
    #[error(transparent)]
    InvalidAddress(#[from] InvalidAddressError),

    /// Unusable serial tag pattern
    #[error(transparent)]
    InvalidGrammar(#[from] InvalidGrammarError),
}
