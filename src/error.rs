//! Error types for duckdns-client.

use crate::dispatcher::Action;
use thiserror::Error;

/// Result type alias for duckdns-client.
pub type Result<T> = std::result::Result<T, DuckDnsError>;

/// DuckDNS client error types.
#[derive(Error, Debug)]
pub enum DuckDnsError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// TXT record action invoked without a record value.
    #[error("Provided TXT record empty, it needs to be provided with --record to {0}")]
    MissingRecord(Action),

    /// Network/HTTP transport error.
    #[error("Network error: {0}")]
    Network(String),

    /// DNS lookup error.
    #[error("DNS error: {0}")]
    Dns(String),

    /// DuckDNS answered with something that is neither OK nor KO.
    #[error("DuckDNS returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// IP detection error.
    #[error("IP detection failed: {0}")]
    IpDetection(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DuckDnsError {
    /// Whether the next scheduled attempt may succeed where this one failed.
    ///
    /// Configuration problems never fix themselves between firings.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DuckDnsError::Network(_)
                | DuckDnsError::Dns(_)
                | DuckDnsError::Http { .. }
                | DuckDnsError::IpDetection(_)
        )
    }
}

impl From<reqwest::Error> for DuckDnsError {
    fn from(e: reqwest::Error) -> Self {
        DuckDnsError::Network(e.to_string())
    }
}

impl From<hickory_resolver::ResolveError> for DuckDnsError {
    fn from(e: hickory_resolver::ResolveError) -> Self {
        DuckDnsError::Dns(e.to_string())
    }
}

impl From<toml::de::Error> for DuckDnsError {
    fn from(e: toml::de::Error) -> Self {
        DuckDnsError::Config(e.to_string())
    }
}
