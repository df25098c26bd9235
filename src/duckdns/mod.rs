//! DuckDNS API: request encoding, response classification and the HTTP client.

mod client;
mod request;
mod resolver;
mod response;

#[cfg(test)]
mod tests;

pub use client::{DuckDnsClient, DEFAULT_BASE_URL, USER_AGENT};
pub use request::{Request, RequestKind};
pub use resolver::{qualify, HickoryTxtResolver, TxtResolver, DUCKDNS_ZONE};
pub use response::{Outcome, Response};

use crate::error::Result;
use async_trait::async_trait;

/// Operations offered by DuckDNS.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DuckDnsApi: Send + Sync {
    /// Update the IP, letting DuckDNS use the requester address.
    async fn update_ip(&self) -> Result<Response>;

    /// Update the IP with explicit addresses. An empty `ipv6` is left out.
    async fn update_ip_with_values(&self, ipv4: &str, ipv6: &str) -> Result<Response>;

    /// Clear the IP.
    async fn clear_ip(&self) -> Result<Response>;

    /// Set the TXT record.
    async fn update_record(&self, record: &str) -> Result<Response>;

    /// Clear the TXT record.
    async fn clear_record(&self, record: &str) -> Result<Response>;

    /// Read the TXT record of the first domain, empty when there is none.
    async fn get_record(&self) -> Result<String>;
}
