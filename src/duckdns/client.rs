//! DuckDNS HTTP client.

use super::request::{Request, RequestKind};
use super::resolver::{qualify, HickoryTxtResolver, TxtResolver};
use super::response::Response;
use super::DuckDnsApi;
use crate::config::ClientConfig;
use crate::error::{DuckDnsError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// DuckDNS API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://www.duckdns.org";

/// User-Agent sent with every request.
pub const USER_AGENT: &str = concat!("duckdns-client/", env!("CARGO_PKG_VERSION"));

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the DuckDNS update endpoint.
pub struct DuckDnsClient {
    client: reqwest::Client,
    base_url: String,
    domains: Vec<String>,
    token: String,
    verbose: bool,
    resolver: Box<dyn TxtResolver>,
}

impl DuckDnsClient {
    /// Create a new DuckDNS client.
    ///
    /// Fails when the token or the domain list is empty.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Self::with_base_url(config, DEFAULT_BASE_URL.to_string())
    }

    /// Create with custom base URL (for testing).
    pub fn with_base_url(config: &ClientConfig, base_url: String) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url,
            domains: config.domains.clone(),
            token: config.token.clone(),
            verbose: config.verbose,
            resolver: Box::new(HickoryTxtResolver::new()),
        })
    }

    /// Replace the TXT resolver.
    pub fn with_resolver(mut self, resolver: impl TxtResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, kind: RequestKind) -> Request {
        Request::new(&self.base_url, &self.domains, &self.token, kind, self.verbose)
    }

    async fn send(&self, request: Request) -> Result<Response> {
        tracing::debug!("Sending DuckDNS update for {}", self.domains.join(","));

        let response = self.client.get(request.url()).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        tracing::debug!("DuckDNS answered HTTP {}: {:?}", status, body);
        Ok(Response::classify(status, body))
    }
}

#[async_trait]
impl DuckDnsApi for DuckDnsClient {
    async fn update_ip(&self) -> Result<Response> {
        self.send(self.request(RequestKind::UpdateIp)).await
    }

    async fn update_ip_with_values(&self, ipv4: &str, ipv6: &str) -> Result<Response> {
        self.send(self.request(RequestKind::UpdateIpWithValues {
            ipv4: ipv4.to_string(),
            ipv6: ipv6.to_string(),
        }))
        .await
    }

    async fn clear_ip(&self) -> Result<Response> {
        self.send(self.request(RequestKind::ClearIp)).await
    }

    async fn update_record(&self, record: &str) -> Result<Response> {
        self.send(self.request(RequestKind::UpdateRecord(record.to_string())))
            .await
    }

    async fn clear_record(&self, record: &str) -> Result<Response> {
        self.send(self.request(RequestKind::ClearRecord(record.to_string())))
            .await
    }

    async fn get_record(&self) -> Result<String> {
        let domain = self
            .domains
            .first()
            .map(|d| qualify(d))
            .ok_or_else(|| DuckDnsError::Config("No domain names configured".to_string()))?;

        // DuckDNS keeps a single TXT record per domain.
        let records = self.resolver.lookup_txt(&domain).await?;
        Ok(records.into_iter().next().unwrap_or_default())
    }
}
