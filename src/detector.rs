//! Public IP detection for `--auto-ip`.

use crate::error::{DuckDnsError, Result};
use std::net::IpAddr;
use std::time::Duration;

/// IP detector with multiple fallback services.
pub struct IpDetector {
    client: reqwest::Client,
    ipv4_services: Vec<String>,
    ipv6_services: Vec<String>,
}

impl IpDetector {
    /// Create a new IP detector with default services.
    pub fn new() -> Result<Self> {
        Self::with_services(
            vec![
                "https://api.ipify.org".to_string(),
                "https://icanhazip.com".to_string(),
                "https://ifconfig.me/ip".to_string(),
                "https://ipecho.net/plain".to_string(),
            ],
            vec![
                "https://api6.ipify.org".to_string(),
                "https://v6.ident.me".to_string(),
                "https://ipv6.icanhazip.com".to_string(),
            ],
        )
    }

    /// Create a new IP detector with custom services.
    pub fn with_services(ipv4_services: Vec<String>, ipv6_services: Vec<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            ipv4_services,
            ipv6_services,
        })
    }

    /// Detect public IPv4 address.
    pub async fn detect_ipv4(&self) -> Result<IpAddr> {
        self.detect(&self.ipv4_services, IpAddr::is_ipv4, "IPv4")
            .await
    }

    /// Detect public IPv6 address.
    pub async fn detect_ipv6(&self) -> Result<IpAddr> {
        self.detect(&self.ipv6_services, IpAddr::is_ipv6, "IPv6")
            .await
    }

    async fn detect(
        &self,
        services: &[String],
        family: fn(&IpAddr) -> bool,
        label: &str,
    ) -> Result<IpAddr> {
        for service in services {
            match self.try_service(service).await {
                Ok(ip) if family(&ip) => {
                    tracing::info!("Got {} {} from {}", label, ip, service);
                    return Ok(ip);
                }
                Ok(ip) => {
                    tracing::warn!("Service {} answered {}, which is not {}", service, ip, label);
                }
                Err(e) => {
                    tracing::warn!("Service {} failed: {}", service, e);
                }
            }
        }

        Err(DuckDnsError::IpDetection(format!(
            "All {} detection services failed",
            label
        )))
    }

    /// Try a single IP detection service.
    async fn try_service(&self, url: &str) -> Result<IpAddr> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(DuckDnsError::IpDetection(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let text = response.text().await?;
        let ip_str = text.trim();

        ip_str
            .parse()
            .map_err(|_| DuckDnsError::IpDetection(format!("Invalid IP response: {}", ip_str)))
    }
}
