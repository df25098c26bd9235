//! TXT record lookups.

use crate::error::Result;
use async_trait::async_trait;
use hickory_resolver::config::ResolverConfig;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::{Resolver, TokioResolver};

/// DNS zone DuckDNS subdomains live under.
pub const DUCKDNS_ZONE: &str = "duckdns.org";

/// Source of TXT records.
#[async_trait]
pub trait TxtResolver: Send + Sync {
    /// All TXT values published for `name`, empty when there are none.
    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>>;
}

/// TXT resolver backed by the system DNS configuration.
pub struct HickoryTxtResolver {
    resolver: TokioResolver,
}

impl HickoryTxtResolver {
    /// Create a resolver from the system configuration.
    ///
    /// Falls back to the default public resolvers when the system
    /// configuration cannot be read.
    pub fn new() -> Self {
        let resolver = match TokioResolver::builder_tokio() {
            Ok(builder) => builder.build(),
            Err(e) => {
                tracing::warn!("Could not read system resolver configuration: {}", e);
                Resolver::builder_with_config(
                    ResolverConfig::default(),
                    TokioConnectionProvider::default(),
                )
                .build()
            }
        };

        Self { resolver }
    }
}

impl Default for HickoryTxtResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TxtResolver for HickoryTxtResolver {
    async fn lookup_txt(&self, name: &str) -> Result<Vec<String>> {
        let fqdn = if name.ends_with('.') {
            name.to_string()
        } else {
            format!("{}.", name)
        };

        match self.resolver.txt_lookup(fqdn.as_str()).await {
            Ok(lookup) => Ok(lookup
                .iter()
                .map(|txt| {
                    txt.txt_data()
                        .iter()
                        .map(|part| String::from_utf8_lossy(part))
                        .collect::<String>()
                })
                .collect()),
            Err(e) if e.is_no_records_found() || e.is_nx_domain() => {
                tracing::debug!("No TXT record for {}", fqdn);
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Qualify a bare DuckDNS subdomain, e.g. `example` -> `example.duckdns.org`.
pub fn qualify(domain: &str) -> String {
    if domain.contains('.') {
        domain.to_string()
    } else {
        format!("{}.{}", domain, DUCKDNS_ZONE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualify() {
        assert_eq!(qualify("example"), "example.duckdns.org");
        assert_eq!(qualify("example.duckdns.org"), "example.duckdns.org");
    }
}
