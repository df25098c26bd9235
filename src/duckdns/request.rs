//! DuckDNS update request encoding.

/// What an update request asks DuckDNS to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    /// Update the IP, letting DuckDNS use the requester address.
    UpdateIp,
    /// Update the IP with explicit addresses.
    UpdateIpWithValues { ipv4: String, ipv6: String },
    /// Clear the IP.
    ClearIp,
    /// Set the TXT record.
    UpdateRecord(String),
    /// Clear the TXT record.
    ClearRecord(String),
}

/// A single `/update` request.
///
/// Values are placed into the query verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    base_url: String,
    domains: String,
    token: String,
    params: Vec<(&'static str, String)>,
}

impl Request {
    /// Build the request for `kind` against `base_url`.
    pub fn new(
        base_url: &str,
        domains: &[String],
        token: &str,
        kind: RequestKind,
        verbose: bool,
    ) -> Self {
        let mut params = Vec::new();

        match kind {
            RequestKind::UpdateIp => params.push(("ip", String::new())),
            RequestKind::UpdateIpWithValues { ipv4, ipv6 } => {
                params.push(("ip", ipv4));
                if !ipv6.is_empty() {
                    params.push(("ipv6", ipv6));
                }
            }
            RequestKind::ClearIp => params.push(("clear", "true".to_string())),
            RequestKind::UpdateRecord(record) => params.push(("txt", record)),
            RequestKind::ClearRecord(record) => {
                params.push(("txt", record));
                params.push(("clear", "true".to_string()));
            }
        }

        if verbose {
            params.push(("verbose", "true".to_string()));
        }

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            domains: domains.join(","),
            token: token.to_string(),
            params,
        }
    }

    /// Path and query, e.g. `/update?domains=a,b&token=t&ip=`.
    pub fn path(&self) -> String {
        let mut path = format!("/update?domains={}&token={}", self.domains, self.token);
        for (name, value) in &self.params {
            path.push('&');
            path.push_str(name);
            path.push('=');
            path.push_str(value);
        }
        path
    }

    /// Full request URL.
    pub fn url(&self) -> String {
        format!("{}{}", self.base_url, self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.duckdns.org";

    fn domains() -> Vec<String> {
        vec!["example".to_string()]
    }

    #[test]
    fn test_update_ip_has_empty_ip() {
        let request = Request::new(BASE, &domains(), "example-token", RequestKind::UpdateIp, false);
        assert_eq!(
            request.path(),
            "/update?domains=example&token=example-token&ip="
        );
    }

    #[test]
    fn test_domains_keep_order() {
        let domains = vec![
            "zeta".to_string(),
            "alpha".to_string(),
            "mid".to_string(),
        ];
        let request = Request::new(BASE, &domains, "tok", RequestKind::ClearIp, false);
        assert!(request.path().contains("domains=zeta,alpha,mid&token=tok"));
    }

    #[test]
    fn test_update_ip_with_values() {
        let request = Request::new(
            BASE,
            &domains(),
            "example-token",
            RequestKind::UpdateIpWithValues {
                ipv4: "10.10.10.253".to_string(),
                ipv6: "0:0:0:0:0:ffff:a0a:afd".to_string(),
            },
            false,
        );
        assert!(request
            .path()
            .ends_with("&ip=10.10.10.253&ipv6=0:0:0:0:0:ffff:a0a:afd"));
    }

    #[test]
    fn test_update_ip_with_ipv4_only() {
        let request = Request::new(
            BASE,
            &domains(),
            "example-token",
            RequestKind::UpdateIpWithValues {
                ipv4: "10.10.10.253".to_string(),
                ipv6: String::new(),
            },
            false,
        );
        assert!(request.path().ends_with("&ip=10.10.10.253"));
        assert!(!request.path().contains("ipv6"));
    }

    #[test]
    fn test_clear_ip_has_no_ip() {
        let request = Request::new(BASE, &domains(), "example-token", RequestKind::ClearIp, false);
        let path = request.path();
        assert!(path.ends_with("&clear=true"));
        assert!(!path.contains("ip="));
    }

    #[test]
    fn test_record_requests() {
        let record = "docusign=1b0a6754-49b1-4db5-8540-d2c12664b289".to_string();

        let update = Request::new(
            BASE,
            &domains(),
            "example-token",
            RequestKind::UpdateRecord(record.clone()),
            false,
        );
        assert_eq!(
            update.path(),
            format!("/update?domains=example&token=example-token&txt={}", record)
        );

        let clear = Request::new(
            BASE,
            &domains(),
            "example-token",
            RequestKind::ClearRecord(record.clone()),
            false,
        );
        assert!(clear
            .path()
            .ends_with(&format!("&txt={}&clear=true", record)));
    }

    #[test]
    fn test_verbose_is_last() {
        let request = Request::new(BASE, &domains(), "t", RequestKind::ClearIp, true);
        assert!(request.path().ends_with("&clear=true&verbose=true"));
    }

    #[test]
    fn test_url_joins_base() {
        let request = Request::new(
            "http://127.0.0.1:8080/",
            &domains(),
            "t",
            RequestKind::UpdateIp,
            false,
        );
        assert_eq!(
            request.url(),
            "http://127.0.0.1:8080/update?domains=example&token=t&ip="
        );
    }
}
