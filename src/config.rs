//! Configuration management for duckdns-client.
//!
//! Values come from three layers: command-line flags and environment
//! variables (collected by the binary into [`Overrides`]), an optional TOML
//! file ([`FileConfig`]), and built-in defaults.

use crate::dispatcher::Action;
use crate::error::{DuckDnsError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Shortest accepted update interval.
pub const MIN_INTERVAL: Duration = Duration::from_secs(10 * 60);

/// Update interval used when none is configured.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Longest accepted update interval.
pub const MAX_INTERVAL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Action selector flags as given by the operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionFlags {
    pub update_ip: bool,
    pub clear_ip: bool,
    pub update_record: bool,
    pub get_record: bool,
    pub clear_record: bool,
}

/// Fully resolved client configuration handed to the engine.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// DuckDNS account token.
    pub token: String,
    /// Domain names to act on, in the order given.
    pub domains: Vec<String>,
    /// TXT record value for record update/clear.
    pub record: String,
    /// Explicit IPv4 address (empty lets DuckDNS use the requester address).
    pub ipv4: String,
    /// Explicit IPv6 address.
    pub ipv6: String,
    /// Interval between IP updates, never below [`MIN_INTERVAL`].
    pub interval: Duration,
    /// Ask DuckDNS for a verbose response.
    pub verbose: bool,
    /// Discover the public addresses before updating.
    pub auto_ip: bool,
    /// Requested action.
    pub actions: ActionFlags,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            domains: Vec::new(),
            record: String::new(),
            ipv4: String::new(),
            ipv6: String::new(),
            interval: DEFAULT_INTERVAL,
            verbose: false,
            auto_ip: false,
            actions: ActionFlags::default(),
        }
    }
}

/// Values taken from the command line or the environment.
///
/// `None` means "not given", so the file layer or the default applies.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub token: Option<String>,
    pub domains: Option<Vec<String>>,
    pub record: Option<String>,
    pub ipv4: Option<String>,
    pub ipv6: Option<String>,
    pub interval: Option<String>,
    pub verbose: bool,
    pub auto_ip: bool,
    pub actions: ActionFlags,
}

/// On-disk configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// DuckDNS token (or environment variable name if prefixed with $).
    pub token: Option<String>,
    /// DuckDNS subdomains.
    pub domains: Vec<String>,
    /// TXT record value.
    pub record: Option<String>,
    pub ipv4: Option<String>,
    pub ipv6: Option<String>,
    /// Update interval, e.g. "30m" or "1h".
    pub interval: Option<String>,
    pub verbose: bool,
    pub auto_ip: bool,
}

impl FileConfig {
    /// Get the default config file path.
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| DuckDnsError::Config("Could not find config directory".to_string()))?;

        Ok(config_dir.join("duckdns-client").join("config.toml"))
    }

    /// Load configuration from a specific path.
    ///
    /// A missing file yields an empty configuration.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let mut config: FileConfig = toml::from_str(content)?;
        config.token = config.token.as_deref().map(resolve_env);
        config.record = config.record.as_deref().map(resolve_env);
        Ok(config)
    }
}

impl ClientConfig {
    /// Merge the command-line layer over the file layer.
    ///
    /// The interval is parsed and raised to [`MIN_INTERVAL`] when needed.
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self> {
        let interval = match overrides.interval.or(file.interval) {
            Some(raw) => clamp_interval(parse_interval(&raw)?),
            None => DEFAULT_INTERVAL,
        };

        let domains = overrides
            .domains
            .filter(|domains| !domains.is_empty())
            .unwrap_or(file.domains);

        Ok(Self {
            token: overrides.token.or(file.token).unwrap_or_default(),
            domains: normalize_domains(domains),
            record: overrides.record.or(file.record).unwrap_or_default(),
            ipv4: overrides.ipv4.or(file.ipv4).unwrap_or_default(),
            ipv6: overrides.ipv6.or(file.ipv6).unwrap_or_default(),
            interval,
            verbose: overrides.verbose || file.verbose,
            auto_ip: overrides.auto_ip || file.auto_ip,
            actions: overrides.actions,
        })
    }

    /// Check the invariants every request depends on.
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(DuckDnsError::Config(
                "DuckDNS token is empty, provide it with --token or DUCKDNS_TOKEN".to_string(),
            ));
        }
        if self.domains.is_empty() {
            return Err(DuckDnsError::Config(
                "No domain names configured, provide them with --domains or DUCKDNS_DOMAINS"
                    .to_string(),
            ));
        }
        Ok(())
    }

    /// The single action this configuration selects.
    pub fn action(&self) -> Action {
        Action::select(&self.actions)
    }

    /// Configuration as a list of `field -> value` pairs for display.
    ///
    /// The token is masked; unset optional values are left out.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("Token", mask_token(&self.token)),
            ("DomainNames", self.domains.join(",")),
        ];
        if !self.record.is_empty() {
            fields.push(("Record", self.record.clone()));
        }
        if !self.ipv4.is_empty() {
            fields.push(("IPv4", self.ipv4.clone()));
        }
        if !self.ipv6.is_empty() {
            fields.push(("IPv6", self.ipv6.clone()));
        }
        fields.push(("Interval", format_interval(self.interval)));
        if self.verbose {
            fields.push(("Verbose", "true".to_string()));
        }
        if self.auto_ip {
            fields.push(("AutoIP", "true".to_string()));
        }
        fields.push(("Action", self.action().flag().to_string()));
        fields
    }
}

/// Raise intervals below [`MIN_INTERVAL`] to the floor.
pub fn clamp_interval(interval: Duration) -> Duration {
    if interval < MIN_INTERVAL {
        tracing::info!(
            "A time interval below {} is not recommended, setting it to {}",
            format_interval(MIN_INTERVAL),
            format_interval(MIN_INTERVAL)
        );
        MIN_INTERVAL
    } else {
        interval
    }
}

/// Parse an interval such as `90s`, `15m`, `1h30m`. A bare number is minutes.
pub fn parse_interval(raw: &str) -> Result<Duration> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(DuckDnsError::Config("Interval is empty".to_string()));
    }

    let too_large = || DuckDnsError::Config(format!("Invalid interval {:?}: too large", raw));

    if let Ok(minutes) = raw.parse::<u64>() {
        let secs = minutes.checked_mul(60).ok_or_else(too_large)?;
        return within_max(Duration::from_secs(secs)).ok_or_else(too_large);
    }

    let mut total = 0u64;
    let mut digits = String::new();
    for c in raw.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
            continue;
        }

        let unit = match c {
            'h' => 3600,
            'm' => 60,
            's' => 1,
            _ => {
                return Err(DuckDnsError::Config(format!(
                    "Invalid interval {:?}: unknown unit '{}'",
                    raw, c
                )))
            }
        };
        if digits.is_empty() {
            return Err(DuckDnsError::Config(format!(
                "Invalid interval {:?}: missing number",
                raw
            )));
        }
        let value: u64 = digits.parse().map_err(|_| too_large())?;
        total = value
            .checked_mul(unit)
            .and_then(|secs| total.checked_add(secs))
            .ok_or_else(too_large)?;
        digits.clear();
    }

    if !digits.is_empty() {
        return Err(DuckDnsError::Config(format!(
            "Invalid interval {:?}: missing unit after {}",
            raw, digits
        )));
    }

    within_max(Duration::from_secs(total)).ok_or_else(too_large)
}

fn within_max(interval: Duration) -> Option<Duration> {
    (interval <= MAX_INTERVAL).then_some(interval)
}

/// Render an interval in the largest whole unit.
pub fn format_interval(interval: Duration) -> String {
    let secs = interval.as_secs();
    if secs > 0 && secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else if secs > 0 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{}s", secs)
    }
}

fn normalize_domains(domains: Vec<String>) -> Vec<String> {
    domains
        .iter()
        .flat_map(|d| d.split(','))
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}

fn mask_token(token: &str) -> String {
    if token.chars().count() <= 4 {
        "****".to_string()
    } else {
        format!("{}****", token.chars().take(4).collect::<String>())
    }
}

/// Resolve environment variable references (values starting with $).
fn resolve_env(value: &str) -> String {
    if let Some(var_name) = value.strip_prefix('$') {
        std::env::var(var_name).unwrap_or_else(|_| {
            tracing::warn!("Environment variable {} not set", var_name);
            value.to_string()
        })
    } else {
        value.to_string()
    }
}
