//! Action dispatch.
//!
//! A [`Dispatcher`] runs exactly one DuckDNS action per invocation and
//! turns the classified response into either a [`Report`] or an error.

use crate::config::{format_interval, ActionFlags, ClientConfig};
use crate::detector::IpDetector;
use crate::duckdns::{DuckDnsApi, Outcome, Response};
use crate::error::{DuckDnsError, Result};
use crate::scheduler::Scheduler;
use std::fmt;
use tokio_util::sync::CancellationToken;

/// Action requested by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    UpdateIp,
    ClearIp,
    UpdateRecord,
    GetRecord,
    ClearRecord,
}

impl Action {
    /// Pick the action for a set of selector flags.
    ///
    /// When several flags are set the first one in the order update-ip,
    /// clear-ip, update-record, get-record, clear-record wins. No flag at all
    /// means update-ip.
    pub fn select(flags: &ActionFlags) -> Self {
        if flags.update_ip {
            Action::UpdateIp
        } else if flags.clear_ip {
            Action::ClearIp
        } else if flags.update_record {
            Action::UpdateRecord
        } else if flags.get_record {
            Action::GetRecord
        } else if flags.clear_record {
            Action::ClearRecord
        } else {
            Action::UpdateIp
        }
    }

    /// Command-line flag selecting this action.
    pub fn flag(&self) -> &'static str {
        match self {
            Action::UpdateIp => "update-ip",
            Action::ClearIp => "clear-ip",
            Action::UpdateRecord => "update-record",
            Action::GetRecord => "get-record",
            Action::ClearRecord => "clear-record",
        }
    }

    /// Whether this action re-runs on the update interval.
    pub fn repeats(&self) -> bool {
        matches!(self, Action::UpdateIp)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Action::UpdateIp => "update the IP",
            Action::ClearIp => "clear the IP",
            Action::UpdateRecord => "update the TXT record",
            Action::GetRecord => "get the TXT record",
            Action::ClearRecord => "clear the TXT record",
        };
        f.write_str(text)
    }
}

/// Where the dispatcher is in its current invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DispatchState {
    #[default]
    Idle,
    Dispatching,
    Done,
    Failed,
}

/// What a successful invocation produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    /// Classified DuckDNS response (success or KO).
    Response(Response),
    /// TXT value read from DNS.
    Record(String),
}

/// Runs configured actions against a DuckDNS API.
pub struct Dispatcher<A> {
    api: A,
    config: ClientConfig,
    state: DispatchState,
    detector: Option<IpDetector>,
}

impl<A: DuckDnsApi> Dispatcher<A> {
    pub fn new(api: A, config: ClientConfig) -> Self {
        Self {
            api,
            config,
            state: DispatchState::Idle,
            detector: None,
        }
    }

    /// Discover the public addresses again before every IP update.
    ///
    /// A family that cannot be detected falls back to the configured value.
    pub fn with_detector(mut self, detector: IpDetector) -> Self {
        self.detector = Some(detector);
        self
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Run the configured action to completion.
    ///
    /// Update-ip repeats on the configured interval until `cancel` fires;
    /// every other action runs once.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<()> {
        let action = self.config.action();

        if action.repeats() {
            let scheduler = Scheduler::new(self.config.interval);
            let summary = scheduler.run(&mut self, cancel).await?;
            tracing::info!(
                "IP updates stopped after {} firing(s), {} failed",
                summary.firings,
                summary.failures
            );
        } else {
            self.dispatch_action(action).await?;
        }

        Ok(())
    }

    /// Run the configured action once.
    pub async fn dispatch(&mut self) -> Result<Report> {
        let action = self.config.action();
        self.dispatch_action(action).await
    }

    /// Run `action` once.
    ///
    /// A `KO` answer is a successful invocation; an unrecognized answer is
    /// returned as [`DuckDnsError::Http`].
    pub async fn dispatch_action(&mut self, action: Action) -> Result<Report> {
        self.state = DispatchState::Dispatching;
        let result = self.execute(action).await;
        self.state = match result {
            Ok(_) => DispatchState::Done,
            Err(_) => DispatchState::Failed,
        };
        result
    }

    async fn execute(&self, action: Action) -> Result<Report> {
        self.config.validate()?;

        let response = match action {
            Action::UpdateIp => {
                let (ipv4, ipv6) = self.addresses().await;
                if ipv4.is_empty() && ipv6.is_empty() {
                    self.api.update_ip().await?
                } else {
                    self.api.update_ip_with_values(&ipv4, &ipv6).await?
                }
            }
            Action::ClearIp => self.api.clear_ip().await?,
            Action::UpdateRecord => {
                let record = self.required_record(action)?;
                self.api.update_record(record).await?
            }
            Action::ClearRecord => {
                let record = self.required_record(action)?;
                self.api.clear_record(record).await?
            }
            Action::GetRecord => {
                let record = self.api.get_record().await?;
                tracing::info!("TXT Record is {:?}", record);
                return Ok(Report::Record(record));
            }
        };

        self.report(action, response)
    }

    async fn addresses(&self) -> (String, String) {
        let Some(detector) = &self.detector else {
            return (self.config.ipv4.clone(), self.config.ipv6.clone());
        };

        let ipv4 = match detector.detect_ipv4().await {
            Ok(ip) => ip.to_string(),
            Err(e) => {
                tracing::warn!("{}, using configured IPv4 {:?}", e, self.config.ipv4);
                self.config.ipv4.clone()
            }
        };
        let ipv6 = match detector.detect_ipv6().await {
            Ok(ip) => ip.to_string(),
            Err(e) => {
                tracing::warn!("{}, using configured IPv6 {:?}", e, self.config.ipv6);
                self.config.ipv6.clone()
            }
        };

        (ipv4, ipv6)
    }

    fn required_record(&self, action: Action) -> Result<&str> {
        if self.config.record.is_empty() {
            return Err(DuckDnsError::MissingRecord(action));
        }
        Ok(&self.config.record)
    }

    fn report(&self, action: Action, response: Response) -> Result<Report> {
        let summary = response.summary();
        let now = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S");

        match response.outcome() {
            Outcome::Success => {
                tracing::info!("Got response {}", summary);
                match action {
                    Action::UpdateIp => tracing::info!("IP has been updated at {}", now),
                    Action::ClearIp => tracing::info!("IP has been cleared at {}", now),
                    Action::UpdateRecord => tracing::info!(
                        "TXT Record has been updated with {} at {}",
                        self.config.record,
                        now
                    ),
                    Action::ClearRecord => tracing::info!("TXT Record has been cleared at {}", now),
                    Action::GetRecord => {}
                }
            }
            Outcome::Rejected if action.repeats() => tracing::warn!(
                "Got response containing KO, verify the provided arguments, will try again in {}",
                format_interval(self.config.interval)
            ),
            Outcome::Rejected => tracing::warn!(
                "Got response containing KO, verify the provided arguments ({})",
                action.flag()
            ),
            Outcome::Failed => {
                return Err(DuckDnsError::Http {
                    status: response.status(),
                    body: summary,
                })
            }
        }

        Ok(Report::Response(response))
    }
}
