//! Fixed-interval IP update loop.

use crate::config::{clamp_interval, format_interval, MAX_INTERVAL};
use crate::dispatcher::{Action, Dispatcher, Report};
use crate::duckdns::DuckDnsApi;
use crate::error::Result;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

/// Counters for a finished schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleSummary {
    /// Number of IP updates attempted.
    pub firings: u64,
    /// Attempts that were rejected or failed.
    pub failures: u64,
}

/// Repeats the IP update every `interval`, starting immediately.
#[derive(Debug, Clone, Copy)]
pub struct Scheduler {
    interval: Duration,
}

impl Scheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: clamp_interval(interval).min(MAX_INTERVAL),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Fire until `cancel` is triggered.
    ///
    /// Rejections and transient errors are logged and the next firing goes
    /// ahead as planned. Late ticks are delayed rather than bunched up. Only
    /// errors that no retry can fix end the loop early.
    pub async fn run<A: DuckDnsApi>(
        &self,
        dispatcher: &mut Dispatcher<A>,
        cancel: CancellationToken,
    ) -> Result<ScheduleSummary> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut summary = ScheduleSummary::default();
        tracing::info!(
            "Updating IP now and every {}",
            format_interval(self.interval)
        );

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            summary.firings += 1;
            match dispatcher.dispatch_action(Action::UpdateIp).await {
                Ok(Report::Response(response)) if !response.is_success() => summary.failures += 1,
                Ok(_) => {}
                Err(e) if e.is_transient() => {
                    summary.failures += 1;
                    tracing::error!(
                        "IP update failed: {}, will try again in {}",
                        e,
                        format_interval(self.interval)
                    );
                }
                Err(e) => return Err(e),
            }
        }

        tracing::debug!("IP update schedule cancelled");
        Ok(summary)
    }
}
