//! DuckDNS response classification.

use std::fmt;

/// Classified result of an update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// DuckDNS answered `OK`.
    Success,
    /// DuckDNS answered `KO`: bad token or domain, nothing was changed.
    Rejected,
    /// Neither `OK` nor `KO`, usually a non-2xx status.
    Failed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "success"),
            Outcome::Rejected => write!(f, "rejected"),
            Outcome::Failed => write!(f, "failed"),
        }
    }
}

/// A completed DuckDNS exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: u16,
    body: String,
    outcome: Outcome,
}

impl Response {
    /// Classify an HTTP status and body.
    pub fn classify(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        let outcome = classify_body(&body);
        Self {
            status,
            body,
            outcome,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_success(&self) -> bool {
        self.outcome == Outcome::Success
    }

    /// All non-empty body lines joined with `", "`.
    pub fn summary(&self) -> String {
        self.body
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn classify_body(body: &str) -> Outcome {
    let first = body.lines().next().unwrap_or_default().trim();
    if first.starts_with("OK") {
        Outcome::Success
    } else if first.starts_with("KO") {
        Outcome::Rejected
    } else {
        Outcome::Failed
    }
}
