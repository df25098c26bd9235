//! # duckdns-client
//!
//! A DuckDNS dynamic DNS client written in Rust.
//!
//! ## Features
//!
//! - Keeps one or more DuckDNS domains pointed at the host's IP address
//! - Repeats the update on a fixed interval (10 minutes minimum)
//! - Clears the IP, or sets, reads and clears the domain's TXT record
//! - Optional public IP discovery (`--auto-ip`)
//!
//! ## Usage
//!
//! ```bash
//! # Update every hour, letting DuckDNS use the requester address
//! duckdns-client --token $TOKEN --domains home,office --interval 1h
//!
//! # Set the TXT record
//! duckdns-client --token $TOKEN --domains home --update-record --record "hello"
//!
//! # Read the TXT record
//! duckdns-client --token $TOKEN --domains home --get-record
//! ```

pub mod config;
pub mod detector;
pub mod dispatcher;
pub mod duckdns;
pub mod error;
pub mod scheduler;

pub use config::ClientConfig;
pub use detector::IpDetector;
pub use dispatcher::{Action, Dispatcher};
pub use duckdns::{DuckDnsApi, DuckDnsClient};
pub use error::{DuckDnsError, Result};
pub use scheduler::Scheduler;
