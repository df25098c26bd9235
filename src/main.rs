//! duckdns-client - DuckDNS dynamic DNS client.

use clap::{ArgGroup, Parser};
use duckdns_client::config::{ActionFlags, ClientConfig, FileConfig, Overrides};
use duckdns_client::detector::IpDetector;
use duckdns_client::dispatcher::{Action, Dispatcher};
use duckdns_client::duckdns::DuckDnsClient;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "duckdns-client")]
#[command(about = "Keep DuckDNS domains pointed at this host and manage their TXT record")]
#[command(version)]
#[command(group(ArgGroup::new("action").multiple(false)))]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// DuckDNS token
    #[arg(long, env = "DUCKDNS_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// DuckDNS domains, comma-separated
    #[arg(long, env = "DUCKDNS_DOMAINS", value_delimiter = ',')]
    domains: Vec<String>,

    /// TXT record value for --update-record and --clear-record
    #[arg(long, env = "DUCKDNS_RECORD")]
    record: Option<String>,

    /// IPv4 address to set instead of the requester address
    #[arg(long, env = "DUCKDNS_IPV4")]
    ipv4: Option<String>,

    /// IPv6 address to set
    #[arg(long, env = "DUCKDNS_IPV6")]
    ipv6: Option<String>,

    /// Update interval, e.g. 30m or 1h (minimum 10m)
    #[arg(long, env = "DUCKDNS_UPDATE_INTERVAL")]
    interval: Option<String>,

    /// Ask DuckDNS for a verbose response and log at debug level
    #[arg(long, env = "DUCKDNS_VERBOSE")]
    verbose: bool,

    /// Discover the public IPv4/IPv6 addresses before every IP update
    #[arg(long, env = "DUCKDNS_AUTO_IP")]
    auto_ip: bool,

    /// Update the IP now and on every interval (default)
    #[arg(long, group = "action")]
    update_ip: bool,

    /// Clear the IP
    #[arg(long, group = "action")]
    clear_ip: bool,

    /// Set the TXT record
    #[arg(long, group = "action")]
    update_record: bool,

    /// Print the TXT record of the first domain
    #[arg(long, group = "action")]
    get_record: bool,

    /// Clear the TXT record
    #[arg(long, group = "action")]
    clear_record: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            token: self.token.clone(),
            domains: Some(self.domains.clone()),
            record: self.record.clone(),
            ipv4: self.ipv4.clone(),
            ipv6: self.ipv6.clone(),
            interval: self.interval.clone(),
            verbose: self.verbose,
            auto_ip: self.auto_ip,
            actions: ActionFlags {
                update_ip: self.update_ip,
                clear_ip: self.clear_ip,
                update_record: self.update_record,
                get_record: self.get_record,
                clear_record: self.clear_record,
            },
        }
    }
}

fn get_config_path(cli_path: Option<PathBuf>) -> Option<PathBuf> {
    if cli_path.is_some() {
        return cli_path;
    }

    let candidates = [
        FileConfig::default_path().ok(),
        Some(PathBuf::from("/etc/duckdns-client/config.toml")),
    ];

    candidates
        .into_iter()
        .flatten()
        .find(|candidate| candidate.exists())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_log_level(cli.verbose))),
        )
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log level used when `RUST_LOG` is not set.
fn default_log_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let file = match get_config_path(cli.config.clone()) {
        Some(path) => {
            tracing::debug!("Loading configuration from {}", path.display());
            FileConfig::load_from(&path)?
        }
        None => FileConfig::default(),
    };

    let config = ClientConfig::resolve(file, cli.overrides())?;
    show_config(&config);

    let client = DuckDnsClient::new(&config)?;
    let auto_ip = config.auto_ip && config.action() == Action::UpdateIp;

    let mut dispatcher = Dispatcher::new(client, config);
    if auto_ip {
        dispatcher = dispatcher.with_detector(IpDetector::new()?);
    }

    let cancel = CancellationToken::new();
    tokio::spawn(wait_for_shutdown(cancel.clone()));

    dispatcher.run(cancel).await?;
    Ok(())
}

fn show_config(config: &ClientConfig) {
    tracing::info!("---------------------------------------");
    tracing::info!("- DuckDNS client configuration -");
    tracing::info!("---------------------------------------");
    for (field, value) in config.summary() {
        tracing::info!("{} : {}", field, value);
    }
    tracing::info!("---------------------------------------");
}

/// Cancel `cancel` on SIGINT or SIGTERM.
#[cfg(unix)]
async fn wait_for_shutdown(cancel: CancellationToken) {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut sigterm, mut sigint) = match (
        signal(SignalKind::terminate()),
        signal(SignalKind::interrupt()),
    ) {
        (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!("Failed to set up signal handlers: {}", e);
            return;
        }
    };

    let received = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };

    tracing::info!("Received {}, shutting down", received);
    cancel.cancel();
}

/// Cancel `cancel` on CTRL-C.
#[cfg(not(unix))]
async fn wait_for_shutdown(cancel: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received CTRL-C, shutting down");
            cancel.cancel();
        }
        Err(e) => tracing::error!("Failed to wait for CTRL-C: {}", e),
    }
}
