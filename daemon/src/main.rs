//! fleet-monitor: crawl the validator fleet, report incidents and drive
//! validator set proposals.

mod config;
mod report;

use clap::Parser;
use config::MonitorConfig;
use fleet_directory::{DirectoryAdapter, MarkdownDirectory};
use fleet_membership::{CrawlReport, Crawler, Reconciler, Registry};
use fleet_rpc::{MonitorClient, MonitorDumpParser};
use fleet_types::{Coinbase, Enode, Timestamp};
use fleet_utils::{init_logging, LogFormat};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "fleet-monitor", about = "Permissioned validator fleet monitor")]
struct Cli {
    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long, env = "FLEET_CONFIG")]
    config: Option<PathBuf>,

    /// Directory branch to read, e.g. "ibft".
    #[arg(long, env = "FLEET_FEATURE")]
    feature: Option<String>,

    /// Directory URL template; "{feature}" is substituted.
    #[arg(long, env = "FLEET_DIRECTORY_URL")]
    directory_url: Option<String>,

    /// Monitor agent port on every node.
    #[arg(long, env = "FLEET_MONITOR_PORT")]
    monitor_port: Option<u16>,

    /// Monitor agent scheme: "https" or "http".
    #[arg(long, env = "FLEET_MONITOR_SCHEME")]
    scheme: Option<String>,

    /// PEM client certificate for the monitor agents.
    #[arg(long, env = "FLEET_CLIENT_CERT")]
    client_cert: Option<PathBuf>,

    /// PEM private key for the client certificate.
    #[arg(long, env = "FLEET_CLIENT_KEY")]
    client_key: Option<PathBuf>,

    /// Log format: "human" or "json".
    #[arg(long, env = "FLEET_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "FLEET_LOG_LEVEL")]
    log_level: Option<String>,

    /// Print results as JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Crawl the fleet and report incidents.
    Check,
    /// Crawl, then list validators recognized by their own view.
    Validators,
    /// Crawl, then list every node that published a coinbase.
    Volunteers,
    /// Crawl, then ask every validator to vote the candidate in or out.
    Propose {
        #[arg(long)]
        candidate: String,
    },
    /// Ask one directory node for its coinbase.
    Coinbase {
        #[arg(long)]
        enode: String,
    },
    /// Crawl, then tell every visited node to refresh its software.
    Update,
    /// Crawl, then tell every visited monitor agent to update itself.
    VersionUpdate,
    /// Crawl, then GET a monitor path on every visited node, stopping at
    /// the first failure.
    Call {
        #[arg(long)]
        path: String,
    },
}

impl Cli {
    /// Layer CLI flags and env vars over the file configuration.
    fn apply_to(&self, mut config: MonitorConfig) -> MonitorConfig {
        if let Some(feature) = &self.feature {
            config.directory.feature = feature.clone();
        }
        if let Some(url) = &self.directory_url {
            config.directory.base_url = url.clone();
        }
        if let Some(port) = self.monitor_port {
            config.rpc.port = port;
        }
        if let Some(scheme) = &self.scheme {
            config.rpc.scheme = scheme.clone();
        }
        if self.client_cert.is_some() {
            config.rpc.client_cert = self.client_cert.clone();
        }
        if self.client_key.is_some() {
            config.rpc.client_key = self.client_key.clone();
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Logging needs the configured format, so a bad file is only reported
    // once the subscriber is up.
    let (file_config, load_error) = match &cli.config {
        Some(path) => match MonitorConfig::from_toml_file(path) {
            Ok(cfg) => (cfg, None),
            Err(e) => (MonitorConfig::default(), Some(e)),
        },
        None => (MonitorConfig::default(), None),
    };
    let config = cli.apply_to(file_config);

    init_logging(config.log_format, &config.log_level)?;
    match (&cli.config, load_error) {
        (Some(path), Some(e)) => tracing::warn!("{e}, using defaults instead of {}", path.display()),
        (Some(path), None) => tracing::info!("Loaded config from {}", path.display()),
        _ => {}
    }

    let client = MonitorClient::new(config.rpc.client_config()?)?;
    let directory = MarkdownDirectory::new(config.directory.urls())?;
    let mut registry = load_registry(&directory).await?;

    match cli.command {
        Command::Check => {
            let (report, took) = crawl(&mut registry, &client).await?;
            emit(cli.json, &report, || report::render_check(&report, took))?;
            if !report.is_clean() {
                return Ok(ExitCode::from(2));
            }
        }
        Command::Validators => {
            crawl(&mut registry, &client).await?;
            let nodes = Reconciler::new(&registry, &client).list_validators();
            emit(cli.json, &nodes, || report::render_nodes(&nodes))?;
        }
        Command::Volunteers => {
            crawl(&mut registry, &client).await?;
            let nodes = Reconciler::new(&registry, &client).list_volunteers();
            emit(cli.json, &nodes, || report::render_nodes(&nodes))?;
        }
        Command::Propose { candidate } => {
            crawl(&mut registry, &client).await?;
            let candidate = Coinbase::new(candidate);
            let round = Reconciler::new(&registry, &client).propose(&candidate).await;
            emit(cli.json, &round, || report::render_round(&round))?;
            if !round.succeeded() {
                tracing::error!(candidate = %candidate, "no validator accepted the proposal");
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Coinbase { enode } => {
            let enode = Enode::parse(&enode)?;
            let coinbase = Reconciler::new(&registry, &client).coinbase_of(&enode).await?;
            emit(cli.json, &coinbase, || format!("{coinbase}\n"))?;
        }
        Command::Update => {
            crawl(&mut registry, &client).await?;
            let contacted = Reconciler::new(&registry, &client).broadcast_update().await;
            tracing::info!(contacted, "update broadcast sent");
        }
        Command::VersionUpdate => {
            crawl(&mut registry, &client).await?;
            let contacted = Reconciler::new(&registry, &client)
                .broadcast_version_update()
                .await;
            tracing::info!(contacted, "version update broadcast sent");
        }
        Command::Call { path } => {
            crawl(&mut registry, &client).await?;
            let contacted = Reconciler::new(&registry, &client).broadcast(&path).await?;
            tracing::info!(contacted, %path, "broadcast answered by every visited node");
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Fetch the directory and seed a fresh registry for this run.
async fn load_registry<D: DirectoryAdapter>(directory: &D) -> anyhow::Result<Registry> {
    let entries = directory.entries().await?;
    Ok(Registry::from_entries(entries))
}

async fn crawl(
    registry: &mut Registry,
    client: &MonitorClient,
) -> anyhow::Result<(CrawlReport, Duration)> {
    let started = Instant::now();
    let parser = MonitorDumpParser::new();
    let report = Crawler::new(client, &parser)
        .crawl(registry, Timestamp::now())
        .await?;
    Ok((report, started.elapsed()))
}

/// Print either the JSON form of `value` or its text rendering on stdout.
fn emit<T: Serialize + ?Sized>(
    json: bool,
    value: &T,
    text: impl FnOnce() -> String,
) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text());
    }
    Ok(())
}
