//! se4d — standalone SE4 health daemon.
//!
//! Serves `/service/*` for a host whose health is checked by the probes
//! declared in its config file, or runs those probes once from the
//! command line.
//!
//! # Usage
//!
//! ```text
//! se4d serve --port 8000 --config /etc/se4d.toml
//! se4d check --config /etc/se4d.toml --mode asg
//! ```

mod config;

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};

use se4_api::ServiceContext;
use se4_health::{ReportMode, Runner};

use crate::config::DaemonConfig;

#[derive(Parser)]
#[command(name = "se4d", about = "SE4 service health daemon")]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the SE4 endpoints.
    Serve {
        /// Port to listen on.
        #[arg(long, default_value = "8000")]
        port: u16,

        /// Path to se4d.toml.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Per-probe timeout, overriding the config file (e.g. "2s").
        #[arg(long)]
        probe_timeout: Option<String>,
    },
    /// Run the configured probes once and print the report.
    Check {
        /// Path to se4d.toml.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Which view to run.
        #[arg(long, value_enum, default_value = "all")]
        mode: Mode,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    All,
    Asg,
    Gtg,
}

impl From<Mode> for ReportMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::All => ReportMode::All,
            Mode::Asg => ReportMode::AsgOnly,
            Mode::Gtg => ReportMode::GtgOnly,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    match cli.command {
        Command::Serve {
            port,
            config,
            probe_timeout,
        } => run_serve(port, config.as_deref(), probe_timeout.as_deref()).await,
        Command::Check { config, mode } => run_check(config.as_deref(), mode.into()).await,
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,se4d=debug,se4=debug"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<DaemonConfig> {
    match path {
        Some(path) => {
            let config = DaemonConfig::from_file(path)?;
            info!(path = ?path, probes = config.probes.len(), "config loaded");
            Ok(config)
        }
        None => {
            info!("no config file given, serving empty build info and no probes");
            Ok(DaemonConfig::default())
        }
    }
}

fn build_context(config: &DaemonConfig, timeout: Duration) -> ServiceContext {
    let ctx = ServiceContext::new(config.build.clone())
        .with_runner(Runner::new().with_timeout(timeout));
    for def in config.test_definitions() {
        ctx.register(def);
    }
    ctx
}

async fn run_serve(
    port: u16,
    config_path: Option<&Path>,
    timeout_override: Option<&str>,
) -> anyhow::Result<()> {
    info!("se4d starting");

    let config = load_config(config_path)?;
    let timeout = match timeout_override {
        Some(s) => config::parse_probe_timeout(s)?,
        None => config.probe_timeout()?,
    };

    let ctx = build_context(&config, timeout);
    info!(
        tests = ctx.registry().len(),
        timeout = ?timeout,
        artifact = %config.build.artifact_id,
        "service context ready"
    );

    let app = Router::new().route("/", get(|| async { "se4d\n" }));
    let router = se4_api::mount(app, ctx);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    info!(%addr, "HTTP server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!(error = %e, "failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            info!("shutdown signal received");
        })
        .await?;

    info!("se4d stopped");
    Ok(())
}

async fn run_check(config_path: Option<&Path>, mode: ReportMode) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let ctx = build_context(&config, config.probe_timeout()?);

    let report = ctx.report(mode).await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    if report.failed() {
        anyhow::bail!("{:?} healthcheck failed", mode);
    }
    Ok(())
}
