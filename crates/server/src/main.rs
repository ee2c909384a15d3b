//! Fixpoint server
//!
//! JSON HTTP service for g(x) suggestions and fixed-point solving.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use fixpoint_server::config::{CliArgs, LogLevel, build_config};
use fixpoint_server::routes::routes;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Fixpoint server - suggest g(x) rearrangements and run fixed-point iteration
#[derive(Parser, Debug)]
#[command(name = "fixpoint-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (TOML format)
    #[arg(short, long, value_name = "FILE", env = "FIXPOINT_CONFIG")]
    config: Option<PathBuf>,

    /// Host address to bind to
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<LogLevel>,
}

impl From<Args> for CliArgs {
    fn from(args: Args) -> Self {
        CliArgs {
            config_file: args.config,
            host: args.host,
            port: args.port,
            log_level: args.log_level,
        }
    }
}

fn init_tracing(log_level: LogLevel) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level.as_filter_str())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli: CliArgs = Args::parse().into();
    let config = build_config(&cli).context("invalid configuration")?;

    init_tracing(config.log_level);

    tracing::info!("Fixpoint server v{}", fixpoint_server::VERSION);
    tracing::info!(
        host = %config.host,
        port = %config.port,
        log_level = %config.log_level,
        body_limit = config.body_limit,
        max_iter_limit = config.max_iter_limit,
        "Server configuration loaded"
    );

    let addr = config.socket_addr()?;
    let (bound, server) = warp::serve(routes(config.body_limit, config.max_iter_limit))
        .try_bind_with_graceful_shutdown(addr, async {
            if tokio::signal::ctrl_c().await.is_err() {
                tracing::warn!("cannot listen for shutdown signal");
            }
        })
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(address = %bound, "Listening");
    server.await;
    tracing::info!("Shut down");

    Ok(())
}
