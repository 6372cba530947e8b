//! Example HTTP server guarding dataset routes with acl-guard.

mod config;
mod routes;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

/// acl-guard example server
#[derive(Parser, Debug)]
#[command(name = "acl-guard-example-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listen address (e.g. 0.0.0.0:8087)
    #[arg(long)]
    bind: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_json);

    let mut cfg = AppConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    if let Some(bind) = args.bind {
        cfg.server.bind = bind;
    }

    let enforcer = routes::build_enforcer(&cfg)?;
    let app = routes::build_router(&cfg, enforcer);

    let listener = tokio::net::TcpListener::bind(&cfg.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", cfg.server.bind))?;
    tracing::info!(bind = %cfg.server.bind, source = ?cfg.source, "acl-guard example server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
