// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use junction_store::MemStore;
use junction_supervisor::{Supervisor, SupervisorConfig};

/// junctiond — runs one hub process: connector registry, event bus,
/// rule/alarm engine, reconnect and health loops (§7).
#[derive(Parser)]
struct Args {
    /// Path to the supervisor's TOML config file.
    #[arg(long, default_value = "junctiond.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let args = Args::parse();
    let config = SupervisorConfig::load(&args.config)?;

    let store: Arc<dyn junction_store::RuleStore> = match &config.store_path {
        Some(path) => Arc::new(MemStore::open(path.clone())?),
        None => Arc::new(MemStore::new()),
    };

    let supervisor = Supervisor::new(config, store);
    supervisor.boot().await?;

    tracing::info!("junctiond booted");
    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    supervisor.shutdown().await;
    Ok(())
}
