//! # CLI Execution Functions
//!
//! Execution logic for each subcommand, kept out of `main.rs`. Every command
//! resolves the store backend first, so missing credentials fail before any
//! work starts.

use anyhow::{bail, Result};
use std::path::Path;
use timeclock::clock_in::{self, ClockInForm};
use timeclock::config::StoreConfig;
use timeclock::store::Backend;
use timeclock::{jobs, server};
use tracing::info;

use super::{Cli, Commands};

async fn connect(cli: &Cli) -> Result<Backend> {
    let config = StoreConfig::resolve(
        cli.supabase_url.as_deref(),
        cli.service_key.as_deref(),
        cli.database_url.as_deref(),
    )?;
    let backend = Backend::connect(&config).await?;
    info!(backend = backend.kind(), "store configured");
    Ok(backend)
}

pub async fn run_serve(cli: &Cli, port: u16, static_dir: Option<&Path>) -> Result<()> {
    let store = connect(cli).await?;
    server::run(port, store, static_dir).await
}

pub async fn run_jobs(cli: &Cli) -> Result<()> {
    let store = connect(cli).await?;
    let listing = jobs::list_open_jobs(&store).await;
    if let Some(err) = listing.error {
        bail!("failed to load jobs: {err}");
    }
    if listing.jobs.is_empty() {
        eprintln!("No open jobs.");
    }
    for job in &listing.jobs {
        println!("{}\t{}", job.id, job.job_name);
    }
    Ok(())
}

pub async fn run_clock_in(cli: &Cli) -> Result<()> {
    let Commands::ClockIn {
        pin,
        job_id,
        hours,
        item_name,
        quantity,
        cost_per_unit,
    } = &cli.command
    else {
        bail!("run_clock_in called for a different subcommand");
    };
    let form = ClockInForm {
        pin: pin.clone(),
        job_id: job_id.clone(),
        hours: hours.clone(),
        item_name: item_name.clone(),
        quantity: quantity.clone(),
        cost_per_unit: cost_per_unit.clone(),
    };

    let store = connect(cli).await?;
    let result = clock_in::process(&store, &form).await;
    println!("{}", serde_json::to_string(&result)?);
    if !result.ok {
        bail!("clock-in failed");
    }
    Ok(())
}
