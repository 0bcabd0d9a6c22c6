//! # Main: CLI Entry Point
//!
//! ## Subcommands
//!
//! - `serve`: run the HTTP server for the clock-in form.
//! - `jobs`: print the open job list.
//! - `clock-in`: submit one time entry (and optional material) from the shell.
//!
//! ## Global Options
//!
//! - `--supabase-url` / `SUPABASE_URL` and `--service-key` /
//!   `SUPABASE_SERVICE_ROLE_KEY`: PostgREST backend.
//! - `--database-url` / `DATABASE_URL`: direct PostgreSQL backend.

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "timeclock", about = "Clock crew hours and materials against open jobs")]
struct Cli {
    /// Supabase project URL (or set SUPABASE_URL env var)
    #[arg(long, env = "SUPABASE_URL", global = true)]
    supabase_url: Option<String>,

    /// Supabase service-role key (or set SUPABASE_SERVICE_ROLE_KEY env var)
    #[arg(long, env = "SUPABASE_SERVICE_ROLE_KEY", hide_env_values = true, global = true)]
    service_key: Option<String>,

    /// PostgreSQL connection URL, used when no Supabase pair is configured
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Port to listen on
        #[arg(long, env = "PORT", default_value_t = 3000)]
        port: u16,
        /// Directory of static files to serve for non-API paths
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
    /// List open jobs, newest first
    Jobs,
    /// Record hours (and optionally a material) against a job
    ClockIn {
        /// Employee PIN
        #[arg(long)]
        pin: String,
        /// Job identifier (see `timeclock jobs`)
        #[arg(long)]
        job_id: String,
        /// Hours worked
        #[arg(long)]
        hours: String,
        /// Material item name; no material is logged when omitted
        #[arg(long)]
        item_name: Option<String>,
        /// Material quantity
        #[arg(long)]
        quantity: Option<String>,
        /// Material cost per unit
        #[arg(long)]
        cost_per_unit: Option<String>,
    },
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // LOG_FORMAT=json for log shippers, human-readable otherwise
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    let rt = tokio::runtime::Runtime::new()?;

    match &cli.command {
        Commands::Serve { port, static_dir } => {
            rt.block_on(cli::run_serve(&cli, *port, static_dir.as_deref()))
        }
        Commands::Jobs => rt.block_on(cli::run_jobs(&cli)),
        Commands::ClockIn { .. } => rt.block_on(cli::run_clock_in(&cli)),
    }
}
