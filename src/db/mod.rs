//! # Database: Direct PostgreSQL Backend
//!
//! Implements [`Store`] with `sqlx::PgPool`, for deployments that reach the
//! Supabase (or any) Postgres instance directly instead of through PostgREST.
//!
//! ## Schema
//!
//! - `jobs`: id, job_name, status, created_at
//! - `employees`: id, pin, active
//! - `time_logs`: job_id, employee_id, hours
//! - `materials`: job_id, item_name, quantity, cost_per_unit
//!
//! See `supabase/migrations/001_timeclock.sql`.
//!
//! Identifiers are opaque to the service: UUID columns are cast to text on the
//! way out and back to `uuid` on insert, so a malformed job id surfaces as an
//! insert error rather than a parse error in Rust.

mod employees;
mod entries;
mod jobs;

use anyhow::Result;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use crate::store::{Employee, JobOption, NewMaterial, NewTimeLog, Store};

#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Open the pool behind the direct-Postgres backend, from `DATABASE_URL`.
    ///
    /// The URL is split by hand so a Supabase pooler user such as
    /// `postgres.<project-ref>` keeps its suffix, which sqlx's own parser drops.
    /// The pooler runs in transaction mode, so prepared statements are not
    /// cached. Four connections cover a crew form: each submission holds one
    /// connection for at most two short inserts.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let url = url::Url::parse(database_url)?;
        let username = urlencoding::decode(url.username())?.into_owned();
        let password = url
            .password()
            .map(|p| urlencoding::decode(p).map(|s| s.into_owned()))
            .transpose()?;
        let mut opts = PgConnectOptions::new()
            .host(url.host_str().unwrap_or("localhost"))
            .port(url.port().unwrap_or(5432))
            .database(url.path().trim_start_matches('/'))
            .username(&username)
            .statement_cache_capacity(0);
        if let Some(ref pw) = password {
            opts = opts.password(pw);
        }
        let pool = PgPoolOptions::new()
            .max_connections(4)
            .connect_with(opts)
            .await?;
        Ok(Database { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl Store for Database {
    async fn open_jobs(&self) -> Result<Vec<JobOption>> {
        self.get_open_jobs().await
    }

    async fn find_active_employee(&self, pin: &str) -> Result<Option<Employee>> {
        self.get_active_employee_by_pin(pin).await
    }

    async fn insert_time_log(&self, entry: &NewTimeLog) -> Result<()> {
        self.create_time_log(entry).await
    }

    async fn insert_material(&self, entry: &NewMaterial) -> Result<()> {
        self.create_material(entry).await
    }

    /// `SELECT 1` against the pool.
    async fn health_check(&self) -> Result<()> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
