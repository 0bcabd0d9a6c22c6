//! Store configuration resolved from CLI flags and the process environment.
//!
//! The Supabase pair (`SUPABASE_URL` + `SUPABASE_SERVICE_ROLE_KEY`) selects the
//! PostgREST backend. A bare `DATABASE_URL` selects direct PostgreSQL. Anything
//! else is a fatal startup error.

use anyhow::{bail, Result};

pub const ENV_SUPABASE_URL: &str = "SUPABASE_URL";
pub const ENV_SERVICE_KEY: &str = "SUPABASE_SERVICE_ROLE_KEY";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    Rest { url: String, service_key: String },
    Postgres { database_url: String },
}

impl StoreConfig {
    /// Resolve the backend from optional settings (already merged from flags
    /// and env by clap). Blank values count as missing.
    pub fn resolve(
        supabase_url: Option<&str>,
        service_key: Option<&str>,
        database_url: Option<&str>,
    ) -> Result<Self> {
        let supabase_url = non_blank(supabase_url);
        let service_key = non_blank(service_key);
        let database_url = non_blank(database_url);

        match (supabase_url, service_key) {
            (Some(url), Some(key)) => Ok(StoreConfig::Rest {
                url: url.trim_end_matches('/').to_string(),
                service_key: key.to_string(),
            }),
            (Some(_), None) => bail!("{ENV_SERVICE_KEY} is required when {ENV_SUPABASE_URL} is set"),
            (None, Some(_)) => bail!("{ENV_SUPABASE_URL} is required when {ENV_SERVICE_KEY} is set"),
            (None, None) => match database_url {
                Some(db) => Ok(StoreConfig::Postgres {
                    database_url: db.to_string(),
                }),
                None => bail!(
                    "{ENV_SUPABASE_URL} and {ENV_SERVICE_KEY} are required \
                     (or set {ENV_DATABASE_URL} for a direct connection)"
                ),
            },
        }
    }
}

fn non_blank(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}
