//! # Store: Persistence Seam
//!
//! The clock-in workflow talks to its persistent store only through the
//! [`Store`] trait. Two backends implement it:
//!
//! - [`Database`]: direct PostgreSQL through a `sqlx::PgPool`.
//! - [`RestStore`]: the Supabase PostgREST API, authenticated with a
//!   service-role key.
//!
//! [`Backend`] picks one at startup from [`StoreConfig`] and dispatches to it,
//! so the HTTP layer holds a single concrete type.
//!
//! Every operation returns `anyhow::Result`. The error's `Display` string is the
//! detail appended to user-facing messages ("Failed to save time: {detail}").

use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::future::Future;

use crate::config::StoreConfig;
use crate::db::Database;
use crate::rest::RestStore;

// ── Row types ───────────────────────────────────────────────────

/// An open job, projected to what the form needs to render a choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct JobOption {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    pub job_name: String,
}

/// An active employee resolved from a PIN. Only the identity leaves the store.
#[derive(Debug, Clone, PartialEq, Deserialize, sqlx::FromRow)]
pub struct Employee {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
}

/// Ids are opaque text. PostgREST sends uuid/text keys as strings and
/// `int8` identity keys as numbers; both are kept as their textual form.
fn opaque_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Int(i64),
        Uint(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Int(n) => n.to_string(),
        RawId::Uint(n) => n.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewTimeLog {
    pub job_id: String,
    pub employee_id: String,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMaterial {
    pub job_id: String,
    pub item_name: String,
    pub quantity: Option<f64>,
    pub cost_per_unit: Option<f64>,
}

// ── Trait ───────────────────────────────────────────────────────

/// Operations the clock-in workflow needs from persistent storage.
pub trait Store: Send + Sync {
    /// Jobs with `status = 'open'`, newest `created_at` first.
    fn open_jobs(&self) -> impl Future<Output = Result<Vec<JobOption>>> + Send;

    /// The single active employee whose PIN matches exactly.
    ///
    /// `Ok(None)` when no employee matches or when the match is ambiguous.
    fn find_active_employee(
        &self,
        pin: &str,
    ) -> impl Future<Output = Result<Option<Employee>>> + Send;

    fn insert_time_log(&self, entry: &NewTimeLog) -> impl Future<Output = Result<()>> + Send;

    fn insert_material(&self, entry: &NewMaterial) -> impl Future<Output = Result<()>> + Send;

    /// Cheap connectivity probe used by the readiness endpoint.
    fn health_check(&self) -> impl Future<Output = Result<()>> + Send;
}

/// Collapse a lookup result into "exactly one match or nothing".
pub(crate) fn unique<T>(mut rows: Vec<T>) -> Option<T> {
    if rows.len() == 1 {
        rows.pop()
    } else {
        None
    }
}

// ── Backend dispatch ────────────────────────────────────────────

#[derive(Clone)]
pub enum Backend {
    Postgres(Database),
    Rest(RestStore),
}

impl Backend {
    /// Build the backend named by the resolved configuration.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        match config {
            StoreConfig::Rest { url, service_key } => {
                Ok(Backend::Rest(RestStore::new(url, service_key)?))
            }
            StoreConfig::Postgres { database_url } => {
                Ok(Backend::Postgres(Database::connect(database_url).await?))
            }
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Backend::Postgres(_) => "postgres",
            Backend::Rest(_) => "postgrest",
        }
    }
}

impl Store for Backend {
    async fn open_jobs(&self) -> Result<Vec<JobOption>> {
        match self {
            Backend::Postgres(db) => db.open_jobs().await,
            Backend::Rest(rest) => rest.open_jobs().await,
        }
    }

    async fn find_active_employee(&self, pin: &str) -> Result<Option<Employee>> {
        match self {
            Backend::Postgres(db) => db.find_active_employee(pin).await,
            Backend::Rest(rest) => rest.find_active_employee(pin).await,
        }
    }

    async fn insert_time_log(&self, entry: &NewTimeLog) -> Result<()> {
        match self {
            Backend::Postgres(db) => db.insert_time_log(entry).await,
            Backend::Rest(rest) => rest.insert_time_log(entry).await,
        }
    }

    async fn insert_material(&self, entry: &NewMaterial) -> Result<()> {
        match self {
            Backend::Postgres(db) => db.insert_material(entry).await,
            Backend::Rest(rest) => rest.insert_material(entry).await,
        }
    }

    async fn health_check(&self) -> Result<()> {
        match self {
            Backend::Postgres(db) => db.health_check().await,
            Backend::Rest(rest) => rest.health_check().await,
        }
    }
}
