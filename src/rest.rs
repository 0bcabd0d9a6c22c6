//! # PostgREST Backend
//!
//! Implements [`Store`] over the Supabase REST API (`{SUPABASE_URL}/rest/v1`),
//! authenticating every request with the service-role key in both the
//! `apikey` and `Authorization: Bearer` headers.
//!
//! | Operation | Request |
//! |-----------|---------|
//! | open jobs | `GET /jobs?select=id,job_name&status=eq.open&order=created_at.desc` |
//! | PIN lookup | `GET /employees?select=id&pin=eq.{pin}&active=eq.true&limit=2` |
//! | time log | `POST /time_logs` (`Prefer: return=minimal`) |
//! | material | `POST /materials` (`Prefer: return=minimal`) |
//!
//! PostgREST reports failures as `{"message", "code", "details", "hint"}`. The
//! `message` becomes the error detail; bodies that are not in that shape fall
//! back to the HTTP status line.

use anyhow::{anyhow, Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::store::{unique, Employee, JobOption, NewMaterial, NewTimeLog, Store};

#[derive(Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    service_key: String,
}

#[derive(Deserialize)]
struct PostgrestError {
    message: String,
}

impl RestStore {
    pub fn new(supabase_url: &str, service_key: &str) -> Result<Self> {
        let parsed = url::Url::parse(supabase_url)
            .with_context(|| format!("invalid SUPABASE_URL: {supabase_url}"))?;
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(RestStore {
            client,
            base_url: format!("{}/rest/v1", parsed.as_str().trim_end_matches('/')),
            service_key: service_key.to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.base_url, table)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    async fn select<T: DeserializeOwned>(&self, table: &str, query: &[(&str, &str)]) -> Result<Vec<T>> {
        let resp = self
            .authed(self.client.get(self.table_url(table)))
            .query(query)
            .send()
            .await?;
        let resp = check_status(resp).await?;
        Ok(resp.json::<Vec<T>>().await?)
    }

    async fn insert<T: serde::Serialize>(&self, table: &str, row: &T) -> Result<()> {
        let resp = self
            .authed(self.client.post(self.table_url(table)))
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;
        check_status(resp).await?;
        Ok(())
    }
}

/// Pass 2xx responses through; turn anything else into an error carrying
/// PostgREST's message.
async fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(anyhow!(error_detail(status, &body)))
}

fn error_detail(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<PostgrestError>(body) {
        Ok(e) if !e.message.is_empty() => e.message,
        _ => status.to_string(),
    }
}

impl Store for RestStore {
    async fn open_jobs(&self) -> Result<Vec<JobOption>> {
        self.select(
            "jobs",
            &[
                ("select", "id,job_name"),
                ("status", "eq.open"),
                ("order", "created_at.desc"),
            ],
        )
        .await
    }

    async fn find_active_employee(&self, pin: &str) -> Result<Option<Employee>> {
        let pin_filter = format!("eq.{pin}");
        let rows: Vec<Employee> = self
            .select(
                "employees",
                &[
                    ("select", "id"),
                    ("pin", pin_filter.as_str()),
                    ("active", "eq.true"),
                    ("limit", "2"),
                ],
            )
            .await?;
        Ok(unique(rows))
    }

    async fn insert_time_log(&self, entry: &NewTimeLog) -> Result<()> {
        self.insert("time_logs", entry).await
    }

    async fn insert_material(&self, entry: &NewMaterial) -> Result<()> {
        self.insert("materials", entry).await
    }

    async fn health_check(&self) -> Result<()> {
        let _: Vec<JobOption> = self
            .select("jobs", &[("select", "id,job_name"), ("limit", "1")])
            .await?;
        Ok(())
    }
}
