//! Open job listing.

use super::Database;
use crate::store::JobOption;
use anyhow::Result;

impl Database {
    /// Open jobs, most recently created first.
    pub(super) async fn get_open_jobs(&self) -> Result<Vec<JobOption>> {
        let rows = sqlx::query_as::<_, JobOption>(
            "SELECT id::text AS id, job_name
             FROM jobs
             WHERE status = 'open'
             ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
