//! PIN resolution.

use super::Database;
use crate::store::{unique, Employee};
use anyhow::Result;

impl Database {
    /// Look up the active employee holding `pin`.
    ///
    /// Fetches at most two rows so an ambiguous PIN (shared by two active
    /// employees) is detected without scanning further, and resolves to `None`.
    pub(super) async fn get_active_employee_by_pin(&self, pin: &str) -> Result<Option<Employee>> {
        let rows = sqlx::query_as::<_, Employee>(
            "SELECT id::text AS id
             FROM employees
             WHERE pin = $1 AND active = true
             LIMIT 2",
        )
        .bind(pin)
        .fetch_all(&self.pool)
        .await?;
        Ok(unique(rows))
    }
}
