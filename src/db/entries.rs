//! Time and material inserts. Both are plain inserts with no upsert: a
//! resubmitted form produces a second row.

use super::Database;
use crate::store::{NewMaterial, NewTimeLog};
use anyhow::Result;

impl Database {
    pub(super) async fn create_time_log(&self, entry: &NewTimeLog) -> Result<()> {
        sqlx::query(
            "INSERT INTO time_logs (job_id, employee_id, hours)
             VALUES ($1::uuid, $2::uuid, $3)",
        )
        .bind(&entry.job_id)
        .bind(&entry.employee_id)
        .bind(entry.hours)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub(super) async fn create_material(&self, entry: &NewMaterial) -> Result<()> {
        sqlx::query(
            "INSERT INTO materials (job_id, item_name, quantity, cost_per_unit)
             VALUES ($1::uuid, $2, $3, $4)",
        )
        .bind(&entry.job_id)
        .bind(&entry.item_name)
        .bind(entry.quantity)
        .bind(entry.cost_per_unit)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
