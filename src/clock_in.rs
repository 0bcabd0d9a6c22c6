//! # Clock-In: Time and Material Submission
//!
//! Turns one submitted form into at most two inserts:
//!
//! ```text
//! validate fields ──▶ resolve PIN ──▶ insert time_logs ──▶ [insert materials]
//!       │                  │                 │                    │
//!   MissingFields      InvalidPin     TimeLogFailed      MaterialFailed
//!   (nothing saved)  (nothing saved)  (nothing saved)   (time already saved)
//! ```
//!
//! The first failure stops the chain. A material failure is a partial success:
//! the time entry is committed and is not rolled back, so the message tells
//! the user not to resubmit hours.
//!
//! Submissions are not idempotent. Posting the same form twice creates two
//! time entries.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::store::{NewMaterial, NewTimeLog, Store};

/// Raw form fields exactly as submitted. Numbers stay text until validated.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClockInForm {
    #[serde(default)]
    pub pin: String,
    #[serde(default)]
    pub job_id: String,
    #[serde(default)]
    pub hours: String,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default)]
    pub cost_per_unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClockInError {
    #[error("Enter PIN, select a job, and enter hours.")]
    MissingFields,
    #[error("Invalid PIN.")]
    InvalidPin,
    #[error("Failed to save time: {0}")]
    TimeLogFailed(String),
    #[error("Time saved, but materials failed: {0}")]
    MaterialFailed(String),
}

impl ClockInError {
    /// Metric label for this outcome.
    pub fn outcome(&self) -> &'static str {
        match self {
            ClockInError::MissingFields => "missing_fields",
            ClockInError::InvalidPin => "invalid_pin",
            ClockInError::TimeLogFailed(_) => "time_log_failed",
            ClockInError::MaterialFailed(_) => "material_failed",
        }
    }
}

/// The `{ok, error}` object returned to the form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResult {
    pub ok: bool,
    pub error: Option<String>,
}

impl From<Result<(), ClockInError>> for SubmitResult {
    fn from(r: Result<(), ClockInError>) -> Self {
        match r {
            Ok(()) => SubmitResult {
                ok: true,
                error: None,
            },
            Err(e) => SubmitResult {
                ok: false,
                error: Some(e.to_string()),
            },
        }
    }
}

/// A form that passed field validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSubmission {
    pub pin: String,
    pub job_id: String,
    pub hours: f64,
    pub material: Option<MaterialLine>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MaterialLine {
    pub item_name: String,
    pub quantity: Option<f64>,
    pub cost_per_unit: Option<f64>,
}

/// Parse a form number. Blank, non-numeric, NaN and infinite all yield `None`.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

impl ClockInForm {
    /// Check required fields and parse numbers. Does not touch the store.
    pub fn validate(&self) -> Result<ValidSubmission, ClockInError> {
        let pin = self.pin.trim();
        let job_id = self.job_id.trim();
        let hours = parse_number(&self.hours).filter(|h| *h > 0.0);

        let hours = match hours {
            Some(h) if !pin.is_empty() && !job_id.is_empty() => h,
            _ => return Err(ClockInError::MissingFields),
        };

        let material = self
            .item_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| MaterialLine {
                item_name: name.to_string(),
                quantity: self.quantity.as_deref().and_then(parse_number),
                cost_per_unit: self.cost_per_unit.as_deref().and_then(parse_number),
            });

        Ok(ValidSubmission {
            pin: pin.to_string(),
            job_id: job_id.to_string(),
            hours,
            material,
        })
    }
}

/// Run the full clock-in chain against `store`.
pub async fn submit<S: Store>(store: &S, form: &ClockInForm) -> Result<(), ClockInError> {
    let sub = form.validate().inspect_err(|_| {
        warn!("clock-in rejected: missing or invalid fields");
    })?;

    let employee = match store.find_active_employee(&sub.pin).await {
        Ok(Some(emp)) => emp,
        Ok(None) => {
            warn!(job_id = %sub.job_id, "clock-in rejected: no active employee for PIN");
            return Err(ClockInError::InvalidPin);
        }
        Err(e) => {
            error!(error = %e, "employee lookup failed");
            return Err(ClockInError::InvalidPin);
        }
    };

    let time_log = NewTimeLog {
        job_id: sub.job_id.clone(),
        employee_id: employee.id.clone(),
        hours: sub.hours,
    };
    if let Err(e) = store.insert_time_log(&time_log).await {
        error!(error = %e, job_id = %sub.job_id, "failed to save time log");
        return Err(ClockInError::TimeLogFailed(e.to_string()));
    }
    info!(
        job_id = %sub.job_id,
        employee_id = %employee.id,
        hours = sub.hours,
        "time saved"
    );

    if let Some(line) = sub.material {
        let material = NewMaterial {
            job_id: sub.job_id.clone(),
            item_name: line.item_name,
            quantity: line.quantity,
            cost_per_unit: line.cost_per_unit,
        };
        if let Err(e) = store.insert_material(&material).await {
            error!(error = %e, job_id = %sub.job_id, "time saved but material insert failed");
            return Err(ClockInError::MaterialFailed(e.to_string()));
        }
        info!(job_id = %sub.job_id, item = %material.item_name, "material saved");
    }

    Ok(())
}

/// [`submit`], flattened into the `{ok, error}` object the form expects.
pub async fn process<S: Store>(store: &S, form: &ClockInForm) -> SubmitResult {
    submit(store, form).await.into()
}
