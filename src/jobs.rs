//! Job listing for the clock-in form's job picker.

use serde::Serialize;
use tracing::warn;

use crate::store::{JobOption, Store};

/// What the form renders its job choices from. A store failure degrades to an
/// empty list with `error` set; the form still renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobListing {
    pub jobs: Vec<JobOption>,
    pub error: Option<String>,
}

impl JobListing {
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Open jobs, newest first. Never fails.
pub async fn list_open_jobs<S: Store>(store: &S) -> JobListing {
    match store.open_jobs().await {
        Ok(jobs) => JobListing { jobs, error: None },
        Err(e) => {
            warn!(error = %e, "failed to load open jobs");
            JobListing {
                jobs: Vec::new(),
                error: Some(e.to_string()),
            }
        }
    }
}
