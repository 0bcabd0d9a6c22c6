//! Clock-in API: accepts the form as `application/x-www-form-urlencoded` or
//! `multipart/form-data` and answers with `{ok, error}`.

use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use std::sync::Arc;

use super::AppState;
use crate::clock_in::{self, ClockInError, ClockInForm, SubmitResult};

/// The clock-in form, read from either supported encoding.
pub(super) struct ClockInPayload(pub ClockInForm);

fn reject(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(SubmitResult {
            ok: false,
            error: Some(message),
        }),
    )
        .into_response()
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"))
}

impl<S> FromRequest<S> for ClockInPayload
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_multipart(&req) {
            return match Form::<ClockInForm>::from_request(req, state).await {
                Ok(Form(form)) => Ok(ClockInPayload(form)),
                Err(e) => Err(reject(e.status(), e.body_text())),
            };
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| reject(e.status(), e.body_text()))?;
        let mut form = ClockInForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| reject(e.status(), e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let value = field
                .text()
                .await
                .map_err(|e| reject(e.status(), e.body_text()))?;
            match name.as_str() {
                "pin" => form.pin = value,
                "job_id" => form.job_id = value,
                "hours" => form.hours = value,
                "item_name" => form.item_name = Some(value),
                "quantity" => form.quantity = Some(value),
                "cost_per_unit" => form.cost_per_unit = Some(value),
                _ => {}
            }
        }
        Ok(ClockInPayload(form))
    }
}

fn status_for(result: &Result<(), ClockInError>) -> StatusCode {
    match result {
        Ok(()) => StatusCode::OK,
        Err(ClockInError::MissingFields) => StatusCode::BAD_REQUEST,
        Err(ClockInError::InvalidPin) => StatusCode::UNAUTHORIZED,
        Err(ClockInError::TimeLogFailed(_)) | Err(ClockInError::MaterialFailed(_)) => {
            StatusCode::BAD_GATEWAY
        }
    }
}

/// POST /api/clock-in
pub(super) async fn handler_api_clock_in(
    State(state): State<Arc<AppState>>,
    ClockInPayload(form): ClockInPayload,
) -> impl IntoResponse {
    let result = clock_in::submit(&state.store, &form).await;
    let outcome = match &result {
        Ok(()) => "ok",
        Err(e) => e.outcome(),
    };
    state.prom_metrics.record_submission(outcome);
    (status_for(&result), Json(SubmitResult::from(result)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_distinguishes_rejections_from_store_failures() {
        assert_eq!(status_for(&Ok(())), StatusCode::OK);
        assert_eq!(
            status_for(&Err(ClockInError::MissingFields)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&Err(ClockInError::InvalidPin)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(&Err(ClockInError::MaterialFailed("x".into()))),
            StatusCode::BAD_GATEWAY
        );
    }
}
