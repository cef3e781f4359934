//! Public lead intake: `POST /api/intake/lead` and its liveness probe.

pub mod consent;
pub mod context;
pub mod duplicate;
pub mod error;
pub mod page_context;
pub mod service;
pub mod store;
pub mod types;
pub mod validation;

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use log::debug;
use std::sync::Arc;

use crate::core::shared::state::AppState;
use crate::core::urls::ApiUrls;
use context::{RequestContext, RequestHeaders};
use error::IntakeError;
use types::{IntakeHealthResponse, LeadSubmission, LeadSubmissionResponse};

pub use service::{IntakeOutcome, IntakeService};

/// The body is taken raw so a malformed payload maps to a 400 with the
/// standard error shape instead of axum's default rejection.
pub async fn handle_submit_lead(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<LeadSubmissionResponse>, IntakeError> {
    let received_at = Utc::now();
    let submission: LeadSubmission = serde_json::from_slice(&body).map_err(|e| {
        debug!("[Lead Intake] Rejected unparseable body: {}", e);
        IntakeError::InvalidBody
    })?;

    let ctx = RequestContext::new(
        RequestHeaders::from_header_map(&headers),
        submission,
        received_at,
    );
    let outcome = state.intake.submit(&ctx).await?;
    Ok(Json(outcome.into()))
}

pub async fn handle_intake_health() -> Json<IntakeHealthResponse> {
    Json(IntakeHealthResponse {
        service: "lead-intake".to_string(),
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

pub fn configure_intake_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        ApiUrls::INTAKE_LEAD,
        get(handle_intake_health).post(handle_submit_lead),
    )
}
