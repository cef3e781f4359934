use axum::{response::IntoResponse, Json};
use log::error;

use super::store::StoreError;

/// The only text an anonymous caller ever sees for a server-side failure.
pub const GENERIC_SERVER_ERROR: &str =
    "An error occurred while processing your request. Please try again.";

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("Invalid request body")]
    InvalidBody,
    #[error("Phone and email are required")]
    MissingContact,
    #[error("TCPA consent is required")]
    MissingConsent,
    #[error("Submission contains oversized fields")]
    OversizedField(&'static str),
    #[error("Invalid domain")]
    InvalidDomain,
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntakeError {
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Store(_) | Self::Internal(_))
    }
}

impl IntoResponse for IntakeError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        let (status, message) = match &self {
            Self::InvalidBody
            | Self::MissingContact
            | Self::MissingConsent
            | Self::OversizedField(_)
            | Self::InvalidDomain => (StatusCode::BAD_REQUEST, self.to_string()),
            Self::Store(_) | Self::Internal(_) => {
                error!("[Lead Intake Error] {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    GENERIC_SERVER_ERROR.to_string(),
                )
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}
