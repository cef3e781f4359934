//! Repeat-submission detection.
//!
//! A heuristic, not an identity match: the same phone number about the same
//! case type inside a trailing window counts as one submission. There is no
//! matching on email, no phone normalisation and nothing across case types.
//!
//! Two concurrent submissions can both miss each other here and both be
//! inserted; that race is accepted.

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde_json::json;

use super::store::{AuditDraft, LeadStore, StoreError};
use crate::core::shared::models::{Lead, LeadEventType, NewLeadAuditLogEntry};

pub const DUPLICATE_WINDOW_HOURS: i64 = 24;

pub fn duplicate_window() -> Duration {
    Duration::hours(DUPLICATE_WINDOW_HOURS)
}

/// Earliest `created_at` still inside the window ending at `now`.
pub fn window_start(now: DateTime<Utc>) -> DateTime<Utc> {
    now - duplicate_window()
}

pub async fn find_duplicate(
    store: &dyn LeadStore,
    phone: &str,
    case_type_id: i64,
    now: DateTime<Utc>,
) -> Result<Option<Lead>, StoreError> {
    store
        .find_recent_duplicate(phone, case_type_id, window_start(now))
        .await
}

/// Audit entry recording a repeat attempt against the original lead.
pub fn duplicate_audit_entry(
    original: &Lead,
    ip_address: Option<String>,
    attempted_at: DateTime<Utc>,
) -> NewLeadAuditLogEntry {
    let metadata = json!({
        "original_lead_id": original.id,
        "duplicate_attempt_at": attempted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    });
    AuditDraft::system(
        LeadEventType::DuplicateSubmission,
        metadata,
        ip_address,
        attempted_at,
    )
    .for_lead(original)
}
