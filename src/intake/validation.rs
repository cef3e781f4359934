use log::debug;
use serde_json::{Map, Value};

use super::error::IntakeError;
use super::types::{is_truthy, non_empty, LeadSubmission};

// Character limits of the matching `leads` columns.
pub const MAX_PHONE_CHARS: usize = 50;
pub const MAX_EMAIL_CHARS: usize = 255;
pub const MAX_NAME_CHARS: usize = 100;
pub const MAX_ZIP_CHARS: usize = 20;
pub const MAX_LABEL_CHARS: usize = 50;
pub const MAX_SESSION_ID_CHARS: usize = 255;

/// The parts of a submission that passed validation, with free-form client
/// objects normalised and size-checked.
#[derive(Debug, Clone)]
pub struct ValidatedSubmission {
    pub phone: String,
    pub email: String,
    pub qualifiers: Value,
    pub utm: Value,
    pub fingerprint: Value,
    pub page_context: Value,
}

/// Checks run before any side effect, in the order callers see them.
pub fn validate_submission(
    submission: &LeadSubmission,
    max_free_form_bytes: usize,
) -> Result<ValidatedSubmission, IntakeError> {
    let phone = non_empty(&submission.contact.phone);
    let email = non_empty(&submission.contact.email);
    let (phone, email) = match (phone, email) {
        (Some(phone), Some(email)) => (phone.to_string(), email.to_string()),
        _ => return Err(IntakeError::MissingContact),
    };

    if !is_truthy(&submission.consent.checked) {
        return Err(IntakeError::MissingConsent);
    }

    let contact = &submission.contact;
    for (field, value, max_chars) in [
        ("phone", Some(phone.as_str()), MAX_PHONE_CHARS),
        ("email", Some(email.as_str()), MAX_EMAIL_CHARS),
        ("firstName", non_empty(&contact.first_name), MAX_NAME_CHARS),
        ("lastName", non_empty(&contact.last_name), MAX_NAME_CHARS),
        ("zipCode", non_empty(&contact.zip_code), MAX_ZIP_CHARS),
        ("source", non_empty(&submission.source), MAX_LABEL_CHARS),
        ("formProvider", non_empty(&submission.form_provider), MAX_LABEL_CHARS),
        ("formVersion", non_empty(&submission.form_version), MAX_LABEL_CHARS),
        ("sessionId", non_empty(&submission.session_id), MAX_SESSION_ID_CHARS),
    ] {
        bounded_text(value, field, max_chars)?;
    }

    Ok(ValidatedSubmission {
        phone,
        email,
        qualifiers: bounded_object(&submission.qualifiers, "qualifiers", max_free_form_bytes)?,
        utm: bounded_object(&submission.utm, "utm", max_free_form_bytes)?,
        fingerprint: bounded_object(&submission.fingerprint, "fingerprint", max_free_form_bytes)?,
        page_context: bounded_object(
            &submission.page_context,
            "pageContext",
            max_free_form_bytes,
        )?,
    })
}

fn bounded_text(
    value: Option<&str>,
    field: &'static str,
    max_chars: usize,
) -> Result<(), IntakeError> {
    match value {
        Some(text) if text.chars().count() > max_chars => {
            debug!("Rejecting {} longer than {} characters", field, max_chars);
            Err(IntakeError::OversizedField(field))
        }
        _ => Ok(()),
    }
}

/// Accepts a JSON object no larger than `max_bytes` once serialized.
/// Anything that is not an object becomes `{}`.
pub fn bounded_object(
    value: &Option<Value>,
    field: &'static str,
    max_bytes: usize,
) -> Result<Value, IntakeError> {
    match value {
        Some(Value::Object(map)) => {
            let size = serde_json::to_vec(map)
                .map_err(|e| IntakeError::Internal(e.to_string()))?
                .len();
            if size > max_bytes {
                debug!("Rejecting {} of {} bytes (limit {})", field, size, max_bytes);
                return Err(IntakeError::OversizedField(field));
            }
            Ok(Value::Object(map.clone()))
        }
        Some(Value::Null) | None => Ok(Value::Object(Map::new())),
        Some(_) => {
            debug!("Discarding non-object {}", field);
            Ok(Value::Object(Map::new()))
        }
    }
}
