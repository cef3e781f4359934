use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /api/intake/lead`.
///
/// Unknown keys are ignored, so a client cannot smuggle in server-owned
/// evidence such as an IP address or consent timestamp.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    #[serde(default)]
    pub contact: ContactInfo,
    #[serde(default)]
    pub consent: ConsentInput,
    pub case_slug: Option<String>,
    pub qualifiers: Option<Value>,
    pub source: Option<String>,
    pub utm: Option<Value>,
    pub landing_page: Option<String>,
    pub page_url: Option<String>,
    pub page_path: Option<String>,
    pub session_id: Option<String>,
    pub fingerprint: Option<Value>,
    pub page_context: Option<Value>,
    pub form_provider: Option<String>,
    pub form_version: Option<String>,
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactInfo {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub zip_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentInput {
    /// Kept loose: forms send `true`, `"on"`, `1` and so on.
    #[serde(default)]
    pub checked: Value,
    pub text: Option<String>,
    pub method: Option<String>,
    pub privacy_policy_url: Option<String>,
    pub terms_of_service_url: Option<String>,
    pub checkbox_position: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmissionResponse {
    pub success: bool,
    pub lead_id: i64,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeHealthResponse {
    pub service: String,
    pub status: String,
    pub timestamp: String,
}

/// Treats blank strings like absent ones.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// JSON truthiness: `false`, `null`, `0` and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!("on")));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!({})));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(&Some("  roundup ".to_string())), Some("roundup"));
        assert_eq!(non_empty(&Some("   ".to_string())), None);
        assert_eq!(non_empty(&None), None);
    }

    #[test]
    fn test_submission_ignores_client_supplied_evidence() {
        let submission: LeadSubmission = serde_json::from_value(json!({
            "contact": {"phone": "5551234567", "email": "a@b.com", "zipCode": "63101"},
            "consent": {"checked": true, "ipAddress": "6.6.6.6", "timestamp": "1999-01-01"},
            "caseSlug": "roundup",
            "ipAddress": "6.6.6.6"
        }))
        .unwrap();

        assert_eq!(submission.contact.zip_code.as_deref(), Some("63101"));
        assert_eq!(submission.case_slug.as_deref(), Some("roundup"));
        assert!(is_truthy(&submission.consent.checked));
    }

    #[test]
    fn test_response_uses_camel_case() {
        let response = LeadSubmissionResponse {
            success: true,
            lead_id: 42,
            message: "ok".to_string(),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, json!({"success": true, "leadId": 42, "message": "ok"}));
    }
}
