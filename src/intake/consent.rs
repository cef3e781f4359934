//! TCPA consent snapshot.
//!
//! The snapshot is the evidentiary record of what the claimant agreed to. It
//! is assembled once, from server-observed facts wherever they exist, and
//! stored verbatim on the lead.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use super::context::RequestContext;
use super::types::non_empty;

pub const DEFAULT_CONSENT_TEXT: &str = "Consent text not provided";
pub const DEFAULT_LOCALE: &str = "en";
pub const DEFAULT_FORM_VERSION: &str = "1.0.0";
pub const DEFAULT_FORM_PROVIDER: &str = "native";
pub const DEFAULT_CONSENT_METHOD: &str = "checkbox";
pub const DEFAULT_CHECKBOX_POSITION: &str = "above_submit";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConsentSnapshot {
    pub text: String,
    pub timestamp: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub locale: String,
    pub form_version: String,
    pub provider: String,
    pub checkbox_checked: bool,
    pub url: String,
    pub method: String,
    pub privacy_policy_url: String,
    pub terms_of_service_url: String,
    pub checkbox_position: String,
    pub consent_language: String,
}

/// Builds the snapshot for a submission whose consent has already been
/// validated as given.
///
/// `timestamp` and `ip_address` come only from the server side of the
/// request; nothing in the body can influence them.
pub fn build_consent_snapshot(ctx: &RequestContext) -> ConsentSnapshot {
    let body = &ctx.body;
    let consent = &body.consent;
    let locale = non_empty(&body.locale).unwrap_or(DEFAULT_LOCALE).to_string();

    ConsentSnapshot {
        text: consent
            .text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(DEFAULT_CONSENT_TEXT)
            .to_string(),
        timestamp: ctx
            .received_at
            .to_rfc3339_opts(SecondsFormat::Millis, true),
        ip_address: ctx.headers.client_ip(),
        user_agent: ctx.headers.user_agent.clone(),
        locale: locale.clone(),
        form_version: form_version(ctx),
        provider: form_provider(ctx),
        checkbox_checked: true,
        url: ctx.page_url(),
        method: non_empty(&consent.method)
            .unwrap_or(DEFAULT_CONSENT_METHOD)
            .to_string(),
        privacy_policy_url: non_empty(&consent.privacy_policy_url)
            .map(|s| s.to_string())
            .unwrap_or_else(|| origin_relative(ctx, "/privacy")),
        terms_of_service_url: non_empty(&consent.terms_of_service_url)
            .map(|s| s.to_string())
            .unwrap_or_else(|| origin_relative(ctx, "/terms")),
        checkbox_position: non_empty(&consent.checkbox_position)
            .unwrap_or(DEFAULT_CHECKBOX_POSITION)
            .to_string(),
        consent_language: locale,
    }
}

/// True when the client sent its own consent language. A snapshot built
/// without it carries the placeholder and needs compliance review.
pub fn consent_text_provided(ctx: &RequestContext) -> bool {
    ctx.body
        .consent
        .text
        .as_deref()
        .is_some_and(|t| !t.trim().is_empty())
}

pub fn form_provider(ctx: &RequestContext) -> String {
    non_empty(&ctx.body.form_provider)
        .unwrap_or(DEFAULT_FORM_PROVIDER)
        .to_string()
}

pub fn form_version(ctx: &RequestContext) -> String {
    non_empty(&ctx.body.form_version)
        .unwrap_or(DEFAULT_FORM_VERSION)
        .to_string()
}

fn origin_relative(ctx: &RequestContext, path: &str) -> String {
    match ctx.headers.origin.as_deref() {
        Some(origin) => format!("{}{}", origin.trim_end_matches('/'), path),
        None => path.to_string(),
    }
}
