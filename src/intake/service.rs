use log::{debug, info, warn};
use serde_json::json;
use std::sync::Arc;

use super::consent::{build_consent_snapshot, consent_text_provided, form_provider, form_version};
use super::context::RequestContext;
use super::duplicate::{duplicate_audit_entry, find_duplicate};
use super::error::IntakeError;
use super::page_context::build_page_context;
use super::store::{AuditDraft, LeadStore};
use super::types::{non_empty, LeadSubmissionResponse};
use super::validation::{validate_submission, ValidatedSubmission};
use crate::core::config::IntakeConfig;
use crate::core::shared::models::{Brand, LeadEventType, LeadStatus, NewLead};

pub const DEFAULT_SOURCE: &str = "web_form";
pub const CREATED_MESSAGE: &str = "Thank you! An attorney will contact you within 24 hours.";
pub const DUPLICATE_MESSAGE: &str = "Your information has been received.";

/// What happened to a submission that passed validation.
///
/// Both variants answer the caller with the same response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeOutcome {
    Created { lead_id: i64 },
    Duplicate { lead_id: i64 },
}

impl IntakeOutcome {
    pub fn lead_id(&self) -> i64 {
        match self {
            Self::Created { lead_id } | Self::Duplicate { lead_id } => *lead_id,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Created { .. } => CREATED_MESSAGE,
            Self::Duplicate { .. } => DUPLICATE_MESSAGE,
        }
    }
}

impl From<IntakeOutcome> for LeadSubmissionResponse {
    fn from(outcome: IntakeOutcome) -> Self {
        Self {
            success: true,
            lead_id: outcome.lead_id(),
            message: outcome.message().to_string(),
        }
    }
}

/// Runs the intake pipeline: validate, resolve brand, resolve case type,
/// check for a duplicate, then persist.
#[derive(Clone)]
pub struct IntakeService {
    store: Arc<dyn LeadStore>,
    config: IntakeConfig,
}

impl IntakeService {
    pub fn new(store: Arc<dyn LeadStore>, config: IntakeConfig) -> Self {
        Self { store, config }
    }

    pub async fn submit(&self, ctx: &RequestContext) -> Result<IntakeOutcome, IntakeError> {
        let submission = validate_submission(&ctx.body, self.config.max_free_form_bytes)?;

        let domain = ctx.headers.normalized_host(&self.config.default_domain);
        let brand = match self.store.find_active_brand_by_domain(&domain).await? {
            Some(brand) => brand,
            None => {
                info!("[Lead Intake] Brand not found for domain: {}", domain);
                return Err(IntakeError::InvalidDomain);
            }
        };
        debug!("[Lead Intake] Host {} resolved to brand {}", domain, brand.slug);

        let case_type_id = match non_empty(&ctx.body.case_slug) {
            Some(slug) => {
                let case_type = self.store.find_active_case_type(brand.id, slug).await?;
                if case_type.is_none() {
                    debug!(
                        "[Lead Intake] No active case type '{}' for brand {}",
                        slug, brand.slug
                    );
                }
                case_type.map(|c| c.id)
            }
            None => None,
        };

        let client_ip = ctx.headers.client_ip();

        if let Some(case_type_id) = case_type_id {
            if let Some(original) = find_duplicate(
                self.store.as_ref(),
                &submission.phone,
                case_type_id,
                ctx.received_at,
            )
            .await?
            {
                let entry = duplicate_audit_entry(&original, client_ip, ctx.received_at);
                self.store.create_audit_log_entry(entry).await?;
                info!(
                    "[Lead Intake] Duplicate submission for lead {} (brand {})",
                    original.id, brand.slug
                );
                return Ok(IntakeOutcome::Duplicate {
                    lead_id: original.id,
                });
            }
        }

        if !consent_text_provided(ctx) {
            warn!(
                "[Lead Intake] Consent text missing for brand {}; snapshot flagged for review",
                brand.slug
            );
        }

        let new_lead = assemble_lead(ctx, &brand, case_type_id, submission)?;
        let audit = AuditDraft::system(
            LeadEventType::Created,
            json!({
                "source": new_lead.source,
                "brand_id": brand.id,
                "case_type_id": case_type_id,
            }),
            client_ip,
            ctx.received_at,
        );

        let (lead, _) = self.store.create_lead_with_audit(new_lead, audit).await?;
        info!(
            "[Lead Intake] Created lead {} for brand {}",
            lead.id, brand.slug
        );

        // Routing to buyers happens outside this service.
        Ok(IntakeOutcome::Created { lead_id: lead.id })
    }
}

/// Builds the row for a validated, non-duplicate submission.
pub fn assemble_lead(
    ctx: &RequestContext,
    brand: &Brand,
    case_type_id: Option<i64>,
    submission: ValidatedSubmission,
) -> Result<NewLead, IntakeError> {
    let body = &ctx.body;
    let snapshot = build_consent_snapshot(ctx);
    let page_context = build_page_context(ctx, &submission.page_context);
    let session_id = non_empty(&body.session_id).map(|s| s.to_string());

    let payload = json!({
        "contact": body.contact,
        "utm": submission.utm,
        "referrer": ctx.headers.referer,
        "landingPage": non_empty(&body.landing_page).or(non_empty(&body.page_url)),
        "sessionId": session_id,
    });

    Ok(NewLead {
        brand_id: brand.id,
        source: non_empty(&body.source).unwrap_or(DEFAULT_SOURCE).to_string(),
        case_type_id,
        injury_id: None,
        geo_id: None,
        phone: submission.phone,
        email: submission.email,
        first_name: non_empty(&body.contact.first_name).map(|s| s.to_string()),
        last_name: non_empty(&body.contact.last_name).map(|s| s.to_string()),
        zip_code: non_empty(&body.contact.zip_code).map(|s| s.to_string()),
        qualifiers: submission.qualifiers,
        payload,
        consent_snapshot: serde_json::to_value(&snapshot)
            .map_err(|e| IntakeError::Internal(format!("consent snapshot: {e}")))?,
        user_agent: ctx.headers.user_agent.clone(),
        fingerprint_data: submission.fingerprint,
        page_context: serde_json::to_value(&page_context)
            .map_err(|e| IntakeError::Internal(format!("page context: {e}")))?,
        session_id,
        status: LeadStatus::New.to_string(),
        form_provider: form_provider(ctx),
        form_version: form_version(ctx),
        created_at: ctx.received_at,
        updated_at: ctx.received_at,
    })
}
