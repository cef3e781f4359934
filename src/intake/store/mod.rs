//! Persistence for brands, case types, leads and their audit trail.
//!
//! Leads and audit entries are insert-only; this trait has no update or
//! delete operation.

pub mod memory;
pub mod postgres;

pub use memory::MemoryLeadStore;
pub use postgres::PgLeadStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::shared::models::{
    Brand, CaseType, Lead, LeadAuditLogEntry, LeadEventType, NewLead, NewLeadAuditLogEntry,
    SYSTEM_ACTOR,
};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Connection pool error: {0}")]
    Pool(String),
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("Background task failed: {0}")]
    Task(String),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// An audit entry waiting for the id of the lead it describes.
#[derive(Debug, Clone)]
pub struct AuditDraft {
    pub event_type: LeadEventType,
    pub actor: String,
    pub metadata: serde_json::Value,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditDraft {
    pub fn system(
        event_type: LeadEventType,
        metadata: serde_json::Value,
        ip_address: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            event_type,
            actor: SYSTEM_ACTOR.to_string(),
            metadata,
            ip_address,
            created_at,
        }
    }

    pub fn for_lead(self, lead: &Lead) -> NewLeadAuditLogEntry {
        NewLeadAuditLogEntry {
            brand_id: lead.brand_id,
            lead_id: lead.id,
            event_type: self.event_type.to_string(),
            actor: Some(self.actor),
            metadata: self.metadata,
            ip_address: self.ip_address,
            created_at: self.created_at,
        }
    }
}

#[async_trait]
pub trait LeadStore: Send + Sync {
    /// Cheap reachability probe for health checks.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Exact domain match, active brands only.
    async fn find_active_brand_by_domain(&self, domain: &str)
        -> Result<Option<Brand>, StoreError>;

    /// Scoped to `brand_id`; never matches another brand's slug.
    async fn find_active_case_type(
        &self,
        brand_id: i64,
        slug: &str,
    ) -> Result<Option<CaseType>, StoreError>;

    /// Most recent lead with this phone and case type created at or after
    /// `since`.
    async fn find_recent_duplicate(
        &self,
        phone: &str,
        case_type_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Option<Lead>, StoreError>;

    async fn create_lead(&self, lead: NewLead) -> Result<Lead, StoreError>;

    async fn create_audit_log_entry(
        &self,
        entry: NewLeadAuditLogEntry,
    ) -> Result<LeadAuditLogEntry, StoreError>;

    /// Inserts the lead and its first audit entry atomically.
    async fn create_lead_with_audit(
        &self,
        lead: NewLead,
        audit: AuditDraft,
    ) -> Result<(Lead, LeadAuditLogEntry), StoreError>;
}
