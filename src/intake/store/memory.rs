use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use super::{AuditDraft, LeadStore, StoreError};
use crate::core::shared::models::{
    Brand, CaseType, CaseTypeStatus, Lead, LeadAuditLogEntry, NewLead, NewLeadAuditLogEntry,
};

#[derive(Debug, Default)]
struct Tables {
    brands: Vec<Brand>,
    case_types: Vec<CaseType>,
    leads: Vec<Lead>,
    audit_log: Vec<LeadAuditLogEntry>,
}

impl Tables {
    fn next_id(len: usize) -> i64 {
        len as i64 + 1
    }

    fn insert_lead(&mut self, lead: NewLead) -> Lead {
        let lead = Lead {
            id: Self::next_id(self.leads.len()),
            brand_id: lead.brand_id,
            source: lead.source,
            case_type_id: lead.case_type_id,
            injury_id: lead.injury_id,
            geo_id: lead.geo_id,
            phone: lead.phone,
            email: lead.email,
            first_name: lead.first_name,
            last_name: lead.last_name,
            zip_code: lead.zip_code,
            qualifiers: lead.qualifiers,
            payload: lead.payload,
            consent_snapshot: lead.consent_snapshot,
            user_agent: lead.user_agent,
            fingerprint_data: lead.fingerprint_data,
            page_context: lead.page_context,
            session_id: lead.session_id,
            status: lead.status,
            form_provider: lead.form_provider,
            form_version: lead.form_version,
            created_at: lead.created_at,
            updated_at: lead.updated_at,
        };
        self.leads.push(lead.clone());
        lead
    }

    fn insert_audit_entry(&mut self, entry: NewLeadAuditLogEntry) -> LeadAuditLogEntry {
        let entry = LeadAuditLogEntry {
            id: Self::next_id(self.audit_log.len()),
            brand_id: entry.brand_id,
            lead_id: entry.lead_id,
            event_type: entry.event_type,
            actor: entry.actor,
            metadata: entry.metadata,
            ip_address: entry.ip_address,
            created_at: entry.created_at,
        };
        self.audit_log.push(entry.clone());
        entry
    }
}

/// Process-local store for tests and database-less local runs.
///
/// Writes can be switched off with [`MemoryLeadStore::fail_writes`] to
/// exercise the infrastructure-failure path.
#[derive(Debug, Default)]
pub struct MemoryLeadStore {
    tables: RwLock<Tables>,
    failing_writes: AtomicBool,
}

impl MemoryLeadStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed_brand(&self, slug: &str, name: &str, domain: &str, active: bool) -> Brand {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let brand = Brand {
            id: Tables::next_id(tables.brands.len()),
            slug: slug.to_string(),
            name: name.to_string(),
            domain: domain.to_string(),
            active,
            created_at: now,
            updated_at: now,
        };
        tables.brands.push(brand.clone());
        brand
    }

    pub async fn seed_case_type(
        &self,
        brand_id: i64,
        slug: &str,
        name: &str,
        status: CaseTypeStatus,
    ) -> CaseType {
        let mut tables = self.tables.write().await;
        let now = Utc::now();
        let case_type = CaseType {
            id: Tables::next_id(tables.case_types.len()),
            brand_id,
            slug: slug.to_string(),
            name: name.to_string(),
            category: "massAction".to_string(),
            pillar_slug: Some(slug.to_string()),
            state_slug: None,
            city_slug: None,
            status: status.to_string(),
            created_at: now,
            updated_at: now,
        };
        tables.case_types.push(case_type.clone());
        case_type
    }

    pub fn fail_writes(&self, failing: bool) {
        self.failing_writes.store(failing, Ordering::SeqCst);
    }

    pub async fn leads(&self) -> Vec<Lead> {
        self.tables.read().await.leads.clone()
    }

    pub async fn audit_log(&self) -> Vec<LeadAuditLogEntry> {
        self.tables.read().await.audit_log.clone()
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.failing_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "memory store is rejecting writes".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl LeadStore for MemoryLeadStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_active_brand_by_domain(
        &self,
        domain: &str,
    ) -> Result<Option<Brand>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .brands
            .iter()
            .find(|b| b.domain == domain && b.active)
            .cloned())
    }

    async fn find_active_case_type(
        &self,
        brand_id: i64,
        slug: &str,
    ) -> Result<Option<CaseType>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .case_types
            .iter()
            .find(|c| c.brand_id == brand_id && c.slug == slug && c.is_active())
            .cloned())
    }

    async fn find_recent_duplicate(
        &self,
        phone: &str,
        case_type_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Option<Lead>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .leads
            .iter()
            .filter(|l| {
                l.phone == phone && l.case_type_id == Some(case_type_id) && l.created_at >= since
            })
            .max_by_key(|l| (l.created_at, l.id))
            .cloned())
    }

    async fn create_lead(&self, lead: NewLead) -> Result<Lead, StoreError> {
        self.check_writable()?;
        Ok(self.tables.write().await.insert_lead(lead))
    }

    async fn create_audit_log_entry(
        &self,
        entry: NewLeadAuditLogEntry,
    ) -> Result<LeadAuditLogEntry, StoreError> {
        self.check_writable()?;
        Ok(self.tables.write().await.insert_audit_entry(entry))
    }

    async fn create_lead_with_audit(
        &self,
        lead: NewLead,
        audit: AuditDraft,
    ) -> Result<(Lead, LeadAuditLogEntry), StoreError> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        let lead = tables.insert_lead(lead);
        let entry = tables.insert_audit_entry(audit.for_lead(&lead));
        Ok((lead, entry))
    }
}
