use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::PgConnection;
use log::debug;

use super::{AuditDraft, LeadStore, StoreError};
use crate::core::shared::models::{
    Brand, CaseType, CaseTypeStatus, Lead, LeadAuditLogEntry, NewLead, NewLeadAuditLogEntry,
};
use crate::core::shared::schema::{brands, case_types, lead_audit_log, leads};
use crate::core::shared::utils::DbPool;

/// Diesel-backed store. Every call borrows a pooled connection on the
/// blocking thread pool.
#[derive(Clone)]
pub struct PgLeadStore {
    pool: DbPool,
}

impl PgLeadStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn with_conn<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut PgConnection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = pool.get().map_err(|e| StoreError::Pool(e.to_string()))?;
            f(&mut *conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

fn insert_lead(conn: &mut PgConnection, lead: &NewLead) -> Result<Lead, StoreError> {
    let lead: Lead = diesel::insert_into(leads::table)
        .values(lead)
        .get_result(conn)?;
    debug!("Inserted lead {} for brand {}", lead.id, lead.brand_id);
    Ok(lead)
}

fn insert_audit_entry(
    conn: &mut PgConnection,
    entry: &NewLeadAuditLogEntry,
) -> Result<LeadAuditLogEntry, StoreError> {
    let entry: LeadAuditLogEntry = diesel::insert_into(lead_audit_log::table)
        .values(entry)
        .get_result(conn)?;
    Ok(entry)
}

#[async_trait]
impl LeadStore for PgLeadStore {
    async fn ping(&self) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            diesel::sql_query("SELECT 1").execute(conn)?;
            Ok(())
        })
        .await
    }

    async fn find_active_brand_by_domain(
        &self,
        domain: &str,
    ) -> Result<Option<Brand>, StoreError> {
        let domain = domain.to_string();
        self.with_conn(move |conn| {
            let brand = brands::table
                .filter(brands::domain.eq(&domain))
                .filter(brands::active.eq(true))
                .first::<Brand>(conn)
                .optional()?;
            Ok(brand)
        })
        .await
    }

    async fn find_active_case_type(
        &self,
        brand_id: i64,
        slug: &str,
    ) -> Result<Option<CaseType>, StoreError> {
        let slug = slug.to_string();
        self.with_conn(move |conn| {
            let case_type = case_types::table
                .filter(case_types::brand_id.eq(brand_id))
                .filter(case_types::slug.eq(&slug))
                .filter(case_types::status.eq(CaseTypeStatus::Active.to_string()))
                .first::<CaseType>(conn)
                .optional()?;
            Ok(case_type)
        })
        .await
    }

    async fn find_recent_duplicate(
        &self,
        phone: &str,
        case_type_id: i64,
        since: DateTime<Utc>,
    ) -> Result<Option<Lead>, StoreError> {
        let phone = phone.to_string();
        self.with_conn(move |conn| {
            let lead = leads::table
                .filter(leads::phone.eq(&phone))
                .filter(leads::case_type_id.eq(case_type_id))
                .filter(leads::created_at.ge(since))
                .order(leads::created_at.desc())
                .first::<Lead>(conn)
                .optional()?;
            Ok(lead)
        })
        .await
    }

    async fn create_lead(&self, lead: NewLead) -> Result<Lead, StoreError> {
        self.with_conn(move |conn| insert_lead(conn, &lead)).await
    }

    async fn create_audit_log_entry(
        &self,
        entry: NewLeadAuditLogEntry,
    ) -> Result<LeadAuditLogEntry, StoreError> {
        self.with_conn(move |conn| insert_audit_entry(conn, &entry))
            .await
    }

    async fn create_lead_with_audit(
        &self,
        lead: NewLead,
        audit: AuditDraft,
    ) -> Result<(Lead, LeadAuditLogEntry), StoreError> {
        self.with_conn(move |conn| {
            conn.transaction::<_, StoreError, _>(|conn| {
                let lead = insert_lead(conn, &lead)?;
                let entry = insert_audit_entry(conn, &audit.for_lead(&lead))?;
                Ok((lead, entry))
            })
        })
        .await
    }
}
