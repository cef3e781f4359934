use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::schema::{brands, case_types, lead_audit_log, leads};

/// A tenant site. Every case type, lead and audit entry belongs to one.
#[derive(Debug, Clone, Queryable, Identifiable, Serialize, Deserialize)]
#[diesel(table_name = brands)]
pub struct Brand {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub domain: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = brands)]
pub struct NewBrand {
    pub slug: String,
    pub name: String,
    pub domain: String,
    pub active: bool,
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Serialize, Deserialize)]
#[diesel(table_name = case_types)]
#[diesel(belongs_to(Brand))]
pub struct CaseType {
    pub id: i64,
    pub brand_id: i64,
    pub slug: String,
    pub name: String,
    pub category: String,
    pub pillar_slug: Option<String>,
    pub state_slug: Option<String>,
    pub city_slug: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CaseType {
    pub fn is_active(&self) -> bool {
        self.status == CaseTypeStatus::Active.to_string()
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = case_types)]
pub struct NewCaseType {
    pub brand_id: i64,
    pub slug: String,
    pub name: String,
    pub category: String,
    pub status: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CaseTypeStatus {
    Active,
    Paused,
    Archived,
}

impl std::fmt::Display for CaseTypeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Active => "active",
            Self::Paused => "paused",
            Self::Archived => "archived",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for CaseTypeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            "archived" => Ok(Self::Archived),
            _ => Err(format!("Unknown case type status: {s}")),
        }
    }
}

/// A persisted submission. `consent_snapshot` is written once and never changed.
#[derive(Debug, Clone, Queryable, Identifiable, Serialize, Deserialize)]
#[diesel(table_name = leads)]
pub struct Lead {
    pub id: i64,
    pub brand_id: i64,
    pub source: String,
    pub case_type_id: Option<i64>,
    pub injury_id: Option<i64>,
    pub geo_id: Option<i64>,
    pub phone: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub zip_code: Option<String>,
    pub qualifiers: serde_json::Value,
    pub payload: serde_json::Value,
    pub consent_snapshot: serde_json::Value,
    pub user_agent: Option<String>,
    pub fingerprint_data: serde_json::Value,
    pub page_context: serde_json::Value,
    pub session_id: Option<String>,
    pub status: String,
    pub form_provider: String,
    pub form_version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable, Serialize)]
#[diesel(table_name = leads)]
pub struct NewLead {
    pub brand_id: i64,
    pub source: String,
    pub case_type_id: Option<i64>,
    pub injury_id: Option<i64>,
    pub geo_id: Option<i64>,
    pub phone: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub zip_code: Option<String>,
    pub qualifiers: serde_json::Value,
    pub payload: serde_json::Value,
    pub consent_snapshot: serde_json::Value,
    pub user_agent: Option<String>,
    pub fingerprint_data: serde_json::Value,
    pub page_context: serde_json::Value,
    pub session_id: Option<String>,
    pub status: String,
    pub form_provider: String,
    pub form_version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LeadStatus {
    New,
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
        }
    }
}

#[derive(Debug, Clone, Queryable, Identifiable, Associations, Serialize, Deserialize)]
#[diesel(table_name = lead_audit_log)]
#[diesel(belongs_to(Lead))]
pub struct LeadAuditLogEntry {
    pub id: i64,
    pub brand_id: i64,
    pub lead_id: i64,
    pub event_type: String,
    pub actor: Option<String>,
    pub metadata: serde_json::Value,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable, Serialize)]
#[diesel(table_name = lead_audit_log)]
pub struct NewLeadAuditLogEntry {
    pub brand_id: i64,
    pub lead_id: i64,
    pub event_type: String,
    pub actor: Option<String>,
    pub metadata: serde_json::Value,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LeadEventType {
    Created,
    DuplicateSubmission,
}

impl std::fmt::Display for LeadEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Created => "created",
            Self::DuplicateSubmission => "duplicate_submission",
        };
        write!(f, "{s}")
    }
}

/// Actor recorded on entries written by the intake pipeline itself.
pub const SYSTEM_ACTOR: &str = "system";
