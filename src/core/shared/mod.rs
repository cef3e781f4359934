pub mod models;
pub mod schema;
pub mod state;
pub mod utils;

pub use models::{
    Brand, CaseType, CaseTypeStatus, Lead, LeadAuditLogEntry, LeadEventType, LeadStatus, NewBrand,
    NewCaseType, NewLead, NewLeadAuditLogEntry,
};
pub use utils::{create_conn, DbPool};
