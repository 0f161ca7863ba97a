//! # txdoc-records — Compliance Record Store
//!
//! Creation, mutation, soft deletion, and association queries for
//! compliance records.
//!
//! ## Integrity Rules
//!
//! - A record is created with a fiscal year of 2015 or later and with both
//!   a requesting and a subject organization that the directory knows.
//! - Organization references are values. Soft-deleting an organization never
//!   cascades to a record, and soft-deleting a record never touches an
//!   organization.
//! - `request_status` is always a member of the closed status set; the raw
//!   value is parsed before any write.
//!
//! ## Layout
//!
//! - [`record`]: the record type, creation draft, patch, and validators.
//! - [`store`]: the [`RecordStore`] persistence trait and its in-memory
//!   backend.
//! - [`integrity`]: organization reference checks.
//! - [`query`]: association query filters.
//! - [`service`]: [`ComplianceRecords`], the operation entry point.

pub mod error;
pub mod integrity;
pub mod query;
pub mod record;
pub mod service;
pub mod store;

pub use error::RecordError;
pub use integrity::ReferenceResolver;
pub use query::RecordFilter;
pub use record::{
    validate_document_link, ComplianceRecord, NewComplianceRecord, RecordPatch, ValidatedDraft,
    MAX_DOCUMENT_LINK_LEN,
};
pub use service::ComplianceRecords;
pub use store::{FieldChanges, GuardedWrite, MemoryRecordStore, RecordStore, StoreError};
