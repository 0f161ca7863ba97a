//! # txdoc-state — Request Status Workflow
//!
//! Closed-set enumerations for the two enumerated fields of a compliance
//! record, and the workflow that decides which status values a record may
//! take.
//!
//! ## Request Status
//!
//! ```text
//! NOT_REQUESTED ──▶ REQUESTED ──▶ RECEIVED
//! ```
//!
//! The default [`StatusPolicy::ValueDomain`] treats the workflow as a value
//! constraint: any enabled member of the enumeration may be set at any time.
//! [`StatusPolicy::Sequential`] additionally forbids moving backwards.
//!
//! ## Design
//!
//! The status and document-type fields are Rust enums with exhaustive
//! `match`. Raw strings are parsed exactly once, at the boundary, through
//! `FromStr`. The set can be narrowed by configuration ([`StatusWorkflow`])
//! but never widened by a caller-supplied string.

pub mod document_type;
pub mod request_status;

pub use document_type::DocumentType;
pub use request_status::{RequestStatus, StatusPolicy, StatusWorkflow};
