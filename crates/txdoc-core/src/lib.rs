#![deny(missing_docs)]

//! # txdoc-core — Foundational Types for Compliance Document Tracking
//!
//! This crate defines the primitives every other crate in the workspace
//! depends on. It has no internal crate dependencies, only `serde`,
//! `thiserror`, and `uuid` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** A [`RecordId`] cannot be passed
//!    where an [`OrganizationId`] is expected, and a requesting organization
//!    is told apart from a subject organization by [`OrganizationRole`].
//!
//! 2. **[`FiscalYear`] is valid by construction.** The only constructor
//!    rejects years below [`FISCAL_YEAR_FLOOR`], so a record holding a
//!    `FiscalYear` can never carry an unsupported year.
//!
//! 3. **Structured errors.** [`ValidationError`] and [`ReferentialError`]
//!    are the two failure families of record creation and mutation. No
//!    `Box<dyn Error>`, no `.unwrap()` outside tests.

pub mod error;
pub mod fiscal;
pub mod identity;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{ReferentialError, ValidationError};
pub use fiscal::{FiscalYear, FISCAL_YEAR_FLOOR};
pub use identity::{OrganizationId, OrganizationRole, RecordId};
