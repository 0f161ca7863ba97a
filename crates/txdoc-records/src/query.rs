//! Filters for association queries.

use txdoc_core::FiscalYear;
use txdoc_state::RequestStatus;

use crate::record::ComplianceRecord;

/// Narrowing applied to a by-organization listing.
///
/// The default matches every active (non-soft-deleted) record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordFilter {
    pub fiscal_year: Option<FiscalYear>,
    pub request_status: Option<RequestStatus>,
    pub include_deleted: bool,
}

impl RecordFilter {
    pub fn fiscal_year(mut self, year: FiscalYear) -> Self {
        self.fiscal_year = Some(year);
        self
    }

    pub fn request_status(mut self, status: RequestStatus) -> Self {
        self.request_status = Some(status);
        self
    }

    /// Also return soft-deleted records.
    pub fn include_deleted(mut self) -> Self {
        self.include_deleted = true;
        self
    }

    /// Whether a record passes the filter.
    pub fn matches(&self, record: &ComplianceRecord) -> bool {
        if !self.include_deleted && record.is_deleted() {
            return false;
        }
        if self.fiscal_year.is_some_and(|y| y != record.fiscal_year) {
            return false;
        }
        if self.request_status.is_some_and(|s| s != record.request_status) {
            return false;
        }
        true
    }
}
