//! # Record Persistence
//!
//! [`RecordStore`] is the persistence seam. Each call applies fully or not
//! at all. The two mutating calls are guarded on the record not being
//! soft-deleted, checked in the same step as the write, so an update racing
//! a soft delete can never bring the record back. Concurrent field updates
//! on a live record resolve last-writer-wins.
//!
//! [`MemoryRecordStore`] keeps records in a map behind a `parking_lot`
//! read-write lock, with a separate insertion-order list so listings are
//! stable when two records share a `created_at`.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;

use txdoc_core::{OrganizationId, OrganizationRole, RecordId};
use txdoc_state::RequestStatus;

use crate::query::RecordFilter;
use crate::record::ComplianceRecord;

/// Backend failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("record {0} already exists")]
    Duplicate(RecordId),
    #[error("{0}")]
    Backend(String),
}

/// The mutable fields of a record, as written by an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldChanges {
    pub request_status: RequestStatus,
    pub document_link: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of a write that only applies to a record that is not
/// soft-deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardedWrite {
    /// Written. Holds the record as stored afterwards.
    Applied(ComplianceRecord),
    /// The record was already soft-deleted and was left as it was.
    AlreadyDeleted(ComplianceRecord),
    /// No record has this id.
    Missing,
}

/// Persistence interface for compliance records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a new record.
    async fn insert(&self, record: &ComplianceRecord) -> Result<(), StoreError>;

    /// Fetch by id, soft-deleted included.
    async fn get(&self, id: RecordId) -> Result<Option<ComplianceRecord>, StoreError>;

    /// Write `request_status`, `document_link` and `updated_at` unless the
    /// record is soft-deleted.
    async fn update_fields(
        &self,
        id: RecordId,
        changes: &FieldChanges,
    ) -> Result<GuardedWrite, StoreError>;

    /// Set `deleted_at` and `updated_at` to `at` unless the record is
    /// already soft-deleted, in which case the original `deleted_at` stays.
    async fn mark_deleted(
        &self,
        id: RecordId,
        at: DateTime<Utc>,
    ) -> Result<GuardedWrite, StoreError>;

    /// Records referencing `org_id` in `role`, matching `filter`, ordered by
    /// `created_at` ascending.
    async fn list_by_organization(
        &self,
        role: OrganizationRole,
        org_id: OrganizationId,
        filter: &RecordFilter,
    ) -> Result<Vec<ComplianceRecord>, StoreError>;
}

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<RecordId, ComplianceRecord>,
    order: Vec<RecordId>,
}

/// In-memory [`RecordStore`].
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    inner: RwLock<Inner>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, soft-deleted included.
    pub fn len(&self) -> usize {
        self.inner.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().records.is_empty()
    }

    /// Apply `write` to a live record, holding the write lock across the
    /// delete check and the mutation.
    fn write_live(&self, id: RecordId, write: impl FnOnce(&mut ComplianceRecord)) -> GuardedWrite {
        let mut inner = self.inner.write();
        match inner.records.get_mut(&id) {
            None => GuardedWrite::Missing,
            Some(rec) if rec.is_deleted() => GuardedWrite::AlreadyDeleted(rec.clone()),
            Some(rec) => {
                write(rec);
                GuardedWrite::Applied(rec.clone())
            }
        }
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert(&self, record: &ComplianceRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.write();
        if inner.records.contains_key(&record.id) {
            return Err(StoreError::Duplicate(record.id));
        }
        inner.records.insert(record.id, record.clone());
        inner.order.push(record.id);
        Ok(())
    }

    async fn get(&self, id: RecordId) -> Result<Option<ComplianceRecord>, StoreError> {
        Ok(self.inner.read().records.get(&id).cloned())
    }

    async fn update_fields(
        &self,
        id: RecordId,
        changes: &FieldChanges,
    ) -> Result<GuardedWrite, StoreError> {
        Ok(self.write_live(id, |rec| {
            rec.request_status = changes.request_status;
            rec.document_link = changes.document_link.clone();
            rec.updated_at = changes.updated_at;
        }))
    }

    async fn mark_deleted(
        &self,
        id: RecordId,
        at: DateTime<Utc>,
    ) -> Result<GuardedWrite, StoreError> {
        Ok(self.write_live(id, |rec| {
            rec.deleted_at = Some(at);
            rec.updated_at = at;
        }))
    }

    async fn list_by_organization(
        &self,
        role: OrganizationRole,
        org_id: OrganizationId,
        filter: &RecordFilter,
    ) -> Result<Vec<ComplianceRecord>, StoreError> {
        let inner = self.inner.read();
        let mut matched: Vec<ComplianceRecord> = inner
            .order
            .iter()
            .filter_map(|id| inner.records.get(id))
            .filter(|r| r.organization_id(role) == org_id && filter.matches(r))
            .cloned()
            .collect();
        // Stable sort: equal timestamps keep insertion order.
        matched.sort_by_key(|r| r.created_at);
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::NewComplianceRecord;
    use chrono::{Duration, Utc};

    fn record(host: OrganizationId, subject: OrganizationId) -> ComplianceRecord {
        NewComplianceRecord::new(2021, host, subject)
            .validate()
            .unwrap()
            .into_record(Utc::now())
    }

    #[tokio::test]
    async fn insert_then_get() {
        let store = MemoryRecordStore::new();
        let rec = record(OrganizationId::new(), OrganizationId::new());
        store.insert(&rec).await.unwrap();
        assert_eq!(store.get(rec.id).await.unwrap(), Some(rec));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_insert_rejected() {
        let store = MemoryRecordStore::new();
        let rec = record(OrganizationId::new(), OrganizationId::new());
        store.insert(&rec).await.unwrap();
        assert_eq!(
            store.insert(&rec).await.unwrap_err(),
            StoreError::Duplicate(rec.id)
        );
    }

    fn changes(status: RequestStatus, link: Option<&str>) -> FieldChanges {
        FieldChanges {
            request_status: status,
            document_link: link.map(str::to_string),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn writes_to_missing_record_report_missing() {
        let store = MemoryRecordStore::new();
        let id = RecordId::new();
        assert_eq!(
            store
                .update_fields(id, &changes(RequestStatus::Received, None))
                .await
                .unwrap(),
            GuardedWrite::Missing
        );
        assert_eq!(
            store.mark_deleted(id, Utc::now()).await.unwrap(),
            GuardedWrite::Missing
        );
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn update_fields_touches_only_mutable_fields() {
        let store = MemoryRecordStore::new();
        let rec = record(OrganizationId::new(), OrganizationId::new());
        store.insert(&rec).await.unwrap();

        let change = changes(RequestStatus::Requested, Some("https://blobs.example.com/a"));
        let GuardedWrite::Applied(stored) = store.update_fields(rec.id, &change).await.unwrap()
        else {
            panic!("update on a live record must apply");
        };
        assert_eq!(stored.request_status, RequestStatus::Requested);
        assert_eq!(stored.document_link.as_deref(), Some("https://blobs.example.com/a"));
        assert_eq!(stored.updated_at, change.updated_at);
        assert_eq!(stored.fiscal_year, rec.fiscal_year);
        assert_eq!(stored.created_at, rec.created_at);
        assert_eq!(store.get(rec.id).await.unwrap(), Some(stored));
    }

    #[tokio::test]
    async fn deleted_record_rejects_field_updates() {
        let store = MemoryRecordStore::new();
        let rec = record(OrganizationId::new(), OrganizationId::new());
        store.insert(&rec).await.unwrap();

        let at = Utc::now();
        assert!(matches!(
            store.mark_deleted(rec.id, at).await.unwrap(),
            GuardedWrite::Applied(r) if r.deleted_at == Some(at)
        ));

        let outcome = store
            .update_fields(rec.id, &changes(RequestStatus::Received, None))
            .await
            .unwrap();
        let GuardedWrite::AlreadyDeleted(current) = outcome else {
            panic!("update on a deleted record must not apply, got {outcome:?}");
        };
        assert_eq!(current.request_status, RequestStatus::NotRequested);
        assert_eq!(current.deleted_at, Some(at));
    }

    #[tokio::test]
    async fn second_delete_keeps_first_timestamp() {
        let store = MemoryRecordStore::new();
        let rec = record(OrganizationId::new(), OrganizationId::new());
        store.insert(&rec).await.unwrap();

        let first = Utc::now();
        store.mark_deleted(rec.id, first).await.unwrap();
        let outcome = store
            .mark_deleted(rec.id, first + Duration::seconds(5))
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            GuardedWrite::AlreadyDeleted(r) if r.deleted_at == Some(first) && r.updated_at == first
        ));
    }

    #[tokio::test]
    async fn list_orders_by_created_at_then_insertion() {
        let store = MemoryRecordStore::new();
        let host = OrganizationId::new();
        let now = Utc::now();

        let mut late = record(host, OrganizationId::new());
        late.created_at = now + Duration::seconds(10);
        let mut tie_a = record(host, OrganizationId::new());
        tie_a.created_at = now;
        let mut tie_b = record(host, OrganizationId::new());
        tie_b.created_at = now;

        store.insert(&late).await.unwrap();
        store.insert(&tie_a).await.unwrap();
        store.insert(&tie_b).await.unwrap();
        store
            .insert(&record(OrganizationId::new(), host))
            .await
            .unwrap();

        let ids: Vec<_> = store
            .list_by_organization(OrganizationRole::Requesting, host, &RecordFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![tie_a.id, tie_b.id, late.id]);
    }

    #[tokio::test]
    async fn list_by_subject_role() {
        let store = MemoryRecordStore::new();
        let subject = OrganizationId::new();
        let rec = record(OrganizationId::new(), subject);
        store.insert(&rec).await.unwrap();

        let by_subject = store
            .list_by_organization(OrganizationRole::Subject, subject, &RecordFilter::default())
            .await
            .unwrap();
        assert_eq!(by_subject, vec![rec]);

        let by_requesting = store
            .list_by_organization(OrganizationRole::Requesting, subject, &RecordFilter::default())
            .await
            .unwrap();
        assert!(by_requesting.is_empty());
    }
}
