//! Property tests for creation-time validation and the status domain.

use std::sync::Arc;

use proptest::prelude::*;

use txdoc_core::{ValidationError, FISCAL_YEAR_FLOOR};
use txdoc_directory::InMemoryDirectory;
use txdoc_records::{
    ComplianceRecords, MemoryRecordStore, NewComplianceRecord, RecordError, RecordPatch,
};
use txdoc_state::{RequestStatus, StatusWorkflow};

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

fn service() -> (Arc<InMemoryDirectory>, ComplianceRecords) {
    let directory = Arc::new(InMemoryDirectory::new());
    let records = ComplianceRecords::new(
        Arc::new(MemoryRecordStore::new()),
        directory.clone(),
        StatusWorkflow::default(),
    );
    (directory, records)
}

proptest! {
    #[test]
    fn fiscal_years_below_floor_are_rejected(year in i32::MIN..FISCAL_YEAR_FLOOR) {
        runtime().block_on(async {
            let (dir, records) = service();
            let h = dir.register("H");
            let c = dir.register("C");
            let err = records
                .create(NewComplianceRecord::new(year, h.id, c.id))
                .await
                .unwrap_err();
            prop_assert!(matches!(
                err,
                RecordError::Validation(ValidationError::FiscalYearBelowFloor { .. })
            ), "expected FiscalYearBelowFloor, got {:?}", err);
            Ok(())
        })?;
    }

    #[test]
    fn fiscal_years_at_or_above_floor_are_accepted(year in FISCAL_YEAR_FLOOR..3000i32) {
        runtime().block_on(async {
            let (dir, records) = service();
            let h = dir.register("H");
            let c = dir.register("C");
            let rec = records
                .create(NewComplianceRecord::new(year, h.id, c.id))
                .await
                .unwrap();
            prop_assert_eq!(rec.fiscal_year.value(), year);
            Ok(())
        })?;
    }

    #[test]
    fn non_member_statuses_never_persist(raw in "[A-Za-z_ ]{0,16}") {
        prop_assume!(raw.parse::<RequestStatus>().is_err());
        runtime().block_on(async {
            let (dir, records) = service();
            let h = dir.register("H");
            let c = dir.register("C");
            let mut rec = records
                .create(NewComplianceRecord::new(2020, h.id, c.id))
                .await
                .unwrap();
            let result = records.update(&mut rec, RecordPatch::request_status(raw.clone())).await;
            prop_assert!(result.is_err());
            let stored = records.get(rec.id).await.unwrap();
            prop_assert_eq!(stored.request_status, RequestStatus::NotRequested);
            Ok(())
        })?;
    }
}

#[tokio::test]
async fn absent_fiscal_year_is_rejected() {
    let (dir, records) = service();
    let h = dir.register("H");
    let c = dir.register("C");
    let draft = NewComplianceRecord {
        fiscal_year: None,
        ..NewComplianceRecord::new(2020, h.id, c.id)
    };
    assert!(matches!(
        records.create(draft).await,
        Err(RecordError::Validation(ValidationError::FiscalYearMissing))
    ));
}
