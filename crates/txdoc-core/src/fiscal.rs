//! # Fiscal Year
//!
//! The fiscal year a compliance document is collected for. The reporting
//! regime supports 2015 onwards; [`FiscalYear::new`] is the only way to
//! build one and it enforces that floor.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Earliest fiscal year the reporting regime supports.
pub const FISCAL_YEAR_FLOOR: i32 = 2015;

/// A fiscal year, guaranteed to be at or above [`FISCAL_YEAR_FLOOR`].
///
/// Deserialization goes through [`FiscalYear::new`], so a stored or
/// transmitted value below the floor is rejected rather than silently
/// accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct FiscalYear(i32);

impl FiscalYear {
    /// Validate and wrap a fiscal year.
    pub fn new(year: i32) -> Result<Self, ValidationError> {
        if year < FISCAL_YEAR_FLOOR {
            return Err(ValidationError::FiscalYearBelowFloor {
                year,
                floor: FISCAL_YEAR_FLOOR,
            });
        }
        Ok(Self(year))
    }

    /// Validate an optional fiscal year, rejecting absence.
    pub fn require(year: Option<i32>) -> Result<Self, ValidationError> {
        match year {
            Some(year) => Self::new(year),
            None => Err(ValidationError::FiscalYearMissing),
        }
    }

    /// The year as an integer.
    pub fn value(&self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for FiscalYear {
    type Error = ValidationError;

    fn try_from(year: i32) -> Result<Self, Self::Error> {
        Self::new(year)
    }
}

impl From<FiscalYear> for i32 {
    fn from(year: FiscalYear) -> Self {
        year.0
    }
}

impl std::fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn floor_year_is_accepted() {
        assert_eq!(FiscalYear::new(2015).unwrap().value(), 2015);
    }

    #[test]
    fn year_below_floor_is_rejected() {
        let err = FiscalYear::new(2014).unwrap_err();
        match err {
            ValidationError::FiscalYearBelowFloor { year, floor } => {
                assert_eq!(year, 2014);
                assert_eq!(floor, FISCAL_YEAR_FLOOR);
            }
            other => panic!("expected FiscalYearBelowFloor, got: {other:?}"),
        }
    }

    #[test]
    fn missing_year_is_rejected() {
        assert!(matches!(
            FiscalYear::require(None),
            Err(ValidationError::FiscalYearMissing)
        ));
    }

    #[test]
    fn deserialization_enforces_floor() {
        let ok: FiscalYear = serde_json::from_str("2019").unwrap();
        assert_eq!(ok.value(), 2019);
        assert!(serde_json::from_str::<FiscalYear>("2010").is_err());
    }

    #[test]
    fn serializes_as_bare_integer() {
        let year = FiscalYear::new(2021).unwrap();
        assert_eq!(serde_json::to_string(&year).unwrap(), "2021");
    }

    proptest! {
        #[test]
        fn every_year_below_floor_fails(year in i32::MIN..FISCAL_YEAR_FLOOR) {
            prop_assert!(FiscalYear::new(year).is_err());
        }

        #[test]
        fn every_year_at_or_above_floor_succeeds(year in FISCAL_YEAR_FLOOR..=i32::MAX) {
            prop_assert_eq!(FiscalYear::new(year).unwrap().value(), year);
        }
    }
}
