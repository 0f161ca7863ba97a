//! Document types a compliance record can track.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use txdoc_core::ValidationError;

/// Kind of compliance document being collected.
///
/// A closed set. Adding a variant forces every `match` in the workspace to
/// handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentType {
    /// United States tax form (W-9 / W-8 family).
    #[default]
    UsTaxForm,
}

impl DocumentType {
    /// Every known document type.
    pub const ALL: [DocumentType; 1] = [DocumentType::UsTaxForm];

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UsTaxForm => "US_TAX_FORM",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownDocumentType(s.to_string()))
    }
}
