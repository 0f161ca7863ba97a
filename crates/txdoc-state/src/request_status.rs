//! # Request Status Workflow
//!
//! The closed set of collection states a compliance record moves through,
//! and the configurable workflow deciding which changes are permitted.
//!
//! ## States
//!
//! ```text
//! NOT_REQUESTED (initial) ──▶ REQUESTED ──▶ RECEIVED (terminal)
//! ```
//!
//! ## Policies
//!
//! - [`StatusPolicy::ValueDomain`] (default): membership validation only.
//!   Any enabled status may be set at any time, in any order.
//! - [`StatusPolicy::Sequential`]: a record may stay where it is or move
//!   forward; moving backwards is rejected.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use txdoc_core::ValidationError;

// ─── Request Status ──────────────────────────────────────────────────

/// Collection state of a compliance document.
///
/// Variant declaration order is workflow order; the derived `Ord` is used by
/// [`StatusPolicy::Sequential`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    /// The document has not been asked for yet.
    #[default]
    NotRequested,
    /// The subject organization has been asked for the document.
    Requested,
    /// The document has been received.
    Received,
}

impl RequestStatus {
    /// Every status, in workflow order.
    pub const ALL: [RequestStatus; 3] = [
        RequestStatus::NotRequested,
        RequestStatus::Requested,
        RequestStatus::Received,
    ];

    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotRequested => "NOT_REQUESTED",
            Self::Requested => "REQUESTED",
            Self::Received => "RECEIVED",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownRequestStatus(s.to_string()))
    }
}

// ─── Policy ──────────────────────────────────────────────────────────

/// How strictly status changes are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusPolicy {
    /// Any enabled status may be set at any time.
    #[default]
    ValueDomain,
    /// Only staying put or moving forward is allowed.
    Sequential,
}

impl StatusPolicy {
    fn as_str(&self) -> &'static str {
        match self {
            Self::ValueDomain => "value_domain",
            Self::Sequential => "sequential",
        }
    }
}

impl std::fmt::Display for StatusPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "value_domain" => Ok(Self::ValueDomain),
            "sequential" => Ok(Self::Sequential),
            other => Err(ValidationError::InvalidConfiguration {
                key: "TXDOC_STATUS_POLICY".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

// ─── Workflow ────────────────────────────────────────────────────────

/// Deployment-level status configuration.
///
/// Holds the enabled subset of [`RequestStatus`] and the [`StatusPolicy`].
/// `NOT_REQUESTED` is always enabled since every record starts there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusWorkflow {
    policy: StatusPolicy,
    enabled: BTreeSet<RequestStatus>,
}

impl StatusWorkflow {
    /// Workflow with every status enabled under the given policy.
    pub fn new(policy: StatusPolicy) -> Self {
        Self {
            policy,
            enabled: RequestStatus::ALL.into_iter().collect(),
        }
    }

    /// Restrict the enabled statuses. The initial status is always kept.
    pub fn with_enabled(mut self, statuses: impl IntoIterator<Item = RequestStatus>) -> Self {
        self.enabled = statuses.into_iter().collect();
        self.enabled.insert(Self::initial());
        self
    }

    /// Parse a comma-separated list of enabled statuses, as found in
    /// configuration (e.g. `"NOT_REQUESTED,RECEIVED"`).
    pub fn parse_enabled(raw: &str) -> Result<Vec<RequestStatus>, ValidationError> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                s.parse::<RequestStatus>()
                    .map_err(|_| ValidationError::InvalidConfiguration {
                        key: "TXDOC_ENABLED_STATUSES".to_string(),
                        value: s.to_string(),
                    })
            })
            .collect()
    }

    /// The status every record is created with.
    pub fn initial() -> RequestStatus {
        RequestStatus::NotRequested
    }

    /// The configured policy.
    pub fn policy(&self) -> StatusPolicy {
        self.policy
    }

    /// Whether a status is enabled in this deployment.
    pub fn is_enabled(&self, status: RequestStatus) -> bool {
        self.enabled.contains(&status)
    }

    /// Enabled statuses in workflow order.
    pub fn enabled(&self) -> impl Iterator<Item = RequestStatus> + '_ {
        self.enabled.iter().copied()
    }

    /// Check a typed status change against enablement and policy.
    pub fn check_transition(
        &self,
        from: RequestStatus,
        to: RequestStatus,
    ) -> Result<(), ValidationError> {
        if !self.is_enabled(to) {
            return Err(ValidationError::StatusNotEnabled(to.to_string()));
        }
        match self.policy {
            StatusPolicy::ValueDomain => Ok(()),
            StatusPolicy::Sequential if to >= from => Ok(()),
            StatusPolicy::Sequential => Err(ValidationError::StatusTransitionRejected {
                from: from.to_string(),
                to: to.to_string(),
            }),
        }
    }

    /// Parse a caller-supplied status string and check the change.
    ///
    /// This is the single entry point for untrusted status values: an
    /// unknown string fails with [`ValidationError::UnknownRequestStatus`]
    /// before any policy is consulted.
    pub fn validate_change(
        &self,
        from: RequestStatus,
        raw: &str,
    ) -> Result<RequestStatus, ValidationError> {
        let to: RequestStatus = raw.parse()?;
        self.check_transition(from, to)?;
        Ok(to)
    }
}

impl Default for StatusWorkflow {
    fn default() -> Self {
        Self::new(StatusPolicy::default())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────
