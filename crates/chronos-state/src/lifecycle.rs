//! # Entity Lifecycle State Machine
//!
//! Models the legal/compliance status of a corporate entity.
//!
//! ## States
//!
//! | Status | Meaning |
//! |---|---|
//! | `PENDING` | Registered with Chronos, formation not yet confirmed. Sole initial state. |
//! | `ACTIVE` | Formed and operating. |
//! | `IN_COMPLIANCE` | Filings and fees current. |
//! | `DELINQUENT` | Filings or fees overdue. |
//! | `DISSOLVED` | Wound up. Terminal. |
//!
//! ## Design Decision
//!
//! Entity status is persisted and round-tripped by callers, so it is a
//! runtime enum checked against one explicit table ([`TRANSITIONS`]) rather
//! than a typestate. Anything not in the table is rejected, including a
//! same-state request and every transition out of `DISSOLVED`.

use serde::{Deserialize, Serialize};

use chronos_core::Timestamp;

use crate::error::StateError;

/// Lifecycle status of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityStatus {
    /// Newly registered; formation unconfirmed.
    Pending,
    /// Formed and operating.
    Active,
    /// Filings current.
    InCompliance,
    /// Filings overdue.
    Delinquent,
    /// Wound up (terminal).
    Dissolved,
}

/// Every permitted `(from, to)` status transition.
pub const TRANSITIONS: &[(EntityStatus, EntityStatus)] = &[
    (EntityStatus::Pending, EntityStatus::Active),
    (EntityStatus::Active, EntityStatus::InCompliance),
    (EntityStatus::Active, EntityStatus::Delinquent),
    (EntityStatus::InCompliance, EntityStatus::Delinquent),
    (EntityStatus::Delinquent, EntityStatus::InCompliance),
    (EntityStatus::Active, EntityStatus::Dissolved),
    (EntityStatus::InCompliance, EntityStatus::Dissolved),
    (EntityStatus::Delinquent, EntityStatus::Dissolved),
];

impl EntityStatus {
    /// All statuses in declaration order.
    pub const ALL: [EntityStatus; 5] = [
        Self::Pending,
        Self::Active,
        Self::InCompliance,
        Self::Delinquent,
        Self::Dissolved,
    ];

    /// The SCREAMING_SNAKE_CASE name, matching the serde form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Active => "ACTIVE",
            Self::InCompliance => "IN_COMPLIANCE",
            Self::Delinquent => "DELINQUENT",
            Self::Dissolved => "DISSOLVED",
        }
    }

    /// Whether this state has no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Dissolved)
    }

    /// Whether `self -> to` appears in [`TRANSITIONS`].
    pub fn can_transition_to(&self, to: EntityStatus) -> bool {
        TRANSITIONS.contains(&(*self, to))
    }

    /// Legal successors of this status, in table order.
    pub fn allowed_targets(&self) -> Vec<EntityStatus> {
        TRANSITIONS
            .iter()
            .filter(|(from, _)| from == self)
            .map(|(_, to)| *to)
            .collect()
    }
}

impl std::fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityStatus {
    type Err = StateError;

    /// Case-insensitive; accepts `in_compliance`, `IN-COMPLIANCE`, `In Compliance`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_uppercase(),
            })
            .collect();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == key)
            .ok_or_else(|| StateError::UnknownStatus(s.to_string()))
    }
}

/// Record of one applied status transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusTransitionRecord {
    /// Status before the transition.
    pub from: EntityStatus,
    /// Status after the transition.
    pub to: EntityStatus,
    /// When the transition was applied.
    pub at: Timestamp,
    /// Caller-supplied reason, if any.
    pub reason: Option<String>,
}
