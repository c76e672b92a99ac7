//! # Entity Records
//!
//! An [`Entity`] is the Entity Store's record of one corporate entity:
//! descriptive attributes supplied by callers plus the lifecycle status
//! and its transition log, which only the lifecycle table may change.
//!
//! Callers submit an [`EntityAttributes`]; the store normalizes it and
//! either creates a new `PENDING` entity or updates the existing one in
//! place.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use chronos_core::{EntityId, JurisdictionCode, Timestamp};

use crate::error::StateError;
use crate::lifecycle::{EntityStatus, StatusTransitionRecord};

// ─── Legal Form ──────────────────────────────────────────────────────

/// Legal form of an entity. Drives the LLC-related risk factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LegalForm {
    /// Stock corporation (`Inc`, `Corp`).
    Corporation,
    /// Limited liability company.
    Llc,
    /// Anything else (partnerships, GmbH, trusts, unknown).
    Other,
}

impl LegalForm {
    /// The SCREAMING_SNAKE_CASE name, matching the serde form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Corporation => "CORPORATION",
            Self::Llc => "LLC",
            Self::Other => "OTHER",
        }
    }

    /// Guess the legal form from designators in the entity name.
    ///
    /// `"TechStart LLC"` and `"Acme, L.L.C."` are LLCs; `"Bar Inc"` and
    /// `"Acme Corporation"` are corporations; everything else is `Other`.
    pub fn infer_from_name(name: &str) -> Self {
        let lowered = name.to_lowercase().replace('.', "");
        let tokens: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();
        if tokens.contains(&"llc") {
            Self::Llc
        } else if tokens
            .iter()
            .any(|t| matches!(*t, "inc" | "corp" | "corporation" | "incorporated"))
        {
            Self::Corporation
        } else {
            Self::Other
        }
    }
}

impl std::fmt::Display for LegalForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Submission ──────────────────────────────────────────────────────

/// Attributes submitted to `EntityStore::create_or_update`.
///
/// Status is deliberately absent: new entities always start `PENDING`
/// and existing ones keep theirs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityAttributes {
    /// Legal name. Must contain at least one alphanumeric character.
    pub name: String,
    /// State or country of formation.
    pub jurisdiction: Option<JurisdictionCode>,
    /// Explicit legal form; inferred from the name when absent.
    pub legal_form: Option<LegalForm>,
    /// Formation date.
    pub formed_on: Option<NaiveDate>,
    /// Officer / manager names.
    pub officers: Vec<String>,
    /// Free text. No semantic effect.
    pub notes: Option<String>,
}

impl EntityAttributes {
    /// Start a submission for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set the jurisdiction.
    pub fn jurisdiction(mut self, code: JurisdictionCode) -> Self {
        self.jurisdiction = Some(code);
        self
    }

    /// Set the legal form explicitly.
    pub fn legal_form(mut self, form: LegalForm) -> Self {
        self.legal_form = Some(form);
        self
    }

    /// Set the formation date.
    pub fn formed_on(mut self, date: NaiveDate) -> Self {
        self.formed_on = Some(date);
        self
    }

    /// Append an officer.
    pub fn officer(mut self, name: impl Into<String>) -> Self {
        self.officers.push(name.into());
        self
    }

    /// Set the notes.
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Key under which submissions are considered "the same entity":
    /// trimmed, whitespace-collapsed, case-folded name.
    pub fn identity_key(&self) -> String {
        identity_key(&self.name)
    }

    /// Trim fields, drop blank and duplicate officers, and reject
    /// submissions without a name.
    pub(crate) fn normalized(self) -> Result<Self, StateError> {
        let name = self.name.split_whitespace().collect::<Vec<_>>().join(" ");
        if name.is_empty() {
            return Err(StateError::InvalidEntity {
                reason: "name must not be empty".to_string(),
            });
        }

        let mut officers: Vec<String> = Vec::with_capacity(self.officers.len());
        for officer in self.officers {
            let officer = officer.trim();
            if officer.is_empty() {
                continue;
            }
            let key = officer_key(officer);
            if !officers.iter().any(|o| officer_key(o) == key) {
                officers.push(officer.to_string());
            }
        }

        let notes = self
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        Ok(Self {
            name,
            jurisdiction: self.jurisdiction,
            legal_form: self.legal_form,
            formed_on: self.formed_on,
            officers,
            notes,
        })
    }
}

fn identity_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Comparison key for officer names: trimmed and case-folded.
pub fn officer_key(name: &str) -> String {
    name.trim().to_lowercase()
}

// ─── Entity ──────────────────────────────────────────────────────────

/// A corporate entity tracked by Chronos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Slug-derived identifier. Immutable.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// State or country of formation. Absent means higher uncertainty.
    pub jurisdiction: Option<JurisdictionCode>,
    /// Legal form.
    pub legal_form: LegalForm,
    /// Formation date.
    pub formed_on: Option<NaiveDate>,
    /// Officer names, de-duplicated, in submission order.
    pub officers: Vec<String>,
    /// Current lifecycle status.
    pub status: EntityStatus,
    /// Free text.
    pub notes: Option<String>,
    /// When the entity was first registered.
    pub created_at: Timestamp,
    /// When attributes or status last changed.
    pub updated_at: Timestamp,
    /// Ordered log of applied status transitions.
    pub transitions: Vec<StatusTransitionRecord>,
}

impl Entity {
    /// Build a new `PENDING` entity from normalized attributes.
    pub(crate) fn create(id: EntityId, attrs: EntityAttributes, at: Timestamp) -> Self {
        let legal_form = attrs
            .legal_form
            .unwrap_or_else(|| LegalForm::infer_from_name(&attrs.name));
        Self {
            id,
            name: attrs.name,
            jurisdiction: attrs.jurisdiction,
            legal_form,
            formed_on: attrs.formed_on,
            officers: attrs.officers,
            status: EntityStatus::Pending,
            notes: attrs.notes,
            created_at: at,
            updated_at: at,
            transitions: Vec::new(),
        }
    }

    /// Overwrite descriptive attributes. Status and history are kept.
    pub(crate) fn apply_update(&mut self, attrs: EntityAttributes, at: Timestamp) {
        self.legal_form = attrs
            .legal_form
            .unwrap_or_else(|| LegalForm::infer_from_name(&attrs.name));
        self.name = attrs.name;
        self.jurisdiction = attrs.jurisdiction;
        self.formed_on = attrs.formed_on;
        self.officers = attrs.officers;
        self.notes = attrs.notes;
        self.updated_at = at;
    }

    /// Move to `to` if the lifecycle table allows it.
    ///
    /// On rejection the entity is left untouched and the error names the
    /// current and requested status.
    pub fn transition_to(
        &mut self,
        to: EntityStatus,
        reason: Option<&str>,
        at: Timestamp,
    ) -> Result<EntityStatus, StateError> {
        if !self.status.can_transition_to(to) {
            return Err(StateError::IllegalTransition {
                entity_id: self.id.clone(),
                from: self.status,
                to,
            });
        }
        self.transitions.push(StatusTransitionRecord {
            from: self.status,
            to,
            at,
            reason: reason.map(str::to_string),
        });
        self.status = to;
        self.updated_at = at;
        Ok(to)
    }

    /// PENDING → ACTIVE.
    pub fn activate(&mut self, at: Timestamp) -> Result<EntityStatus, StateError> {
        self.transition_to(EntityStatus::Active, None, at)
    }

    /// ACTIVE | DELINQUENT → IN_COMPLIANCE.
    pub fn mark_in_compliance(&mut self, at: Timestamp) -> Result<EntityStatus, StateError> {
        self.transition_to(EntityStatus::InCompliance, None, at)
    }

    /// ACTIVE | IN_COMPLIANCE → DELINQUENT.
    pub fn mark_delinquent(&mut self, at: Timestamp) -> Result<EntityStatus, StateError> {
        self.transition_to(EntityStatus::Delinquent, None, at)
    }

    /// ACTIVE | IN_COMPLIANCE | DELINQUENT → DISSOLVED.
    pub fn dissolve(&mut self, at: Timestamp) -> Result<EntityStatus, StateError> {
        self.transition_to(EntityStatus::Dissolved, None, at)
    }

    /// Whether the entity has reached the terminal state.
    pub fn is_dissolved(&self) -> bool {
        self.status.is_terminal()
    }

    /// Days between formation and `today`, if the formation date is known.
    pub fn age_in_days(&self, today: NaiveDate) -> Option<i64> {
        self.formed_on.map(|formed| (today - formed).num_days())
    }
}
