//! # Entity Identity
//!
//! An [`EntityId`] is a stable slug derived from an entity's legal name.
//! The derivation is delegated to a [`Slugger`] so callers can swap the
//! naming scheme without touching the store.
//!
//! ## Invariants
//!
//! - An id is immutable once assigned to an entity.
//! - The store never re-issues an id, even after the entity is deleted.
//!   Collisions are resolved by numeric suffixes (`acme-llc-2`).

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Unique identifier for a corporate entity.
///
/// Ordered lexicographically so reports and traversals are deterministic.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Wrap an existing slug.
    ///
    /// No validation is performed: the graph accepts ids for entities it
    /// has never seen, and ids read back from a caller's log must be taken
    /// as-is.
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// The slug with a numeric disambiguation suffix appended.
    pub fn with_suffix(&self, n: u32) -> Self {
        Self(format!("{}-{n}", self.0))
    }

    /// Access the slug.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Deterministic name → id derivation.
pub trait Slugger: Send + Sync {
    /// Derive the base id for `name`. Must return the same id for the
    /// same input on every call.
    fn slug(&self, name: &str) -> Result<EntityId, CoreError>;
}

/// Default slugger: lowercase, alphanumeric runs joined by single dashes.
///
/// `"Central Holdings"` → `central-holdings`,
/// `"Acme, L.L.C."` → `acme-l-l-c`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DashSlugger;

impl Slugger for DashSlugger {
    fn slug(&self, name: &str) -> Result<EntityId, CoreError> {
        let mut out = String::with_capacity(name.len());
        let mut pending_dash = false;
        for c in name.trim().chars() {
            if c.is_alphanumeric() {
                if pending_dash && !out.is_empty() {
                    out.push('-');
                }
                pending_dash = false;
                out.extend(c.to_lowercase());
            } else {
                pending_dash = true;
            }
        }
        if out.is_empty() {
            return Err(CoreError::EmptySlug {
                name: name.to_string(),
            });
        }
        Ok(EntityId(out))
    }
}

/// Answers whether an id refers to a live entity.
///
/// The relationship graph is attribute-agnostic; strict-mode edge upserts
/// consult a resolver to reject dangling endpoints.
pub trait EntityResolver {
    /// Whether `id` currently names an entity.
    fn contains_entity(&self, id: &EntityId) -> bool;
}

impl EntityResolver for BTreeSet<EntityId> {
    fn contains_entity(&self, id: &EntityId) -> bool {
        self.contains(id)
    }
}

impl EntityResolver for HashSet<EntityId> {
    fn contains_entity(&self, id: &EntityId) -> bool {
        self.contains(id)
    }
}
