//! # Entity Store
//!
//! In-memory, id-keyed registry of [`Entity`] records.
//!
//! ## Identity
//!
//! Submissions are keyed by their normalized name (see
//! [`EntityAttributes::identity_key`]). Resubmitting the same name updates
//! the existing entity in place; a new name gets the slug of that name,
//! suffixed `-2`, `-3`, … when the slug has been issued before. Issued ids
//! are remembered forever, so a deleted entity's id is never handed out
//! again.
//!
//! ## Atomicity
//!
//! Every operation validates before it mutates. A failed call leaves the
//! store exactly as it was.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use chronos_core::{
    Clock, DashSlugger, EntityId, EntityResolver, JurisdictionCode, Slugger, SystemClock,
};

use crate::entity::{Entity, EntityAttributes};
use crate::error::StateError;
use crate::lifecycle::EntityStatus;

// ─── Filter ──────────────────────────────────────────────────────────

/// Criteria for [`EntityStore::list`]. Every present criterion must match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityFilter {
    /// Exact status.
    pub status: Option<EntityStatus>,
    /// Exact jurisdiction.
    pub jurisdiction: Option<JurisdictionCode>,
    /// Case-insensitive substring of the name.
    pub name_contains: Option<String>,
}

impl EntityFilter {
    /// Match everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to one status.
    pub fn status(mut self, status: EntityStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restrict to one jurisdiction.
    pub fn jurisdiction(mut self, code: JurisdictionCode) -> Self {
        self.jurisdiction = Some(code);
        self
    }

    /// Restrict to names containing `text`, ignoring case.
    pub fn name_contains(mut self, text: impl Into<String>) -> Self {
        self.name_contains = Some(text.into());
        self
    }

    /// Whether `entity` satisfies every criterion.
    pub fn matches(&self, entity: &Entity) -> bool {
        if let Some(status) = self.status {
            if entity.status != status {
                return false;
            }
        }
        if let Some(code) = &self.jurisdiction {
            if entity.jurisdiction.as_ref() != Some(code) {
                return false;
            }
        }
        if let Some(text) = &self.name_contains {
            if !entity.name.to_lowercase().contains(&text.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

// ─── Store ───────────────────────────────────────────────────────────

/// Registry of entities keyed by [`EntityId`].
pub struct EntityStore {
    entities: BTreeMap<EntityId, Entity>,
    /// Identity key → id of the live entity holding that key.
    keys: HashMap<String, EntityId>,
    /// Every id ever issued, live or deleted.
    issued: HashSet<EntityId>,
    slugger: Arc<dyn Slugger>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for EntityStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore")
            .field("entities", &self.entities.len())
            .field("issued", &self.issued.len())
            .finish()
    }
}

impl Default for EntityStore {
    fn default() -> Self {
        Self::new(Arc::new(DashSlugger), Arc::new(SystemClock))
    }
}

impl EntityStore {
    /// Create an empty store with the given id derivation and clock.
    pub fn new(slugger: Arc<dyn Slugger>, clock: Arc<dyn Clock>) -> Self {
        Self {
            entities: BTreeMap::new(),
            keys: HashMap::new(),
            issued: HashSet::new(),
            slugger,
            clock,
        }
    }

    /// Create an empty store using [`DashSlugger`] and `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self::new(Arc::new(DashSlugger), clock)
    }

    /// Idempotent upsert.
    ///
    /// Updates the entity whose name matches `attrs` in place, keeping
    /// its status and history, or creates a new `PENDING` entity.
    ///
    /// # Errors
    ///
    /// `InvalidEntity` for an empty name or a formation date after today;
    /// `Core` when the name yields no slug.
    pub fn create_or_update(&mut self, attrs: EntityAttributes) -> Result<EntityId, StateError> {
        let attrs = attrs.normalized()?;
        let now = self.clock.now();
        if let Some(formed) = attrs.formed_on {
            if formed > now.date() {
                return Err(StateError::InvalidEntity {
                    reason: format!("formation date {formed} is in the future"),
                });
            }
        }

        let key = attrs.identity_key();
        if let Some(id) = self.keys.get(&key).cloned() {
            if let Some(entity) = self.entities.get_mut(&id) {
                entity.apply_update(attrs, now);
                info!(entity_id = %id, "entity updated");
                return Ok(id);
            }
        }

        let base = self.slugger.slug(&attrs.name)?;
        let id = self.next_free_id(&base);
        let entity = Entity::create(id.clone(), attrs, now);
        info!(
            entity_id = %id,
            name = %entity.name,
            legal_form = %entity.legal_form,
            "entity created"
        );
        self.issued.insert(id.clone());
        self.keys.insert(key, id.clone());
        self.entities.insert(id.clone(), entity);
        Ok(id)
    }

    fn next_free_id(&self, base: &EntityId) -> EntityId {
        if !self.issued.contains(base) {
            return base.clone();
        }
        let mut n = 2;
        loop {
            let candidate = base.with_suffix(n);
            if !self.issued.contains(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    /// Look up an entity.
    pub fn get(&self, id: &EntityId) -> Result<&Entity, StateError> {
        self.entities.get(id).ok_or_else(|| StateError::NotFound {
            entity_id: id.clone(),
        })
    }

    /// Entities matching `filter`, ordered by id.
    pub fn list(&self, filter: &EntityFilter) -> Vec<&Entity> {
        self.entities.values().filter(|e| filter.matches(e)).collect()
    }

    /// Remove an entity. Its id is retired, not freed.
    ///
    /// Ownership edges that mention the id are left alone; the graph
    /// treats such ids as unknown.
    pub fn delete(&mut self, id: &EntityId) -> Result<Entity, StateError> {
        let entity = self.entities.remove(id).ok_or_else(|| StateError::NotFound {
            entity_id: id.clone(),
        })?;
        self.keys.retain(|_, v| v != id);
        info!(entity_id = %id, "entity deleted");
        Ok(entity)
    }

    /// Apply a lifecycle transition.
    ///
    /// # Errors
    ///
    /// `NotFound` if the id is unknown; `IllegalTransition` if the table
    /// does not allow `current -> to`. The entity is unchanged on error.
    pub fn transition(
        &mut self,
        id: &EntityId,
        to: EntityStatus,
        reason: Option<&str>,
    ) -> Result<EntityStatus, StateError> {
        let now = self.clock.now();
        let entity = self.entities.get_mut(id).ok_or_else(|| StateError::NotFound {
            entity_id: id.clone(),
        })?;
        let from = entity.status;
        match entity.transition_to(to, reason, now) {
            Ok(status) => {
                info!(entity_id = %id, %from, to = %status, "status transition applied");
                Ok(status)
            }
            Err(e) => {
                warn!(entity_id = %id, %from, %to, "status transition rejected");
                Err(e)
            }
        }
    }

    /// Number of entities per status, with zero entries for unused ones.
    pub fn status_counts(&self) -> BTreeMap<EntityStatus, usize> {
        let mut counts: BTreeMap<EntityStatus, usize> =
            EntityStatus::ALL.into_iter().map(|s| (s, 0)).collect();
        for entity in self.entities.values() {
            *counts.entry(entity.status).or_insert(0) += 1;
        }
        counts
    }

    /// Whether an entity with this id exists.
    pub fn contains(&self, id: &EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// All entities, ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the store holds no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl EntityResolver for EntityStore {
    fn contains_entity(&self, id: &EntityId) -> bool {
        self.contains(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use chronos_core::FixedClock;

    use crate::entity::LegalForm;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn store() -> EntityStore {
        EntityStore::with_clock(Arc::new(FixedClock::on(today())))
    }

    fn code(s: &str) -> JurisdictionCode {
        JurisdictionCode::new(s).unwrap()
    }

    fn demo_store() -> EntityStore {
        let mut s = store();
        s.create_or_update(
            EntityAttributes::new("Foo LLC")
                .jurisdiction(code("DE"))
                .formed_on(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()),
        )
        .unwrap();
        let bar = s
            .create_or_update(EntityAttributes::new("Bar Inc").jurisdiction(code("NY")))
            .unwrap();
        let baz = s
            .create_or_update(EntityAttributes::new("Baz GmbH").jurisdiction(code("DE")))
            .unwrap();
        s.transition(&bar, EntityStatus::Active, None).unwrap();
        s.transition(&baz, EntityStatus::Active, None).unwrap();
        s.transition(&baz, EntityStatus::Delinquent, None).unwrap();
        s
    }

    #[test]
    fn test_create_starts_pending() {
        let mut s = store();
        let id = s.create_or_update(EntityAttributes::new("Acme Corp")).unwrap();
        assert_eq!(id.as_str(), "acme-corp");
        let e = s.get(&id).unwrap();
        assert_eq!(e.status, EntityStatus::Pending);
        assert_eq!(e.legal_form, LegalForm::Corporation);
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let mut s = store();
        let attrs = EntityAttributes::new("Foo LLC").jurisdiction(code("DE"));
        let a = s.create_or_update(attrs.clone()).unwrap();
        let b = s.create_or_update(attrs).unwrap();
        assert_eq!(a, b);
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_update_keeps_status_and_history() {
        let mut s = store();
        let id = s.create_or_update(EntityAttributes::new("Foo LLC")).unwrap();
        s.transition(&id, EntityStatus::Active, Some("formed")).unwrap();
        let same = s
            .create_or_update(
                EntityAttributes::new("foo  llc")
                    .jurisdiction(code("WY"))
                    .notes("moved"),
            )
            .unwrap();
        assert_eq!(same, id);
        let e = s.get(&id).unwrap();
        assert_eq!(e.status, EntityStatus::Active);
        assert_eq!(e.transitions.len(), 1);
        assert_eq!(e.jurisdiction, Some(code("WY")));
        assert_eq!(e.name, "foo llc");
        assert_eq!(e.notes.as_deref(), Some("moved"));
    }

    #[test]
    fn test_colliding_slugs_are_disambiguated() {
        let mut s = store();
        let a = s.create_or_update(EntityAttributes::new("Acme LLC")).unwrap();
        let b = s.create_or_update(EntityAttributes::new("Acme, LLC")).unwrap();
        let c = s.create_or_update(EntityAttributes::new("Acme -- LLC")).unwrap();
        assert_eq!(a.as_str(), "acme-llc");
        assert_eq!(b.as_str(), "acme-llc-2");
        assert_eq!(c.as_str(), "acme-llc-3");
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn test_deleted_ids_are_never_reused() {
        let mut s = store();
        let first = s.create_or_update(EntityAttributes::new("Foo LLC")).unwrap();
        s.delete(&first).unwrap();
        let second = s.create_or_update(EntityAttributes::new("Foo LLC")).unwrap();
        assert_ne!(first, second);
        assert_eq!(second.as_str(), "foo-llc-2");
        assert!(matches!(s.get(&first), Err(StateError::NotFound { .. })));
    }

    #[test]
    fn test_delete_missing_is_not_found() {
        let mut s = store();
        let err = s.delete(&EntityId::new("ghost")).unwrap_err();
        assert!(matches!(err, StateError::NotFound { .. }));
    }

    #[test]
    fn test_future_formation_rejected() {
        let mut s = store();
        let tomorrow = today().succ_opt().unwrap();
        let err = s
            .create_or_update(EntityAttributes::new("Future LLC").formed_on(tomorrow))
            .unwrap_err();
        assert!(matches!(err, StateError::InvalidEntity { .. }));
        assert!(s.is_empty());
    }

    #[test]
    fn test_unsluggable_name_rejected() {
        let mut s = store();
        let err = s.create_or_update(EntityAttributes::new("!!!")).unwrap_err();
        assert!(matches!(err, StateError::Core(_)));
    }

    #[test]
    fn test_list_filters() {
        let s = demo_store();
        assert_eq!(s.list(&EntityFilter::all()).len(), 3);

        let delinquent = s.list(&EntityFilter::all().status(EntityStatus::Delinquent));
        assert_eq!(delinquent.len(), 1);
        assert_eq!(delinquent[0].name, "Baz GmbH");

        let de = s.list(&EntityFilter::all().jurisdiction(code("de")));
        assert_eq!(de.len(), 2);

        let by_name = s.list(&EntityFilter::all().name_contains("LLC"));
        assert_eq!(by_name.len(), 1);
        let by_lower = s.list(&EntityFilter::all().name_contains("llc"));
        assert_eq!(by_lower.len(), 1);

        let combined = s.list(
            &EntityFilter::all()
                .jurisdiction(code("DE"))
                .status(EntityStatus::Pending),
        );
        assert_eq!(combined.len(), 1);
        assert_eq!(combined[0].id.as_str(), "foo-llc");
    }

    #[test]
    fn test_transition_not_found() {
        let mut s = store();
        let err = s
            .transition(&EntityId::new("ghost"), EntityStatus::Active, None)
            .unwrap_err();
        assert!(matches!(err, StateError::NotFound { .. }));
    }

    #[test]
    fn test_illegal_transition_leaves_store_unchanged() {
        let mut s = demo_store();
        let id = EntityId::new("bar-inc");
        let before = s.get(&id).unwrap().clone();
        let err = s.transition(&id, EntityStatus::Pending, None).unwrap_err();
        assert!(matches!(
            err,
            StateError::IllegalTransition {
                from: EntityStatus::Active,
                to: EntityStatus::Pending,
                ..
            }
        ));
        assert_eq!(s.get(&id).unwrap(), &before);
    }

    #[test]
    fn test_status_counts_include_zeroes() {
        let s = demo_store();
        let counts = s.status_counts();
        assert_eq!(counts.len(), 5);
        assert_eq!(counts[&EntityStatus::Pending], 1);
        assert_eq!(counts[&EntityStatus::Active], 1);
        assert_eq!(counts[&EntityStatus::Delinquent], 1);
        assert_eq!(counts[&EntityStatus::Dissolved], 0);
    }

    #[test]
    fn test_resolver() {
        let s = demo_store();
        assert!(s.contains_entity(&EntityId::new("foo-llc")));
        assert!(!s.contains_entity(&EntityId::new("ghost")));
    }
}
