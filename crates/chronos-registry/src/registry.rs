//! # Registry
//!
//! The single concurrency authority over Entity Store and ownership graph.
//!
//! Both live inside one `parking_lot::RwLock`. Every mutation takes the
//! write guard for its full duration, and every read that needs a
//! consistent picture (scoring, cycle detection, graph views) holds the
//! read guard for its full duration. A scoring pass therefore never sees
//! half of an edge upsert or half of a status transition.
//!
//! Reads hand out owned values, never references into the guarded state.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::info;

use chronos_core::{Clock, DashSlugger, EntityId, SystemClock};
use chronos_graph::{OwnershipEdge, OwnershipGraph, OwnershipPercentage};
use chronos_risk::{RiskEngine, RiskReport, RiskReportEntry};
use chronos_state::{Entity, EntityAttributes, EntityFilter, EntityStatus, EntityStore};

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::view::GraphView;

#[derive(Debug)]
struct Inner {
    store: EntityStore,
    graph: OwnershipGraph,
}

/// Shared handle to the Chronos core. Clones share the same state.
#[derive(Debug, Clone)]
pub struct Registry {
    inner: Arc<RwLock<Inner>>,
    engine: Arc<RiskEngine>,
    config: Arc<RegistryConfig>,
}

impl Default for Registry {
    fn default() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner {
                store: EntityStore::default(),
                graph: OwnershipGraph::new(),
            })),
            engine: Arc::new(RiskEngine::default()),
            config: Arc::new(RegistryConfig::default()),
        }
    }
}

impl Registry {
    /// Registry on the system clock.
    ///
    /// # Errors
    ///
    /// `Config` if the risk section fails validation.
    pub fn new(config: RegistryConfig) -> Result<Self, RegistryError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Registry whose store timestamps and scoring window use `clock`.
    ///
    /// # Errors
    ///
    /// `Config` if the risk section fails validation.
    pub fn with_clock(config: RegistryConfig, clock: Arc<dyn Clock>) -> Result<Self, RegistryError> {
        let engine = RiskEngine::with_clock(config.risk.clone(), Arc::clone(&clock))?;
        let store = EntityStore::new(Arc::new(DashSlugger), clock);
        info!(strict_edges = config.strict_edges, "registry initialized");
        Ok(Self {
            inner: Arc::new(RwLock::new(Inner {
                store,
                graph: OwnershipGraph::new(),
            })),
            engine: Arc::new(engine),
            config: Arc::new(config),
        })
    }

    /// Active configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    // ── Entities ─────────────────────────────────────────────────────

    /// Idempotent upsert keyed by name. See [`EntityStore::create_or_update`].
    pub fn create_or_update(&self, attrs: EntityAttributes) -> Result<EntityId, RegistryError> {
        Ok(self.inner.write().store.create_or_update(attrs)?)
    }

    /// Copy of the entity.
    pub fn get(&self, id: &EntityId) -> Result<Entity, RegistryError> {
        Ok(self.inner.read().store.get(id)?.clone())
    }

    /// Entities matching `filter`, ordered by id.
    pub fn list(&self, filter: &EntityFilter) -> Vec<Entity> {
        self.inner
            .read()
            .store
            .list(filter)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Remove the entity. Edges touching it are left in place.
    pub fn delete(&self, id: &EntityId) -> Result<Entity, RegistryError> {
        Ok(self.inner.write().store.delete(id)?)
    }

    /// Apply a lifecycle transition.
    pub fn transition(
        &self,
        id: &EntityId,
        to: EntityStatus,
        reason: Option<&str>,
    ) -> Result<EntityStatus, RegistryError> {
        Ok(self.inner.write().store.transition(id, to, reason)?)
    }

    /// Entity count per status, zeros included.
    pub fn status_counts(&self) -> BTreeMap<EntityStatus, usize> {
        self.inner.read().store.status_counts()
    }

    /// Number of registered entities.
    pub fn entity_count(&self) -> usize {
        self.inner.read().store.len()
    }

    // ── Ownership ────────────────────────────────────────────────────

    /// Insert or replace `parent → child`. Strict when the configuration
    /// asks for it.
    pub fn upsert_edge(
        &self,
        parent: EntityId,
        child: EntityId,
        percentage: f64,
    ) -> Result<Option<OwnershipPercentage>, RegistryError> {
        if self.config.strict_edges {
            return self.upsert_edge_strict(parent, child, percentage);
        }
        Ok(self.inner.write().graph.upsert_edge(parent, child, percentage)?)
    }

    /// Insert or replace `parent → child`, rejecting unregistered endpoints.
    pub fn upsert_edge_strict(
        &self,
        parent: EntityId,
        child: EntityId,
        percentage: f64,
    ) -> Result<Option<OwnershipPercentage>, RegistryError> {
        let mut guard = self.inner.write();
        let Inner { store, graph } = &mut *guard;
        Ok(graph.upsert_edge_strict(parent, child, percentage, &*store)?)
    }

    /// Remove `parent → child`; no-op when absent.
    pub fn remove_edge(&self, parent: &EntityId, child: &EntityId) -> Option<OwnershipPercentage> {
        self.inner.write().graph.remove_edge(parent, child)
    }

    /// Remove every edge. Entities are untouched.
    pub fn clear_edges(&self) -> usize {
        self.inner.write().graph.clear()
    }

    /// Every edge, ordered by parent then child.
    pub fn edges(&self) -> Vec<OwnershipEdge> {
        self.inner.read().graph.edges()
    }

    /// Transitive owners of `id`.
    pub fn ancestors(&self, id: &EntityId) -> BTreeSet<EntityId> {
        self.inner.read().graph.ancestors(id)
    }

    /// Transitive holdings of `id`.
    pub fn descendants(&self, id: &EntityId) -> BTreeSet<EntityId> {
        self.inner.read().graph.descendants(id)
    }

    /// Direct owners of `id` with their shares.
    pub fn direct_parents(&self, id: &EntityId) -> Vec<(EntityId, OwnershipPercentage)> {
        self.inner.read().graph.direct_parents(id)
    }

    /// Direct holdings of `id` with its shares.
    pub fn direct_children(&self, id: &EntityId) -> Vec<(EntityId, OwnershipPercentage)> {
        self.inner.read().graph.direct_children(id)
    }

    /// Length of the single-child chain ending at `id`.
    pub fn chain_length(&self, id: &EntityId) -> usize {
        self.inner.read().graph.chain_length(id)
    }

    /// Every simple ownership cycle.
    pub fn detect_cycles(&self) -> Vec<Vec<EntityId>> {
        self.inner.read().graph.detect_cycles()
    }

    /// Nodes, edges, and cycles from one snapshot.
    pub fn graph_view(&self) -> GraphView {
        let guard = self.inner.read();
        GraphView::build(&guard.store, &guard.graph)
    }

    // ── Risk ─────────────────────────────────────────────────────────

    /// Score one entity against the current state.
    pub fn score(&self, id: &EntityId) -> Result<RiskReportEntry, RegistryError> {
        let guard = self.inner.read();
        Ok(self.engine.score(&guard.store, &guard.graph, id)?)
    }

    /// Score every entity, ranked.
    pub fn score_all(&self) -> RiskReport {
        let guard = self.inner.read();
        self.engine.score_all(&guard.store, &guard.graph)
    }

    /// Entries at or above the configured candidate threshold, ranked.
    pub fn shell_candidates(&self) -> Vec<RiskReportEntry> {
        let threshold = self.config.risk.candidate_threshold;
        self.score_all()
            .into_iter()
            .filter(|e| e.is_candidate(threshold))
            .collect()
    }
}
