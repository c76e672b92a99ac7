//! # Ownership Graph
//!
//! Edges are stored twice, forward (`parent → children`) and backward
//! (`child → parents`), both as ordered maps so every query answers in a
//! deterministic order. A node exists only while at least one edge
//! touches it.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use chronos_core::{EntityId, EntityResolver};

use crate::cycles;
use crate::error::{EdgeViolation, GraphError};
use crate::percentage::OwnershipPercentage;

type Adjacency = BTreeMap<EntityId, BTreeMap<EntityId, OwnershipPercentage>>;

/// One ownership edge: `parent` holds `percentage` of `child`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnershipEdge {
    /// Owning entity.
    pub parent: EntityId,
    /// Owned entity.
    pub child: EntityId,
    /// Parent's share of the child.
    pub percentage: OwnershipPercentage,
}

/// Directed, percentage-weighted ownership graph.
#[derive(Debug, Clone, Default)]
pub struct OwnershipGraph {
    children: Adjacency,
    parents: Adjacency,
}

impl OwnershipGraph {
    /// An empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Insert or replace the edge `parent → child`.
    ///
    /// Endpoints need not exist as entities. Returns the percentage the
    /// edge carried before, if it existed.
    ///
    /// # Errors
    ///
    /// `InvalidEdge` for a self-loop or a percentage outside (0, 100]. The
    /// graph is unchanged on error.
    pub fn upsert_edge(
        &mut self,
        parent: EntityId,
        child: EntityId,
        percentage: f64,
    ) -> Result<Option<OwnershipPercentage>, GraphError> {
        let percentage = Self::validate(&parent, &child, percentage)?;
        Ok(self.insert(parent, child, percentage))
    }

    /// [`upsert_edge`](Self::upsert_edge), additionally rejecting
    /// endpoints `known` does not resolve.
    pub fn upsert_edge_strict<R: EntityResolver + ?Sized>(
        &mut self,
        parent: EntityId,
        child: EntityId,
        percentage: f64,
        known: &R,
    ) -> Result<Option<OwnershipPercentage>, GraphError> {
        let percentage = Self::validate(&parent, &child, percentage)?;
        for endpoint in [&parent, &child] {
            if !known.contains_entity(endpoint) {
                warn!(%parent, %child, %endpoint, "edge rejected: unknown endpoint");
                return Err(GraphError::InvalidEdge {
                    parent: parent.clone(),
                    child: child.clone(),
                    reason: EdgeViolation::UnknownEndpoint(endpoint.clone()),
                });
            }
        }
        Ok(self.insert(parent, child, percentage))
    }

    fn validate(
        parent: &EntityId,
        child: &EntityId,
        percentage: f64,
    ) -> Result<OwnershipPercentage, GraphError> {
        let reject = |reason: EdgeViolation| {
            warn!(%parent, %child, %reason, "edge rejected");
            GraphError::InvalidEdge {
                parent: parent.clone(),
                child: child.clone(),
                reason,
            }
        };
        if parent == child {
            return Err(reject(EdgeViolation::SelfLoop));
        }
        OwnershipPercentage::new(percentage).map_err(reject)
    }

    fn insert(
        &mut self,
        parent: EntityId,
        child: EntityId,
        percentage: OwnershipPercentage,
    ) -> Option<OwnershipPercentage> {
        info!(%parent, %child, %percentage, "ownership edge upserted");
        self.parents
            .entry(child.clone())
            .or_default()
            .insert(parent.clone(), percentage);
        self.children
            .entry(parent)
            .or_default()
            .insert(child, percentage)
    }

    /// Remove the edge `parent → child`. No-op when absent.
    pub fn remove_edge(
        &mut self,
        parent: &EntityId,
        child: &EntityId,
    ) -> Option<OwnershipPercentage> {
        let removed = Self::detach(&mut self.children, parent, child);
        Self::detach(&mut self.parents, child, parent);
        if removed.is_some() {
            info!(%parent, %child, "ownership edge removed");
        }
        removed
    }

    fn detach(
        adjacency: &mut Adjacency,
        from: &EntityId,
        to: &EntityId,
    ) -> Option<OwnershipPercentage> {
        let targets = adjacency.get_mut(from)?;
        let removed = targets.remove(to);
        if targets.is_empty() {
            adjacency.remove(from);
        }
        removed
    }

    /// Remove every edge. Returns how many were removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.edge_count();
        self.children.clear();
        self.parents.clear();
        info!(removed, "ownership graph cleared");
        removed
    }

    // ── Inspection ───────────────────────────────────────────────────

    /// The percentage on `parent → child`, if that edge exists.
    pub fn edge(&self, parent: &EntityId, child: &EntityId) -> Option<OwnershipPercentage> {
        self.children.get(parent)?.get(child).copied()
    }

    /// All edges, ordered by `(parent, child)`.
    pub fn edges(&self) -> Vec<OwnershipEdge> {
        self.children
            .iter()
            .flat_map(|(parent, targets)| {
                targets.iter().map(move |(child, pct)| OwnershipEdge {
                    parent: parent.clone(),
                    child: child.clone(),
                    percentage: *pct,
                })
            })
            .collect()
    }

    /// Every id touched by at least one edge, ordered.
    pub fn nodes(&self) -> BTreeSet<EntityId> {
        self.children
            .keys()
            .chain(self.parents.keys())
            .cloned()
            .collect()
    }

    /// Whether any edge touches `id`.
    pub fn contains_node(&self, id: &EntityId) -> bool {
        self.children.contains_key(id) || self.parents.contains_key(id)
    }

    /// Number of distinct nodes.
    pub fn node_count(&self) -> usize {
        self.nodes().len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.children.values().map(BTreeMap::len).sum()
    }

    /// Whether the graph has no edges.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    // ── Topology queries ─────────────────────────────────────────────

    /// Direct owners of `id` with their shares.
    pub fn direct_parents(&self, id: &EntityId) -> Vec<(EntityId, OwnershipPercentage)> {
        Self::neighbours(&self.parents, id)
    }

    /// Direct holdings of `id` with its shares.
    pub fn direct_children(&self, id: &EntityId) -> Vec<(EntityId, OwnershipPercentage)> {
        Self::neighbours(&self.children, id)
    }

    fn neighbours(adjacency: &Adjacency, id: &EntityId) -> Vec<(EntityId, OwnershipPercentage)> {
        adjacency
            .get(id)
            .map(|targets| targets.iter().map(|(k, v)| (k.clone(), *v)).collect())
            .unwrap_or_default()
    }

    /// Every node with a directed path to `id`. Never contains `id`.
    pub fn ancestors(&self, id: &EntityId) -> BTreeSet<EntityId> {
        Self::reachable(&self.parents, id)
    }

    /// Every node reachable from `id`. Never contains `id`.
    pub fn descendants(&self, id: &EntityId) -> BTreeSet<EntityId> {
        Self::reachable(&self.children, id)
    }

    fn reachable(adjacency: &Adjacency, start: &EntityId) -> BTreeSet<EntityId> {
        let mut seen: BTreeSet<EntityId> = BTreeSet::new();
        let mut queue: VecDeque<&EntityId> = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            if let Some(targets) = adjacency.get(current) {
                for next in targets.keys() {
                    if next != start && seen.insert(next.clone()) {
                        queue.push_back(next);
                    }
                }
            }
        }
        seen
    }

    /// Length of the single-child ownership chain ending at `id`.
    ///
    /// Walks upward while the current node has exactly one parent and that
    /// parent has exactly one child, counting edges. Stops on revisiting a
    /// node, so a pure ownership loop yields its own length.
    pub fn chain_length(&self, id: &EntityId) -> usize {
        let mut length = 0;
        let mut current = id;
        let mut seen: BTreeSet<&EntityId> = BTreeSet::from([id]);
        loop {
            let parent = match self.parents.get(current) {
                Some(owners) if owners.len() == 1 => owners.keys().next(),
                _ => None,
            };
            let Some(parent) = parent else { break };
            if self.children.get(parent).map_or(0, BTreeMap::len) != 1 {
                break;
            }
            length += 1;
            if !seen.insert(parent) {
                break;
            }
            current = parent;
        }
        length
    }

    /// Nodes lying on at least one ownership cycle.
    pub fn cyclic_nodes(&self) -> BTreeSet<EntityId> {
        let (ids, adj) = self.indexed();
        cycles::cyclic_mask(&adj)
            .into_iter()
            .zip(ids)
            .filter_map(|(cyclic, id)| cyclic.then_some(id))
            .collect()
    }

    /// Every simple ownership cycle as `[a, b, ..., a]`.
    ///
    /// Each cycle starts at its smallest id; the list is sorted. Empty for
    /// an acyclic graph.
    pub fn detect_cycles(&self) -> Vec<Vec<EntityId>> {
        let (ids, adj) = self.indexed();
        let mut found: Vec<Vec<EntityId>> = cycles::simple_cycles(&adj)
            .into_iter()
            .map(|cycle| cycle.into_iter().map(|i| ids[i].clone()).collect())
            .collect();
        found.sort();
        debug!(cycles = found.len(), "cycle detection complete");
        found
    }

    /// Dense index view: ids in sorted order and forward adjacency lists.
    fn indexed(&self) -> (Vec<EntityId>, Vec<Vec<usize>>) {
        let ids: Vec<EntityId> = self.nodes().into_iter().collect();
        let position: HashMap<&EntityId, usize> =
            ids.iter().enumerate().map(|(i, id)| (id, i)).collect();
        let adj = ids
            .iter()
            .map(|id| {
                self.children
                    .get(id)
                    .map(|targets| {
                        targets
                            .keys()
                            .filter_map(|c| position.get(c).copied())
                            .collect::<Vec<usize>>()
                    })
                    .unwrap_or_default()
            })
            .collect();
        (ids, adj)
    }
}
