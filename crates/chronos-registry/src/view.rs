//! Snapshot of the ownership network for rendering.
//!
//! The graph does not require endpoints to be registered, so a node may
//! lack entity details. Such nodes are marked [`NodeDetails::Unknown`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use chronos_core::{EntityId, JurisdictionCode};
use chronos_graph::{OwnershipEdge, OwnershipGraph};
use chronos_state::{EntityStatus, EntityStore, LegalForm};

/// What the store knows about a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeDetails {
    /// The id names a registered entity.
    Entity {
        /// Display name.
        name: String,
        /// Lifecycle status.
        status: EntityStatus,
        /// Jurisdiction, when recorded.
        jurisdiction: Option<JurisdictionCode>,
        /// Legal form.
        legal_form: LegalForm,
    },
    /// The id appears only as an edge endpoint.
    Unknown,
}

/// One node of the view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Node id.
    pub id: EntityId,
    /// Entity details, if any.
    pub details: NodeDetails,
    /// Whether the node lies on an ownership cycle.
    pub cyclic: bool,
}

/// Nodes, weighted edges, and cycles, taken from one consistent snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphView {
    /// Every registered entity plus every edge endpoint, ordered by id.
    pub nodes: Vec<GraphNode>,
    /// Every edge, ordered by parent then child.
    pub edges: Vec<OwnershipEdge>,
    /// Every simple cycle.
    pub cycles: Vec<Vec<EntityId>>,
}

impl GraphView {
    pub(crate) fn build(store: &EntityStore, graph: &OwnershipGraph) -> Self {
        let mut ids: BTreeSet<EntityId> = graph.nodes();
        ids.extend(store.iter().map(|e| e.id.clone()));
        let cyclic = graph.cyclic_nodes();

        let nodes = ids
            .into_iter()
            .map(|id| {
                let details = match store.get(&id) {
                    Ok(entity) => NodeDetails::Entity {
                        name: entity.name.clone(),
                        status: entity.status,
                        jurisdiction: entity.jurisdiction.clone(),
                        legal_form: entity.legal_form,
                    },
                    Err(_) => NodeDetails::Unknown,
                };
                let on_cycle = cyclic.contains(&id);
                GraphNode {
                    id,
                    details,
                    cyclic: on_cycle,
                }
            })
            .collect();

        Self {
            nodes,
            edges: graph.edges(),
            cycles: graph.detect_cycles(),
        }
    }

    /// Node for `id`, if present.
    pub fn node(&self, id: &EntityId) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| &n.id == id)
    }
}
