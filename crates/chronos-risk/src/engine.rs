//! # Risk Engine
//!
//! Scores entities against a [`RiskConfig`]. Each call builds its own
//! evaluation context (officer index, cycle membership) from the store and
//! graph it is handed, so results always reflect their current state.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use chronos_core::{Clock, EntityId, SystemClock};
use chronos_graph::OwnershipGraph;
use chronos_state::entity::officer_key;
use chronos_state::{Entity, EntityStatus, EntityStore, LegalForm};

use crate::config::RiskConfig;
use crate::error::RiskError;
use crate::factor::{FactorHit, RiskFactor};
use crate::report::{DataGap, RiskLevel, RiskReport, RiskReportEntry};

/// Shell-company risk scorer.
#[derive(Clone)]
pub struct RiskEngine {
    config: RiskConfig,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for RiskEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self {
            config: RiskConfig::default(),
            clock: Arc::new(SystemClock),
        }
    }
}

/// Per-pass facts shared by every entity scored in that pass.
struct Context {
    today: NaiveDate,
    /// Officer key → entities listing that officer.
    officers: HashMap<String, BTreeSet<EntityId>>,
    cyclic: BTreeSet<EntityId>,
}

impl Context {
    fn build(store: &EntityStore, graph: &OwnershipGraph, today: NaiveDate) -> Self {
        let mut officers: HashMap<String, BTreeSet<EntityId>> = HashMap::new();
        for entity in store.iter() {
            for officer in &entity.officers {
                officers
                    .entry(officer_key(officer))
                    .or_default()
                    .insert(entity.id.clone());
            }
        }
        Self {
            today,
            officers,
            cyclic: graph.cyclic_nodes(),
        }
    }

    fn shared_officers(&self, entity: &Entity) -> Vec<String> {
        entity
            .officers
            .iter()
            .filter(|officer| {
                self.officers
                    .get(&officer_key(officer))
                    .is_some_and(|holders| holders.iter().any(|id| id != &entity.id))
            })
            .cloned()
            .collect()
    }
}

impl RiskEngine {
    /// Engine on the system clock.
    ///
    /// # Errors
    ///
    /// `Config` if `config` fails validation.
    pub fn new(config: RiskConfig) -> Result<Self, RiskError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Engine with an injected clock, used for the recent-formation window.
    ///
    /// # Errors
    ///
    /// `Config` if `config` fails validation.
    pub fn with_clock(config: RiskConfig, clock: Arc<dyn Clock>) -> Result<Self, RiskError> {
        config.validate()?;
        Ok(Self { config, clock })
    }

    /// The active policy.
    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Score one entity.
    ///
    /// # Errors
    ///
    /// `NotFound` if `id` has no entity in `store`.
    pub fn score(
        &self,
        store: &EntityStore,
        graph: &OwnershipGraph,
        id: &EntityId,
    ) -> Result<RiskReportEntry, RiskError> {
        let entity = store.get(id).map_err(|_| RiskError::NotFound {
            entity_id: id.clone(),
        })?;
        let ctx = Context::build(store, graph, self.clock.today());
        Ok(self.evaluate(entity, graph, &ctx))
    }

    /// Score every entity in `store`, ranked by descending score.
    pub fn score_all(&self, store: &EntityStore, graph: &OwnershipGraph) -> RiskReport {
        let ctx = Context::build(store, graph, self.clock.today());
        let entries: Vec<RiskReportEntry> = store
            .iter()
            .map(|entity| self.evaluate(entity, graph, &ctx))
            .collect();
        let report = RiskReport::new(entries);
        info!(
            entities = report.len(),
            candidates = report.shell_candidates(self.config.candidate_threshold).len(),
            "risk scoring pass complete"
        );
        report
    }

    fn evaluate(&self, entity: &Entity, graph: &OwnershipGraph, ctx: &Context) -> RiskReportEntry {
        let w = &self.config.weights;
        let mut hits: Vec<FactorHit> = Vec::new();
        let mut gaps: Vec<DataGap> = Vec::new();

        // ── Entity structure ─────────────────────────────────────────
        let is_llc = entity.legal_form == LegalForm::Llc;
        if is_llc {
            hits.push(FactorHit::new(RiskFactor::LlcStructure, w.llc));
        }
        let lowered = entity.name.to_lowercase();
        if let Some(pattern) = self
            .config
            .holding_name_patterns
            .iter()
            .find(|p| lowered.contains(&p.to_lowercase()))
        {
            hits.push(FactorHit::new(
                RiskFactor::HoldingCompanyName {
                    pattern: pattern.clone(),
                },
                w.holding_name,
            ));
        }
        if entity.status == EntityStatus::Delinquent {
            hits.push(FactorHit::new(RiskFactor::DelinquentStatus, w.delinquent));
        }
        match entity.age_in_days(ctx.today) {
            None => {
                gaps.push(DataGap::FormationDate);
                hits.push(FactorHit::new(RiskFactor::MissingFormationDate, w.formation));
            }
            Some(age_days) if age_days <= self.config.recent_formation_days => {
                hits.push(FactorHit::new(
                    RiskFactor::RecentFormation { age_days },
                    w.formation,
                ));
            }
            Some(_) => {}
        }

        // ── Jurisdiction ─────────────────────────────────────────────
        match &entity.jurisdiction {
            None => gaps.push(DataGap::Jurisdiction),
            Some(code) => {
                if self.config.shell_friendly_jurisdictions.contains(code) {
                    hits.push(FactorHit::new(
                        RiskFactor::ShellFriendlyJurisdiction {
                            jurisdiction: code.clone(),
                        },
                        w.shell_jurisdiction,
                    ));
                }
                if is_llc && self.config.premium_llc_jurisdictions.contains(code) {
                    hits.push(FactorHit::new(
                        RiskFactor::PremiumJurisdictionLlc {
                            jurisdiction: code.clone(),
                        },
                        w.premium_llc,
                    ));
                }
            }
        }

        // ── Ownership pattern ────────────────────────────────────────
        let owners = graph.direct_parents(&entity.id).len();
        if owners > 0 && graph.direct_children(&entity.id).is_empty() {
            hits.push(FactorHit::new(
                RiskFactor::OwnedWithoutSubsidiaries { owners },
                w.owned_without_subsidiaries,
            ));
        }
        let length = graph.chain_length(&entity.id);
        if length >= self.config.min_chain_length {
            hits.push(FactorHit::new(
                RiskFactor::PassThroughChain { length },
                (w.chain_step * length as f64).min(w.chain_cap),
            ));
        }
        let shared = ctx.shared_officers(entity);
        if !shared.is_empty() {
            let bonus = (w.shared_officer * shared.len() as f64).min(w.shared_officer_cap);
            hits.push(FactorHit::new(
                RiskFactor::SharedOfficers { officers: shared },
                bonus,
            ));
        }
        if ctx.cyclic.contains(&entity.id) {
            hits.push(FactorHit::new(
                RiskFactor::CircularOwnership,
                w.circular_ownership,
            ));
        }

        let raw: f64 = hits.iter().map(|h| h.contribution).sum();
        let risk_score = ((raw * 10_000.0).round() / 10_000.0).clamp(0.0, 1.0);
        debug!(
            entity_id = %entity.id,
            raw,
            risk_score,
            factors = hits.len(),
            "entity scored"
        );
        RiskReportEntry {
            entity_id: entity.id.clone(),
            name: entity.name.clone(),
            risk_score,
            level: RiskLevel::from_score(risk_score),
            factors: hits,
            data_gaps: gaps,
        }
    }
}
