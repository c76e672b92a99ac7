//! # End-to-End Scenarios
//!
//! Drives a `Registry` the way a host would: register entities, wire
//! ownership, walk the lifecycle, and read the risk report.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;
use chronos_core::FixedClock;
use chronos_registry::{
    EdgeViolation, EntityAttributes, EntityFilter, EntityId, EntityStatus, JurisdictionCode,
    LegalForm, NodeDetails, Registry, RegistryConfig, RegistryError, RiskFactor, RiskLevel,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

fn registry() -> Registry {
    init_tracing();
    let clock = FixedClock::on(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
    Registry::with_clock(RegistryConfig::default(), Arc::new(clock)).unwrap()
}

fn code(c: &str) -> JurisdictionCode {
    JurisdictionCode::new(c).unwrap()
}

fn established() -> NaiveDate {
    NaiveDate::from_ymd_opt(2012, 5, 4).unwrap()
}

fn has(entry: &chronos_registry::RiskReportEntry, factor: &RiskFactor) -> bool {
    entry.factors.iter().any(|h| &h.factor == factor)
}

// ---------------------------------------------------------------------------
// 1. Central Holdings owns TechStart LLC
// ---------------------------------------------------------------------------

#[test]
fn scenario_techstart_shell_pattern() {
    let r = registry();
    let central = r
        .create_or_update(
            EntityAttributes::new("Central Holdings")
                .jurisdiction(code("WY"))
                .legal_form(LegalForm::Corporation)
                .formed_on(established()),
        )
        .unwrap();
    let techstart = r
        .create_or_update(
            EntityAttributes::new("TechStart LLC")
                .jurisdiction(code("DE"))
                .legal_form(LegalForm::Llc)
                .formed_on(established()),
        )
        .unwrap();
    assert_eq!(techstart.as_str(), "techstart-llc");
    r.upsert_edge(central.clone(), techstart.clone(), 100.0)
        .unwrap();

    let entry = r.score(&techstart).unwrap();
    assert_eq!(entry.risk_score, 1.0);
    assert_eq!(entry.level, RiskLevel::High);
    assert!(has(&entry, &RiskFactor::LlcStructure));
    assert!(has(
        &entry,
        &RiskFactor::ShellFriendlyJurisdiction {
            jurisdiction: code("DE")
        }
    ));
    assert!(has(
        &entry,
        &RiskFactor::PremiumJurisdictionLlc {
            jurisdiction: code("DE")
        }
    ));
    assert!(has(&entry, &RiskFactor::OwnedWithoutSubsidiaries { owners: 1 }));
    assert!(entry
        .factor_descriptions()
        .contains(&"Shell pattern: Delaware LLC with limited transparency"));

    let report = r.score_all();
    assert_eq!(report.entries()[0].entity_id, techstart);
    assert_eq!(report.len(), 2);
}

// ---------------------------------------------------------------------------
// 2. Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn scenario_active_to_pending_is_illegal() {
    let r = registry();
    let id = r.create_or_update(EntityAttributes::new("Acme Corp")).unwrap();
    r.transition(&id, EntityStatus::Active, None).unwrap();

    let err = r.transition(&id, EntityStatus::Pending, None).unwrap_err();
    assert_eq!(
        err,
        RegistryError::IllegalTransition {
            entity_id: id.clone(),
            from: EntityStatus::Active,
            to: EntityStatus::Pending,
        }
    );
    assert_eq!(r.get(&id).unwrap().status, EntityStatus::Active);
}

#[test]
fn scenario_dissolved_is_terminal_but_still_scored() {
    let r = registry();
    let id = r
        .create_or_update(EntityAttributes::new("Wind Down LLC").jurisdiction(code("NV")))
        .unwrap();
    r.transition(&id, EntityStatus::Active, None).unwrap();
    r.transition(&id, EntityStatus::Delinquent, Some("missed annual report"))
        .unwrap();
    r.transition(&id, EntityStatus::Dissolved, Some("administrative dissolution"))
        .unwrap();

    for to in EntityStatus::ALL {
        assert!(r.transition(&id, to, None).is_err());
    }

    let entity = r.get(&id).unwrap();
    assert_eq!(entity.transitions.len(), 3);
    assert_eq!(
        entity.transitions[1].reason.as_deref(),
        Some("missed annual report")
    );
    assert!(r.score_all().get(&id).is_some());
}

#[test]
fn scenario_transition_on_unknown_entity() {
    let r = registry();
    let err = r
        .transition(&EntityId::new("nobody"), EntityStatus::Active, None)
        .unwrap_err();
    assert!(matches!(err, RegistryError::NotFound { .. }));
}

// ---------------------------------------------------------------------------
// 3. Edges
// ---------------------------------------------------------------------------

#[test]
fn scenario_out_of_range_percentage_leaves_graph_unchanged() {
    let r = registry();
    let a = EntityId::new("a");
    let b = EntityId::new("b");
    r.upsert_edge(a.clone(), b.clone(), 30.0).unwrap();
    let before = r.edges();

    let err = r.upsert_edge(a.clone(), b.clone(), 150.0).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::InvalidEdge {
            reason: EdgeViolation::PercentageOutOfRange(_),
            ..
        }
    ));
    assert_eq!(r.edges(), before);

    let err = r.upsert_edge(a.clone(), a.clone(), 10.0).unwrap_err();
    assert!(matches!(
        err,
        RegistryError::InvalidEdge {
            reason: EdgeViolation::SelfLoop,
            ..
        }
    ));
    assert_eq!(r.edges(), before);
}

#[test]
fn scenario_edge_upsert_keeps_latest_percentage() {
    let r = registry();
    let a = EntityId::new("a");
    let b = EntityId::new("b");
    assert!(r.upsert_edge(a.clone(), b.clone(), 25.0).unwrap().is_none());
    let previous = r.upsert_edge(a.clone(), b.clone(), 75.0).unwrap();
    assert_eq!(previous.map(|p| p.value()), Some(25.0));
    let edges = r.edges();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].percentage.value(), 75.0);
}

#[test]
fn scenario_clear_resets_graph_only() {
    let r = registry();
    let a = r.create_or_update(EntityAttributes::new("Alpha Corp")).unwrap();
    let b = r.create_or_update(EntityAttributes::new("Beta Corp")).unwrap();
    r.upsert_edge(a.clone(), b.clone(), 100.0).unwrap();
    assert_eq!(r.clear_edges(), 1);
    assert!(r.edges().is_empty());
    assert_eq!(r.entity_count(), 2);
    assert!(r.ancestors(&b).is_empty());
}

// ---------------------------------------------------------------------------
// 4. Cycles
// ---------------------------------------------------------------------------

#[test]
fn scenario_three_entity_cycle() {
    let r = registry();
    let ids: Vec<EntityId> = ["A Corp", "B Corp", "C Corp"]
        .into_iter()
        .map(|n| {
            r.create_or_update(
                EntityAttributes::new(n)
                    .jurisdiction(code("CA"))
                    .formed_on(established()),
            )
            .unwrap()
        })
        .collect();
    r.upsert_edge(ids[0].clone(), ids[1].clone(), 60.0).unwrap();
    r.upsert_edge(ids[1].clone(), ids[2].clone(), 60.0).unwrap();
    r.upsert_edge(ids[2].clone(), ids[0].clone(), 60.0).unwrap();

    let cycles = r.detect_cycles();
    assert_eq!(
        cycles,
        vec![vec![
            ids[0].clone(),
            ids[1].clone(),
            ids[2].clone(),
            ids[0].clone()
        ]]
    );

    let report = r.score_all();
    for id in &ids {
        let entry = report.get(id).unwrap();
        assert!(has(entry, &RiskFactor::CircularOwnership));
        assert!(r.ancestors(id).iter().all(|a| a != id));
        assert!(r.descendants(id).iter().all(|d| d != id));
    }

    let view = r.graph_view();
    assert!(view.nodes.iter().all(|n| n.cyclic));
    assert_eq!(view.cycles.len(), 1);
}

// ---------------------------------------------------------------------------
// 5. Store behavior through the registry
// ---------------------------------------------------------------------------

#[test]
fn scenario_idempotent_upsert_and_filtering() {
    let r = registry();
    let first = r
        .create_or_update(EntityAttributes::new("Pacific Group").jurisdiction(code("CA")))
        .unwrap();
    let second = r
        .create_or_update(EntityAttributes::new("Pacific Group").jurisdiction(code("CA")))
        .unwrap();
    assert_eq!(first, second);
    assert_eq!(r.entity_count(), 1);

    r.create_or_update(EntityAttributes::new("Atlantic Holdings").jurisdiction(code("DE")))
        .unwrap();
    let de = r.list(&EntityFilter::all().jurisdiction(code("DE")));
    assert_eq!(de.len(), 1);
    assert_eq!(de[0].name, "Atlantic Holdings");

    let named = r.list(&EntityFilter::all().name_contains("PACIFIC"));
    assert_eq!(named.len(), 1);

    let counts = r.status_counts();
    assert_eq!(counts[&EntityStatus::Pending], 2);
    assert_eq!(counts[&EntityStatus::Dissolved], 0);
}

#[test]
fn scenario_graph_view_serializes() {
    let r = registry();
    let parent = r
        .create_or_update(EntityAttributes::new("Parent Holdings").jurisdiction(code("WY")))
        .unwrap();
    r.upsert_edge(parent.clone(), EntityId::new("offshore-sub"), 51.0)
        .unwrap();

    let view = r.graph_view();
    let json = serde_json::to_value(&view).unwrap();
    assert_eq!(json["nodes"].as_array().unwrap().len(), 2);
    assert_eq!(json["edges"][0]["percentage"], 51.0);

    let unknown = view.node(&EntityId::new("offshore-sub")).unwrap();
    assert_eq!(unknown.details, NodeDetails::Unknown);
    match &view.node(&parent).unwrap().details {
        NodeDetails::Entity {
            name, jurisdiction, ..
        } => {
            assert_eq!(name, "Parent Holdings");
            assert_eq!(jurisdiction.as_ref().map(JurisdictionCode::as_str), Some("WY"));
        }
        NodeDetails::Unknown => panic!("registered entity rendered as unknown"),
    }

    let report = serde_json::to_value(r.score_all()).unwrap();
    assert!(report.as_array().is_some());
    assert_eq!(
        r.descendants(&parent),
        BTreeSet::from([EntityId::new("offshore-sub")])
    );
}
