//! Scored output: one [`RiskReportEntry`] per entity, ranked in a
//! [`RiskReport`]. Entries are ephemeral and never written back to the
//! store.

use serde::{Deserialize, Serialize};

use chronos_core::EntityId;

use crate::factor::FactorHit;

/// Coarse banding of a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Below 0.4.
    Low,
    /// From 0.4 up to but excluding 0.7.
    Medium,
    /// 0.7 and above.
    High,
}

impl RiskLevel {
    /// Band a score in `[0, 1]`.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.7 {
            Self::High
        } else if score >= 0.4 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        };
        f.write_str(s)
    }
}

/// An attribute the scorer needed but the entity does not carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataGap {
    /// No jurisdiction on record.
    Jurisdiction,
    /// No formation date on record.
    FormationDate,
}

/// Score and evidence for one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReportEntry {
    /// Scored entity.
    pub entity_id: EntityId,
    /// Entity name at scoring time.
    pub name: String,
    /// Clamped score in `[0, 1]`.
    pub risk_score: f64,
    /// Band of `risk_score`.
    pub level: RiskLevel,
    /// Triggered factors, in evaluation order.
    pub factors: Vec<FactorHit>,
    /// Missing attributes that make the score less certain.
    pub data_gaps: Vec<DataGap>,
}

impl RiskReportEntry {
    /// Factor descriptions, in evaluation order.
    pub fn factor_descriptions(&self) -> Vec<&str> {
        self.factors.iter().map(|h| h.description.as_str()).collect()
    }

    /// Whether the score is at or above `threshold`.
    pub fn is_candidate(&self, threshold: f64) -> bool {
        self.risk_score >= threshold
    }
}

/// Entries ordered by descending score, ties by ascending id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskReport {
    entries: Vec<RiskReportEntry>,
}

impl RiskReport {
    /// Rank `entries`.
    pub fn new(mut entries: Vec<RiskReportEntry>) -> Self {
        entries.sort_by(|a, b| {
            b.risk_score
                .total_cmp(&a.risk_score)
                .then_with(|| a.entity_id.cmp(&b.entity_id))
        });
        Self { entries }
    }

    /// Ranked entries.
    pub fn entries(&self) -> &[RiskReportEntry] {
        &self.entries
    }

    /// Entry for `id`, if it was scored.
    pub fn get(&self, id: &EntityId) -> Option<&RiskReportEntry> {
        self.entries.iter().find(|e| &e.entity_id == id)
    }

    /// Entries scoring at or above `threshold`, still ranked.
    pub fn shell_candidates(&self, threshold: f64) -> Vec<&RiskReportEntry> {
        self.entries
            .iter()
            .filter(|e| e.is_candidate(threshold))
            .collect()
    }

    /// Ranked iteration.
    pub fn iter(&self) -> std::slice::Iter<'_, RiskReportEntry> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was scored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for RiskReport {
    type Item = RiskReportEntry;
    type IntoIter = std::vec::IntoIter<RiskReportEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a RiskReport {
    type Item = &'a RiskReportEntry;
    type IntoIter = std::slice::Iter<'a, RiskReportEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
