use crate::grade::Grade;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A scoring profile: formula weights plus grade bands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringProfileDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    pub weights: ScoringWeights,
    /// Bands from best to worst grade. A score gets the first band whose
    /// `min_score` it reaches.
    pub bands: Vec<GradeBand>,
    /// Grade for scores below every band.
    pub floor_grade: Grade,
}

/// Per-gram weights. Penalties are subtracted, bonuses added.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub sugar: Decimal,
    pub saturated_fat: Decimal,
    pub salt: Decimal,
    pub fat: Decimal,
    pub protein: Decimal,
    #[serde(default)]
    pub fiber: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeBand {
    pub grade: Grade,
    pub min_score: Decimal,
}

/// Ordered keyword tables for ingredient classification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordTableDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// Checked first, in order.
    pub concerning: Vec<KeywordRuleDef>,
    /// Checked only when no concerning rule matched, in order.
    pub beneficial: Vec<KeywordRuleDef>,
    #[serde(default = "default_neutral_reason")]
    pub neutral_reason: String,
}

/// A single lower-case substring rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRuleDef {
    pub keyword: String,
    pub reason: String,
}

fn default_neutral_reason() -> String {
    "No specific concern detected; neutral ingredient.".to_string()
}
