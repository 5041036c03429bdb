use crate::model::Nutrient;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Letter grade, best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Grade {
    /// Colour name a front end can use for the grade badge.
    pub fn display_hint(self) -> &'static str {
        match self {
            Grade::A => "green",
            Grade::B => "lime",
            Grade::C => "yellow",
            Grade::D => "orange",
            Grade::E => "red",
            Grade::F => "dark-red",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
            Grade::F => "F",
        };
        write!(f, "{letter}")
    }
}

/// Traffic-light level for a nutrient reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NutrientLevel {
    Low,
    Moderate,
    High,
}

impl fmt::Display for NutrientLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NutrientLevel::Low => write!(f, "low"),
            NutrientLevel::Moderate => write!(f, "moderate"),
            NutrientLevel::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutrientReading {
    pub nutrient: Nutrient,
    pub amount: Decimal,
    pub level: NutrientLevel,
    /// Upper bound (inclusive) of the low band.
    pub low_max: Decimal,
    /// Upper bound (inclusive) of the moderate band.
    pub moderate_max: Decimal,
}

/// Health score and grade for one nutrient profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeResult {
    /// Name of the scoring profile that produced this result.
    pub scoring_name: String,
    /// Exact score, clamped to 0..=100. Grades are decided on this value.
    pub score: Decimal,
    /// Score rounded half-up for display.
    pub rounded_score: u8,
    pub grade: Grade,
    pub display_hint: String,
    pub levels: Vec<NutrientReading>,
    pub good_aspects: Vec<String>,
    pub concerns: Vec<String>,
}
