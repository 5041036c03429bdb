use crate::grade::outcome::{Grade, GradeResult, NutrientLevel, NutrientReading};
use crate::model::{Nutrient, NutrientProfile};
use crate::rules::schema::{ScoringProfileDef, ScoringWeights};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Traffic-light bounds per nutrient: (low_max, moderate_max), grams per 100 g.
fn level_bounds() -> [(Nutrient, Decimal, Decimal); 4] {
    [
        (Nutrient::Sugar, Decimal::new(5, 0), Decimal::new(225, 1)),
        (Nutrient::Fat, Decimal::new(3, 0), Decimal::new(175, 1)),
        (Nutrient::SaturatedFat, Decimal::new(15, 1), Decimal::new(5, 0)),
        (Nutrient::Salt, Decimal::new(3, 1), Decimal::new(15, 1)),
    ]
}

const HIGH_PROTEIN_MIN: i64 = 8;
const FIBER_SOURCE_MIN: i64 = 3;

/// Grade a nutrient profile against a scoring profile.
pub fn grade(profile: &NutrientProfile, scoring: &ScoringProfileDef) -> GradeResult {
    let score = score(profile, &scoring.weights);
    let grade = grade_for_score(score, scoring);
    let (good_aspects, concerns) = highlights(profile);

    GradeResult {
        scoring_name: scoring.name.clone(),
        score,
        rounded_score: round_score(score),
        grade,
        display_hint: grade.display_hint().to_string(),
        levels: nutrient_levels(profile),
        good_aspects,
        concerns,
    }
}

/// Unclamped weighted score, or `None` when the arithmetic overflows.
pub fn raw_score(profile: &NutrientProfile, weights: &ScoringWeights) -> Option<Decimal> {
    Decimal::ONE_HUNDRED
        .checked_sub(penalty(profile, weights)?)?
        .checked_add(bonus(profile, weights)?)
}

/// Weighted score clamped to 0..=100.
///
/// Readings too large to weigh push the score to the bound they head
/// toward: an overflowing penalty gives 0, an overflowing bonus gives 100.
pub fn score(profile: &NutrientProfile, weights: &ScoringWeights) -> Decimal {
    let raw = match (penalty(profile, weights), bonus(profile, weights)) {
        (None, _) => Decimal::ZERO,
        (Some(_), None) => Decimal::ONE_HUNDRED,
        (Some(p), Some(b)) => match Decimal::ONE_HUNDRED
            .checked_sub(p)
            .and_then(|d| d.checked_add(b))
        {
            Some(raw) => raw,
            None if b > p => Decimal::ONE_HUNDRED,
            None => Decimal::ZERO,
        },
    };
    raw.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
}

fn penalty(profile: &NutrientProfile, weights: &ScoringWeights) -> Option<Decimal> {
    weighted_sum(&[
        (profile.sugar, weights.sugar),
        (profile.saturated_fat, weights.saturated_fat),
        (profile.salt, weights.salt),
        (profile.fat, weights.fat),
    ])
}

fn bonus(profile: &NutrientProfile, weights: &ScoringWeights) -> Option<Decimal> {
    weighted_sum(&[
        (profile.protein, weights.protein),
        (profile.fiber, weights.fiber),
    ])
}

fn weighted_sum(terms: &[(Decimal, Decimal)]) -> Option<Decimal> {
    terms.iter().try_fold(Decimal::ZERO, |acc, &(amount, weight)| {
        acc.checked_add(amount.checked_mul(weight)?)
    })
}

/// First band whose minimum the score reaches, else the floor grade.
pub fn grade_for_score(score: Decimal, scoring: &ScoringProfileDef) -> Grade {
    scoring
        .bands
        .iter()
        .find(|band| score >= band.min_score)
        .map(|band| band.grade)
        .unwrap_or(scoring.floor_grade)
}

fn round_score(score: Decimal) -> u8 {
    score
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u8()
        .unwrap_or(0)
}

/// Classify sugar, fat, saturated fat and salt into low/moderate/high.
pub fn nutrient_levels(profile: &NutrientProfile) -> Vec<NutrientReading> {
    level_bounds()
        .into_iter()
        .map(|(nutrient, low_max, moderate_max)| {
            let amount = profile.get(nutrient);
            let level = if amount <= low_max {
                NutrientLevel::Low
            } else if amount <= moderate_max {
                NutrientLevel::Moderate
            } else {
                NutrientLevel::High
            };
            NutrientReading {
                nutrient,
                amount,
                level,
                low_max,
                moderate_max,
            }
        })
        .collect()
}

/// Short good-aspect and concern bullets from fixed thresholds.
pub fn highlights(profile: &NutrientProfile) -> (Vec<String>, Vec<String>) {
    let [sugar, _, sat_fat, salt] = level_bounds();
    let mut good = Vec::new();
    let mut bad = Vec::new();

    if profile.protein >= Decimal::from(HIGH_PROTEIN_MIN) {
        good.push("High in protein, good for muscle repair".to_string());
    }
    if profile.fiber >= Decimal::from(FIBER_SOURCE_MIN) {
        good.push("Contains dietary fiber, supports digestion".to_string());
    }
    if profile.sugar <= sugar.1 {
        good.push("Low sugar".to_string());
    }

    if profile.sugar > sugar.2 {
        bad.push("High sugar, may raise blood sugar".to_string());
    }
    if profile.saturated_fat > sat_fat.2 {
        bad.push("High saturated fat, unhealthy for the heart".to_string());
    }
    if profile.salt > salt.2 {
        bad.push("High sodium, may raise blood pressure".to_string());
    }

    (good, bad)
}
