pub mod builtin;
pub mod schema;

use crate::error::NutriError;
use rust_decimal::Decimal;
use schema::{KeywordTableDef, ScoringProfileDef};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Load a scoring profile from a JSON file.
pub fn load_scoring(path: &Path) -> Result<ScoringProfileDef, NutriError> {
    let profile: ScoringProfileDef = read_json(path)?;
    validate_scoring(&profile)?;
    Ok(profile)
}

/// Load a keyword table from a JSON file.
pub fn load_keywords(path: &Path) -> Result<KeywordTableDef, NutriError> {
    let table: KeywordTableDef = read_json(path)?;
    validate_keywords(&table)?;
    Ok(table)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, NutriError> {
    let content = std::fs::read_to_string(path).map_err(|e| NutriError::RulesetLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| NutriError::RulesetLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Parse a scoring profile from a JSON string (no file path context).
pub fn parse_scoring_str(json: &str) -> Result<ScoringProfileDef, NutriError> {
    let profile: ScoringProfileDef = serde_json::from_str(json)?;
    validate_scoring(&profile)?;
    Ok(profile)
}

/// Parse a keyword table from a JSON string (no file path context).
pub fn parse_keywords_str(json: &str) -> Result<KeywordTableDef, NutriError> {
    let table: KeywordTableDef = serde_json::from_str(json)?;
    validate_keywords(&table)?;
    Ok(table)
}

/// Validate that a scoring profile is well-formed.
///
/// Weights must be non-negative so the score stays monotone in each
/// nutrient. Bands must run from best to worst grade with strictly
/// decreasing minimum scores, all within 0..=100, and the floor grade must
/// be worse than every band.
pub fn validate_scoring(profile: &ScoringProfileDef) -> Result<(), NutriError> {
    let w = &profile.weights;
    for (label, weight) in [
        ("sugar", w.sugar),
        ("saturated_fat", w.saturated_fat),
        ("salt", w.salt),
        ("fat", w.fat),
        ("protein", w.protein),
        ("fiber", w.fiber),
    ] {
        if weight < Decimal::ZERO {
            return Err(NutriError::RulesetInvalid(format!(
                "weight '{}' must not be negative (got {})",
                label, weight
            )));
        }
    }

    if profile.bands.is_empty() {
        return Err(NutriError::RulesetInvalid("bands must not be empty".into()));
    }

    for pair in profile.bands.windows(2) {
        if pair[1].grade <= pair[0].grade {
            return Err(NutriError::RulesetInvalid(format!(
                "band {} must come after band {}",
                pair[0].grade, pair[1].grade
            )));
        }
        if pair[1].min_score >= pair[0].min_score {
            return Err(NutriError::RulesetInvalid(format!(
                "band {} min_score {} must be below band {} min_score {}",
                pair[1].grade, pair[1].min_score, pair[0].grade, pair[0].min_score
            )));
        }
    }

    for band in &profile.bands {
        if band.min_score < Decimal::ZERO || band.min_score > Decimal::ONE_HUNDRED {
            return Err(NutriError::RulesetInvalid(format!(
                "band {} min_score {} is outside 0..=100",
                band.grade, band.min_score
            )));
        }
    }

    if let Some(last) = profile.bands.last() {
        if profile.floor_grade <= last.grade {
            return Err(NutriError::RulesetInvalid(format!(
                "floor grade {} must be worse than the last band {}",
                profile.floor_grade, last.grade
            )));
        }
    }

    Ok(())
}

/// Validate that a keyword table is well-formed.
pub fn validate_keywords(table: &KeywordTableDef) -> Result<(), NutriError> {
    if table.concerning.is_empty() && table.beneficial.is_empty() {
        return Err(NutriError::RulesetInvalid(
            "keyword table has no rules".into(),
        ));
    }

    for rule in table.concerning.iter().chain(&table.beneficial) {
        if rule.keyword.trim().is_empty() {
            return Err(NutriError::RulesetInvalid(
                "keyword must not be empty".into(),
            ));
        }
        if rule.keyword != rule.keyword.to_lowercase() {
            return Err(NutriError::RulesetInvalid(format!(
                "keyword '{}' must be lower-case",
                rule.keyword
            )));
        }
        if rule.reason.trim().is_empty() {
            return Err(NutriError::RulesetInvalid(format!(
                "keyword '{}' has no reason",
                rule.keyword
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID_SCORING: &str = r#"{
        "name": "Test",
        "version": "1.0",
        "weights": { "sugar": "1", "saturated_fat": "1", "salt": "1", "fat": "1", "protein": "1" },
        "bands": [
            { "grade": "A", "min_score": "80" },
            { "grade": "B", "min_score": "50" }
        ],
        "floor_grade": "C"
    }"#;

    #[test]
    fn test_parse_valid_scoring() {
        let profile = parse_scoring_str(VALID_SCORING).unwrap();
        assert_eq!(profile.name, "Test");
        assert_eq!(profile.bands.len(), 2);
        assert!(profile.weights.fiber.is_zero());
    }

    #[test]
    fn test_negative_weight_rejected() {
        let json = VALID_SCORING.replace(r#""salt": "1""#, r#""salt": "-2""#);
        assert!(parse_scoring_str(&json).is_err());
    }

    #[test]
    fn test_unordered_bands_rejected() {
        let json = VALID_SCORING.replace(r#""min_score": "50""#, r#""min_score": "90""#);
        assert!(parse_scoring_str(&json).is_err());
    }

    #[test]
    fn test_floor_grade_must_be_worst() {
        let json = VALID_SCORING.replace(r#""floor_grade": "C""#, r#""floor_grade": "A""#);
        assert!(parse_scoring_str(&json).is_err());
    }

    #[test]
    fn test_parse_valid_keywords() {
        let json = r#"{
            "name": "Kw",
            "version": "1.0",
            "concerning": [ { "keyword": "sugar", "reason": "Added sugar." } ],
            "beneficial": []
        }"#;
        let table = parse_keywords_str(json).unwrap();
        assert_eq!(table.concerning.len(), 1);
        assert!(table.neutral_reason.contains("neutral"));
    }

    #[test]
    fn test_uppercase_keyword_rejected() {
        let json = r#"{
            "name": "Kw",
            "version": "1.0",
            "concerning": [ { "keyword": "Sugar", "reason": "Added sugar." } ],
            "beneficial": []
        }"#;
        assert!(parse_keywords_str(json).is_err());
    }

    #[test]
    fn test_empty_keyword_table_rejected() {
        let json = r#"{ "name": "Kw", "version": "1.0", "concerning": [], "beneficial": [] }"#;
        assert!(parse_keywords_str(json).is_err());
    }
}
