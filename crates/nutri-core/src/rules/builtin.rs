use crate::error::NutriError;
use crate::rules::schema::{KeywordTableDef, ScoringProfileDef};

const SCORING_STANDARD_JSON: &str = include_str!("../../../../rules/scoring-standard.json");
const SCORING_LEGACY_JSON: &str = include_str!("../../../../rules/scoring-legacy.json");
const INGREDIENT_KEYWORDS_JSON: &str = include_str!("../../../../rules/ingredient-keywords.json");

/// Available predefined scoring profiles. The first one is the default.
pub const SCORING_PRESETS: &[&str] = &["standard", "legacy"];

pub const DEFAULT_SCORING: &str = "standard";

/// Load a predefined scoring profile by name.
pub fn load_scoring_preset(name: &str) -> Result<ScoringProfileDef, NutriError> {
    match name {
        "standard" => Ok(serde_json::from_str(SCORING_STANDARD_JSON)?),
        "legacy" => Ok(serde_json::from_str(SCORING_LEGACY_JSON)?),
        _ => Err(NutriError::RulesetInvalid(format!(
            "unknown scoring preset '{}'. Available: {}",
            name,
            SCORING_PRESETS.join(", ")
        ))),
    }
}

/// Load the builtin ingredient keyword table.
pub fn load_keyword_table() -> Result<KeywordTableDef, NutriError> {
    Ok(serde_json::from_str(INGREDIENT_KEYWORDS_JSON)?)
}
