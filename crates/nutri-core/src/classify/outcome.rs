use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngredientTag {
    Beneficial,
    Concerning,
    Neutral,
}

impl fmt::Display for IngredientTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngredientTag::Beneficial => write!(f, "beneficial"),
            IngredientTag::Concerning => write!(f, "concerning"),
            IngredientTag::Neutral => write!(f, "neutral"),
        }
    }
}

/// Classification of a single ingredient label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientEntry {
    /// Label as it appeared on the product.
    pub text: String,
    pub tag: IngredientTag,
    /// Human-readable explanation of the tag.
    pub reason: String,
    /// Keyword that matched, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_keyword: Option<String>,
}

/// One summary line: a reason and a few ingredients that share it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryGroup {
    pub reason: String,
    /// Up to three distinct example labels, in first-seen order.
    pub examples: Vec<String>,
}

/// Concerning and beneficial ingredients grouped by reason.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationSummary {
    pub concerning: Vec<SummaryGroup>,
    pub beneficial: Vec<SummaryGroup>,
}

impl ClassificationSummary {
    pub fn is_empty(&self) -> bool {
        self.concerning.is_empty() && self.beneficial.is_empty()
    }
}
