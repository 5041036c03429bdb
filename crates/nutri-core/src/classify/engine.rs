use crate::classify::outcome::{IngredientEntry, IngredientTag};
use crate::model::split_ingredients_text;
use crate::rules::schema::{KeywordRuleDef, KeywordTableDef};

/// Classify ingredient labels against a keyword table, preserving order.
pub fn classify_ingredients<S: AsRef<str>>(
    labels: &[S],
    table: &KeywordTableDef,
) -> Vec<IngredientEntry> {
    labels
        .iter()
        .map(|label| classify_one(label.as_ref(), table))
        .collect()
}

/// Split a comma-separated ingredients text and classify each piece.
pub fn classify_ingredients_text(text: &str, table: &KeywordTableDef) -> Vec<IngredientEntry> {
    classify_ingredients(&split_ingredients_text(text), table)
}

/// Classify a single label.
///
/// Concerning rules are evaluated before beneficial rules, and within each
/// table the first matching keyword wins, so an ingredient that matches
/// both tables is always concerning.
pub fn classify_one(label: &str, table: &KeywordTableDef) -> IngredientEntry {
    let lower = label.to_lowercase();

    if let Some(rule) = first_match(&lower, &table.concerning) {
        return entry(label, IngredientTag::Concerning, rule);
    }
    if let Some(rule) = first_match(&lower, &table.beneficial) {
        return entry(label, IngredientTag::Beneficial, rule);
    }

    IngredientEntry {
        text: label.to_string(),
        tag: IngredientTag::Neutral,
        reason: table.neutral_reason.clone(),
        matched_keyword: None,
    }
}

fn first_match<'a>(lower: &str, rules: &'a [KeywordRuleDef]) -> Option<&'a KeywordRuleDef> {
    rules.iter().find(|r| lower.contains(r.keyword.as_str()))
}

fn entry(label: &str, tag: IngredientTag, rule: &KeywordRuleDef) -> IngredientEntry {
    IngredientEntry {
        text: label.to_string(),
        tag,
        reason: rule.reason.clone(),
        matched_keyword: Some(rule.keyword.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::builtin::load_keyword_table;

    fn table() -> KeywordTableDef {
        load_keyword_table().unwrap()
    }

    #[test]
    fn test_chocolate_bar_ingredients() {
        let entries = classify_ingredients(
            &["Sugar", "Wheat Flour", "Cocoa Butter", "Salt"],
            &table(),
        );
        let tags: Vec<IngredientTag> = entries.iter().map(|e| e.tag).collect();
        assert_eq!(
            tags,
            vec![
                IngredientTag::Concerning,
                IngredientTag::Neutral,
                IngredientTag::Neutral,
                IngredientTag::Concerning,
            ]
        );
        assert!(entries[0].reason.contains("Added sugar"));
        assert!(entries[3].reason.contains("sodium"));
        assert_eq!(entries[1].text, "Wheat Flour");
    }

    #[test]
    fn test_concerning_wins_over_beneficial() {
        let entry = classify_one("Sugar-coated fiber flakes", &table());
        assert_eq!(entry.tag, IngredientTag::Concerning);
        assert_eq!(entry.matched_keyword.as_deref(), Some("sugar"));
    }

    #[test]
    fn test_first_rule_in_table_wins() {
        let entry = classify_one("High Fructose Corn Syrup", &table());
        assert_eq!(entry.matched_keyword.as_deref(), Some("high fructose"));

        let entry = classify_one("Partially Hydrogenated Soybean Oil", &table());
        assert_eq!(entry.matched_keyword.as_deref(), Some("partially hydrogenated"));
    }

    #[test]
    fn test_beneficial_match() {
        let entry = classify_one("Rolled Oats", &table());
        assert_eq!(entry.tag, IngredientTag::Beneficial);
        assert_eq!(entry.matched_keyword.as_deref(), Some("oat"));
    }

    #[test]
    fn test_additive_code() {
        let entry = classify_one("Emulsifier (Soy Lecithin)", &table());
        assert_eq!(entry.tag, IngredientTag::Concerning);
        assert_eq!(entry.matched_keyword.as_deref(), Some("emulsifier"));

        let entry = classify_one("E-471", &table());
        assert_eq!(entry.matched_keyword.as_deref(), Some("e-"));
    }

    #[test]
    fn test_neutral_fallback() {
        let entry = classify_one("Milk Solids", &table());
        assert_eq!(entry.tag, IngredientTag::Neutral);
        assert!(entry.matched_keyword.is_none());
        assert_eq!(entry.reason, table().neutral_reason);
    }

    #[test]
    fn test_classify_text_splits_and_trims() {
        let entries = classify_ingredients_text(" Oats ,, Sugar ", &table());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "Oats");
        assert_eq!(entries[1].text, "Sugar");
    }

    #[test]
    fn test_classification_is_repeatable() {
        let labels = ["Glucose Syrup", "Whole Wheat", "Water", "Sodium Benzoate"];
        let t = table();
        assert_eq!(classify_ingredients(&labels, &t), classify_ingredients(&labels, &t));
    }
}
