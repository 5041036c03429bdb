use crate::classify::outcome::{ClassificationSummary, IngredientEntry, IngredientTag, SummaryGroup};

/// Examples kept per reason.
pub const MAX_EXAMPLES: usize = 3;

/// Group concerning and beneficial entries by reason.
///
/// Groups keep the order in which their reason first appears; each group
/// keeps up to [`MAX_EXAMPLES`] distinct labels in first-seen order. Neutral
/// entries are not summarized.
pub fn summarize(entries: &[IngredientEntry]) -> ClassificationSummary {
    let mut summary = ClassificationSummary::default();

    for e in entries {
        let groups = match e.tag {
            IngredientTag::Concerning => &mut summary.concerning,
            IngredientTag::Beneficial => &mut summary.beneficial,
            IngredientTag::Neutral => continue,
        };

        let idx = match groups.iter().position(|g| g.reason == e.reason) {
            Some(idx) => idx,
            None => {
                groups.push(SummaryGroup {
                    reason: e.reason.clone(),
                    examples: Vec::new(),
                });
                groups.len() - 1
            }
        };

        let group = &mut groups[idx];
        if group.examples.len() < MAX_EXAMPLES && !group.examples.contains(&e.text) {
            group.examples.push(e.text.clone());
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::engine::classify_ingredients;
    use crate::rules::builtin::load_keyword_table;

    #[test]
    fn test_groups_by_reason_in_first_seen_order() {
        let table = load_keyword_table().unwrap();
        let entries = classify_ingredients(
            &["Salt", "Sugar", "Oats", "Cane Sugar", "Sea Salt", "Water"],
            &table,
        );
        let summary = summarize(&entries);

        assert_eq!(summary.concerning.len(), 2);
        assert!(summary.concerning[0].reason.contains("sodium"));
        assert_eq!(summary.concerning[0].examples, vec!["Salt", "Sea Salt"]);
        assert_eq!(summary.concerning[1].examples, vec!["Sugar", "Cane Sugar"]);

        assert_eq!(summary.beneficial.len(), 1);
        assert_eq!(summary.beneficial[0].examples, vec!["Oats"]);
    }

    #[test]
    fn test_examples_capped_and_distinct() {
        let table = load_keyword_table().unwrap();
        let entries = classify_ingredients(
            &["Sugar", "Sugar", "Brown Sugar", "Icing Sugar", "Cane Sugar"],
            &table,
        );
        let summary = summarize(&entries);
        assert_eq!(summary.concerning.len(), 1);
        assert_eq!(
            summary.concerning[0].examples,
            vec!["Sugar", "Brown Sugar", "Icing Sugar"]
        );
    }

    #[test]
    fn test_neutral_only_is_empty() {
        let table = load_keyword_table().unwrap();
        let entries = classify_ingredients(&["Water", "Milk Solids"], &table);
        assert!(summarize(&entries).is_empty());
    }
}
