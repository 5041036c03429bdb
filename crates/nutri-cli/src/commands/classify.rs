use nutri_core::classify::{self, ClassificationSummary, IngredientEntry};
use nutri_core::config::Config;
use nutri_core::error::NutriError;
use serde::Serialize;

use crate::output;

#[derive(Serialize)]
struct ClassifyReport {
    ingredients: Vec<IngredientEntry>,
    summary: ClassificationSummary,
}

pub fn run(config: &Config, text: &str, output_format: &str) -> Result<(), NutriError> {
    let table = config.keyword_table()?;
    let ingredients = classify::classify_ingredients_text(text, &table);
    if ingredients.is_empty() {
        return Err(NutriError::validation("ingredients", "no ingredients given"));
    }
    let summary = classify::summarize(&ingredients);

    match output_format {
        "json" => output::json::print(&ClassifyReport {
            ingredients,
            summary,
        })?,
        _ => {
            output::table::print_ingredients(&ingredients, true);
            output::table::print_summary(&summary);
        }
    }
    Ok(())
}
