pub mod engine;
pub mod outcome;
pub mod summary;

pub use engine::{classify_ingredients, classify_ingredients_text};
pub use outcome::{ClassificationSummary, IngredientEntry, IngredientTag, SummaryGroup};
pub use summary::summarize;
