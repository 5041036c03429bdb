pub mod engine;
pub mod outcome;

pub use engine::grade;
pub use outcome::{Grade, GradeResult, NutrientLevel, NutrientReading};
