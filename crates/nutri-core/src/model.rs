use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// One of the per-100 g readings tracked for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nutrient {
    Sugar,
    Fat,
    SaturatedFat,
    Salt,
    Protein,
    Fiber,
    Carbohydrates,
    EnergyKcal,
}

impl Nutrient {
    pub const ALL: [Nutrient; 8] = [
        Nutrient::Sugar,
        Nutrient::Fat,
        Nutrient::SaturatedFat,
        Nutrient::Salt,
        Nutrient::Protein,
        Nutrient::Fiber,
        Nutrient::Carbohydrates,
        Nutrient::EnergyKcal,
    ];

    /// Field name in the Open Food Facts `nutriments` object.
    pub fn off_key(self) -> &'static str {
        match self {
            Nutrient::Sugar => "sugars_100g",
            Nutrient::Fat => "fat_100g",
            Nutrient::SaturatedFat => "saturated-fat_100g",
            Nutrient::Salt => "salt_100g",
            Nutrient::Protein => "proteins_100g",
            Nutrient::Fiber => "fiber_100g",
            Nutrient::Carbohydrates => "carbohydrates_100g",
            Nutrient::EnergyKcal => "energy-kcal_100g",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Nutrient::EnergyKcal => "kcal",
            _ => "g",
        }
    }
}

impl fmt::Display for Nutrient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Nutrient::Sugar => "Sugar",
            Nutrient::Fat => "Fat",
            Nutrient::SaturatedFat => "Saturated fat",
            Nutrient::Salt => "Salt",
            Nutrient::Protein => "Protein",
            Nutrient::Fiber => "Fiber",
            Nutrient::Carbohydrates => "Carbohydrates",
            Nutrient::EnergyKcal => "Energy",
        };
        write!(f, "{label}")
    }
}

/// Normalized readings per 100 g of product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutrientProfile {
    #[serde(default)]
    pub sugar: Decimal,
    #[serde(default)]
    pub fat: Decimal,
    #[serde(default)]
    pub saturated_fat: Decimal,
    #[serde(default)]
    pub salt: Decimal,
    #[serde(default)]
    pub protein: Decimal,
    #[serde(default)]
    pub fiber: Decimal,
    #[serde(default)]
    pub carbohydrates: Decimal,
    #[serde(default)]
    pub energy_kcal: Decimal,
}

impl NutrientProfile {
    pub fn get(&self, nutrient: Nutrient) -> Decimal {
        match nutrient {
            Nutrient::Sugar => self.sugar,
            Nutrient::Fat => self.fat,
            Nutrient::SaturatedFat => self.saturated_fat,
            Nutrient::Salt => self.salt,
            Nutrient::Protein => self.protein,
            Nutrient::Fiber => self.fiber,
            Nutrient::Carbohydrates => self.carbohydrates,
            Nutrient::EnergyKcal => self.energy_kcal,
        }
    }

    /// Build a profile from an Open Food Facts `nutriments` object.
    ///
    /// Absent, null, boolean or otherwise non-numeric fields become 0.
    pub fn from_nutriments(nutriments: &serde_json::Map<String, Value>) -> Self {
        let read = |n: Nutrient| nutriments.get(n.off_key()).map(coerce_number).unwrap_or_default();
        NutrientProfile {
            sugar: read(Nutrient::Sugar),
            fat: read(Nutrient::Fat),
            saturated_fat: read(Nutrient::SaturatedFat),
            salt: read(Nutrient::Salt),
            protein: read(Nutrient::Protein),
            fiber: read(Nutrient::Fiber),
            carbohydrates: read(Nutrient::Carbohydrates),
            energy_kcal: read(Nutrient::EnergyKcal),
        }
    }
}

/// Coerce a JSON value into a decimal, falling back to 0.
///
/// Accepts numbers, numeric strings and scientific notation ("1e-3").
pub fn coerce_number(value: &Value) -> Decimal {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return Decimal::ZERO,
    };
    if text.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .unwrap_or(Decimal::ZERO)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<Decimal>,
}

impl Ingredient {
    pub fn new(text: impl Into<String>) -> Self {
        Ingredient {
            text: text.into(),
            percent: None,
        }
    }
}

/// Split a comma-separated ingredients text into trimmed, non-empty labels.
pub fn split_ingredients_text(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// A product as returned by a lookup source, already normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub barcode: String,
    pub name: Option<String>,
    pub brands: Option<String>,
    pub quantity: Option<String>,
    pub image_url: Option<String>,
    pub nutrients: NutrientProfile,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub ingredients_text: Option<String>,
}

impl ProductRecord {
    /// Ingredient labels in declared order, preferring the structured list.
    pub fn ingredient_labels(&self) -> Vec<String> {
        if !self.ingredients.is_empty() {
            return self
                .ingredients
                .iter()
                .map(|i| i.text.trim())
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect();
        }
        self.ingredients_text
            .as_deref()
            .map(split_ingredients_text)
            .unwrap_or_default()
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Unnamed product")
    }
}
