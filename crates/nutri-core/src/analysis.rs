use crate::classify::{self, ClassificationSummary, IngredientEntry};
use crate::grade::{self, GradeResult};
use crate::model::{Nutrient, NutrientProfile, ProductRecord};
use crate::rules::schema::{KeywordTableDef, ScoringProfileDef};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Everything computed for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAnalysis {
    pub barcode: String,
    pub name: String,
    pub brands: Option<String>,
    pub quantity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub nutrients: NutrientProfile,
    pub grade: GradeResult,
    pub ingredients: Vec<IngredientEntry>,
    pub summary: ClassificationSummary,
}

/// Grade a product and classify its ingredients.
pub fn analyze(
    product: &ProductRecord,
    scoring: &ScoringProfileDef,
    keywords: &KeywordTableDef,
) -> ProductAnalysis {
    let ingredients = classify::classify_ingredients(&product.ingredient_labels(), keywords);
    let summary = classify::summarize(&ingredients);

    ProductAnalysis {
        barcode: product.barcode.clone(),
        name: product.display_name().to_string(),
        brands: product.brands.clone(),
        quantity: product.quantity.clone(),
        image_url: product.image_url.clone(),
        nutrients: product.nutrients.clone(),
        grade: grade::grade(&product.nutrients, scoring),
        ingredients,
        summary,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NutrientDelta {
    pub nutrient: Nutrient,
    pub left: Decimal,
    pub right: Decimal,
    /// `right - left`.
    pub difference: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductComparison {
    pub left: ProductAnalysis,
    pub right: ProductAnalysis,
    /// Side with the higher exact score; `None` on a tie.
    pub better: Option<Side>,
    pub deltas: Vec<NutrientDelta>,
}

/// Analyse two products side by side.
pub fn compare(
    left: &ProductRecord,
    right: &ProductRecord,
    scoring: &ScoringProfileDef,
    keywords: &KeywordTableDef,
) -> ProductComparison {
    let left = analyze(left, scoring, keywords);
    let right = analyze(right, scoring, keywords);

    let better = match left.grade.score.cmp(&right.grade.score) {
        std::cmp::Ordering::Greater => Some(Side::Left),
        std::cmp::Ordering::Less => Some(Side::Right),
        std::cmp::Ordering::Equal => None,
    };

    let deltas = Nutrient::ALL
        .iter()
        .map(|&nutrient| {
            let l = left.nutrients.get(nutrient);
            let r = right.nutrients.get(nutrient);
            NutrientDelta {
                nutrient,
                left: l,
                right: r,
                difference: saturating_difference(r, l),
            }
        })
        .collect();

    ProductComparison {
        left,
        right,
        better,
        deltas,
    }
}

/// `right - left`, pinned to the Decimal range instead of overflowing.
fn saturating_difference(right: Decimal, left: Decimal) -> Decimal {
    right.checked_sub(left).unwrap_or(if right > left {
        Decimal::MAX
    } else {
        Decimal::MIN
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::IngredientTag;
    use crate::grade::Grade;
    use crate::lookup::demo::demo_product;
    use crate::lookup::openfoodfacts::parse_envelope;
    use crate::rules::builtin::{load_keyword_table, load_scoring_preset};
    use rust_decimal_macros::dec;

    #[test]
    fn test_analyze_demo_product() {
        let analysis = analyze(
            &demo_product(),
            &load_scoring_preset("standard").unwrap(),
            &load_keyword_table().unwrap(),
        );
        assert_eq!(analysis.name, "Demo Chocolate Bar");
        assert_eq!(analysis.grade.grade, Grade::E);
        assert_eq!(analysis.ingredients.len(), 8);

        let concerning: Vec<&str> = analysis
            .ingredients
            .iter()
            .filter(|e| e.tag == IngredientTag::Concerning)
            .map(|e| e.text.as_str())
            .collect();
        assert_eq!(concerning, vec!["Sugar", "Emulsifier (Soy Lecithin)", "Salt"]);
        assert_eq!(analysis.summary.concerning.len(), 3);
        assert!(analysis.summary.beneficial.is_empty());
    }

    #[test]
    fn test_analyze_survives_oversized_readings() {
        let body = serde_json::json!({
            "status": 1,
            "product": {
                "product_name": "Broken Record",
                "image_url": "https://example.org/broken.jpg",
                "nutriments": { "salt_100g": "10000000000000000000000000000" }
            }
        });
        let product = parse_envelope("5000000000010", &body).unwrap().unwrap();
        let scoring = load_scoring_preset("standard").unwrap();
        let keywords = load_keyword_table().unwrap();

        let analysis = analyze(&product, &scoring, &keywords);
        assert_eq!(analysis.grade.score, Decimal::ZERO);
        assert_eq!(analysis.grade.grade, Grade::E);
        assert_eq!(analysis.image_url.as_deref(), Some("https://example.org/broken.jpg"));

        let negative = ProductRecord {
            nutrients: NutrientProfile {
                salt: Decimal::MIN,
                ..Default::default()
            },
            ..Default::default()
        };
        let cmp = compare(&negative, &product, &scoring, &keywords);
        let salt = cmp.deltas.iter().find(|d| d.nutrient == Nutrient::Salt).unwrap();
        assert_eq!(salt.difference, Decimal::MAX);
    }

    #[test]
    fn test_compare_picks_higher_score() {
        let oats = ProductRecord {
            barcode: "1111111".into(),
            name: Some("Oats".into()),
            nutrients: NutrientProfile {
                sugar: dec!(1),
                fat: dec!(7),
                protein: dec!(13),
                fiber: dec!(10),
                ..Default::default()
            },
            ingredients_text: Some("Wholegrain Oats".into()),
            ..Default::default()
        };
        let scoring = load_scoring_preset("standard").unwrap();
        let keywords = load_keyword_table().unwrap();

        let cmp = compare(&demo_product(), &oats, &scoring, &keywords);
        assert_eq!(cmp.better, Some(Side::Right));
        assert_eq!(cmp.deltas.len(), 8);
        let sugar = cmp.deltas.iter().find(|d| d.nutrient == Nutrient::Sugar).unwrap();
        assert_eq!(sugar.difference, dec!(-50));

        let same = compare(&oats, &oats, &scoring, &keywords);
        assert_eq!(same.better, None);
    }
}
