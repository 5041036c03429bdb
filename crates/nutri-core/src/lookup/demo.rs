use crate::error::NutriError;
use crate::lookup::{Barcode, ProductSource};
use crate::model::{NutrientProfile, ProductRecord};
use rust_decimal::Decimal;

/// Barcode the demonstration record answers to.
pub const DEMO_BARCODE: &str = "8901058816338";

/// Offline source that only knows the demonstration chocolate bar.
pub struct DemoSource;

impl ProductSource for DemoSource {
    fn fetch(&self, barcode: &Barcode) -> Result<Option<ProductRecord>, NutriError> {
        if barcode.as_str() == DEMO_BARCODE {
            Ok(Some(demo_product()))
        } else {
            Ok(None)
        }
    }

    fn name(&self) -> &str {
        "demo"
    }
}

/// The fixed demonstration record.
pub fn demo_product() -> ProductRecord {
    ProductRecord {
        barcode: DEMO_BARCODE.to_string(),
        name: Some("Demo Chocolate Bar".into()),
        brands: Some("DemoBrand".into()),
        quantity: Some("37 g".into()),
        image_url: None,
        nutrients: NutrientProfile {
            sugar: Decimal::from(51),
            fat: Decimal::from(26),
            saturated_fat: Decimal::from(14),
            salt: Decimal::new(2, 1),
            protein: Decimal::from(7),
            fiber: Decimal::from(1),
            carbohydrates: Decimal::from(64),
            energy_kcal: Decimal::from(518),
        },
        ingredients: Vec::new(),
        ingredients_text: Some(
            "Sugar, Wheat Flour, Cocoa Butter, Milk Solids, Cocoa Mass, Vegetable Fat, \
             Emulsifier (Soy Lecithin), Salt"
                .into(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_answers_its_barcode_only() {
        let demo = DemoSource;
        let hit = demo.fetch(&Barcode::parse(DEMO_BARCODE).unwrap()).unwrap();
        assert_eq!(hit.unwrap().display_name(), "Demo Chocolate Bar");

        let miss = demo.fetch(&Barcode::parse("6001068586806").unwrap()).unwrap();
        assert!(miss.is_none());
    }

    #[test]
    fn test_demo_ingredients() {
        let labels = demo_product().ingredient_labels();
        assert_eq!(labels.len(), 8);
        assert_eq!(labels[0], "Sugar");
        assert_eq!(labels[6], "Emulsifier (Soy Lecithin)");
    }
}
