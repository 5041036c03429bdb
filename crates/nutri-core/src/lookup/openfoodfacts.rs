//! Open Food Facts v2 product API.
//!
//! `GET {base}/api/v2/product/{barcode}` answers with an envelope holding a
//! `status` flag and a nested `product` object. Nutrients live in
//! `product.nutriments` under `*_100g` keys; ingredients come either as a
//! structured `ingredients` array or as a flat `ingredients_text`.

use crate::error::NutriError;
use crate::lookup::{Barcode, ProductSource};
use crate::model::{coerce_number, Ingredient, NutrientProfile, ProductRecord};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = concat!("nutri/", env!("CARGO_PKG_VERSION"));

pub struct OpenFoodFactsSource {
    name: String,
    base_url: String,
    agent: ureq::Agent,
}

impl OpenFoodFactsSource {
    pub fn new(name: &str, base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build();
        Self {
            name: name.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    pub fn product_url(&self, barcode: &Barcode) -> String {
        format!("{}/api/v2/product/{}", self.base_url, barcode)
    }
}

impl ProductSource for OpenFoodFactsSource {
    fn fetch(&self, barcode: &Barcode) -> Result<Option<ProductRecord>, NutriError> {
        let url = self.product_url(barcode);
        debug!(%url, "GET");

        let response = match self.agent.get(&url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(404, _)) => return Ok(None),
            Err(ureq::Error::Status(status, _)) => {
                return Err(NutriError::Upstream {
                    source_name: self.name.clone(),
                    status,
                })
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(NutriError::Network {
                    source_name: self.name.clone(),
                    reason: transport.to_string(),
                })
            }
        };

        let body: Value = response.into_json().map_err(|e| NutriError::Decode {
            source_name: self.name.clone(),
            reason: e.to_string(),
        })?;

        parse_envelope(barcode.as_str(), &body).map_err(|reason| NutriError::Decode {
            source_name: self.name.clone(),
            reason,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Parse an API envelope. `Ok(None)` when the envelope reports a miss.
pub fn parse_envelope(barcode: &str, body: &Value) -> Result<Option<ProductRecord>, String> {
    let envelope = body
        .as_object()
        .ok_or_else(|| "response is not a JSON object".to_string())?;

    let missed = match envelope.get("status") {
        Some(Value::Number(n)) => n.as_i64() == Some(0),
        Some(Value::String(s)) => s.eq_ignore_ascii_case("failure"),
        _ => false,
    };
    if missed {
        return Ok(None);
    }

    match envelope.get("product") {
        Some(Value::Object(product)) => Ok(Some(parse_product(barcode, product))),
        Some(Value::Null) | None => Ok(None),
        Some(_) => Err("'product' is not an object".to_string()),
    }
}

/// Normalize a product object. Never fails: unusable fields are dropped and
/// unusable nutrient readings become 0.
pub fn parse_product(barcode: &str, product: &Map<String, Value>) -> ProductRecord {
    let nutrients = product
        .get("nutriments")
        .and_then(Value::as_object)
        .map(NutrientProfile::from_nutriments)
        .unwrap_or_default();

    let ingredients = product
        .get("ingredients")
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(parse_ingredient).collect())
        .unwrap_or_default();

    ProductRecord {
        barcode: text_field(product, "code").unwrap_or_else(|| barcode.to_string()),
        name: text_field(product, "product_name"),
        brands: text_field(product, "brands"),
        quantity: text_field(product, "quantity"),
        image_url: text_field(product, "image_front_small_url")
            .or_else(|| text_field(product, "image_url")),
        nutrients,
        ingredients,
        ingredients_text: text_field(product, "ingredients_text"),
    }
}

fn parse_ingredient(value: &Value) -> Option<Ingredient> {
    let item = value.as_object()?;
    let text = text_field(item, "text").or_else(|| text_field(item, "name"))?;
    let percent = item
        .get("percent")
        .filter(|v| !v.is_null())
        .map(coerce_number);
    Some(Ingredient { text, percent })
}

fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_status_zero_is_miss() {
        let body = json!({ "status": 0, "status_verbose": "product not found" });
        assert_eq!(parse_envelope("123456", &body).unwrap(), None);
    }

    #[test]
    fn test_failure_status_is_miss() {
        let body = json!({ "status": "failure", "product": { "product_name": "x" } });
        assert_eq!(parse_envelope("123456", &body).unwrap(), None);
    }

    #[test]
    fn test_missing_product_is_miss() {
        assert_eq!(parse_envelope("123456", &json!({ "status": 1 })).unwrap(), None);
    }

    #[test]
    fn test_non_object_body_is_error() {
        assert!(parse_envelope("123456", &json!([1, 2])).is_err());
        assert!(parse_envelope("123456", &json!({ "product": "x" })).is_err());
    }

    #[test]
    fn test_parse_full_product() {
        let body = json!({
            "status": 1,
            "code": "6001068586806",
            "product": {
                "product_name": "Crunchy Oat Bar",
                "brands": "Acme",
                "quantity": "40 g",
                "image_url": "https://example.org/full.jpg",
                "image_front_small_url": "https://example.org/small.jpg",
                "nutriments": {
                    "sugars_100g": 12.5,
                    "fat_100g": "9",
                    "proteins_100g": 8,
                    "fiber_100g": null
                },
                "ingredients": [
                    { "text": "Oats", "percent": 55 },
                    { "name": "Sugar" },
                    { "percent": 3 },
                    "garbage"
                ],
                "ingredients_text": "Oats, Sugar"
            }
        });
        let record = parse_envelope("6001068586806", &body).unwrap().unwrap();
        assert_eq!(record.name.as_deref(), Some("Crunchy Oat Bar"));
        assert_eq!(record.image_url.as_deref(), Some("https://example.org/small.jpg"));
        assert_eq!(record.nutrients.sugar, dec!(12.5));
        assert_eq!(record.nutrients.fat, dec!(9));
        assert_eq!(record.nutrients.fiber, dec!(0));
        assert_eq!(record.ingredients.len(), 2);
        assert_eq!(record.ingredients[0].percent, Some(dec!(55)));
        assert_eq!(record.ingredients[1].text, "Sugar");
        assert_eq!(record.ingredient_labels(), vec!["Oats", "Sugar"]);
    }

    #[test]
    fn test_ingredients_text_fallback() {
        let body = json!({
            "status": 1,
            "product": { "ingredients": [], "ingredients_text": "Water, Salt" }
        });
        let record = parse_envelope("123456", &body).unwrap().unwrap();
        assert_eq!(record.barcode, "123456");
        assert_eq!(record.ingredient_labels(), vec!["Water", "Salt"]);
        assert_eq!(record.nutrients, NutrientProfile::default());
    }

    #[test]
    fn test_product_url() {
        let source = OpenFoodFactsSource::new(
            "global",
            "https://world.openfoodfacts.net/",
            Duration::from_secs(5),
        );
        let code = Barcode::parse("6001068586806").unwrap();
        assert_eq!(
            source.product_url(&code),
            "https://world.openfoodfacts.net/api/v2/product/6001068586806"
        );
    }
}
