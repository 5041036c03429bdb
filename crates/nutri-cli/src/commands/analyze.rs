use nutri_core::config::Config;
use nutri_core::error::NutriError;
use nutri_core::lookup::openfoodfacts::{parse_envelope, parse_product};
use nutri_core::AnalysisOptions;
use serde_json::Value;
use std::path::Path;

use crate::output;

pub fn run(config: &Config, input_file: &Path, output_format: &str) -> Result<(), NutriError> {
    let options = AnalysisOptions::from_config(config)?;

    let bytes = std::fs::read(input_file)?;
    let body: Value = serde_json::from_slice(&bytes)?;
    let source_name = input_file.display().to_string();

    // Accept either an API envelope or the bare product object.
    let product = match body {
        Value::Object(ref map) if map.contains_key("product") || map.contains_key("status") => {
            let code = map.get("code").and_then(Value::as_str).unwrap_or_default();
            parse_envelope(code, &body)
                .map_err(|reason| NutriError::Decode {
                    source_name: source_name.clone(),
                    reason,
                })?
                .ok_or_else(|| NutriError::Decode {
                    source_name: source_name.clone(),
                    reason: "envelope holds no product".into(),
                })?
        }
        Value::Object(ref map) => {
            let code = map.get("code").and_then(Value::as_str).unwrap_or_default();
            parse_product(code, map)
        }
        _ => {
            return Err(NutriError::Decode {
                source_name,
                reason: "expected a JSON object".into(),
            })
        }
    };

    let analysis = nutri_core::analysis::analyze(&product, &options.scoring, &options.keywords);
    match output_format {
        "json" => output::json::print(&analysis)?,
        _ => output::table::print_analysis(&analysis, None),
    }
    Ok(())
}
