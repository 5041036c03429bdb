use nutri_core::config::Config;
use nutri_core::error::NutriError;
use nutri_core::AnalysisOptions;

use crate::commands::chain;
use crate::output;

pub fn run(config: &Config, barcode: &str, demo: bool, output_format: &str) -> Result<(), NutriError> {
    let options = AnalysisOptions::from_config(config)?;
    let result = nutri_core::analyze_barcode(barcode, &chain(config, demo), &options)?;

    match output_format {
        "json" => output::json::print(&result)?,
        _ => output::table::print_lookup(&result),
    }
    Ok(())
}

pub fn compare(
    config: &Config,
    left: &str,
    right: &str,
    demo: bool,
    output_format: &str,
) -> Result<(), NutriError> {
    let options = AnalysisOptions::from_config(config)?;
    let comparison = nutri_core::compare_barcodes(left, right, &chain(config, demo), &options)?;

    match output_format {
        "json" => output::json::print(&comparison)?,
        _ => output::table::print_comparison(&comparison),
    }
    Ok(())
}
