pub mod account;
pub mod analysis;
pub mod classify;
pub mod config;
pub mod error;
pub mod grade;
pub mod lookup;
pub mod model;
pub mod rules;

use analysis::{ProductAnalysis, ProductComparison};
use config::Config;
use error::NutriError;
use lookup::{Barcode, Lookup, LookupChain};
use rules::schema::{KeywordTableDef, ScoringProfileDef};
use serde::Serialize;

/// Rule tables used when analysing products.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    pub scoring: ScoringProfileDef,
    pub keywords: KeywordTableDef,
}

impl AnalysisOptions {
    /// Builtin default scoring preset and keyword table.
    pub fn builtin() -> Result<Self, NutriError> {
        Ok(Self {
            scoring: rules::builtin::load_scoring_preset(rules::builtin::DEFAULT_SCORING)?,
            keywords: rules::builtin::load_keyword_table()?,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, NutriError> {
        Ok(Self {
            scoring: config.scoring_profile()?,
            keywords: config.keyword_table()?,
        })
    }
}

/// Outcome of analysing a barcode.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BarcodeAnalysis {
    Found {
        source: String,
        analysis: ProductAnalysis,
    },
    NotFound {
        barcode: String,
        tried: Vec<String>,
    },
}

/// Main API entry point: validate a barcode, look it up through the chain
/// and analyse the product.
///
/// A product missing from every source is a `NotFound` value, not an error.
pub fn analyze_barcode(
    input: &str,
    chain: &LookupChain,
    options: &AnalysisOptions,
) -> Result<BarcodeAnalysis, NutriError> {
    let barcode = Barcode::parse(input)?;
    match chain.lookup(&barcode)? {
        Lookup::Found { source, product } => Ok(BarcodeAnalysis::Found {
            source,
            analysis: analysis::analyze(&product, &options.scoring, &options.keywords),
        }),
        Lookup::NotFound { barcode, tried } => Ok(BarcodeAnalysis::NotFound { barcode, tried }),
    }
}

/// Look up two barcodes and compare them.
///
/// Fails with `Validation` naming the missing barcode if either is not
/// found, since there is nothing to compare against.
pub fn compare_barcodes(
    left: &str,
    right: &str,
    chain: &LookupChain,
    options: &AnalysisOptions,
) -> Result<ProductComparison, NutriError> {
    let fetch = |field: &str, input: &str| -> Result<model::ProductRecord, NutriError> {
        let barcode = Barcode::parse(input).map_err(|e| match e {
            NutriError::Validation { message, .. } => NutriError::validation(field, message),
            other => other,
        })?;
        chain.lookup(&barcode)?.into_product().ok_or_else(|| {
            NutriError::validation(field, format!("product {} was not found", barcode))
        })
    };

    let left = fetch("left", left)?;
    let right = fetch("right", right)?;
    Ok(analysis::compare(
        &left,
        &right,
        &options.scoring,
        &options.keywords,
    ))
}
