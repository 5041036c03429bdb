pub mod demo;
pub mod openfoodfacts;
pub mod sequence;

use crate::config::Config;
use crate::error::NutriError;
use crate::model::ProductRecord;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};

pub use demo::DemoSource;
pub use openfoodfacts::OpenFoodFactsSource;
pub use sequence::{RequestSequencer, Ticket};

/// A validated product barcode: ASCII digits only, at least six of them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Barcode(String);

impl Barcode {
    pub const MIN_LEN: usize = 6;

    pub fn parse(input: &str) -> Result<Self, NutriError> {
        let code = input.trim();
        if code.is_empty() {
            return Err(NutriError::validation("barcode", "enter a barcode"));
        }
        if !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(NutriError::validation(
                "barcode",
                format!("'{}' must contain digits only", code),
            ));
        }
        if code.len() < Self::MIN_LEN {
            return Err(NutriError::validation(
                "barcode",
                format!("'{}' is shorter than {} digits", code, Self::MIN_LEN),
            ));
        }
        Ok(Barcode(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Barcode {
    type Err = NutriError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Barcode::parse(s)
    }
}

impl fmt::Display for Barcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A place products can be fetched from.
pub trait ProductSource: Send + Sync {
    /// Fetch a product. `Ok(None)` means the source has no such product;
    /// `Err` means the source could not answer.
    fn fetch(&self, barcode: &Barcode) -> Result<Option<ProductRecord>, NutriError>;

    /// Name of this source (for diagnostics and results).
    fn name(&self) -> &str;
}

/// Result of running a barcode through the lookup chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Lookup {
    Found {
        source: String,
        product: ProductRecord,
    },
    NotFound {
        barcode: String,
        /// Sources consulted, in order.
        tried: Vec<String>,
    },
}

impl Lookup {
    pub fn product(&self) -> Option<&ProductRecord> {
        match self {
            Lookup::Found { product, .. } => Some(product),
            Lookup::NotFound { .. } => None,
        }
    }

    pub fn into_product(self) -> Option<ProductRecord> {
        match self {
            Lookup::Found { product, .. } => Some(product),
            Lookup::NotFound { .. } => None,
        }
    }
}

/// Ordered list of product sources, tried in sequence until one finds the
/// product.
#[derive(Default)]
pub struct LookupChain {
    sources: Vec<Box<dyn ProductSource>>,
}

impl LookupChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: impl ProductSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn push(&mut self, source: Box<dyn ProductSource>) {
        self.sources.push(source);
    }

    /// Build the regional -> global -> demo chain described by `config`.
    pub fn from_config(config: &Config) -> Self {
        let mut chain = LookupChain::new();
        if let Some(ref url) = config.regional_url {
            chain.push(Box::new(OpenFoodFactsSource::new("regional", url, config.timeout)));
        }
        chain.push(Box::new(OpenFoodFactsSource::new(
            "global",
            &config.global_url,
            config.timeout,
        )));
        if config.demo_fallback {
            chain.push(Box::new(DemoSource));
        }
        chain
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Try each source in order and return the first hit.
    ///
    /// A source failure does not stop the chain. If no source has the
    /// product and at least one failed, the first failure is returned so a
    /// broken network is not reported as a missing product.
    pub fn lookup(&self, barcode: &Barcode) -> Result<Lookup, NutriError> {
        let mut tried = Vec::new();
        let mut first_failure = None;

        for source in &self.sources {
            debug!(source = source.name(), %barcode, "querying product source");
            tried.push(source.name().to_string());

            match source.fetch(barcode) {
                Ok(Some(product)) => {
                    info!(source = source.name(), %barcode, "product found");
                    return Ok(Lookup::Found {
                        source: source.name().to_string(),
                        product,
                    });
                }
                Ok(None) => debug!(source = source.name(), %barcode, "product not in source"),
                Err(e) => {
                    warn!(source = source.name(), %barcode, error = %e, "product source failed");
                    first_failure.get_or_insert(e);
                }
            }
        }

        match first_failure {
            Some(e) => Err(e),
            None => {
                info!(%barcode, tried = tried.len(), "product not found in any source");
                Ok(Lookup::NotFound {
                    barcode: barcode.to_string(),
                    tried,
                })
            }
        }
    }
}
