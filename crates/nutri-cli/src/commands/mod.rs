pub mod account;
pub mod analyze;
pub mod classify;
pub mod lookup;
pub mod rules;
pub mod scan;

use nutri_core::config::Config;
use nutri_core::lookup::{DemoSource, LookupChain};

/// The configured source chain, or the demonstration source alone.
pub fn chain(config: &Config, demo_only: bool) -> LookupChain {
    if demo_only {
        LookupChain::new().with_source(DemoSource)
    } else {
        LookupChain::from_config(config)
    }
}
