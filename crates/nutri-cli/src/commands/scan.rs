use nutri_core::config::Config;
use nutri_core::error::NutriError;
use nutri_core::lookup::{RequestSequencer, Ticket};
use nutri_core::{AnalysisOptions, BarcodeAnalysis};
use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;
use tracing::debug;

use crate::commands::chain;
use crate::output;

type ScanResult = (Ticket, String, Result<BarcodeAnalysis, NutriError>);

/// Read barcodes line by line and look each one up on its own thread.
///
/// Only the result for the most recently entered barcode is printed; a
/// slower answer to an earlier line is dropped.
pub fn run(config: &Config, demo: bool) -> Result<(), NutriError> {
    let options = AnalysisOptions::from_config(config)?;
    let chain = chain(config, demo);
    let sequencer = RequestSequencer::new();

    eprintln!("Sources: {}", chain.source_names().join(" -> "));
    eprintln!("Enter barcodes, one per line. Ctrl-D or 'quit' to stop.");

    thread::scope(|scope| -> Result<(), NutriError> {
        let (tx, rx) = mpsc::channel::<ScanResult>();
        let sequencer = &sequencer;
        let chain = &chain;
        let options = &options;

        scope.spawn(move || {
            for (ticket, barcode, result) in rx {
                match sequencer.accept(ticket, result) {
                    Some(Ok(analysis)) => {
                        println!();
                        output::table::print_lookup(&analysis);
                    }
                    Some(Err(e)) => eprintln!("Error: {e}"),
                    None => debug!(ticket = ticket.number(), %barcode, "dropping stale lookup result"),
                }
            }
        });

        for line in io::stdin().lock().lines() {
            let line = line?;
            let barcode = line.trim();
            if barcode.is_empty() {
                continue;
            }
            if barcode.eq_ignore_ascii_case("quit") || barcode.eq_ignore_ascii_case("exit") {
                break;
            }

            let ticket = sequencer.issue();
            let barcode = barcode.to_string();
            let tx = tx.clone();
            scope.spawn(move || {
                let result = nutri_core::analyze_barcode(&barcode, chain, options);
                // The receiver only goes away once every sender is dropped.
                let _ = tx.send((ticket, barcode, result));
            });
        }

        drop(tx);
        Ok(())
    })
}
