//! The main entry point for the `cdnshift` command-line application.
//!
//! Parses arguments, configures logging once, then hands the resolved
//! settings to the library runner.

use cdnshift::cli;
use cdnshift::config::Settings;
use cdnshift::errors::Result;
use cdnshift::{logging, runner};
use log::error;
use std::process;

fn main() {
    let args = cli::parse_args();

    if !args.quiet {
        cli::print_banner();
    }
    logging::init(args.verbose);

    if let Err(e) = execute(&args) {
        error!("{e}");
        process::exit(1);
    }
}

fn execute(args: &cli::Args) -> Result<()> {
    let settings = Settings::from_args(args)?;
    let summary = runner::run(&settings)?;

    println!("\n{}", "-".repeat(50));
    match summary.replaced {
        Some(stats) => println!(
            "Files scanned : {}\nFiles changed : {}\nURLs replaced : {}",
            summary.scanned, stats.files, stats.replacements
        ),
        None => println!(
            "Files scanned : {}\nFiles to change : {}",
            summary.scanned,
            summary.detected.len()
        ),
    }
    Ok(())
}
