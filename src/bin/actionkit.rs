// src/bin/actionkit.rs

use actionkit::{
    cli::{Cli, catalog::Catalog, dispatcher},
    constants::FAILURE_EXIT_CODE,
};
use clap::Parser;
use colored::*;

/// Sets up logging, dispatches, and turns the outcome into an exit code.
fn main() {
    env_logger::init();

    let cli = Cli::parse();
    log::debug!("CLI args parsed: {:?}", cli);
    let catalog = Catalog::builtin();

    match dispatcher::dispatch(cli.args, &catalog) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("\n{}: {:#}", "Error".red().bold(), e);
            std::process::exit(FAILURE_EXIT_CODE);
        }
    }
}
