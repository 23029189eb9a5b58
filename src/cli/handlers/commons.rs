// src/cli/handlers/commons.rs

// Shared helpers for the command handlers.

use anyhow::Result;
use clap::{Parser, error::ErrorKind};
use colored::Colorize;

use crate::{
    cli::catalog::Catalog,
    core::arg_inference::{analyze_action, format_args_help},
    core::translator::Translator,
    models::Action,
};

/// Parses a handler's own arguments. Returns `None` after printing help or
/// version text, which callers treat as a successful exit.
pub fn parse_handler_args<T: Parser>(args: &[String]) -> Result<Option<T>> {
    match T::try_parse_from(args) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print()?;
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Prints the usage block inferred from the action's source, or a short
/// header when nothing could be inferred.
pub fn print_action_help(action: &Action) {
    match analyze_action(action) {
        Some(meta) => println!("{}", format_args_help(&meta)),
        None => {
            println!("{} - {}", action.name, action.describe(&Translator::new()));
            println!("\n{}", t!("help.no_metadata"));
        }
    }
}

pub fn report_unknown_action(name: &str, catalog: &Catalog) {
    eprintln!(
        "{}",
        format!(t!("cli.run.action_not_found"), name = name).red().bold()
    );
    let names = catalog.names();
    if !names.is_empty() {
        eprintln!(
            "{}",
            format!(t!("cli.run.available_actions"), names = names.join(", ")).dimmed()
        );
    }
}
