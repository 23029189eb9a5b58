// src/cli/handlers/help.rs

use anyhow::Result;
use clap::{CommandFactory, Parser};

use crate::{
    cli::{Cli, catalog::Catalog, handlers::commons},
    constants::FAILURE_EXIT_CODE,
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Shows the arguments an action accepts."
)]
struct HelpArgs {
    /// The action to describe. Without one, prints the general help.
    action: Option<String>,
}

pub fn handle(args: Vec<String>, catalog: &Catalog) -> Result<i32> {
    let Some(help_args) = commons::parse_handler_args::<HelpArgs>(&args)? else {
        return Ok(0);
    };

    let Some(name) = help_args.action else {
        Cli::command().print_help()?;
        return Ok(0);
    };

    match catalog.find(&name) {
        Some(action) => {
            commons::print_action_help(action);
            Ok(0)
        }
        None => {
            commons::report_unknown_action(&name, catalog);
            Ok(FAILURE_EXIT_CODE)
        }
    }
}
