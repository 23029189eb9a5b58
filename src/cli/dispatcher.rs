// src/cli/dispatcher.rs

use anyhow::Result;
use clap::CommandFactory;

use crate::{
    cli::{Cli, catalog::Catalog, handlers},
    constants::FAILURE_EXIT_CODE,
};

/// A sub-command: its name, aliases and handler. Handlers return the
/// process exit code.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &Catalog) -> Result<i32>,
}

/// The single source of truth for all sub-commands.
static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "list",
        aliases: &["ls"],
        handler: handlers::list::handle,
    },
    CommandDefinition {
        name: "run",
        aliases: &[],
        handler: handlers::run::handle,
    },
    CommandDefinition {
        name: "help",
        aliases: &[],
        handler: handlers::help::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Routes the raw arguments.
///
/// # Logic:
/// 1. No arguments: print the general help.
/// 2. `actionkit <command> [args...]`: a registered command.
/// 3. `actionkit <action> [args...]`: shortcut for `run <action> [args...]`.
/// 4. Anything else is an unknown action.
pub fn dispatch(all_args: Vec<String>, catalog: &Catalog) -> Result<i32> {
    log::debug!("Dispatching args: {:?}", all_args);

    let Some((first, rest)) = all_args.split_first() else {
        Cli::command().print_help()?;
        return Ok(0);
    };

    if let Some(command) = find_command(first) {
        return (command.handler)(rest.to_vec(), catalog);
    }
    if catalog.find(first).is_some() {
        return handlers::run::handle(all_args, catalog);
    }

    handlers::commons::report_unknown_action(first, catalog);
    Ok(FAILURE_EXIT_CODE)
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_command_by_name_and_alias() {
        assert_eq!(find_command("ls").map(|c| c.name), Some("list"));
        assert_eq!(find_command("run").map(|c| c.name), Some("run"));
        assert!(find_command("greet").is_none());
    }

    #[test]
    fn test_unknown_action_exits_with_failure() {
        let catalog = Catalog::new(Vec::new());
        assert_eq!(dispatch(vec!["missing".to_string()], &catalog).unwrap(), 1);
    }
}
