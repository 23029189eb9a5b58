// src/cli/handlers/run.rs

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use colored::Colorize;
use console::Term;

use crate::{
    cli::{catalog::Catalog, handlers::commons},
    constants::FAILURE_EXIT_CODE,
    core::{
        action_runner::{RunOptions, run_action},
        arg_parser::parse_args,
        config_loader,
    },
    models::ExecutionResult,
    state::ResponderGuard,
    system::{headless::HeadlessResponder, interactive::InteractiveResponder, render},
};

#[derive(Parser, Debug, Default)]
#[command(
    no_binary_name = true,
    about = "Runs an action. Options go before the action name; everything after it belongs to the action."
)]
struct RunArgs {
    /// Answer prompts with terminal widgets instead of flags and typed lines.
    #[arg(long, short)]
    interactive: bool,

    /// Print the collected messages as JSON instead of rendering them live.
    #[arg(long)]
    json: bool,

    /// Use this configuration file.
    #[arg(long, short)]
    config: Option<String>,
}

/// Options that take a value, so the value is not mistaken for the action name.
const VALUE_OPTIONS: [&str; 2] = ["--config", "-c"];

/// Splits `[run options] <action> [action args]`.
fn split_run_args(args: &[String]) -> (&[String], Option<&String>, &[String]) {
    let mut end = 0;
    while let Some(token) = args.get(end) {
        if VALUE_OPTIONS.contains(&token.as_str()) {
            end += 2;
        } else if token.starts_with('-') {
            end += 1;
        } else {
            break;
        }
    }
    let (own, rest) = args.split_at(end.min(args.len()));
    match rest.split_first() {
        Some((action, action_args)) => (own, Some(action), action_args),
        None => (own, None, &[]),
    }
}

pub fn handle(args: Vec<String>, catalog: &Catalog) -> Result<i32> {
    let (own, action_name, action_args) = split_run_args(&args);
    let Some(run_args) = commons::parse_handler_args::<RunArgs>(own)? else {
        return Ok(0);
    };
    let name = action_name.ok_or_else(|| anyhow!(t!("cli.run.missing_action")))?;

    let Some(action) = catalog.find(name) else {
        commons::report_unknown_action(name, catalog);
        return Ok(FAILURE_EXIT_CODE);
    };

    let parsed = parse_args(action_args);
    if parsed.has_help() {
        commons::print_action_help(action);
        return Ok(0);
    }

    let loaded = config_loader::load(run_args.config.as_deref())
        .with_context(|| t!("cli.run.config_failed"))?;

    let attended = Term::stderr().is_term();
    if run_args.interactive && !attended {
        log::warn!("--interactive needs a terminal; falling back to headless prompts.");
    }
    let _responder = if run_args.interactive && attended {
        ResponderGuard::install(InteractiveResponder::new())?
    } else {
        ResponderGuard::install(HeadlessResponder::stdio(parsed))?
    };

    let mut options = RunOptions::new()
        .args(action_args.iter().cloned())
        .config(loaded.config)
        .plugins(loaded.plugins);
    if !run_args.json {
        options.on_output = Some(render::terminal_sink());
        options.on_visual_feedback = Some(render::feedback_printer());
    }

    let result = run_action(action, options);
    if run_args.json {
        println!("{}", serde_json::to_string_pretty(&result.messages)?);
    }
    Ok(report_outcome(&action.name, &result))
}

/// Prints the failure, if any, and picks the exit code.
fn report_outcome(name: &str, result: &ExecutionResult) -> i32 {
    log::debug!(
        "Run {} of '{}' finished in {:?} (success: {})",
        result.run_id,
        name,
        result.duration,
        result.success
    );
    if result.success {
        return 0;
    }

    if let Some(validation) = result.arg_validation_error() {
        eprintln!("\n{}: {}", t!("cli.run.invalid_argument").red().bold(), validation);
        return FAILURE_EXIT_CODE;
    }
    if let Some(error) = &result.error {
        eprintln!("\n{}: {:#}", t!("cli.run.failed").red().bold(), error);
    }
    result.exit_code()
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::executor::ShellError;
    use std::time::Duration;
    use uuid::Uuid;

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_split_run_args() {
        let args = strings(&["--json", "-c", "ci.toml", "deploy", "--env", "staging"]);
        let (own, action, rest) = split_run_args(&args);
        assert_eq!(own, strings(&["--json", "-c", "ci.toml"]).as_slice());
        assert_eq!(action.map(String::as_str), Some("deploy"));
        assert_eq!(rest, strings(&["--env", "staging"]).as_slice());

        let only_flags = strings(&["--json"]);
        let (_, action, rest) = split_run_args(&only_flags);
        assert!(action.is_none());
        assert!(rest.is_empty());
    }

    #[test]
    fn test_report_outcome_exit_codes() {
        let result = |error: Option<anyhow::Error>| ExecutionResult {
            run_id: Uuid::new_v4(),
            success: error.is_none(),
            duration: Duration::ZERO,
            error,
            messages: Vec::new(),
            final_visual_state: None,
        };
        assert_eq!(report_outcome("ok", &result(None)), 0);
        assert_eq!(report_outcome("bad", &result(Some(anyhow!("boom")))), 1);

        let shell = anyhow::Error::new(ShellError::NonZeroExit {
            command: "make".into(),
            exit_code: 2,
        });
        assert_eq!(report_outcome("shell", &result(Some(shell))), 2);
    }

    #[test]
    fn test_unknown_action_and_help_exit_codes() {
        let catalog = Catalog::builtin();
        assert_eq!(handle(strings(&["nope"]), &catalog).unwrap(), 1);
        assert_eq!(handle(strings(&["greet", "--help"]), &catalog).unwrap(), 0);
        assert!(handle(strings(&["--json"]), &catalog).is_err());
    }
}
