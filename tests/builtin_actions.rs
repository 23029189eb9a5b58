// tests/builtin_actions.rs

use actionkit::actions;
use actionkit::cli::catalog::Catalog;
use actionkit::core::action_runner::{RunOptions, run_action};
use actionkit::core::arg_parser::parse_args;
use actionkit::core::output::{MessageContent, MessageType, OutputMessage};
use actionkit::models::{Action, ExecutionResult};
use actionkit::state::ResponderGuard;
use actionkit::system::headless::HeadlessResponder;
use serde_json::json;
use std::collections::HashMap;
use std::io::Cursor;
use std::sync::{Mutex, MutexGuard};

static SLOT_LOCK: Mutex<()> = Mutex::new(());

fn builtin(name: &str) -> Action {
    Catalog::new(actions::builtin()).find(name).cloned().unwrap()
}

/// Runs `action` headless with `args` and no further input.
fn run_headless(action: &Action, args: &[&str], options: RunOptions) -> ExecutionResult {
    let _lock: MutexGuard<'_, ()> = SLOT_LOCK.lock().unwrap_or_else(|p| p.into_inner());
    let _guard = ResponderGuard::install(HeadlessResponder::new(
        parse_args(args),
        Box::new(Cursor::new(Vec::new())),
        Box::new(Vec::new()),
    ))
    .unwrap();
    run_action(action, options.args(args.iter().copied()))
}

fn texts(messages: &[OutputMessage], kind: MessageType) -> Vec<String> {
    messages
        .iter()
        .filter(|m| m.message_type == kind)
        .filter_map(|m| m.content.as_text().map(str::to_string))
        .collect()
}

#[test]
fn test_greet_from_flags() {
    let result = run_headless(&builtin("greet"), &["--name", "Ada", "--shout"], RunOptions::new());
    assert!(result.success, "{:?}", result.error);
    assert_eq!(texts(&result.messages, MessageType::Success), vec!["HELLO, ADA!"]);
}

#[test]
fn test_greet_falls_back_to_defaults_at_end_of_input() {
    let result = run_headless(&builtin("greet"), &[], RunOptions::new());
    assert!(result.success, "{:?}", result.error);
    assert_eq!(texts(&result.messages, MessageType::Success), vec!["Hello, World!"]);
}

#[test]
fn test_scaffold_plans_feature_files() {
    let result = run_headless(
        &builtin("scaffold"),
        &["--name", "my-plugin", "--template", "full", "-f", "commands,tests"],
        RunOptions::new(),
    );
    assert!(result.success, "{:?}", result.error);

    let planned = result.messages.iter().find_map(|m| match &m.content {
        MessageContent::List { items } => Some(items.clone()),
        _ => None,
    });
    assert_eq!(
        planned.unwrap(),
        vec![
            "my-plugin/Cargo.toml",
            "my-plugin/src/lib.rs",
            "my-plugin/src/commands.rs",
            "my-plugin/src/tests.rs",
        ]
    );
}

#[test]
fn test_scaffold_rejects_bad_name_from_flag() {
    let result = run_headless(&builtin("scaffold"), &["--name", "Bad Name"], RunOptions::new());
    assert!(!result.success);
    assert!(result.arg_validation_error().is_some());
    assert_eq!(result.exit_code(), 1);
}

#[test]
fn test_deploy_out_of_range_replicas() {
    let result = run_headless(
        &builtin("deploy"),
        &["--env", "staging", "--replicas", "50"],
        RunOptions::new(),
    );
    assert!(!result.success);
    let validation = result.arg_validation_error().unwrap();
    assert!(validation.to_string().contains("--replicas"));
}

#[test]
fn test_deploy_reports_settings() {
    let plugins = HashMap::from([("deployer".to_string(), json!({ "region": "eu-west" }))]);
    let result = run_headless(
        &builtin("deploy"),
        &["-e", "staging", "-r", "3"],
        RunOptions::new().plugins(plugins),
    );
    assert!(result.success, "{:?}", result.error);

    let pairs = result.messages.iter().find_map(|m| match &m.content {
        MessageContent::KeyValue { pairs } => Some(pairs.clone()),
        _ => None,
    });
    let pairs = pairs.unwrap();
    assert!(pairs.contains(&("region".to_string(), "eu-west".to_string())));
    assert!(pairs.contains(&("replicas".to_string(), "3".to_string())));
}

#[cfg(unix)]
#[test]
fn test_deploy_propagates_check_exit_code() {
    let plugins = HashMap::from([("deployer".to_string(), json!({ "check_command": "sh -c 'exit 3'" }))]);
    let result = run_headless(
        &builtin("deploy"),
        &["--env", "staging"],
        RunOptions::new().plugins(plugins),
    );
    assert!(!result.success);
    assert_eq!(result.exit_code(), 3);
}
