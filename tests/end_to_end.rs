// tests/end_to_end.rs

use actionkit::core::action_runner::{RunOptions, run_action};
use actionkit::core::arg_inference::{ArgKind, Dialect, analyze_action_args, analyze_action_source};
use actionkit::core::arg_parser::{get_arg_value, parse_args};
use actionkit::core::prompt::PromptError;
use actionkit::core::request::{Field, Request, Step, TextOptions};
use actionkit::models::Action;
use actionkit::state::ResponderGuard;
use actionkit::system::headless::HeadlessResponder;
use serde::Deserialize;
use serde_json::{Value, json};
use std::io::{Cursor, Write};
use std::sync::{Arc, Mutex, MutexGuard};

static SLOT_LOCK: Mutex<()> = Mutex::new(());

fn slot_lock() -> MutexGuard<'static, ()> {
    SLOT_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[test]
fn test_text_prompt_answered_by_responder() {
    let _lock = slot_lock();
    let _guard = ResponderGuard::install(|request: &Request| -> Result<Value, PromptError> {
        assert_eq!(request.message(), "Name?");
        Ok(json!("test input"))
    })
    .unwrap();

    let seen = Arc::new(Mutex::new(None));
    let observed = Arc::clone(&seen);
    let action = Action::new("ask", "Asks a name", move |ctx| {
        let name = ctx
            .prompt
            .text("Name?", TextOptions::default().default_value("Tester"))?;
        *observed.lock().unwrap() = Some(name);
        Ok(())
    });

    let result = run_action(&action, RunOptions::new());
    assert!(result.success);
    assert_eq!(seen.lock().unwrap().as_deref(), Some("test input"));
}

#[test]
fn test_failing_action_reports_instead_of_raising() {
    let action = Action::new("explode", "Always fails", |_| anyhow::bail!("boom"));
    let result = run_action(&action, RunOptions::new());
    assert!(!result.success);
    assert_eq!(result.error_message().as_deref(), Some("boom"));
    assert_eq!(result.exit_code(), 1);
}

#[test]
fn test_step_form_values_are_merged() {
    #[derive(Deserialize)]
    struct Contact {
        name: String,
        email: String,
    }

    let _lock = slot_lock();
    let _guard = ResponderGuard::install(|request: &Request| -> Result<Value, PromptError> {
        let Request::StepForm(form) = request else {
            panic!("expected a step form, got {:?}", request.kind());
        };
        assert_eq!(form.steps.len(), 2);
        Ok(json!({ "name": "John", "email": "john@example.com" }))
    })
    .unwrap();

    let seen = Arc::new(Mutex::new(None));
    let observed = Arc::clone(&seen);
    let action = Action::new("contact", "Collects a contact", move |ctx| {
        let contact: Contact = ctx.prompt.step_form(
            "Contact",
            vec![
                Step::new(vec![Field::text("name", "Name", TextOptions::default())]),
                Step::new(vec![Field::text("email", "Email", TextOptions::default())]),
            ],
        )?;
        *observed.lock().unwrap() = Some((contact.name, contact.email));
        Ok(())
    });

    let result = run_action(&action, RunOptions::new());
    assert!(result.success, "{:?}", result.error);
    assert_eq!(
        seen.lock().unwrap().clone(),
        Some(("John".to_string(), "john@example.com".to_string()))
    );
}

#[test]
fn test_inferred_flag_answers_headless_prompt() {
    let source = "export default {\n  name: 'plugin',\n  async run({ tui }) {\n    const name = await tui.prompt.text('Plugin name:', { arg: 'name', argShort: 'n' });\n  }\n};\n";

    let mut file = tempfile::Builder::new().suffix(".js").tempfile().unwrap();
    file.write_all(source.as_bytes()).unwrap();
    let meta = analyze_action_args(file.path()).unwrap();
    assert_eq!(meta, analyze_action_source(source, Dialect::JavaScript).unwrap());
    assert_eq!(meta.args.len(), 1);

    let arg = &meta.args[0];
    assert_eq!(arg.kind, ArgKind::Text);
    assert_eq!(arg.mapping.long.as_deref(), Some("name"));
    assert_eq!(arg.mapping.short.as_deref(), Some("n"));

    let parsed = parse_args(&["--name", "hello"]);
    assert_eq!(get_arg_value(&parsed, &arg.mapping), Some("hello"));

    // The answer comes from the flag; the empty reader is never consulted.
    let _lock = slot_lock();
    let _guard = ResponderGuard::install(HeadlessResponder::new(
        parsed,
        Box::new(Cursor::new(Vec::new())),
        Box::new(Vec::new()),
    ))
    .unwrap();

    let seen = Arc::new(Mutex::new(None));
    let observed = Arc::clone(&seen);
    let mapping = arg.mapping.clone();
    let action = Action::new("plugin", "Names a plugin", move |ctx| {
        let mut options = TextOptions::default();
        if let Some(long) = &mapping.long {
            options = options.arg(long.clone());
        }
        if let Some(short) = &mapping.short {
            options = options.arg_short(short.clone());
        }
        *observed.lock().unwrap() = Some(ctx.prompt.text("Plugin name:", options)?);
        Ok(())
    });

    let result = run_action(&action, RunOptions::new().args(["--name", "hello"]));
    assert!(result.success, "{:?}", result.error);
    assert_eq!(seen.lock().unwrap().as_deref(), Some("hello"));
}

#[test]
fn test_prompt_without_responder_fails_the_run() {
    let _lock = slot_lock();
    let action = Action::new("lonely", "Asks nobody", |ctx| {
        ctx.prompt.text("Anyone?", TextOptions::default())?;
        Ok(())
    });
    let result = run_action(&action, RunOptions::new());
    assert!(!result.success);
    assert!(
        result
            .error_message()
            .is_some_and(|m| m.contains("No responder"))
    );
}
