// src/system/headless.rs

//! # Headless Responder
//!
//! Answers prompts without a terminal UI. A prompt whose arg mapping matches
//! a command-line value is answered from that value, after the same
//! conversion and validation an interactive answer would go through. Every
//! other prompt falls back to a plain line reader: the prompt is written to
//! the writer (stderr in the binary) and one line is read per attempt.
//!
//! An invalid flag value aborts the request with `PromptError::ArgValidation`.
//! An invalid typed line is reported and asked again.

use crate::core::arg_convert::{
    ArgValidationError, convert_to_boolean, convert_to_multi_select_value, convert_to_number,
    convert_to_select_value, validate_text_value,
};
use crate::core::arg_parser::{ArgMapping, ParsedArgs, get_arg_value, get_flag_value};
use crate::core::prompt::{PromptError, find_choice};
use crate::core::request::{
    Choice, FormRequest, Request, StepFormRequest, Validator, WaitForKeyRequest, stringify_value,
};
use crate::state::Responder;
use serde_json::{Map, Value};
use std::fmt;
use std::io::{self, BufRead, BufReader, Write};
use std::sync::{Mutex, MutexGuard};

/// The reader and writer of the line fallback.
struct LineIo {
    reader: Box<dyn BufRead + Send>,
    writer: Box<dyn Write + Send>,
    /// Set once the reader has hit end of input.
    closed: bool,
}

impl LineIo {
    fn write(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())?;
        self.writer.flush()
    }

    fn writeln(&mut self, text: &str) -> io::Result<()> {
        self.write(text)?;
        self.write("\n")
    }

    /// Reads one line without its terminator. `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            self.closed = true;
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

/// Resolves requests from parsed command-line arguments, falling back to a
/// line-oriented reader.
pub struct HeadlessResponder {
    args: ParsedArgs,
    io: Mutex<LineIo>,
}

impl fmt::Debug for HeadlessResponder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadlessResponder")
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}

impl HeadlessResponder {
    pub fn new(
        args: ParsedArgs,
        reader: Box<dyn BufRead + Send>,
        writer: Box<dyn Write + Send>,
    ) -> Self {
        Self {
            args,
            io: Mutex::new(LineIo {
                reader,
                writer,
                closed: false,
            }),
        }
    }

    /// Reads answers from stdin and writes prompts to stderr, keeping stdout
    /// for the action's own output.
    pub fn stdio(args: ParsedArgs) -> Self {
        Self::new(
            args,
            Box::new(BufReader::new(io::stdin())),
            Box::new(io::stderr()),
        )
    }

    fn lock_io(&self) -> MutexGuard<'_, LineIo> {
        self.io.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // --- Primitive requests ---

    fn resolve_primitive(&self, request: &Request) -> Result<Value, PromptError> {
        match self.from_args(request)? {
            Some(value) => Ok(value),
            None => self.ask(request),
        }
    }

    /// The command-line answer for `request`, if its mapping matches one.
    fn from_args(&self, request: &Request) -> Result<Option<Value>, PromptError> {
        let Some(mapping) = request.arg_mapping() else {
            return Ok(None);
        };
        let name = mapping.display_name();

        let value = match request {
            Request::Confirm(_) => match self.confirm_from_args(mapping, &name)? {
                Some(value) => Value::Bool(value),
                None => return Ok(None),
            },
            _ => match get_arg_value(&self.args, mapping) {
                Some(raw) => convert_answer(request, raw, &name)?,
                None => return Ok(None),
            },
        };

        log::debug!("Answered '{}' from {}.", request.kind().as_str(), name);
        Ok(Some(value))
    }

    /// `--yes=<bool>` and `--yes <bool>` are converted strictly; a bare `--yes`
    /// is `true`; a positional slot is converted like a named value.
    fn confirm_from_args(
        &self,
        mapping: &ArgMapping,
        name: &str,
    ) -> Result<Option<bool>, ArgValidationError> {
        let named = [mapping.long.as_ref(), mapping.short.as_ref()]
            .into_iter()
            .flatten()
            .find_map(|key| self.args.named.get(key));
        if let Some(raw) = named {
            return convert_to_boolean(raw, name).map(Some);
        }
        if let Some(value) = get_flag_value(&self.args, mapping) {
            return Ok(Some(value));
        }
        mapping
            .index
            .and_then(|index| self.args.positional.get(index))
            .map(|raw| convert_to_boolean(raw, name))
            .transpose()
    }

    /// Asks on the line reader until a valid answer arrives.
    fn ask(&self, request: &Request) -> Result<Value, PromptError> {
        let mut io = self.lock_io();
        let label = request.message().to_string();

        if let Some(description) = request.description() {
            io.writeln(description)?;
        }
        if let Request::Select(r) = request {
            write_choices(&mut io, &r.choices)?;
        } else if let Request::MultiSelect(r) = request {
            write_choices(&mut io, &r.choices)?;
        }

        loop {
            io.write(&render_prompt(request))?;
            let Some(line) = io.read_line()? else {
                return default_answer(request).ok_or(PromptError::InputClosed(label));
            };

            match parse_line(request, &line, &label) {
                Ok(value) => return Ok(value),
                Err(e) => io.writeln(&format!("  ! {}", describe(&e)))?,
            }
        }
    }

    // --- Composite requests ---

    fn resolve_form(&self, form: &FormRequest) -> Result<Value, PromptError> {
        if !form.message.is_empty() {
            self.lock_io().writeln(&form.message)?;
        }
        let mut values = Map::new();
        for field in &form.fields {
            values.insert(field.key.clone(), self.resolve_primitive(&field.request)?);
        }
        Ok(Value::Object(values))
    }

    /// Steps run in order and their values merge into one object. A failed
    /// step validation asks the step again, unless one of its answers came
    /// from the command line; that cannot change, so it is an error.
    fn resolve_step_form(&self, form: &StepFormRequest) -> Result<Value, PromptError> {
        if !form.message.is_empty() {
            self.lock_io().writeln(&form.message)?;
        }
        let total = form.steps.len();
        let mut merged = Map::new();

        for (number, step) in (1..).zip(&form.steps) {
            let mut header = format!(t!("headless.step_header"), number = number, total = total);
            if let Some(title) = &step.title {
                header = format!("{}: {}", header, title);
            }
            self.lock_io().writeln(&header)?;
            let title = step.title.clone().unwrap_or_else(|| header.clone());
            if let Some(description) = &step.description {
                self.lock_io().writeln(description)?;
            }

            loop {
                let mut candidate = merged.clone();
                let mut from_flags = false;
                for field in &step.fields {
                    let value = match self.from_args(&field.request)? {
                        Some(value) => {
                            from_flags = true;
                            value
                        }
                        None => self.ask(&field.request)?,
                    };
                    candidate.insert(field.key.clone(), value);
                }

                let verdict = step
                    .validate
                    .as_ref()
                    .map_or(Ok(()), |validator| validator.check(&candidate));
                match verdict {
                    Ok(()) => {
                        merged = candidate;
                        break;
                    }
                    Err(reason) if from_flags => {
                        let shown = Value::Object(candidate).to_string();
                        return Err(ArgValidationError::new(&title, &shown, reason).into());
                    }
                    // Asking again would only replay the same defaults.
                    Err(_) if self.lock_io().closed => {
                        return Err(PromptError::InputClosed(title));
                    }
                    Err(reason) => {
                        let message = format!(t!("headless.step_invalid"), step = title, reason = reason);
                        self.lock_io().writeln(&format!("  ! {}", message))?;
                    }
                }
            }
        }
        Ok(Value::Object(merged))
    }

    // --- Waits ---

    fn wait_for_enter(&self, message: &str) -> Result<Value, PromptError> {
        let mut io = self.lock_io();
        io.write(&format!("{} {} ", message, t!("headless.press_enter")))?;
        // Nothing to answer, so closed input simply continues.
        io.read_line()?;
        Ok(Value::Null)
    }

    fn wait_for_key(&self, request: &WaitForKeyRequest) -> Result<Value, PromptError> {
        if let Some(timeout) = request.options.timeout {
            log::debug!("Ignoring wait-for-key timeout of {:?} in headless mode.", timeout);
        }
        let keys = &request.options.keys;
        let mut io = self.lock_io();

        loop {
            if keys.is_empty() {
                io.write(&format!("{} ", request.message))?;
            } else {
                io.write(&format!("{} [{}] ", request.message, keys.join("/")))?;
            }
            let Some(line) = io.read_line()? else {
                return Err(PromptError::InputClosed(request.message.clone()));
            };

            let key = match line.trim() {
                "" => String::from("enter"),
                typed => typed.to_string(),
            };
            if keys.is_empty() || keys.iter().any(|k| k.eq_ignore_ascii_case(&key)) {
                return Ok(Value::String(key));
            }
            let message = format!(t!("headless.key_not_allowed"), keys = keys.join(", "));
            io.writeln(&format!("  ! {}", message))?;
        }
    }
}

impl Responder for HeadlessResponder {
    fn respond(&self, request: &Request) -> Result<Value, PromptError> {
        match request {
            Request::Form(form) => self.resolve_form(form),
            Request::StepForm(form) => self.resolve_step_form(form),
            Request::WaitForEnter(r) => self.wait_for_enter(&r.message),
            Request::WaitForKey(r) => self.wait_for_key(r),
            primitive => self.resolve_primitive(primitive),
        }
    }
}

// --- Conversion ---

/// Converts one raw answer into the value `request` resolves to.
pub(crate) fn convert_answer(request: &Request, raw: &str, name: &str) -> Result<Value, ArgValidationError> {
    match request {
        Request::Text(r) => {
            let text = Value::String(validate_text_value(raw, name, &r.options.constraints())?);
            run_validator(r.options.validate.as_ref(), text, raw, name)
        }
        Request::Password(r) => {
            let text = Value::String(validate_text_value(raw, name, &r.options.constraints())?);
            run_validator(r.options.validate.as_ref(), text, raw, name)
        }
        Request::Number(r) => {
            let number = Value::from(convert_to_number(raw, name, &r.options.bounds())?);
            run_validator(r.options.validate.as_ref(), number, raw, name)
        }
        Request::Confirm(_) => convert_to_boolean(raw, name).map(Value::Bool),
        Request::Select(r) => convert_to_select_value(raw, name, &r.choices),
        Request::MultiSelect(r) => {
            convert_to_multi_select_value(raw, name, &r.choices, &r.options.bounds())
                .map(Value::Array)
        }
        other => Err(ArgValidationError::new(
            name,
            raw,
            format!("'{}' cannot be answered with a value", other.kind().as_str()),
        )),
    }
}

fn run_validator(
    validator: Option<&Validator>,
    value: Value,
    raw: &str,
    name: &str,
) -> Result<Value, ArgValidationError> {
    match validator.map(|v| v.check(&value)) {
        Some(Err(reason)) => Err(ArgValidationError::new(name, raw, reason)),
        _ => Ok(value),
    }
}

/// Interprets one typed line. Selection prompts also accept 1-based numbers.
fn parse_line(request: &Request, line: &str, label: &str) -> Result<Value, ArgValidationError> {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        if let Some(value) = default_answer(request) {
            return Ok(value);
        }
        return match request {
            // An empty text answer is still subject to its constraints.
            Request::Text(_) | Request::Password(_) | Request::MultiSelect(_) => {
                convert_answer(request, "", label)
            }
            _ => Err(ArgValidationError::new(label, line, t!("headless.value_required"))),
        };
    }

    match request {
        Request::Select(r) => match choice_by_number(&r.choices, trimmed, label)? {
            Some(choice) => Ok(choice.value.clone()),
            None => convert_answer(request, trimmed, label),
        },
        Request::MultiSelect(r) => {
            let labels = trimmed
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| {
                    Ok(choice_by_number(&r.choices, item, label)?
                        .map_or_else(|| item.to_string(), |choice| choice.label.clone()))
                })
                .collect::<Result<Vec<_>, ArgValidationError>>()?;
            convert_answer(request, &labels.join(","), label)
        }
        // Passwords keep their surrounding spaces.
        Request::Password(_) => convert_answer(request, line, label),
        _ => convert_answer(request, trimmed, label),
    }
}

/// A 1-based choice number, re-checked against the list.
fn choice_by_number<'a>(
    choices: &'a [Choice],
    input: &str,
    label: &str,
) -> Result<Option<&'a Choice>, ArgValidationError> {
    let Ok(number) = input.parse::<usize>() else {
        return Ok(None);
    };
    number
        .checked_sub(1)
        .and_then(|index| choices.get(index))
        .map(Some)
        .ok_or_else(|| {
            let reason = format!(t!("headless.choice_out_of_range"), max = choices.len());
            ArgValidationError::new(label, input, reason)
        })
}

/// The declared default, as the value the request resolves to.
fn default_answer(request: &Request) -> Option<Value> {
    match request {
        Request::Text(r) => r.options.default_value.clone().map(Value::String),
        Request::Number(r) => r.options.default_value.map(Value::from),
        Request::Confirm(r) => r.options.default_value.map(Value::Bool),
        Request::Select(r) => r.options.default_value.clone(),
        Request::MultiSelect(r) if !r.options.default_values.is_empty() => {
            Some(Value::Array(r.options.default_values.clone()))
        }
        _ => None,
    }
}

// --- Rendering ---

fn write_choices(io: &mut LineIo, choices: &[Choice]) -> io::Result<()> {
    for (number, choice) in (1..).zip(choices) {
        match &choice.description {
            Some(description) => {
                io.writeln(&format!("  {}) {} - {}", number, choice.label, description))?;
            }
            None => io.writeln(&format!("  {}) {}", number, choice.label))?,
        }
    }
    Ok(())
}

/// The prompt line: message, then range and default hints.
fn render_prompt(request: &Request) -> String {
    let mut hints = Vec::new();

    match request {
        Request::Text(r) => {
            if let Some(default) = &r.options.default_value {
                hints.push(format!("[{}]", default));
            }
        }
        Request::Number(r) => {
            match (r.options.min, r.options.max) {
                (Some(min), Some(max)) => hints.push(format!("({}-{})", min, max)),
                (Some(min), None) => hints.push(format!("(>= {})", min)),
                (None, Some(max)) => hints.push(format!("(<= {})", max)),
                (None, None) => {}
            }
            if let Some(default) = r.options.default_value {
                hints.push(format!("[{}]", default));
            }
        }
        Request::Confirm(r) => hints.push(
            match r.options.default_value {
                Some(true) => "(Y/n)",
                Some(false) => "(y/N)",
                None => "(y/n)",
            }
            .to_string(),
        ),
        Request::Select(r) => {
            if let Some(default) = &r.options.default_value {
                let shown = find_choice(&r.choices, default)
                    .map_or_else(|| stringify_value(default), |c| c.label.clone());
                hints.push(format!("[{}]", shown));
            }
        }
        Request::MultiSelect(r) => {
            hints.push(format!("({})", t!("headless.multi_select_hint")));
            if !r.options.default_values.is_empty() {
                let shown: Vec<String> = r
                    .options
                    .default_values
                    .iter()
                    .map(|v| find_choice(&r.choices, v).map_or_else(|| stringify_value(v), |c| c.label.clone()))
                    .collect();
                hints.push(format!("[{}]", shown.join(", ")));
            }
        }
        _ => {}
    }

    if hints.is_empty() {
        format!("{} ", request.message())
    } else {
        format!("{} {} ", request.message(), hints.join(" "))
    }
}

/// A diagnostic for the line fallback: the reason and any valid options.
fn describe(error: &ArgValidationError) -> String {
    match &error.valid_options {
        Some(options) if !options.is_empty() => format!(
            t!("headless.invalid_with_options"),
            reason = error.reason,
            options = options.join(", ")
        ),
        _ => error.reason.clone(),
    }
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::arg_parser::parse_args;
    use crate::core::request::{
        ConfirmOptions, ConfirmRequest, Field, MultiSelectOptions, MultiSelectRequest,
        NumberOptions, NumberRequest, SelectOptions, SelectRequest, Step, TextOptions,
        TextRequest, WaitForKeyOptions, normalize_choices,
    };
    use serde_json::json;
    use std::io::Cursor;
    use std::sync::Arc;

    /// A writer whose contents the test can read back.
    #[derive(Clone, Default)]
    struct Transcript(Arc<Mutex<Vec<u8>>>);

    impl Write for Transcript {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl Transcript {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn responder(args: &[&str], input: &str) -> (HeadlessResponder, Transcript) {
        let transcript = Transcript::default();
        let responder = HeadlessResponder::new(
            parse_args(args),
            Box::new(Cursor::new(input.as_bytes().to_vec())),
            Box::new(transcript.clone()),
        );
        (responder, transcript)
    }

    fn text(message: &str, options: TextOptions) -> Request {
        Request::Text(TextRequest { message: message.to_string(), options })
    }

    fn env_select() -> Request {
        Request::Select(SelectRequest {
            message: "Environment".to_string(),
            choices: normalize_choices(["staging", "production"]),
            options: SelectOptions::default().arg("env"),
        })
    }

    #[test]
    fn test_flag_value_answers_without_reading() {
        let request = text("Plugin name:", TextOptions::default().arg("name").arg_short("n"));

        let (long, transcript) = responder(&["--name", "hello"], "");
        assert_eq!(long.respond(&request).unwrap(), json!("hello"));
        assert!(transcript.text().is_empty());

        let (short, _) = responder(&["-n", "short"], "");
        assert_eq!(short.respond(&request).unwrap(), json!("short"));
    }

    #[test]
    fn test_invalid_flag_value_is_an_error() {
        let (responder, _) = responder(&["--env", "qa"], "staging\n");
        let err = responder.respond(&env_select()).unwrap_err();
        let validation = err.arg_validation().unwrap();
        assert_eq!(validation.arg_name, "--env");
        assert_eq!(validation.value, "qa");
        assert_eq!(
            validation.valid_options,
            Some(vec!["staging".to_string(), "production".to_string()])
        );
    }

    #[test]
    fn test_custom_validator_applies_to_flags() {
        let (responder, _) = responder(&["--slug", "Has Spaces"], "");
        let request = text(
            "Slug",
            TextOptions::default().arg("slug").validate(|v| match v.as_str() {
                Some(s) if s.contains(' ') => Err("no spaces allowed".to_string()),
                _ => Ok(()),
            }),
        );
        let err = responder.respond(&request).unwrap_err();
        assert_eq!(err.arg_validation().unwrap().reason, "no spaces allowed");
    }

    #[test]
    fn test_line_fallback_reprompts_until_valid() {
        let (responder, transcript) = responder(&[], "abc\n50\n7\n");
        let request = Request::Number(NumberRequest {
            message: "Replicas".to_string(),
            options: NumberOptions::default().min(1.0).max(10.0),
        });
        assert_eq!(responder.respond(&request).unwrap(), json!(7.0));

        let shown = transcript.text();
        assert_eq!(shown.matches("Replicas (1-10)").count(), 3);
        assert!(shown.contains("expected a number"));
        assert!(shown.contains("must be at most 10"));
    }

    #[test]
    fn test_line_fallback_shows_description_first() {
        let (responder, transcript) = responder(&[], "Ada\n");
        let request = text(
            "Name?",
            TextOptions::default().arg("name").description("Who gets the greeting"),
        );
        assert_eq!(responder.respond(&request).unwrap(), json!("Ada"));
        assert_eq!(transcript.text(), "Who gets the greeting\nName? ");
    }

    #[test]
    fn test_select_by_number_and_range_check() {
        let (responder, transcript) = responder(&[], "3\n2\n");
        assert_eq!(responder.respond(&env_select()).unwrap(), json!("production"));
        let shown = transcript.text();
        assert!(shown.contains("  1) staging\n  2) production\n"));
        assert!(shown.contains("between 1 and 2"));
    }

    #[test]
    fn test_multi_select_mixes_numbers_and_labels() {
        let (responder, _) = responder(&[], "1, blue\n");
        let request = Request::MultiSelect(MultiSelectRequest {
            message: "Colors".to_string(),
            choices: normalize_choices(["red", "green", "blue"]),
            options: MultiSelectOptions::default(),
        });
        assert_eq!(responder.respond(&request).unwrap(), json!(["red", "blue"]));
    }

    #[test]
    fn test_confirm_defaults_and_flags() {
        let confirm = |default| {
            Request::Confirm(ConfirmRequest {
                message: "Proceed?".to_string(),
                options: ConfirmOptions { default_value: default, ..ConfirmOptions::default() }.arg("yes"),
            })
        };

        let (empty_line, _) = responder(&[], "\n");
        assert_eq!(empty_line.respond(&confirm(Some(true))).unwrap(), json!(true));

        let (bare_flag, _) = responder(&["--yes"], "");
        assert_eq!(bare_flag.respond(&confirm(None)).unwrap(), json!(true));

        let (negated, _) = responder(&["--no-yes"], "");
        assert_eq!(negated.respond(&confirm(None)).unwrap(), json!(false));

        let (garbage, _) = responder(&["--yes=maybe"], "");
        assert!(garbage.respond(&confirm(None)).unwrap_err().arg_validation().is_some());
    }

    #[test]
    fn test_end_of_input_uses_default_or_fails() {
        let (with_default, _) = responder(&[], "");
        let request = text("Name?", TextOptions::default().default_value("Tester"));
        assert_eq!(with_default.respond(&request).unwrap(), json!("Tester"));

        let (without, _) = responder(&[], "");
        let err = without.respond(&text("Name?", TextOptions::default())).unwrap_err();
        assert!(matches!(err, PromptError::InputClosed(ref m) if m == "Name?"));
    }

    #[test]
    fn test_form_mixes_flags_and_lines() {
        let (responder, _) = responder(&["--name", "John"], "john@example.com\n");
        let request = Request::Form(FormRequest {
            message: String::new(),
            fields: vec![
                Field::text("name", "Name", TextOptions::default().arg("name")),
                Field::text("email", "Email", TextOptions::default()),
            ],
        });
        assert_eq!(
            responder.respond(&request).unwrap(),
            json!({"name": "John", "email": "john@example.com"})
        );
    }

    #[test]
    fn test_step_form_merges_and_revalidates() {
        let steps = || {
            vec![
                Step::new(vec![Field::text("name", "Name", TextOptions::default().arg("name"))]),
                Step::new(vec![Field::text("email", "Email", TextOptions::default())])
                    .title("Contact")
                    .validate(|values| match values.get("email").and_then(Value::as_str) {
                        Some(email) if email.contains('@') => Ok(()),
                        _ => Err("email needs an @".to_string()),
                    }),
            ]
        };
        let request = Request::StepForm(StepFormRequest { message: String::new(), steps: steps() });

        let (responder, transcript) = responder(&["--name", "John"], "nope\njohn@example.com\n");
        assert_eq!(
            responder.respond(&request).unwrap(),
            json!({"name": "John", "email": "john@example.com"})
        );
        assert!(transcript.text().contains("email needs an @"));
    }

    #[test]
    fn test_step_form_stops_when_input_ends() {
        let request = Request::StepForm(StepFormRequest {
            message: String::new(),
            steps: vec![
                Step::new(vec![Field::text("code", "Code", TextOptions::default().default_value("x"))])
                    .title("Code")
                    .validate(|_| Err("never valid".to_string())),
            ],
        });
        let (responder, _) = responder(&[], "");
        let err = responder.respond(&request).unwrap_err();
        assert!(matches!(err, PromptError::InputClosed(ref step) if step == "Code"));
    }

    #[test]
    fn test_wait_for_key_checks_allowed_keys() {
        let (responder, _) = responder(&[], "x\nY\n");
        let request = Request::WaitForKey(WaitForKeyRequest {
            message: "Continue?".to_string(),
            options: WaitForKeyOptions::default().keys(["y", "n"]),
        });
        assert_eq!(responder.respond(&request).unwrap(), json!("Y"));
    }
}
