// src/system/interactive.rs

//! Terminal responder built on `dialoguer`. Used by the binary when stdin and
//! stderr are attached to a terminal.

use crate::core::prompt::PromptError;
use crate::core::request::{
    Choice, ConfirmRequest, FormRequest, MultiSelectRequest, NumberRequest, PasswordRequest,
    Request, SelectRequest, StepFormRequest, TextRequest, WaitForKeyRequest,
};
use crate::state::Responder;
use crate::system::headless::convert_answer;
use console::{Key, Term};
use dialoguer::{Confirm, Input, MultiSelect, Password, Select, theme::ColorfulTheme};
use serde_json::{Map, Value};

/// Renders every request as a `dialoguer` prompt on stderr.
#[derive(Debug, Clone)]
pub struct InteractiveResponder {
    term: Term,
}

impl Default for InteractiveResponder {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractiveResponder {
    pub fn new() -> Self {
        Self { term: Term::stderr() }
    }

    fn text(&self, request: &TextRequest) -> Result<Value, PromptError> {
        let prompt = Request::Text(request.clone());
        let theme = ColorfulTheme::default();
        let answer = input(&theme, &request.message, request.options.default_value.clone())
            .allow_empty(true)
            .validate_with(|raw: &String| check(&prompt, raw))
            .interact_text_on(&self.term)
            .map_err(interaction)?;
        Ok(Value::String(answer))
    }

    fn number(&self, request: &NumberRequest) -> Result<Value, PromptError> {
        let prompt = Request::Number(request.clone());
        let theme = ColorfulTheme::default();
        let default = request.options.default_value.map(|value| value.to_string());
        let answer = input(&theme, &request.message, default)
            .validate_with(|raw: &String| check(&prompt, raw))
            .interact_text_on(&self.term)
            .map_err(interaction)?;
        convert_answer(&prompt, &answer, &request.message).map_err(PromptError::from)
    }

    fn password(&self, request: &PasswordRequest) -> Result<Value, PromptError> {
        let prompt = Request::Password(request.clone());
        let answer = Password::with_theme(&ColorfulTheme::default())
            .with_prompt(&request.message)
            .allow_empty_password(true)
            .validate_with(|raw: &String| check(&prompt, raw))
            .interact_on(&self.term)
            .map_err(interaction)?;
        Ok(Value::String(answer))
    }

    fn confirm(&self, request: &ConfirmRequest) -> Result<Value, PromptError> {
        let answer = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(&request.message)
            .default(request.options.default_value.unwrap_or(false))
            .show_default(request.options.default_value.is_some())
            .interact_on(&self.term)
            .map_err(interaction)?;
        Ok(Value::Bool(answer))
    }

    fn select(&self, request: &SelectRequest) -> Result<Value, PromptError> {
        let default = request
            .options
            .default_value
            .as_ref()
            .and_then(|value| request.choices.iter().position(|c| &c.value == value))
            .unwrap_or(0);
        let index = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(&request.message)
            .items(&labels(&request.choices))
            .default(default)
            .interact_on(&self.term)
            .map_err(interaction)?;
        request
            .choices
            .get(index)
            .map(|choice| choice.value.clone())
            .ok_or(PromptError::EmptyChoiceSet)
    }

    fn multi_select(&self, request: &MultiSelectRequest) -> Result<Value, PromptError> {
        let defaults: Vec<bool> = request
            .choices
            .iter()
            .map(|choice| request.options.default_values.contains(&choice.value))
            .collect();
        let bounds = request.options.bounds();

        loop {
            let picked = MultiSelect::with_theme(&ColorfulTheme::default())
                .with_prompt(&request.message)
                .items(&labels(&request.choices))
                .defaults(&defaults)
                .interact_on(&self.term)
                .map_err(interaction)?;

            let too_few = bounds.min.is_some_and(|min| picked.len() < min);
            let too_many = bounds.max.is_some_and(|max| picked.len() > max);
            if too_few || too_many {
                let message = format!(
                    t!("interactive.selection_count"),
                    min = bounds.min.unwrap_or(0),
                    max = bounds.max.map_or_else(|| String::from("-"), |m| m.to_string())
                );
                self.term.write_line(&message)?;
                continue;
            }

            let values = picked
                .into_iter()
                .filter_map(|index| request.choices.get(index))
                .map(|choice| choice.value.clone())
                .collect();
            return Ok(Value::Array(values));
        }
    }

    fn wait_for_key(&self, request: &WaitForKeyRequest) -> Result<Value, PromptError> {
        let keys = &request.options.keys;
        if keys.is_empty() {
            self.term.write_line(&request.message)?;
        } else {
            self.term
                .write_line(&format!("{} [{}]", request.message, keys.join("/")))?;
        }
        // The timeout is advisory; `read_key` has no deadline.
        loop {
            let key = key_name(self.term.read_key()?);
            if keys.is_empty() || keys.iter().any(|k| k.eq_ignore_ascii_case(&key)) {
                return Ok(Value::String(key));
            }
        }
    }

    fn form(&self, request: &FormRequest) -> Result<Value, PromptError> {
        if !request.message.is_empty() {
            self.term.write_line(&request.message)?;
        }
        let mut values = Map::new();
        for field in &request.fields {
            values.insert(field.key.clone(), self.respond(&field.request)?);
        }
        Ok(Value::Object(values))
    }

    fn step_form(&self, request: &StepFormRequest) -> Result<Value, PromptError> {
        if !request.message.is_empty() {
            self.term.write_line(&request.message)?;
        }
        let total = request.steps.len();
        let mut merged = Map::new();

        for (number, step) in (1..).zip(&request.steps) {
            let mut header = format!(t!("headless.step_header"), number = number, total = total);
            if let Some(title) = &step.title {
                header = format!("{}: {}", header, title);
            }
            self.term.write_line(&header)?;
            if let Some(description) = &step.description {
                self.term.write_line(description)?;
            }

            loop {
                let mut candidate = merged.clone();
                for field in &step.fields {
                    candidate.insert(field.key.clone(), self.respond(&field.request)?);
                }
                match step.validate.as_ref().map_or(Ok(()), |v| v.check(&candidate)) {
                    Ok(()) => {
                        merged = candidate;
                        break;
                    }
                    Err(reason) => self.term.write_line(&format!("  ! {}", reason))?,
                }
            }
        }
        Ok(Value::Object(merged))
    }
}

impl Responder for InteractiveResponder {
    fn respond(&self, request: &Request) -> Result<Value, PromptError> {
        match request {
            Request::Text(r) => self.text(r),
            Request::Number(r) => self.number(r),
            Request::Password(r) => self.password(r),
            Request::Confirm(r) => self.confirm(r),
            Request::Select(r) => self.select(r),
            Request::MultiSelect(r) => self.multi_select(r),
            Request::WaitForEnter(r) => {
                self.term
                    .write_str(&format!("{} {} ", r.message, t!("headless.press_enter")))?;
                self.term.read_line()?;
                Ok(Value::Null)
            }
            Request::WaitForKey(r) => self.wait_for_key(r),
            Request::Form(r) => self.form(r),
            Request::StepForm(r) => self.step_form(r),
        }
    }
}

/// A line input borrowing `theme`, pre-filled with `default` when given.
fn input<'a>(theme: &'a ColorfulTheme, message: &str, default: Option<String>) -> Input<'a, String> {
    let input = Input::with_theme(theme).with_prompt(message);
    match default {
        Some(default) => input.default(default),
        None => input,
    }
}

/// Runs the same checks a headless answer goes through, as a `dialoguer`
/// validator.
fn check(request: &Request, raw: &str) -> Result<(), String> {
    convert_answer(request, raw, request.message())
        .map(drop)
        .map_err(|e| e.reason)
}

fn labels(choices: &[Choice]) -> Vec<String> {
    choices
        .iter()
        .map(|choice| match &choice.description {
            Some(description) => format!("{} - {}", choice.label, description),
            None => choice.label.clone(),
        })
        .collect()
}

fn key_name(key: Key) -> String {
    match key {
        Key::Enter => String::from("enter"),
        Key::Escape => String::from("escape"),
        Key::Tab => String::from("tab"),
        Key::Backspace => String::from("backspace"),
        Key::ArrowUp => String::from("up"),
        Key::ArrowDown => String::from("down"),
        Key::ArrowLeft => String::from("left"),
        Key::ArrowRight => String::from("right"),
        Key::Char(' ') => String::from("space"),
        Key::Char(c) => c.to_string(),
        other => format!("{:?}", other).to_lowercase(),
    }
}

fn interaction(error: dialoguer::Error) -> PromptError {
    PromptError::Interaction(error.to_string())
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::request::{NumberOptions, TextOptions, normalize_choices};

    #[test]
    fn test_check_reuses_headless_conversion() {
        let number = Request::Number(NumberRequest {
            message: "Age".to_string(),
            options: NumberOptions::default().min(18.0),
        });
        assert!(check(&number, "30").is_ok());
        assert_eq!(check(&number, "12").unwrap_err(), "must be at least 18");
        assert_eq!(check(&number, "old").unwrap_err(), "expected a number");

        let text = Request::Text(TextRequest {
            message: "Code".to_string(),
            options: TextOptions::default().pattern("^[A-Z]{3}$"),
        });
        assert!(check(&text, "ABC").is_ok());
        assert!(check(&text, "abc").is_err());
    }

    #[test]
    fn test_inputs_outlive_their_builder_chain() {
        let theme = ColorfulTheme::default();
        let prompt = Request::Text(TextRequest {
            message: "Name".to_string(),
            options: TextOptions::default(),
        });
        let plain = input(&theme, "Name", None).allow_empty(true);
        let prefilled = input(&theme, "Count", Some("3".to_string()))
            .validate_with(|raw: &String| check(&prompt, raw));
        drop((plain, prefilled));
    }

    #[test]
    fn test_labels_and_key_names() {
        let choices = vec![
            Choice::new("Staging", "stg").with_description("pre-production"),
            normalize_choices(["prod"]).remove(0),
        ];
        assert_eq!(labels(&choices), vec!["Staging - pre-production", "prod"]);
        assert_eq!(key_name(Key::Enter), "enter");
        assert_eq!(key_name(Key::Char('y')), "y");
        assert_eq!(key_name(Key::Char(' ')), "space");
    }
}
