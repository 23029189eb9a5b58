// src/core/prompt.rs

//! Prompt construction functions.
//!
//! Each function checks its own static invariants, builds a `Request` and
//! hands it to the active responder. None of them knows how the value will be
//! produced, so interactive and headless modes share identical semantics.

use crate::core::arg_convert::ArgValidationError;
use crate::core::request::{
    Choice, ConfirmOptions, ConfirmRequest, Field, FormRequest, MultiSelectOptions, MultiSelectRequest,
    NumberOptions, NumberRequest, PasswordOptions, PasswordRequest, Request, SelectOptions,
    SelectRequest, Step, StepFormRequest, TextOptions, TextRequest, WaitForEnterRequest,
    WaitForKeyOptions, WaitForKeyRequest, normalize_choices,
};
use crate::state;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// Failures raised while constructing or resolving a prompt.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("No responder is configured to answer prompts")]
    NoResponderConfigured,

    #[error("A selection prompt needs at least one choice")]
    EmptyChoiceSet,

    #[error("A step form needs at least one step")]
    EmptyStepList,

    #[error("The responder cannot be replaced while a prompt is waiting for it")]
    ResponderBusy,

    #[error("Argument validation failed")]
    ArgValidation(#[from] ArgValidationError),

    #[error("Input ended before '{0}' was answered")]
    InputClosed(String),

    #[error("Form field '{key}' must be a primitive prompt, found '{kind}'")]
    NestedComposite { key: String, kind: &'static str },

    #[error("The responder answered '{kind}' with an unexpected value: {source}")]
    UnexpectedValue {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error while prompting")]
    Io(#[from] std::io::Error),

    #[error("Interactive prompt failed: {0}")]
    Interaction(String),
}

impl PromptError {
    /// The validation failure behind this error, if any.
    pub fn arg_validation(&self) -> Option<&ArgValidationError> {
        match self {
            Self::ArgValidation(e) => Some(e),
            _ => None,
        }
    }
}

fn resolve_as<T: DeserializeOwned>(request: &Request) -> Result<T, PromptError> {
    let value = state::resolve(request)?;
    serde_json::from_value(value).map_err(|source| PromptError::UnexpectedValue {
        kind: request.kind().as_str(),
        source,
    })
}

// --- Primitive prompts ---

pub fn text(message: impl Into<String>, options: TextOptions) -> Result<String, PromptError> {
    resolve_as(&Request::Text(TextRequest {
        message: message.into(),
        options,
    }))
}

pub fn number(message: impl Into<String>, options: NumberOptions) -> Result<f64, PromptError> {
    resolve_as(&Request::Number(NumberRequest {
        message: message.into(),
        options,
    }))
}

pub fn password(
    message: impl Into<String>,
    options: PasswordOptions,
) -> Result<String, PromptError> {
    resolve_as(&Request::Password(PasswordRequest {
        message: message.into(),
        options,
    }))
}

pub fn confirm(message: impl Into<String>, options: ConfirmOptions) -> Result<bool, PromptError> {
    resolve_as(&Request::Confirm(ConfirmRequest {
        message: message.into(),
        options,
    }))
}

/// Asks for one of `choices`. Bare values are normalised into
/// `{label, value}` pairs in input order; the result is the chosen value.
pub fn select<T, I, C>(
    message: impl Into<String>,
    choices: I,
    options: SelectOptions,
) -> Result<T, PromptError>
where
    T: DeserializeOwned,
    I: IntoIterator<Item = C>,
    C: Into<Choice>,
{
    let choices = normalize_choices(choices);
    if choices.is_empty() {
        return Err(PromptError::EmptyChoiceSet);
    }
    resolve_as(&Request::Select(SelectRequest {
        message: message.into(),
        choices,
        options,
    }))
}

pub fn multi_select<T, I, C>(
    message: impl Into<String>,
    choices: I,
    options: MultiSelectOptions,
) -> Result<Vec<T>, PromptError>
where
    T: DeserializeOwned,
    I: IntoIterator<Item = C>,
    C: Into<Choice>,
{
    let choices = normalize_choices(choices);
    if choices.is_empty() {
        return Err(PromptError::EmptyChoiceSet);
    }
    resolve_as(&Request::MultiSelect(MultiSelectRequest {
        message: message.into(),
        choices,
        options,
    }))
}

pub fn wait_for_enter(message: impl Into<String>) -> Result<(), PromptError> {
    state::resolve(&Request::WaitForEnter(WaitForEnterRequest {
        message: message.into(),
    }))
    .map(drop)
}

/// Blocks until a key is pressed and returns its name.
pub fn wait_for_key(
    message: impl Into<String>,
    options: WaitForKeyOptions,
) -> Result<String, PromptError> {
    resolve_as(&Request::WaitForKey(WaitForKeyRequest {
        message: message.into(),
        options,
    }))
}

// --- Composite prompts ---

/// A single-page form. The responder answers with an object keyed by field.
pub fn form<T: DeserializeOwned>(
    message: impl Into<String>,
    fields: Vec<Field>,
) -> Result<T, PromptError> {
    ensure_primitive_fields(&fields)?;
    resolve_as(&Request::Form(FormRequest {
        message: message.into(),
        fields,
    }))
}

/// A multi-step form. Values from every step are merged, in declaration
/// order, into one object keyed by field.
pub fn step_form<T: DeserializeOwned>(
    message: impl Into<String>,
    steps: Vec<Step>,
) -> Result<T, PromptError> {
    if steps.is_empty() {
        return Err(PromptError::EmptyStepList);
    }
    for step in &steps {
        ensure_primitive_fields(&step.fields)?;
    }
    resolve_as(&Request::StepForm(StepFormRequest {
        message: message.into(),
        steps,
    }))
}

fn ensure_primitive_fields(fields: &[Field]) -> Result<(), PromptError> {
    for field in fields {
        let kind = field.request.kind();
        if kind.is_composite() {
            return Err(PromptError::NestedComposite {
                key: field.key.clone(),
                kind: kind.as_str(),
            });
        }
        if let Request::Select(r) = &field.request
            && r.choices.is_empty()
        {
            return Err(PromptError::EmptyChoiceSet);
        }
        if let Request::MultiSelect(r) = &field.request
            && r.choices.is_empty()
        {
            return Err(PromptError::EmptyChoiceSet);
        }
    }
    Ok(())
}

// --- Handle ---

/// The prompt namespace handed to actions as `ctx.prompt`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Prompts;

impl Prompts {
    pub fn text(&self, message: impl Into<String>, options: TextOptions) -> Result<String, PromptError> {
        text(message, options)
    }

    pub fn number(&self, message: impl Into<String>, options: NumberOptions) -> Result<f64, PromptError> {
        number(message, options)
    }

    pub fn password(
        &self,
        message: impl Into<String>,
        options: PasswordOptions,
    ) -> Result<String, PromptError> {
        password(message, options)
    }

    pub fn confirm(&self, message: impl Into<String>, options: ConfirmOptions) -> Result<bool, PromptError> {
        confirm(message, options)
    }

    pub fn select<T, I, C>(
        &self,
        message: impl Into<String>,
        choices: I,
        options: SelectOptions,
    ) -> Result<T, PromptError>
    where
        T: DeserializeOwned,
        I: IntoIterator<Item = C>,
        C: Into<Choice>,
    {
        select(message, choices, options)
    }

    pub fn multi_select<T, I, C>(
        &self,
        message: impl Into<String>,
        choices: I,
        options: MultiSelectOptions,
    ) -> Result<Vec<T>, PromptError>
    where
        T: DeserializeOwned,
        I: IntoIterator<Item = C>,
        C: Into<Choice>,
    {
        multi_select(message, choices, options)
    }

    pub fn wait_for_enter(&self, message: impl Into<String>) -> Result<(), PromptError> {
        wait_for_enter(message)
    }

    pub fn wait_for_key(
        &self,
        message: impl Into<String>,
        options: WaitForKeyOptions,
    ) -> Result<String, PromptError> {
        wait_for_key(message, options)
    }

    pub fn form<T: DeserializeOwned>(
        &self,
        message: impl Into<String>,
        fields: Vec<Field>,
    ) -> Result<T, PromptError> {
        form(message, fields)
    }

    pub fn step_form<T: DeserializeOwned>(
        &self,
        message: impl Into<String>,
        steps: Vec<Step>,
    ) -> Result<T, PromptError> {
        step_form(message, steps)
    }
}

/// Matches a resolved value back to the choice it came from, if any.
pub fn find_choice<'a>(choices: &'a [Choice], value: &Value) -> Option<&'a Choice> {
    choices.iter().find(|choice| &choice.value == value)
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{self, test_lock};
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_select_with_no_choices_fails_before_resolving() {
        let _lock = test_lock();
        let calls = Arc::new(Mutex::new(0));
        let seen = Arc::clone(&calls);
        state::set_responder(move |_: &Request| {
            *seen.lock().unwrap() += 1;
            Ok::<_, PromptError>(json!("x"))
        })
        .unwrap();

        let empty: Vec<&str> = Vec::new();
        let result: Result<String, _> = select("Pick", empty.clone(), SelectOptions::default());
        assert!(matches!(result, Err(PromptError::EmptyChoiceSet)));
        let multi: Result<Vec<String>, _> =
            multi_select("Pick", empty, MultiSelectOptions::default());
        assert!(matches!(multi, Err(PromptError::EmptyChoiceSet)));
        let steps: Result<Value, _> = step_form("Wizard", Vec::new());
        assert!(matches!(steps, Err(PromptError::EmptyStepList)));

        assert_eq!(*calls.lock().unwrap(), 0);
        state::clear_responder().unwrap();
    }

    #[test]
    fn test_select_resolves_value_from_normalised_choices() {
        let _lock = test_lock();
        state::set_responder(|request: &Request| -> Result<Value, PromptError> {
            match request {
                Request::Select(r) => Ok(r.choices[1].value.clone()),
                Request::MultiSelect(r) => Ok(json!([r.choices[0].value, r.choices[2].value])),
                _ => Ok(Value::Null),
            }
        })
        .unwrap();

        let picked: i64 = select("Pick", vec![json!(10), json!(20), json!(30)], SelectOptions::default()).unwrap();
        assert_eq!(picked, 20);

        let picked: Vec<String> =
            multi_select("Pick", ["a", "b", "c"], MultiSelectOptions::default()).unwrap();
        assert_eq!(picked, vec!["a", "c"]);
        state::clear_responder().unwrap();
    }

    #[test]
    fn test_unexpected_value_type_is_reported() {
        let _lock = test_lock();
        state::set_responder(|_: &Request| Ok::<_, PromptError>(json!("not a number"))).unwrap();
        let err = number("How many?", NumberOptions::default()).unwrap_err();
        assert!(matches!(err, PromptError::UnexpectedValue { kind: "number", .. }));
        state::clear_responder().unwrap();
    }

    #[test]
    fn test_form_rejects_nested_composites_and_deserializes() {
        #[derive(Deserialize)]
        struct Answers {
            name: String,
            age: f64,
        }

        let _lock = test_lock();
        state::set_responder(|_: &Request| Ok::<_, PromptError>(json!({"name": "Ada", "age": 36}))).unwrap();

        let answers: Answers = form(
            "Profile",
            vec![
                Field::text("name", "Name", TextOptions::default()),
                Field::number("age", "Age", NumberOptions::default()),
            ],
        )
        .unwrap();
        assert_eq!(answers.name, "Ada");
        assert_eq!(answers.age, 36.0);

        let nested = Field {
            key: "inner".to_string(),
            request: Request::Form(FormRequest {
                message: "Inner".to_string(),
                fields: Vec::new(),
            }),
        };
        let err = form::<Value>("Outer", vec![nested]).unwrap_err();
        assert!(matches!(err, PromptError::NestedComposite { .. }));
        state::clear_responder().unwrap();
    }
}
