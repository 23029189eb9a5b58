// src/core/request.rs

//! The closed set of requests an action can make, and the options each one
//! carries. Requests are plain data: they are built by the prompt functions,
//! handed to the active responder once, and never mutated.

use crate::core::{
    arg_convert::{NumberBounds, SelectionBounds, TextConstraints},
    arg_parser::ArgMapping,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::{fmt, sync::Arc, time::Duration};

// --- Validators ---

/// A per-value check: `Ok(())` accepts, `Err(message)` rejects with a reason.
#[derive(Clone)]
pub struct Validator(Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>);

impl Validator {
    pub fn new(check: impl Fn(&Value) -> Result<(), String> + Send + Sync + 'static) -> Self {
        Self(Arc::new(check))
    }

    pub fn check(&self, value: &Value) -> Result<(), String> {
        (self.0)(value)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator(..)")
    }
}

/// A cross-field check run after a step, over every value collected so far.
#[derive(Clone)]
pub struct StepValidator(Arc<dyn Fn(&Map<String, Value>) -> Result<(), String> + Send + Sync>);

impl StepValidator {
    pub fn new(
        check: impl Fn(&Map<String, Value>) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        Self(Arc::new(check))
    }

    pub fn check(&self, values: &Map<String, Value>) -> Result<(), String> {
        (self.0)(values)
    }
}

impl fmt::Debug for StepValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StepValidator(..)")
    }
}

// --- Choices ---

/// One entry of a select or multi-select prompt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choice {
    pub label: String,
    pub value: Value,
    pub description: Option<String>,
}

impl Choice {
    pub fn new(label: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Normalizes a raw value into a choice.
    ///
    /// Objects that already carry `label` and `value` keep that pairing;
    /// anything else becomes `{label: stringified value, value}`.
    pub fn from_value(value: Value) -> Self {
        if let Value::Object(map) = &value
            && let (Some(Value::String(label)), Some(inner)) = (map.get("label"), map.get("value"))
        {
            return Self {
                label: label.clone(),
                value: inner.clone(),
                description: map
                    .get("description")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            };
        }
        Self {
            label: stringify_value(&value),
            value,
            description: None,
        }
    }
}

impl From<&str> for Choice {
    fn from(value: &str) -> Self {
        Self::new(value, value)
    }
}

impl From<String> for Choice {
    fn from(value: String) -> Self {
        Self::new(value.clone(), value)
    }
}

impl From<i64> for Choice {
    fn from(value: i64) -> Self {
        Self::from_value(Value::from(value))
    }
}

impl From<bool> for Choice {
    fn from(value: bool) -> Self {
        Self::from_value(Value::from(value))
    }
}

impl From<Value> for Choice {
    fn from(value: Value) -> Self {
        Self::from_value(value)
    }
}

/// Converts any list of choice-like items, keeping the input order.
pub fn normalize_choices<I, C>(items: I) -> Vec<Choice>
where
    I: IntoIterator<Item = C>,
    C: Into<Choice>,
{
    items.into_iter().map(Into::into).collect()
}

/// Renders a value the way it appears in labels and on the command line:
/// strings unquoted, everything else as compact JSON.
pub fn stringify_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// --- Options ---

/// Adds the `arg`/`arg_short`/`arg_index` builders to an options struct.
macro_rules! impl_arg_mapping_builders {
    ($($options:ty),+ $(,)?) => {
        $(
            impl $options {
                /// Lets `--<name>` answer this prompt in headless mode.
                pub fn arg(mut self, name: impl Into<String>) -> Self {
                    self.arg.long = Some(name.into());
                    self
                }

                /// Lets `-<name>` answer this prompt in headless mode.
                pub fn arg_short(mut self, name: impl Into<String>) -> Self {
                    self.arg.short = Some(name.into());
                    self
                }

                /// Lets the positional argument at `index` answer this prompt.
                pub fn arg_index(mut self, index: usize) -> Self {
                    self.arg.index = Some(index);
                    self
                }

                /// Help text shown next to the flag.
                pub fn description(mut self, description: impl Into<String>) -> Self {
                    self.description = Some(description.into());
                    self
                }
            }
        )+
    };
}

impl_arg_mapping_builders!(
    TextOptions,
    NumberOptions,
    PasswordOptions,
    ConfirmOptions,
    SelectOptions,
    MultiSelectOptions,
);

#[derive(Debug, Clone, Default)]
pub struct TextOptions {
    pub default_value: Option<String>,
    pub placeholder: Option<String>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
    pub validate: Option<Validator>,
    pub arg: ArgMapping,
    pub description: Option<String>,
}

impl TextOptions {
    /// Answer used when the input is left empty or has ended.
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Hint shown in an empty input.
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Minimum length in characters.
    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    /// Maximum length in characters.
    pub fn max_length(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }

    /// Regular expression the whole answer must match.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Extra check run after the built-in constraints.
    pub fn validate(
        mut self,
        check: impl Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.validate = Some(Validator::new(check));
        self
    }

    pub fn constraints(&self) -> TextConstraints {
        TextConstraints {
            min_length: self.min_length,
            max_length: self.max_length,
            pattern: self.pattern.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NumberOptions {
    pub default_value: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
    pub validate: Option<Validator>,
    pub arg: ArgMapping,
    pub description: Option<String>,
}

impl NumberOptions {
    pub fn default_value(mut self, value: f64) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Inclusive lower bound.
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Inclusive upper bound.
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Increment a terminal front-end may use for arrow keys.
    pub fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    pub fn validate(
        mut self,
        check: impl Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.validate = Some(Validator::new(check));
        self
    }

    pub fn bounds(&self) -> NumberBounds {
        NumberBounds {
            min: self.min,
            max: self.max,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PasswordOptions {
    pub mask: Option<char>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub validate: Option<Validator>,
    pub arg: ArgMapping,
    pub description: Option<String>,
}

impl PasswordOptions {
    /// Character echoed in place of each typed one.
    pub fn mask(mut self, mask: char) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn min_length(mut self, length: usize) -> Self {
        self.min_length = Some(length);
        self
    }

    pub fn max_length(mut self, length: usize) -> Self {
        self.max_length = Some(length);
        self
    }

    pub fn validate(
        mut self,
        check: impl Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.validate = Some(Validator::new(check));
        self
    }

    pub fn constraints(&self) -> TextConstraints {
        TextConstraints {
            min_length: self.min_length,
            max_length: self.max_length,
            pattern: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConfirmOptions {
    pub default_value: Option<bool>,
    pub arg: ArgMapping,
    pub description: Option<String>,
}

impl ConfirmOptions {
    pub fn default_value(mut self, value: bool) -> Self {
        self.default_value = Some(value);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectOptions {
    pub default_value: Option<Value>,
    pub arg: ArgMapping,
    pub description: Option<String>,
}

impl SelectOptions {
    /// Choice value preselected, matched against each choice's value.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct MultiSelectOptions {
    pub default_values: Vec<Value>,
    pub min_selected: Option<usize>,
    pub max_selected: Option<usize>,
    pub arg: ArgMapping,
    pub description: Option<String>,
}

impl MultiSelectOptions {
    /// Choice values checked up front.
    pub fn default_values<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.default_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn min_selected(mut self, count: usize) -> Self {
        self.min_selected = Some(count);
        self
    }

    pub fn max_selected(mut self, count: usize) -> Self {
        self.max_selected = Some(count);
        self
    }

    pub fn bounds(&self) -> SelectionBounds {
        SelectionBounds {
            min: self.min_selected,
            max: self.max_selected,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WaitForKeyOptions {
    /// Keys that end the wait. Empty means any key.
    pub keys: Vec<String>,
    /// Advisory only; a responder may ignore it.
    pub timeout: Option<Duration>,
}

impl WaitForKeyOptions {
    pub fn keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

// --- Requests ---

#[derive(Debug, Clone)]
pub struct TextRequest {
    pub message: String,
    pub options: TextOptions,
}

#[derive(Debug, Clone)]
pub struct NumberRequest {
    pub message: String,
    pub options: NumberOptions,
}

#[derive(Debug, Clone)]
pub struct PasswordRequest {
    pub message: String,
    pub options: PasswordOptions,
}

#[derive(Debug, Clone)]
pub struct ConfirmRequest {
    pub message: String,
    pub options: ConfirmOptions,
}

#[derive(Debug, Clone)]
pub struct SelectRequest {
    pub message: String,
    pub choices: Vec<Choice>,
    pub options: SelectOptions,
}

#[derive(Debug, Clone)]
pub struct MultiSelectRequest {
    pub message: String,
    pub choices: Vec<Choice>,
    pub options: MultiSelectOptions,
}

#[derive(Debug, Clone)]
pub struct WaitForEnterRequest {
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct WaitForKeyRequest {
    pub message: String,
    pub options: WaitForKeyOptions,
}

#[derive(Debug, Clone)]
pub struct FormRequest {
    pub message: String,
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone)]
pub struct StepFormRequest {
    pub message: String,
    pub steps: Vec<Step>,
}

/// Tag identifying a request variant without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Text,
    Number,
    Password,
    Confirm,
    Select,
    MultiSelect,
    WaitForEnter,
    WaitForKey,
    Form,
    StepForm,
}

impl RequestKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Password => "password",
            Self::Confirm => "confirm",
            Self::Select => "select",
            Self::MultiSelect => "multi_select",
            Self::WaitForEnter => "wait_for_enter",
            Self::WaitForKey => "wait_for_key",
            Self::Form => "form",
            Self::StepForm => "step_form",
        }
    }

    /// Maps a prompt method name, in either camelCase or snake_case.
    pub fn from_method(method: &str) -> Option<Self> {
        match method {
            "text" => Some(Self::Text),
            "number" => Some(Self::Number),
            "password" => Some(Self::Password),
            "confirm" => Some(Self::Confirm),
            "select" => Some(Self::Select),
            "multiSelect" | "multi_select" => Some(Self::MultiSelect),
            "waitForEnter" | "wait_for_enter" => Some(Self::WaitForEnter),
            "waitForKey" | "wait_for_key" => Some(Self::WaitForKey),
            "form" => Some(Self::Form),
            "stepForm" | "step_form" => Some(Self::StepForm),
            _ => None,
        }
    }

    pub fn is_composite(self) -> bool {
        matches!(self, Self::Form | Self::StepForm)
    }
}

/// A typed ask for a value, resolved exactly once by the active responder.
#[derive(Debug, Clone)]
pub enum Request {
    Text(TextRequest),
    Number(NumberRequest),
    Password(PasswordRequest),
    Confirm(ConfirmRequest),
    Select(SelectRequest),
    MultiSelect(MultiSelectRequest),
    WaitForEnter(WaitForEnterRequest),
    WaitForKey(WaitForKeyRequest),
    Form(FormRequest),
    StepForm(StepFormRequest),
}

impl Request {
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::Text(_) => RequestKind::Text,
            Self::Number(_) => RequestKind::Number,
            Self::Password(_) => RequestKind::Password,
            Self::Confirm(_) => RequestKind::Confirm,
            Self::Select(_) => RequestKind::Select,
            Self::MultiSelect(_) => RequestKind::MultiSelect,
            Self::WaitForEnter(_) => RequestKind::WaitForEnter,
            Self::WaitForKey(_) => RequestKind::WaitForKey,
            Self::Form(_) => RequestKind::Form,
            Self::StepForm(_) => RequestKind::StepForm,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Text(r) => &r.message,
            Self::Number(r) => &r.message,
            Self::Password(r) => &r.message,
            Self::Confirm(r) => &r.message,
            Self::Select(r) => &r.message,
            Self::MultiSelect(r) => &r.message,
            Self::WaitForEnter(r) => &r.message,
            Self::WaitForKey(r) => &r.message,
            Self::Form(r) => &r.message,
            Self::StepForm(r) => &r.message,
        }
    }

    /// The flag mapping, for the variants that can be answered from the command line.
    pub fn arg_mapping(&self) -> Option<&ArgMapping> {
        let mapping = match self {
            Self::Text(r) => &r.options.arg,
            Self::Number(r) => &r.options.arg,
            Self::Password(r) => &r.options.arg,
            Self::Confirm(r) => &r.options.arg,
            Self::Select(r) => &r.options.arg,
            Self::MultiSelect(r) => &r.options.arg,
            _ => return None,
        };
        (!mapping.is_empty()).then_some(mapping)
    }

    /// Help text of a primitive request. The line fallback prints it above
    /// the prompt.
    pub fn description(&self) -> Option<&str> {
        match self {
            Self::Text(r) => r.options.description.as_deref(),
            Self::Number(r) => r.options.description.as_deref(),
            Self::Password(r) => r.options.description.as_deref(),
            Self::Confirm(r) => r.options.description.as_deref(),
            Self::Select(r) => r.options.description.as_deref(),
            Self::MultiSelect(r) => r.options.description.as_deref(),
            _ => None,
        }
    }
}

// --- Forms ---

/// One input of a form. Its request is always a primitive variant.
#[derive(Debug, Clone)]
pub struct Field {
    pub key: String,
    pub request: Request,
}

impl Field {
    pub fn text(key: impl Into<String>, message: impl Into<String>, options: TextOptions) -> Self {
        Self::new(key, Request::Text(TextRequest { message: message.into(), options }))
    }

    pub fn number(
        key: impl Into<String>,
        message: impl Into<String>,
        options: NumberOptions,
    ) -> Self {
        Self::new(key, Request::Number(NumberRequest { message: message.into(), options }))
    }

    pub fn password(
        key: impl Into<String>,
        message: impl Into<String>,
        options: PasswordOptions,
    ) -> Self {
        Self::new(key, Request::Password(PasswordRequest { message: message.into(), options }))
    }

    pub fn confirm(
        key: impl Into<String>,
        message: impl Into<String>,
        options: ConfirmOptions,
    ) -> Self {
        Self::new(key, Request::Confirm(ConfirmRequest { message: message.into(), options }))
    }

    pub fn select<I, C>(
        key: impl Into<String>,
        message: impl Into<String>,
        choices: I,
        options: SelectOptions,
    ) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Choice>,
    {
        Self::new(
            key,
            Request::Select(SelectRequest {
                message: message.into(),
                choices: normalize_choices(choices),
                options,
            }),
        )
    }

    pub fn multi_select<I, C>(
        key: impl Into<String>,
        message: impl Into<String>,
        choices: I,
        options: MultiSelectOptions,
    ) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Choice>,
    {
        Self::new(
            key,
            Request::MultiSelect(MultiSelectRequest {
                message: message.into(),
                choices: normalize_choices(choices),
                options,
            }),
        )
    }

    fn new(key: impl Into<String>, request: Request) -> Self {
        Self {
            key: key.into(),
            request,
        }
    }
}

/// A page of a multi-step form.
#[derive(Debug, Clone, Default)]
pub struct Step {
    pub title: Option<String>,
    pub description: Option<String>,
    pub fields: Vec<Field>,
    pub validate: Option<StepValidator>,
}

impl Step {
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            fields,
            ..Self::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validate(
        mut self,
        check: impl Fn(&Map<String, Value>) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.validate = Some(StepValidator::new(check));
        self
    }
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_choices_keeps_order_and_stringifies() {
        let choices = normalize_choices(vec![json!(3), json!("two"), json!(true)]);
        let labels: Vec<_> = choices.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["3", "two", "true"]);
        assert_eq!(choices[0].value, json!(3));
    }

    #[test]
    fn test_choice_from_labelled_object() {
        let choice = Choice::from_value(json!({"label": "Prod", "value": "prod", "description": "live"}));
        assert_eq!(choice.label, "Prod");
        assert_eq!(choice.value, json!("prod"));
        assert_eq!(choice.description.as_deref(), Some("live"));

        // Objects without the pairing are bare values.
        let bare = Choice::from_value(json!({"name": "x"}));
        assert_eq!(bare.label, r#"{"name":"x"}"#);
    }

    #[test]
    fn test_request_arg_mapping_only_for_mapped_primitives() {
        let mapped = Request::Text(TextRequest {
            message: "Name?".into(),
            options: TextOptions::default().arg("name").arg_short("n"),
        });
        let mapping = mapped.arg_mapping().unwrap();
        assert_eq!(mapping.long.as_deref(), Some("name"));
        assert_eq!(mapping.short.as_deref(), Some("n"));

        let unmapped = Request::Confirm(ConfirmRequest {
            message: "Sure?".into(),
            options: ConfirmOptions::default(),
        });
        assert!(unmapped.arg_mapping().is_none());

        let enter = Request::WaitForEnter(WaitForEnterRequest {
            message: "Press enter".into(),
        });
        assert!(enter.arg_mapping().is_none());
        assert_eq!(enter.kind().as_str(), "wait_for_enter");
    }

    #[test]
    fn test_request_kind_from_method() {
        assert_eq!(RequestKind::from_method("multiSelect"), Some(RequestKind::MultiSelect));
        assert_eq!(RequestKind::from_method("multi_select"), Some(RequestKind::MultiSelect));
        assert_eq!(RequestKind::from_method("spinner"), None);
        assert!(RequestKind::StepForm.is_composite());
    }
}
