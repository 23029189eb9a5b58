// src/core/arg_convert.rs

//! Converts raw command-line strings into typed prompt values, applying the
//! same bounds, patterns and choice sets an interactive prompt would.

use crate::core::request::{Choice, stringify_value};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// A supplied value that failed type, range, pattern or choice validation.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("Invalid value '{value}' for {arg_name}: {reason}{}", format_valid_options(.valid_options))]
pub struct ArgValidationError {
    pub arg_name: String,
    pub value: String,
    pub reason: String,
    pub valid_options: Option<Vec<String>>,
}

impl ArgValidationError {
    pub fn new(arg_name: &str, value: &str, reason: impl Into<String>) -> Self {
        Self {
            arg_name: arg_name.to_string(),
            value: value.to_string(),
            reason: reason.into(),
            valid_options: None,
        }
    }

    pub fn with_valid_options(mut self, options: Vec<String>) -> Self {
        self.valid_options = Some(options);
        self
    }
}

fn format_valid_options(options: &Option<Vec<String>>) -> String {
    match options {
        Some(options) if !options.is_empty() => format!(" (valid options: {})", options.join(", ")),
        _ => String::new(),
    }
}

/// Inclusive numeric range for number prompts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NumberBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Length and pattern limits for text and password prompts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TextConstraints {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
}

/// How many entries a multi-select answer may contain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SelectionBounds {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

pub fn convert_to_number(
    value: &str,
    arg_name: &str,
    bounds: &NumberBounds,
) -> Result<f64, ArgValidationError> {
    let number = value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| ArgValidationError::new(arg_name, value, "expected a number"))?;

    if let Some(min) = bounds.min
        && number < min
    {
        return Err(ArgValidationError::new(
            arg_name,
            value,
            format!("must be at least {}", min),
        ));
    }
    if let Some(max) = bounds.max
        && number > max
    {
        return Err(ArgValidationError::new(
            arg_name,
            value,
            format!("must be at most {}", max),
        ));
    }
    Ok(number)
}

const TRUE_WORDS: [&str; 5] = ["true", "yes", "y", "1", "on"];
const FALSE_WORDS: [&str; 5] = ["false", "no", "n", "0", "off"];

pub fn convert_to_boolean(value: &str, arg_name: &str) -> Result<bool, ArgValidationError> {
    let normalized = value.trim().to_lowercase();
    if TRUE_WORDS.contains(&normalized.as_str()) {
        Ok(true)
    } else if FALSE_WORDS.contains(&normalized.as_str()) {
        Ok(false)
    } else {
        Err(ArgValidationError::new(arg_name, value, "expected a yes/no value")
            .with_valid_options(vec!["true".to_string(), "false".to_string()]))
    }
}

/// Finds the choice whose label or stringified value equals `value`.
pub fn convert_to_select_value(
    value: &str,
    arg_name: &str,
    choices: &[Choice],
) -> Result<Value, ArgValidationError> {
    let wanted = value.trim();
    choices
        .iter()
        .find(|choice| choice.label == wanted || stringify_value(&choice.value) == wanted)
        .map(|choice| choice.value.clone())
        .ok_or_else(|| {
            ArgValidationError::new(arg_name, value, "does not match any choice")
                .with_valid_options(choice_labels(choices))
        })
}

/// Converts a comma-separated list element by element. The first invalid
/// element fails the whole conversion with its own diagnosis.
pub fn convert_to_multi_select_value(
    value: &str,
    arg_name: &str,
    choices: &[Choice],
    bounds: &SelectionBounds,
) -> Result<Vec<Value>, ArgValidationError> {
    let selected = value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| convert_to_select_value(item, arg_name, choices))
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(min) = bounds.min
        && selected.len() < min
    {
        return Err(ArgValidationError::new(
            arg_name,
            value,
            format!("select at least {} option(s)", min),
        )
        .with_valid_options(choice_labels(choices)));
    }
    if let Some(max) = bounds.max
        && selected.len() > max
    {
        return Err(ArgValidationError::new(
            arg_name,
            value,
            format!("select at most {} option(s)", max),
        )
        .with_valid_options(choice_labels(choices)));
    }
    Ok(selected)
}

pub fn validate_text_value(
    value: &str,
    arg_name: &str,
    constraints: &TextConstraints,
) -> Result<String, ArgValidationError> {
    let length = value.chars().count();

    if let Some(min) = constraints.min_length
        && length < min
    {
        return Err(ArgValidationError::new(
            arg_name,
            value,
            format!("must be at least {} character(s) long", min),
        ));
    }
    if let Some(max) = constraints.max_length
        && length > max
    {
        return Err(ArgValidationError::new(
            arg_name,
            value,
            format!("must be at most {} character(s) long", max),
        ));
    }
    if let Some(pattern) = &constraints.pattern {
        let regex = Regex::new(pattern).map_err(|e| {
            ArgValidationError::new(arg_name, value, format!("invalid pattern '{}': {}", pattern, e))
        })?;
        if !regex.is_match(value) {
            return Err(ArgValidationError::new(
                arg_name,
                value,
                format!("must match the pattern '{}'", pattern),
            ));
        }
    }
    Ok(value.to_string())
}

fn choice_labels(choices: &[Choice]) -> Vec<String> {
    choices.iter().map(|c| c.label.clone()).collect()
}

// MARK: --- UNIT TESTS ---
