// src/core/arg_parser.rs

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Associates a prompt with the command-line surface that can answer it
/// without asking: `--long`, `-s` or a positional slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ArgMapping {
    pub long: Option<String>,
    pub short: Option<String>,
    pub index: Option<usize>,
}

impl ArgMapping {
    /// A mapping answered by `--<name>`.
    pub fn long(name: impl Into<String>) -> Self {
        Self {
            long: Some(name.into()),
            ..Self::default()
        }
    }

    /// A mapping answered by the positional argument at `index`.
    pub fn positional(index: usize) -> Self {
        Self {
            index: Some(index),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.long.is_none() && self.short.is_none() && self.index.is_none()
    }

    /// The most descriptive name for diagnostics: `--long`, `-s` or `<index>`.
    pub fn display_name(&self) -> String {
        if let Some(long) = &self.long {
            format!("--{}", long)
        } else if let Some(short) = &self.short {
            format!("-{}", short)
        } else if let Some(index) = self.index {
            format!("<{}>", index)
        } else {
            String::from("<unmapped>")
        }
    }
}

/// Command-line tokens split into three disjoint views.
///
/// Every raw token lands in exactly one of `named`, `positional` or `flags`
/// (a value consumed by `--key value` belongs to `named` only).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedArgs {
    pub named: BTreeMap<String, String>,
    pub positional: Vec<String>,
    pub flags: BTreeSet<String>,
}

impl ParsedArgs {
    /// True when `--help` or `-h` was passed as a bare flag.
    pub fn has_help(&self) -> bool {
        self.flags.contains("help") || self.flags.contains("h")
    }

    pub fn is_empty(&self) -> bool {
        self.named.is_empty() && self.positional.is_empty() && self.flags.is_empty()
    }

    fn insert_named(&mut self, key: &str, value: &str) {
        self.flags.remove(key);
        self.named.insert(key.to_string(), value.to_string());
    }

    fn insert_flag(&mut self, key: &str) {
        self.named.remove(key);
        self.flags.insert(key.to_string());
    }
}

/// Parses raw CLI tokens into a `ParsedArgs`.
///
/// # Logic:
/// - `--key=value` and `-k=value` are named arguments.
/// - `--no-key` is the negated flag and is stored as `key = "false"`.
/// - `--key value` / `-k value` consume the next token when it is not itself
///   option-like. Negative numbers (`-5`, `-0.5`) are values, not options.
/// - A bare `--key` / `-k` is a flag.
/// - `--` ends option parsing; everything after it is positional.
/// - Anything else is a positional argument.
pub fn parse_args<S: AsRef<str>>(tokens: &[S]) -> ParsedArgs {
    let mut parsed = ParsedArgs::default();
    let mut tokens_iter = tokens.iter().map(AsRef::as_ref).peekable();
    let mut options_ended = false;

    while let Some(token) = tokens_iter.next() {
        if options_ended {
            parsed.positional.push(token.to_string());
            continue;
        }
        if token == "--" {
            options_ended = true;
            continue;
        }

        let name_opt = if let Some(name) = token.strip_prefix("--") {
            Some(name)
        } else if is_option_like(token) {
            token.strip_prefix('-')
        } else {
            None
        };

        let Some(name) = name_opt else {
            parsed.positional.push(token.to_string());
            continue;
        };

        if let Some((key, value)) = name.split_once('=') {
            parsed.insert_named(key, value);
        } else if let Some(negated) = name
            .strip_prefix("no-")
            .filter(|n| !n.is_empty() && token.starts_with("--"))
        {
            parsed.insert_named(negated, "false");
        } else if let Some(value) = tokens_iter.next_if(|next| !is_option_like(next)) {
            parsed.insert_named(name, value);
        } else {
            parsed.insert_flag(name);
        }
    }

    log::trace!("Parsed CLI tokens: {:?}", parsed);
    parsed
}

/// A token is option-like when it starts with `-`, is longer than one
/// character and is not a negative number.
fn is_option_like(token: &str) -> bool {
    token.len() > 1 && token.starts_with('-') && token.parse::<f64>().is_err()
}

/// Looks up a raw value for `mapping`: long name, then short name, then
/// positional index. Returns the first match.
pub fn get_arg_value<'a>(parsed: &'a ParsedArgs, mapping: &ArgMapping) -> Option<&'a str> {
    mapping
        .long
        .as_ref()
        .and_then(|long| parsed.named.get(long))
        .or_else(|| {
            mapping
                .short
                .as_ref()
                .and_then(|short| parsed.named.get(short))
        })
        .or_else(|| mapping.index.and_then(|index| parsed.positional.get(index)))
        .map(String::as_str)
}

/// Resolves a boolean for `mapping`.
///
/// An explicit `name=value` wins (`"false"` is `false`, anything else `true`);
/// otherwise the presence of the long or short flag means `true`.
pub fn get_flag_value(parsed: &ParsedArgs, mapping: &ArgMapping) -> Option<bool> {
    let names = [mapping.long.as_deref(), mapping.short.as_deref()];

    for name in names.iter().flatten() {
        if let Some(value) = parsed.named.get(*name) {
            return Some(!value.eq_ignore_ascii_case("false"));
        }
    }
    names
        .iter()
        .flatten()
        .any(|name| parsed.flags.contains(*name))
        .then_some(true)
}

// MARK: --- UNIT TESTS ---
