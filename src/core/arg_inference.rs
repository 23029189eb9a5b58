// src/core/arg_inference.rs

//! # Argument Inference
//!
//! Reconstructs an action's command-line surface from its source text without
//! running it. The source is parsed with the tree-sitter grammar that matches
//! its file extension, and the syntax tree is walked for prompt call-sites
//! that carry an arg mapping:
//!
//! - `ctx.prompt.text("Name:", TextOptions::default().arg("name").arg_short("n"))`
//! - `tui.prompt.select('Env', ['dev', 'prod'], { arg: 'env', argShort: 'e' })`
//! - `Field::number("count", "How many?", NumberOptions::default().arg_index(0))`
//! - `{ type: 'confirm', message: 'Sure?', arg: 'yes' }` inside a form definition
//!
//! The result only feeds `--help` text, so every failure degrades to `None`.

use crate::core::arg_parser::ArgMapping;
use crate::core::request::RequestKind;
use crate::dev_utils::BlockTimer;
use crate::models::{Action, ActionSource};
use lazy_static::lazy_static;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tree_sitter::{Language, Node, Parser};

/// The grammar a source file is parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    JavaScript,
    TypeScript,
    /// TypeScript with JSX.
    Tsx,
    Rust,
}

lazy_static! {
    static ref DIALECTS_BY_EXTENSION: HashMap<&'static str, Dialect> = HashMap::from([
        ("js", Dialect::JavaScript),
        ("mjs", Dialect::JavaScript),
        ("cjs", Dialect::JavaScript),
        ("jsx", Dialect::JavaScript),
        ("ts", Dialect::TypeScript),
        ("mts", Dialect::TypeScript),
        ("cts", Dialect::TypeScript),
        ("tsx", Dialect::Tsx),
        ("rs", Dialect::Rust),
    ]);
}

impl Dialect {
    /// Looks up a file extension, without the leading dot. Case-insensitive.
    pub fn from_extension(extension: &str) -> Option<Self> {
        DIALECTS_BY_EXTENSION
            .get(extension.to_ascii_lowercase().as_str())
            .copied()
    }

    /// The dialect of a source file, by its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        Self::from_extension(path.extension()?.to_str()?)
    }

    fn language(self) -> Language {
        match self {
            Self::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
        }
    }
}

// --- Inferred model ---

/// The value type an inferred argument expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgKind {
    Text,
    Number,
    Password,
    Boolean,
    Select,
    MultiSelect,
}

impl ArgKind {
    fn from_request_kind(kind: RequestKind) -> Option<Self> {
        match kind {
            RequestKind::Text => Some(Self::Text),
            RequestKind::Number => Some(Self::Number),
            RequestKind::Password => Some(Self::Password),
            RequestKind::Confirm => Some(Self::Boolean),
            RequestKind::Select => Some(Self::Select),
            RequestKind::MultiSelect => Some(Self::MultiSelect),
            _ => None,
        }
    }

    fn has_choices(self) -> bool {
        matches!(self, Self::Select | Self::MultiSelect)
    }
}

/// What is known statically about a selection prompt's choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum ChoiceSet {
    /// Not a selection prompt.
    None,
    /// Every choice is a string literal.
    Static(Vec<String>),
    /// Only known at runtime.
    Dynamic,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferredArg {
    pub kind: ArgKind,
    /// The prompt method as written at the call-site.
    pub method: String,
    pub message: Option<String>,
    pub mapping: ArgMapping,
    pub description: Option<String>,
    pub choices: ChoiceSet,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActionArgsMeta {
    pub name: Option<String>,
    pub description: Option<String>,
    pub args: Vec<InferredArg>,
}

// --- Syntax tree helpers ---

/// Named children, skipping comments and other extras.
fn children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| !child.is_extra())
        .collect()
}

fn field<'t>(node: Node<'t>, name: &str) -> Option<Node<'t>> {
    node.child_by_field_name(name)
}

/// The expressions passed to a call.
fn call_args<'t>(call: Node<'t>) -> Vec<Node<'t>> {
    field(call, "arguments").map(children).unwrap_or_default()
}

/// The callee of a call, looking through a Rust turbofish.
fn callee<'t>(call: Node<'t>) -> Option<Node<'t>> {
    let function = field(call, "function")?;
    if function.kind() == "generic_function" {
        field(function, "function")
    } else {
        Some(function)
    }
}

/// Splits `a.b` / `a::b` into its receiver (if it is an expression) and the
/// trailing name.
fn split_path<'t>(node: Node<'t>) -> Option<(Option<Node<'t>>, Node<'t>)> {
    match node.kind() {
        "member_expression" => Some((field(node, "object"), field(node, "property")?)),
        "field_expression" => Some((field(node, "value"), field(node, "field")?)),
        "scoped_identifier" => Some((None, field(node, "name")?)),
        _ => None,
    }
}

fn unescape(sequence: &str) -> String {
    match sequence.strip_prefix('\\').unwrap_or(sequence) {
        "n" => String::from("\n"),
        "t" => String::from("\t"),
        "r" => String::from("\r"),
        "0" => String::from("\0"),
        // Line continuation.
        rest if rest.starts_with(['\n', '\r']) => String::new(),
        rest => rest.to_string(),
    }
}

struct Walker<'s> {
    source: &'s str,
    meta: ActionArgsMeta,
}

impl<'s> Walker<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            meta: ActionArgsMeta::default(),
        }
    }

    fn text(&self, node: Node<'_>) -> &'s str {
        self.source.get(node.byte_range()).unwrap_or_default()
    }

    /// The last segment of a path such as `Field` or `actionkit::Field`.
    fn last_segment(&self, node: Node<'_>) -> &'s str {
        match split_path(node) {
            Some((_, name)) => self.text(name),
            None => self.text(node),
        }
    }

    /// A string literal, optionally wrapped in `Some(..)`, `String::from(..)`
    /// or followed by `.into()` / `.to_string()` / `.to_owned()`.
    fn literal_string(&self, node: Node<'_>) -> Option<String> {
        match node.kind() {
            "string" | "string_literal" | "raw_string_literal" => {
                let mut text = String::new();
                for part in children(node) {
                    match part.kind() {
                        "string_fragment" | "string_content" => text.push_str(self.text(part)),
                        "escape_sequence" => text.push_str(&unescape(self.text(part))),
                        _ => {}
                    }
                }
                Some(text)
            }
            "template_string" => {
                if children(node).iter().any(|part| part.kind() == "template_substitution") {
                    return None;
                }
                let raw = self.text(node).strip_prefix('`')?.strip_suffix('`')?;
                Some(raw.to_string())
            }
            "parenthesized_expression" => self.literal_string(*children(node).first()?),
            "call_expression" => {
                let function = callee(node)?;
                let args = call_args(node);
                match (function.kind(), self.text(function), args.as_slice()) {
                    ("identifier", "Some", [inner]) => self.literal_string(*inner),
                    ("scoped_identifier", "String::from", [inner]) => self.literal_string(*inner),
                    ("field_expression", _, []) => {
                        let (receiver, method) = split_path(function)?;
                        matches!(self.text(method), "into" | "to_string" | "to_owned")
                            .then_some(())?;
                        self.literal_string(receiver?)
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// An integer literal, optionally wrapped in `Some(..)`. Type suffixes
    /// such as `0usize` are ignored.
    fn literal_index(&self, node: Node<'_>) -> Option<usize> {
        match node.kind() {
            "number" | "integer_literal" => {
                let digits: String = self
                    .text(node)
                    .chars()
                    .take_while(char::is_ascii_digit)
                    .collect();
                digits.parse().ok()
            }
            "call_expression" => {
                let function = callee(node)?;
                match (self.text(function), call_args(node).as_slice()) {
                    ("Some", [inner]) => self.literal_index(*inner),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// `key: value` entries of an object or struct literal. Methods such as
    /// `async run() {}` are listed with the method node as their value.
    /// Shorthand entries and spreads are skipped.
    fn entries<'t>(&self, node: Node<'t>) -> Vec<(String, Node<'t>)> {
        let body = match node.kind() {
            "struct_expression" => match field(node, "body") {
                Some(body) => body,
                None => return Vec::new(),
            },
            _ => node,
        };

        children(body)
            .into_iter()
            .filter_map(|entry| match entry.kind() {
                "pair" => {
                    let key = field(entry, "key")?;
                    let key = match key.kind() {
                        "property_identifier" => self.text(key).to_string(),
                        _ => self.literal_string(key)?,
                    };
                    Some((key, field(entry, "value")?))
                }
                "field_initializer" => Some((
                    self.text(field(entry, "field")?).to_string(),
                    field(entry, "value")?,
                )),
                "method_definition" => Some((self.text(field(entry, "name")?).to_string(), entry)),
                _ => None,
            })
            .collect()
    }

    /// Static knowledge about a selection prompt's choices argument.
    fn parse_choices(&self, node: Node<'_>) -> ChoiceSet {
        let elements = match node.kind() {
            "reference_expression" => {
                return field(node, "value").map_or(ChoiceSet::Dynamic, |inner| self.parse_choices(inner));
            }
            "array" | "array_expression" => children(node),
            "macro_invocation" if field(node, "macro").is_some_and(|m| self.text(m) == "vec") => {
                children(node)
                    .into_iter()
                    .find(|child| child.kind() == "token_tree")
                    .map(children)
                    .unwrap_or_default()
            }
            _ => return ChoiceSet::Dynamic,
        };

        elements
            .into_iter()
            .map(|element| self.literal_string(element))
            .collect::<Option<Vec<_>>>()
            .map_or(ChoiceSet::Dynamic, ChoiceSet::Static)
    }

    // --- Walk ---

    fn walk(&mut self, node: Node<'_>) {
        match node.kind() {
            "call_expression" => self.inspect_call(node),
            "object" | "struct_expression" => self.inspect_object(node),
            _ => {}
        }
        for child in children(node) {
            self.walk(child);
        }
    }

    fn inspect_call(&mut self, call: Node<'_>) {
        let Some((receiver, method)) = callee(call).and_then(split_path) else {
            return;
        };
        let method = self.text(method);
        let args = call_args(call);

        match receiver {
            Some(receiver) if self.last_segment(receiver) == "prompt" => {
                self.record_call(method, &args, 0);
            }
            Some(_) => {}
            None => {
                let path = callee(call).and_then(|c| field(c, "path"));
                match (path.map(|p| self.last_segment(p)), method) {
                    // Field constructors take the field key first.
                    (Some("Field"), _) => self.record_call(method, &args, 1),
                    (Some("Action"), "new") => {
                        self.record_identity(args.first().copied(), args.get(1).copied());
                    }
                    _ => {}
                }
            }
        }
    }

    /// A prompt-style call: `[key,] message, [choices,] options`.
    fn record_call(&mut self, method: &str, args: &[Node<'_>], message_at: usize) {
        let Some(kind) = RequestKind::from_method(method).and_then(ArgKind::from_request_kind)
        else {
            return;
        };
        let choices_at = message_at + 1;
        let options_at = if kind.has_choices() { choices_at + 1 } else { choices_at };

        let options = match args.get(options_at) {
            Some(node) => OptionsMeta::parse(self, *node),
            None => return,
        };
        if options.mapping.is_empty() {
            return;
        }

        let choices = if kind.has_choices() {
            args.get(choices_at)
                .map_or(ChoiceSet::Dynamic, |node| self.parse_choices(*node))
        } else {
            ChoiceSet::None
        };

        let message = args.get(message_at).and_then(|node| self.literal_string(*node));
        self.meta.args.push(InferredArg {
            kind,
            method: method.to_string(),
            message,
            mapping: options.mapping,
            description: options.description,
            choices,
        });
    }

    /// Object literals: action definitions (`{ name, description, run }`) and
    /// declarative form fields (`{ type: 'text', message, arg }`).
    fn inspect_object(&mut self, node: Node<'_>) {
        let entries = self.entries(node);
        let entry = |key: &str| entries.iter().find(|(k, _)| k == key).map(|(_, v)| *v);

        if entry("run").is_some() {
            self.record_identity(entry("name"), entry("description"));
        }

        let Some(kind_name) = entry("type").and_then(|value| self.literal_string(value)) else {
            return;
        };
        let Some(kind) = RequestKind::from_method(&kind_name).and_then(ArgKind::from_request_kind)
        else {
            return;
        };

        let mut options = OptionsMeta::default();
        options.absorb_entries(self, node);
        if options.mapping.is_empty() {
            return;
        }

        let choices = if kind.has_choices() {
            entry("choices").map_or(ChoiceSet::Dynamic, |value| self.parse_choices(value))
        } else {
            ChoiceSet::None
        };

        let message = entry("message").and_then(|value| self.literal_string(value));
        self.meta.args.push(InferredArg {
            kind,
            method: kind_name,
            message,
            mapping: options.mapping,
            description: options.description,
            choices,
        });
    }

    /// The first literal action identity found wins.
    fn record_identity(&mut self, name: Option<Node<'_>>, description: Option<Node<'_>>) {
        if self.meta.name.is_some() {
            return;
        }
        if let Some(name) = name.and_then(|node| self.literal_string(node)) {
            self.meta.description = description.and_then(|node| self.literal_string(node));
            self.meta.name = Some(name);
        }
    }
}

// --- Options ---

#[derive(Debug, Default)]
struct OptionsMeta {
    mapping: ArgMapping,
    description: Option<String>,
}

impl OptionsMeta {
    /// Reads an options argument: an object/struct literal, a builder chain
    /// or a mix of both.
    fn parse(walker: &Walker<'_>, node: Node<'_>) -> Self {
        let mut meta = Self::default();
        meta.absorb(walker, node);
        meta
    }

    fn absorb(&mut self, walker: &Walker<'_>, node: Node<'_>) {
        match node.kind() {
            "object" | "struct_expression" => self.absorb_entries(walker, node),
            // `Options::default().arg("x").arg_short("y")` or `ArgMapping::long("x")`
            "call_expression" => {
                let Some((receiver, method)) = callee(node).and_then(split_path) else {
                    return;
                };
                if let Some(value) = call_args(node).first() {
                    self.apply(walker, walker.text(method), *value);
                }
                if let Some(receiver) = receiver {
                    self.absorb(walker, receiver);
                }
            }
            "parenthesized_expression" | "reference_expression" | "try_expression" => {
                for child in children(node) {
                    self.absorb(walker, child);
                }
            }
            _ => {}
        }
    }

    fn absorb_entries(&mut self, walker: &Walker<'_>, node: Node<'_>) {
        for (key, value) in walker.entries(node) {
            self.apply(walker, &key, value);
        }
    }

    fn apply(&mut self, walker: &Walker<'_>, key: &str, value: Node<'_>) {
        match key {
            "arg" | "long" => match walker.literal_string(value) {
                Some(long) => self.mapping.long = Some(long),
                // `arg: ArgMapping { .. }` or `.arg(ArgMapping::long(..))`
                None => self.absorb(walker, value),
            },
            "argShort" | "arg_short" | "short" => {
                if let Some(short) = walker.literal_string(value) {
                    self.mapping.short = Some(short);
                }
            }
            "argIndex" | "arg_index" | "index" | "positional" => {
                if let Some(index) = walker.literal_index(value) {
                    self.mapping.index = Some(index);
                }
            }
            "description" => {
                if let Some(description) = walker.literal_string(value) {
                    self.description = Some(description);
                }
            }
            _ => {}
        }
    }
}

// --- Entry points ---

/// Infers the argument surface of an action from its source text.
///
/// Returns `None` when the grammar cannot be loaded or the source has any
/// syntax error.
pub fn analyze_action_source(source: &str, dialect: Dialect) -> Option<ActionArgsMeta> {
    let _timer = BlockTimer::new("analyze_action_source");

    let mut parser = Parser::new();
    if let Err(e) = parser.set_language(&dialect.language()) {
        log::debug!("Argument inference: cannot load the {:?} grammar: {}", dialect, e);
        return None;
    }
    let Some(tree) = parser.parse(source, None) else {
        log::debug!("Argument inference: the {:?} parser gave up.", dialect);
        return None;
    };

    let root = tree.root_node();
    if root.has_error() {
        log::debug!("Argument inference: syntax error in {:?} source.", dialect);
        return None;
    }

    let mut walker = Walker::new(source);
    walker.walk(root);
    Some(walker.meta)
}

/// Reads and analyzes an action source file. The grammar follows the file
/// extension; unknown extensions yield `None`.
pub fn analyze_action_args(path: &Path) -> Option<ActionArgsMeta> {
    let Some(dialect) = Dialect::from_path(path) else {
        log::debug!("Argument inference: no grammar for '{}'.", path.display());
        return None;
    };
    match fs::read_to_string(path) {
        Ok(source) => analyze_action_source(&source, dialect),
        Err(e) => {
            log::debug!("Argument inference: cannot read '{}': {}", path.display(), e);
            None
        }
    }
}

/// Analyzes whatever source an action carries. The action's own name and
/// static description fill in what the source does not state literally.
pub fn analyze_action(action: &Action) -> Option<ActionArgsMeta> {
    let mut meta = match action.metadata.source.as_ref()? {
        ActionSource::File(path) => analyze_action_args(path)?,
        ActionSource::Embedded { path, text } => {
            analyze_action_source(text, Dialect::from_path(Path::new(path))?)?
        }
    };
    meta.name.get_or_insert_with(|| action.name.clone());
    if meta.description.is_none()
        && let crate::models::Description::Static(text) = &action.description
    {
        meta.description = Some(text.clone());
    }
    Some(meta)
}

// --- Help rendering ---

fn type_hint(arg: &InferredArg) -> Option<String> {
    match (arg.kind, &arg.choices) {
        (ArgKind::Boolean, _) => None,
        (ArgKind::Number, _) => Some(String::from("<number>")),
        (ArgKind::Select | ArgKind::MultiSelect, ChoiceSet::Static(values)) if !values.is_empty() => {
            Some(format!("<{}>", values.join("|")))
        }
        _ => Some(String::from("<value>")),
    }
}

fn flag_column(arg: &InferredArg) -> String {
    let names = match (&arg.mapping.short, &arg.mapping.long, arg.mapping.index) {
        (Some(short), Some(long), _) => format!("-{}, --{}", short, long),
        (None, Some(long), _) => format!("    --{}", long),
        (Some(short), None, _) => format!("-{}", short),
        (None, None, Some(index)) => format!("[{}]", index),
        (None, None, None) => String::new(),
    };
    match type_hint(arg) {
        Some(hint) => format!("{} {}", names, hint),
        None => names,
    }
}

/// Renders a deterministic usage block for `meta`.
pub fn format_args_help(meta: &ActionArgsMeta) -> String {
    let name = meta.name.as_deref().unwrap_or("action");
    let mut lines = Vec::new();

    match &meta.description {
        Some(description) => lines.push(format!("{} - {}", name, description)),
        None => lines.push(name.to_string()),
    }
    lines.push(String::new());
    lines.push(format!(t!("help.usage"), name = name));

    if meta.args.is_empty() {
        lines.push(String::new());
        lines.push(t!("help.no_arguments").to_string());
        return lines.join("\n");
    }

    lines.push(String::new());
    lines.push(t!("help.options_header").to_string());

    let columns: Vec<(String, &str)> = meta
        .args
        .iter()
        .map(|arg| {
            let text = arg
                .description
                .as_deref()
                .or(arg.message.as_deref())
                .unwrap_or_default();
            (flag_column(arg), text)
        })
        .collect();
    let width = columns
        .iter()
        .map(|(flag, _)| flag.chars().count())
        .max()
        .unwrap_or(0);

    for (flag, text) in columns {
        let line = format!("  {:<width$}  {}", flag, text, width = width);
        lines.push(line.trim_end().to_string());
    }
    lines.join("\n")
}


// MARK: --- UNIT TESTS ---
