// src/models.rs

use crate::core::arg_convert::ArgValidationError;
use crate::core::context::ActionContext;
use crate::core::feedback::VisualFeedbackState;
use crate::core::output::OutputMessage;
use crate::core::prompt::PromptError;
use crate::core::translator::Translator;
use crate::constants::FAILURE_EXIT_CODE;
use crate::system::executor::ShellError;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

// --- Action ---

/// The routine an action runs. Failures are returned, never printed.
pub type ActionRun = Arc<dyn Fn(&ActionContext) -> anyhow::Result<()> + Send + Sync>;

/// An action's human description: fixed text, or looked up at display time.
#[derive(Clone)]
pub enum Description {
    Static(String),
    Translated(fn(&Translator) -> String),
}

impl fmt::Debug for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(text) => f.debug_tuple("Static").field(text).finish(),
            Self::Translated(_) => f.write_str("Translated(..)"),
        }
    }
}

impl From<&str> for Description {
    fn from(text: &str) -> Self {
        Self::Static(text.to_string())
    }
}

impl From<String> for Description {
    fn from(text: String) -> Self {
        Self::Static(text)
    }
}

/// Where an action's source text can be read for argument inference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionSource {
    File(PathBuf),
    /// Source compiled into the binary, with the path it was read from.
    Embedded { path: &'static str, text: &'static str },
}

/// Data the discovery layer attaches to an action.
#[derive(Debug, Clone, Default)]
pub struct ActionMetadata {
    pub source: Option<ActionSource>,
    pub plugin: Option<String>,
    /// Translation namespace used for `ctx.t`.
    pub namespace: Option<String>,
}

/// A named unit of executable logic. Immutable once constructed.
#[derive(Clone)]
pub struct Action {
    pub name: String,
    pub description: Description,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub run: ActionRun,
    pub metadata: ActionMetadata,
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("category", &self.category)
            .field("tags", &self.tags)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl Action {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<Description>,
        run: impl Fn(&ActionContext) -> anyhow::Result<()> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            category: None,
            tags: Vec::new(),
            run: Arc::new(run),
            metadata: ActionMetadata::default(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_source(mut self, source: ActionSource) -> Self {
        self.metadata.source = Some(source);
        self
    }

    pub fn with_plugin(mut self, plugin: impl Into<String>) -> Self {
        self.metadata.plugin = Some(plugin.into());
        self
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.metadata.namespace = Some(namespace.into());
        self
    }

    pub fn describe(&self, translator: &Translator) -> String {
        match &self.description {
            Description::Static(text) => text.clone(),
            Description::Translated(describe) => describe(translator),
        }
    }

    pub fn invoke(&self, ctx: &ActionContext) -> anyhow::Result<()> {
        (self.run)(ctx)
    }
}

// --- Execution Result ---

/// Outcome of one `run_action` call. Never reused across runs.
#[derive(Debug)]
pub struct ExecutionResult {
    pub run_id: Uuid,
    pub success: bool,
    pub duration: Duration,
    pub error: Option<anyhow::Error>,
    pub messages: Vec<OutputMessage>,
    pub final_visual_state: Option<VisualFeedbackState>,
}

impl ExecutionResult {
    /// The top-level failure message, if the run failed.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// The argument validation failure that aborted the run, if that is what
    /// happened.
    pub fn arg_validation_error(&self) -> Option<&ArgValidationError> {
        self.error.as_ref()?.chain().find_map(|cause| {
            cause.downcast_ref::<ArgValidationError>().or_else(|| {
                cause
                    .downcast_ref::<PromptError>()
                    .and_then(PromptError::arg_validation)
            })
        })
    }

    /// Process exit code for headless drivers: 0 on success, a failed shell
    /// sub-command's own code when that caused the failure, otherwise 1.
    pub fn exit_code(&self) -> i32 {
        let Some(error) = &self.error else {
            return if self.success { 0 } else { FAILURE_EXIT_CODE };
        };
        error
            .chain()
            .find_map(|cause| match cause.downcast_ref::<ShellError>() {
                Some(ShellError::NonZeroExit { exit_code, .. }) if *exit_code != 0 => {
                    Some(*exit_code)
                }
                _ => None,
            })
            .unwrap_or(FAILURE_EXIT_CODE)
    }
}

// MARK: --- UNIT TESTS ---
