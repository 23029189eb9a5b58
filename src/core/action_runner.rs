// src/core/action_runner.rs

use crate::core::arg_parser::parse_args;
use crate::core::context::ActionContext;
use crate::core::feedback::{self, FeedbackController, FeedbackSetter, VisualFeedbackState};
use crate::core::output::{OutputChannel, OutputMessage, OutputSink};
use crate::core::prompt::Prompts;
use crate::core::translator::Translator;
use crate::constants::AUTO_CLEAR_DELAY_MS;
use crate::models::{Action, ExecutionResult};
use crate::system::executor::{ShellHelper, ShellRunner, SystemShell};
use anyhow::anyhow;
use serde_json::Value;
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Everything a mode driver can supply for one run. Every field is optional.
#[derive(Clone, Default)]
pub struct RunOptions {
    /// Raw command-line tokens meant for the action.
    pub args: Vec<String>,
    pub config: Value,
    /// Plugin name → plugin-scoped configuration.
    pub plugins: HashMap<String, Value>,
    pub on_output: Option<OutputSink>,
    pub on_visual_feedback: Option<FeedbackSetter>,
    pub cwd: Option<PathBuf>,
    pub env: Option<HashMap<String, String>>,
    pub shell: Option<Arc<dyn ShellRunner>>,
    pub translator: Option<Translator>,
    pub clear_delay: Option<Duration>,
}

impl fmt::Debug for RunOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunOptions")
            .field("args", &self.args)
            .field("config", &self.config)
            .field("plugins", &self.plugins.keys().collect::<Vec<_>>())
            .field("on_output", &self.on_output.is_some())
            .field("on_visual_feedback", &self.on_visual_feedback.is_some())
            .field("cwd", &self.cwd)
            .finish_non_exhaustive()
    }
}

impl RunOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn config(mut self, config: Value) -> Self {
        self.config = config;
        self
    }

    pub fn plugins(mut self, plugins: HashMap<String, Value>) -> Self {
        self.plugins = plugins;
        self
    }

    pub fn on_output(mut self, sink: impl Fn(&OutputMessage) + Send + Sync + 'static) -> Self {
        self.on_output = Some(Arc::new(sink));
        self
    }

    pub fn on_visual_feedback(
        mut self,
        setter: impl Fn(Option<VisualFeedbackState>) + Send + Sync + 'static,
    ) -> Self {
        self.on_visual_feedback = Some(Arc::new(setter));
        self
    }

    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    pub fn env(mut self, env: HashMap<String, String>) -> Self {
        self.env = Some(env);
        self
    }

    pub fn shell(mut self, runner: Arc<dyn ShellRunner>) -> Self {
        self.shell = Some(runner);
        self
    }

    pub fn translator(mut self, translator: Translator) -> Self {
        self.translator = Some(translator);
        self
    }

    pub fn clear_delay(mut self, delay: Duration) -> Self {
        self.clear_delay = Some(delay);
        self
    }
}

/// Builds a fresh context for `action` from the run options.
pub fn build_context(action: &Action, options: RunOptions) -> ActionContext {
    let RunOptions {
        args,
        config,
        plugins,
        on_output,
        on_visual_feedback,
        cwd,
        env,
        shell,
        translator,
        clear_delay,
    } = options;

    let cwd = cwd.unwrap_or_else(|| {
        std::env::current_dir().unwrap_or_else(|e| {
            log::warn!("Could not read the current directory ({}); using '.'", e);
            PathBuf::from(".")
        })
    });
    let env = env.unwrap_or_else(|| std::env::vars().collect());
    let plugin_config = action
        .metadata
        .plugin
        .as_ref()
        .and_then(|plugin| plugins.get(plugin).cloned());

    let translator = translator.unwrap_or_default();
    let t = match &action.metadata.namespace {
        Some(namespace) => translator.scoped(namespace.as_str()),
        None => translator,
    };

    let runner = shell.unwrap_or_else(|| Arc::new(SystemShell) as Arc<dyn ShellRunner>);
    let control = FeedbackController::with_clear_delay(
        on_visual_feedback.unwrap_or_else(feedback::discard),
        clear_delay.unwrap_or(Duration::from_millis(AUTO_CLEAR_DELAY_MS)),
    );

    ActionContext {
        prompt: Prompts,
        output: Arc::new(OutputChannel::new(on_output)),
        control,
        shell: ShellHelper::new(runner, cwd.clone(), env.clone()),
        env,
        cwd,
        config,
        plugin_config,
        args: parse_args(&args),
        t,
        action_name: action.name.clone(),
    }
}

/// Runs `action` once and reports what happened.
///
/// This is the failure boundary of the engine: an error returned by the
/// action, or a panic raised inside it, becomes `success: false` in the
/// result. Nothing propagates to the caller.
pub fn run_action(action: &Action, options: RunOptions) -> ExecutionResult {
    let run_id = Uuid::new_v4();
    let ctx = build_context(action, options);
    log::debug!("Starting action '{}' (run {})", action.name, run_id);

    let start = Instant::now();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| action.invoke(&ctx)));
    let duration = start.elapsed();

    let error = match outcome {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(e),
        Err(payload) => Some(anyhow!(
            "Action '{}' panicked: {}",
            action.name,
            panic_message(payload.as_ref())
        )),
    };

    match &error {
        None => log::debug!("Action '{}' finished in {:?}", action.name, duration),
        Some(e) => log::debug!("Action '{}' failed after {:?}: {:#}", action.name, duration, e),
    }

    ExecutionResult {
        run_id,
        success: error.is_none(),
        duration,
        error,
        messages: ctx.output.messages(),
        final_visual_state: ctx.control.state(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| String::from("unknown panic payload"))
}

// MARK: --- UNIT TESTS ---
