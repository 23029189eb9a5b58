// src/core/context.rs

use crate::core::arg_parser::ParsedArgs;
use crate::core::feedback::FeedbackController;
use crate::core::output::OutputChannel;
use crate::core::prompt::Prompts;
use crate::core::translator::Translator;
use crate::system::executor::ShellHelper;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

/// Everything an action receives for one run.
///
/// A fresh context is built per invocation; nothing in it is shared with
/// another run.
#[derive(Debug)]
pub struct ActionContext {
    pub prompt: Prompts,
    pub output: Arc<OutputChannel>,
    pub control: FeedbackController,
    pub shell: ShellHelper,
    pub env: HashMap<String, String>,
    pub cwd: PathBuf,
    pub config: Value,
    pub plugin_config: Option<Value>,
    pub args: ParsedArgs,
    pub t: Translator,
    pub action_name: String,
}

impl ActionContext {
    /// Reads a value from the run's environment map.
    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env.get(key).map(String::as_str)
    }

    /// Looks up a dotted path (`section.key`) in the opaque configuration.
    pub fn config_value(&self, path: &str) -> Option<&Value> {
        path.split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(&self.config, |value, segment| value.get(segment))
    }

    /// Deserializes the plugin-scoped configuration into `T`.
    pub fn plugin_config_as<T: DeserializeOwned>(&self) -> Option<anyhow::Result<T>> {
        self.plugin_config
            .clone()
            .map(|value| serde_json::from_value(value).map_err(anyhow::Error::from))
    }

    /// Shorthand for `self.t.t(key, vars)`.
    pub fn tr(&self, key: &str, vars: &[(&str, &str)]) -> String {
        self.t.t(key, vars)
    }
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::feedback::discard;
    use crate::system::executor::SystemShell;
    use serde::Deserialize;
    use serde_json::json;

    fn context(config: Value, plugin_config: Option<Value>) -> ActionContext {
        ActionContext {
            prompt: Prompts,
            output: Arc::new(OutputChannel::new(None)),
            control: FeedbackController::new(discard()),
            shell: ShellHelper::new(Arc::new(SystemShell), PathBuf::from("."), HashMap::new()),
            env: HashMap::from([("HOME".to_string(), "/home/test".to_string())]),
            cwd: PathBuf::from("."),
            config,
            plugin_config,
            args: ParsedArgs::default(),
            t: Translator::new(),
            action_name: "demo".to_string(),
        }
    }

    #[test]
    fn test_config_value_walks_dotted_path() {
        let ctx = context(json!({"deploy": {"region": "eu-west-1"}}), None);
        assert_eq!(ctx.config_value("deploy.region"), Some(&json!("eu-west-1")));
        assert_eq!(ctx.config_value("deploy.missing"), None);
        assert_eq!(ctx.env_var("HOME"), Some("/home/test"));
    }

    #[test]
    fn test_plugin_config_as() {
        #[derive(Deserialize)]
        struct Settings {
            retries: u32,
        }

        let ctx = context(Value::Null, Some(json!({"retries": 3})));
        let settings = ctx.plugin_config_as::<Settings>().unwrap().unwrap();
        assert_eq!(settings.retries, 3);
        assert!(context(Value::Null, None).plugin_config_as::<Settings>().is_none());
    }
}
