// src/core/config_loader.rs

//! # Config Loader
//!
//! Finds and reads the optional `actionkit.toml` file. The file has two
//! tables, both opaque to the engine:
//!
//! ```toml
//! [config]          # passed to every action as `ctx.config`
//! team = "core"
//!
//! [plugins.deployer]  # passed to actions owned by `deployer` as `ctx.plugin_config`
//! region = "eu-west-1"
//! ```
//!
//! Values are converted to `serde_json::Value` so the context exposes a
//! single JSON-shaped type.

use crate::constants::{
    CONFIG_ENV_VAR, GLOBAL_CONFIG_DIR, GLOBAL_CONFIG_FILENAME, LOCAL_CONFIG_FILENAME,
};
use serde::Deserialize;
use serde_json::Value;
use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("Config file '{path}' holds a value that cannot be represented as JSON")]
    Convert {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The on-disk layout of a config file.
#[derive(Deserialize, Debug, Default)]
struct ConfigFile {
    #[serde(default)]
    config: toml::Table,
    #[serde(default)]
    plugins: BTreeMap<String, toml::Table>,
}

/// The configuration handed to `run_action`.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    /// The file the values came from, if one was found.
    pub source: Option<PathBuf>,
    pub config: Value,
    pub plugins: HashMap<String, Value>,
}

impl Default for LoadedConfig {
    fn default() -> Self {
        Self {
            source: None,
            config: Value::Object(serde_json::Map::new()),
            plugins: HashMap::new(),
        }
    }
}

/// Picks the config file to load.
///
/// # Logic:
/// 1. An explicit path (the `--config` flag).
/// 2. The `ACTIONKIT_CONFIG` environment variable.
/// 3. `./actionkit.toml`, if it exists.
/// 4. `<config dir>/actionkit/config.toml`, if it exists.
pub fn resolve_config_path(explicit: Option<&str>) -> Option<PathBuf> {
    let env_value = std::env::var(CONFIG_ENV_VAR).ok();
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_config_path_from(explicit, env_value.as_deref(), &cwd, dirs::config_dir())
}

fn resolve_config_path_from(
    explicit: Option<&str>,
    env_value: Option<&str>,
    cwd: &Path,
    config_dir: Option<PathBuf>,
) -> Option<PathBuf> {
    if let Some(raw) = explicit.or(env_value).filter(|raw| !raw.trim().is_empty()) {
        return Some(expand_path(raw));
    }

    let local = cwd.join(LOCAL_CONFIG_FILENAME);
    if local.is_file() {
        return Some(local);
    }

    config_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_DIR).join(GLOBAL_CONFIG_FILENAME))
        .filter(|path| path.is_file())
}

/// Expands `~` and `$VARS` in a user-supplied path. Unknown variables are
/// left as written.
fn expand_path(raw: &str) -> PathBuf {
    let expanded = shellexpand::full(raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| shellexpand::tilde(raw).into_owned());
    PathBuf::from(expanded)
}

/// Resolves and loads the configuration. No file means an empty configuration.
pub fn load(explicit: Option<&str>) -> Result<LoadedConfig, ConfigError> {
    match resolve_config_path(explicit) {
        Some(path) => load_from_path(&path),
        None => {
            log::debug!("No config file found; using an empty configuration.");
            Ok(LoadedConfig::default())
        }
    }
}

/// Loads one config file. A path that does not exist is an empty configuration.
pub fn load_from_path(path: &Path) -> Result<LoadedConfig, ConfigError> {
    if !path.exists() {
        log::warn!("Config file '{}' does not exist; ignoring it.", path.display());
        return Ok(LoadedConfig::default());
    }

    log::debug!("Loading config from '{}'", path.display());
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut loaded = parse_config(&content, path)?;
    loaded.source = Some(path.to_path_buf());
    Ok(loaded)
}

/// Parses config text. `path` is only used in error messages.
pub fn parse_config(content: &str, path: &Path) -> Result<LoadedConfig, ConfigError> {
    let file: ConfigFile = toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let to_json = |table: toml::Table| {
        serde_json::to_value(table).map_err(|source| ConfigError::Convert {
            path: path.to_path_buf(),
            source,
        })
    };

    let config = to_json(file.config)?;
    let plugins = file
        .plugins
        .into_iter()
        .map(|(name, table)| Ok::<_, ConfigError>((name, to_json(table)?)))
        .collect::<Result<HashMap<_, _>, ConfigError>>()?;

    Ok(LoadedConfig {
        source: None,
        config,
        plugins,
    })
}

// MARK: --- UNIT TESTS ---
