// src/constants.rs

/// Delay before a finished (`success`/`error`) feedback state clears itself.
pub const AUTO_CLEAR_DELAY_MS: u64 = 1000;

/// Message shown by a spinner started without one.
pub const DEFAULT_SPINNER_MESSAGE: &str = "Loading...";

/// Message shown by a progress bar started without one.
pub const DEFAULT_PROGRESS_MESSAGE: &str = "Processing...";

/// Spinner animation used when the action does not pick one.
pub const DEFAULT_SPINNER_KIND: &str = "dots";

/// Environment variable pointing at an explicit configuration file.
pub const CONFIG_ENV_VAR: &str = "ACTIONKIT_CONFIG";

/// The name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILENAME: &str = "actionkit.toml";

/// The name of the directory holding the user configuration (in ~/.config/).
pub const GLOBAL_CONFIG_DIR: &str = "actionkit";

/// The name of the user configuration file (inside `GLOBAL_CONFIG_DIR`).
pub const GLOBAL_CONFIG_FILENAME: &str = "config.toml";

/// Exit code for every failure that does not carry a more specific one.
pub const FAILURE_EXIT_CODE: i32 = 1;
