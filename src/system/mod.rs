//! # System Interaction Layer
//!
//! Everything that touches the terminal or the operating system lives here,
//! behind the contracts `core` defines.
//!
//! ## Modules
//!
//! - **`executor`**: The shell helper exposed to actions as `ctx.shell`. Spawns a
//!   command in the run's working directory and environment and captures its output.
//! - **`headless`**: A responder that answers prompts from command-line flags and
//!   falls back to reading lines.
//! - **`interactive`**: A `dialoguer` responder for attended terminals.
//! - **`render`**: Prints output messages and feedback states to the terminal.

pub mod executor;
pub mod headless;
pub mod interactive;
pub mod render;
