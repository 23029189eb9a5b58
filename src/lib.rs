//! # actionkit
//!
//! One authored action, two ways to drive it. An action's `run` routine asks for
//! input through the prompt functions, writes to an output channel and shows
//! spinner/progress feedback. Whichever responder is installed decides how each
//! request is satisfied: a `dialoguer` front-end at a terminal, or command-line
//! flags with a line-oriented fallback in headless mode.

include!(concat!(env!("OUT_DIR"), "/translations.rs"));

pub mod actions;
pub mod cli;
pub mod constants;
pub mod core;
pub mod dev_utils;
pub mod models;
pub mod state;
pub mod system;
