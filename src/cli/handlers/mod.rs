// src/cli/handlers/mod.rs

pub mod commons;
pub mod help;
pub mod list;
pub mod run;
