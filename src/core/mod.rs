// src/core/mod.rs

pub mod action_runner;
pub mod arg_convert;
pub mod arg_inference;
pub mod arg_parser;
pub mod config_loader;
pub mod context;
pub mod feedback;
pub mod output;
pub mod prompt;
pub mod request;
pub mod translator;
