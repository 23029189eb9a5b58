// src/actions/mod.rs

//! Built-in actions shipped with the binary.

use crate::models::Action;

pub mod deploy;
pub mod greet;
pub mod scaffold;

/// Every built-in action, in listing order.
pub fn builtin() -> Vec<Action> {
    vec![greet::action(), scaffold::action(), deploy::action()]
}
