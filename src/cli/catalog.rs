// src/cli/catalog.rs

use crate::actions;
use crate::models::Action;
use std::collections::BTreeMap;

/// The actions the binary knows about, looked up by name.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    actions: Vec<Action>,
}

impl Catalog {
    pub fn new(actions: Vec<Action>) -> Self {
        Self { actions }
    }

    /// The actions compiled into the binary.
    pub fn builtin() -> Self {
        Self::new(actions::builtin())
    }

    pub fn find(&self, name: &str) -> Option<&Action> {
        self.actions.iter().find(|action| action.name == name)
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn names(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.name.as_str()).collect()
    }

    /// Actions grouped by category, sorted by name inside each group.
    /// Uncategorized actions are grouped under an empty name.
    pub fn by_category(&self) -> BTreeMap<&str, Vec<&Action>> {
        let mut groups: BTreeMap<&str, Vec<&Action>> = BTreeMap::new();
        for action in &self.actions {
            groups
                .entry(action.category.as_deref().unwrap_or_default())
                .or_default()
                .push(action);
        }
        for group in groups.values_mut() {
            group.sort_by(|a, b| a.name.cmp(&b.name));
        }
        groups
    }
}

// MARK: --- UNIT TESTS ---
