// src/core/translator.rs

use crate::TRANSLATIONS;
use std::collections::HashMap;
use std::sync::Arc;

/// Runtime `t(key, vars)` lookup over the compiled translation table.
///
/// Keys are looked up in the action's namespace first (`<namespace>.<key>`),
/// then as-is. Unknown keys come back unchanged so a missing entry is
/// visible without failing the run.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    namespace: Option<String>,
    overrides: Arc<HashMap<String, String>>,
}

impl Translator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds entries that take precedence over the compiled table.
    pub fn with_overrides<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut merged = (*self.overrides).clone();
        merged.extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self.overrides = Arc::new(merged);
        self
    }

    /// A copy of this translator that resolves keys inside `namespace` first.
    pub fn scoped(&self, namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            overrides: Arc::clone(&self.overrides),
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Translates `key`, replacing each `{name}` with its value from `vars`.
    pub fn t(&self, key: &str, vars: &[(&str, &str)]) -> String {
        let template = self
            .namespace
            .as_ref()
            .and_then(|ns| self.lookup(&format!("{}.{}", ns, key)))
            .or_else(|| self.lookup(key))
            .unwrap_or(key);

        vars.iter().fold(template.to_string(), |text, (name, value)| {
            text.replace(&format!("{{{}}}", name), value)
        })
    }

    fn lookup(&self, key: &str) -> Option<&str> {
        self.overrides.get(key).map(String::as_str).or_else(|| {
            TRANSLATIONS
                .binary_search_by(|(k, _)| str::cmp(k, key))
                .ok()
                .and_then(|i| TRANSLATIONS.get(i))
                .map(|(_, v)| *v)
        })
    }
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_key_returns_key() {
        assert_eq!(Translator::new().t("no.such.key", &[]), "no.such.key");
    }

    #[test]
    fn test_compiled_table_and_interpolation() {
        let t = Translator::new();
        assert_eq!(
            t.t("cli.run.action_not_found", &[("name", "deploy")]),
            "Action 'deploy' not found."
        );
    }

    #[test]
    fn test_scoped_overrides_win() {
        let t = Translator::new()
            .with_overrides([("greet.hello", "Hola, {name}!"), ("hello", "Hello, {name}!")])
            .scoped("greet");
        assert_eq!(t.t("hello", &[("name", "Ana")]), "Hola, Ana!");
        assert_eq!(Translator::new().with_overrides([("hello", "Hi {name}")]).t("hello", &[("name", "Bo")]), "Hi Bo");
        assert_eq!(t.namespace(), Some("greet"));
    }
}
