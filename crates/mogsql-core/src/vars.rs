//! Host variables (`\set` style settings) visible to drivers.

use std::collections::HashMap;

/// Environment prefix for variables imported by [`Vars::from_env`].
pub const ENV_PREFIX: &str = "MOGSQL_";

/// A case-insensitive map of host variables. Names are stored upper-cased.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vars {
    values: HashMap<String, String>,
}

impl Vars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Import every `MOGSQL_<NAME>` process variable as `<NAME>`.
    pub fn from_env() -> Self {
        Self::from_pairs(std::env::vars())
    }

    fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut vars = Self::new();
        for (key, value) in pairs {
            if let Some(name) = key.strip_prefix(ENV_PREFIX) {
                if !name.is_empty() {
                    vars.set(name, value);
                }
            }
        }
        vars
    }

    /// Builder-style set.
    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_ascii_uppercase(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(&name.to_ascii_uppercase())
            .map(String::as_str)
    }

    pub fn unset(&mut self, name: &str) -> Option<String> {
        self.values.remove(&name.to_ascii_uppercase())
    }
}
