//! Environment overlay built from the `vars` input.
//!
//! The overlay is a value, not a mutation of the process environment: it is
//! applied additively to child processes (the verification run) and exported
//! by the host for downstream steps.

use serde_yaml::Value;
use std::collections::BTreeMap;
use std::ffi::OsString;

use crate::reporter::Reporter;

/// Additive set of environment variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvironmentOverlay {
    vars: BTreeMap<String, String>,
}

impl EnvironmentOverlay {
    /// Parse the `vars` input.
    ///
    /// A YAML mapping is tried first; anything else is read line by line as
    /// `key=value`. Malformed lines are skipped with a warning.
    #[must_use]
    pub fn parse(input: &str, reporter: &dyn Reporter) -> Self {
        if input.trim().is_empty() {
            return Self::default();
        }

        if let Ok(Value::Mapping(mapping)) = serde_yaml::from_str::<Value>(input) {
            let vars = mapping
                .iter()
                .map(|(k, v)| (yaml_to_string(k), yaml_to_string(v)))
                .filter(|(k, _)| !k.is_empty())
                .collect();
            return Self { vars };
        }

        let mut vars = BTreeMap::new();
        for line in input.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            match line.split_once('=') {
                Some((key, value)) if !key.trim().is_empty() => {
                    vars.insert(key.trim().to_string(), value.trim().to_string());
                }
                _ => reporter.warn(&format!("Ignoring malformed vars entry: {line}")),
            }
        }
        Self { vars }
    }

    /// Add or replace a variable.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }

    /// Value of `key`, if set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the overlay is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Iterate over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy of the overlay with `PATH` set to `search_path`.
    #[must_use]
    pub fn with_search_path(&self, search_path: &OsString) -> Vec<(OsString, OsString)> {
        self.iter()
            .filter(|(k, _)| *k != "PATH")
            .map(|(k, v)| (OsString::from(k), OsString::from(v)))
            .chain(std::iter::once((OsString::from("PATH"), search_path.clone())))
            .collect()
    }
}

fn yaml_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
