//! Redaction of sensitive fields before logging or export.

use serde_json::{Map, Value};

use crate::config::RedactionConfig;

/// Marker written in place of sensitive values.
pub const REDACTED: &str = "[REDACTED]";

/// Built-in key fragments.
pub const DEFAULT_SENSITIVE_KEYS: &[&str] =
    &["ssn", "password", "accountnumber", "routingnumber", "creditcard"];

/// Which object keys hold sensitive values, and what replaces them.
///
/// A key matches when its lowercased form, with `_` and `-` removed,
/// contains any fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedactionPolicy {
    fragments: Vec<String>,
    marker: String,
}

impl Default for RedactionPolicy {
    fn default() -> Self {
        Self {
            fragments: DEFAULT_SENSITIVE_KEYS.iter().map(|k| k.to_string()).collect(),
            marker: REDACTED.to_string(),
        }
    }
}

impl RedactionPolicy {
    /// A policy with no fragments; nothing is redacted until some are added.
    pub fn empty() -> Self {
        Self {
            fragments: Vec::new(),
            marker: REDACTED.to_string(),
        }
    }

    pub fn from_config(config: &RedactionConfig) -> Self {
        let mut policy = Self::empty().with_marker(config.marker.clone());
        policy.extend(config.sensitive_keys.iter().chain(&config.extra_keys));
        policy
    }

    pub fn with_fragment(mut self, fragment: impl AsRef<str>) -> Self {
        self.add(fragment.as_ref());
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    pub fn extend<I, S>(&mut self, fragments: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for fragment in fragments {
            self.add(fragment.as_ref());
        }
    }

    fn add(&mut self, fragment: &str) {
        let normalized = normalize_key(fragment);
        if !normalized.is_empty() && !self.fragments.contains(&normalized) {
            self.fragments.push(normalized);
        }
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn is_sensitive(&self, key: &str) -> bool {
        let key = normalize_key(key);
        self.fragments.iter().any(|fragment| key.contains(fragment.as_str()))
    }

    /// Deep copy of `value` with sensitive values replaced.
    pub fn redact(&self, value: &Value) -> Value {
        match value {
            Value::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(key, v)| {
                        let v = if self.is_sensitive(key) {
                            Value::String(self.marker.clone())
                        } else {
                            self.redact(v)
                        };
                        (key.clone(), v)
                    })
                    .collect::<Map<String, Value>>(),
            ),
            Value::Array(items) => Value::Array(items.iter().map(|v| self.redact(v)).collect()),
            scalar => scalar.clone(),
        }
    }
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Redact with the built-in policy.
pub fn redact(value: &Value) -> Value {
    RedactionPolicy::default().redact(value)
}
