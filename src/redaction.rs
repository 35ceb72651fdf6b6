//! Context redaction: key-name-based scrubbing of sensitive values.

use crate::config::RedactionConfig;
use crate::event::Context;
use serde_json::Value;

/// Key substrings that always mark a value as sensitive. Matching is by
/// containment, not equality: `auth_token`, `api_key`, and
/// `user_password_hint` must all be caught.
const SENSITIVE_TERMS: &[&str] = &[
    "password",
    "secret",
    "token",
    "auth",
    "key",
    "credential",
    "credit_card",
    "card_number",
    "cvv",
    "ssn",
];

/// Scrubs context bags before they reach any log stream or sink.
///
/// Redaction is key-name-aware only, never key-path-aware: the same term
/// list applies at every nesting level. Null-valued entries are dropped
/// outright rather than redacted, so semantically-empty noise is never
/// persisted.
#[derive(Debug, Clone)]
pub struct Redactor {
    terms: Vec<String>,
    marker: String,
    max_depth: usize,
}

impl Redactor {
    pub fn new(config: &RedactionConfig) -> Self {
        let mut terms: Vec<String> = SENSITIVE_TERMS.iter().map(|t| t.to_string()).collect();
        for term in &config.extra_terms {
            let term = term.to_lowercase();
            if !term.is_empty() && !terms.contains(&term) {
                terms.push(term);
            }
        }
        Self {
            terms,
            marker: config.marker.clone(),
            max_depth: config.max_depth,
        }
    }

    /// Whether a key's lower-cased form contains any sensitive term.
    pub fn is_sensitive(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.terms.iter().any(|term| key.contains(term))
    }

    /// Produce a scrubbed copy of `context`: same shape, same key order,
    /// sensitive values replaced with the marker, nulls removed.
    pub fn redact(&self, context: &Context) -> Context {
        self.redact_map(context, 0)
    }

    fn redact_map(&self, map: &Context, depth: usize) -> Context {
        let mut out = Context::new();
        for (key, value) in map {
            if value.is_null() {
                continue;
            }
            if self.is_sensitive(key) {
                out.insert(key.clone(), Value::String(self.marker.clone()));
                continue;
            }
            out.insert(key.clone(), self.redact_value(value, depth + 1));
        }
        out
    }

    fn redact_value(&self, value: &Value, depth: usize) -> Value {
        // serde_json trees cannot be cyclic, but the depth cap still bounds
        // pathological nesting.
        if depth >= self.max_depth {
            return Value::String(self.marker.clone());
        }
        match value {
            Value::Object(map) => Value::Object(self.redact_map(map, depth)),
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .filter(|item| !item.is_null())
                    .map(|item| self.redact_value(item, depth + 1))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new(&RedactionConfig::default())
    }
}
