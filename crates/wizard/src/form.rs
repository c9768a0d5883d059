use dash_core::{DashError, Result};
use std::collections::BTreeMap;

/// Values entered into a wizard, keyed by field name.
///
/// The form is the only place answers live: summaries and validation read
/// straight from it. It also carries the invalid marks (with their inline
/// feedback) left by the last validation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Form {
    values:  BTreeMap<String, String>,
    invalid: BTreeMap<String, String>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a form from a flat TOML table of answers.
    ///
    /// Strings are taken as is, booleans become `"true"` / `"false"` and
    /// numbers their decimal text. Nested tables and arrays are rejected.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let table: toml::Table =
            toml::from_str(raw).map_err(|e| DashError::Config(format!("wizard answers: {e}")))?;

        let mut form = Self::new();
        for (key, value) in table {
            let text = match value {
                toml::Value::String(s)   => s,
                toml::Value::Boolean(b)  => b.to_string(),
                toml::Value::Integer(i)  => i.to_string(),
                toml::Value::Float(f)    => f.to_string(),
                other => {
                    return Err(DashError::Config(format!(
                        "wizard answers: '{key}' must be a string, number or boolean (got {})",
                        other.type_str()
                    )));
                }
            };
            form.set(key, text);
        }
        Ok(form)
    }

    /// Overlay `other`'s values on this form.
    pub fn merge(&mut self, other: Form) {
        self.values.extend(other.values);
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) {
        self.values.remove(name);
        self.invalid.remove(name);
    }

    /// Raw value, empty when unset.
    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    /// Trimmed value, empty when unset.
    pub fn value(&self, name: &str) -> &str {
        self.get(name).trim()
    }

    /// Checkbox state. `true`, `on`, `yes` and `1` count as checked.
    pub fn checked(&self, name: &str) -> bool {
        matches!(
            self.value(name).to_ascii_lowercase().as_str(),
            "true" | "on" | "yes" | "1"
        )
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn mark_invalid(&mut self, name: impl Into<String>, feedback: impl Into<String>) {
        self.invalid.insert(name.into(), feedback.into());
    }

    pub fn clear_invalid(&mut self, name: &str) {
        self.invalid.remove(name);
    }

    pub fn is_invalid(&self, name: &str) -> bool {
        self.invalid.contains_key(name)
    }

    /// Inline feedback shown under an invalid field.
    pub fn feedback(&self, name: &str) -> Option<&str> {
        self.invalid.get(name).map(String::as_str)
    }

    pub fn invalid_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.invalid.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
