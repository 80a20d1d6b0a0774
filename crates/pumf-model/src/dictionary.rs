//! Code-to-label dictionaries.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mapping from integer codes to normalized labels for one coded field.
///
/// Codes are stored as integers so that `"10"`, `"10.0"` and `10` all
/// resolve to the same entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelDictionary {
    /// Name of the coded field this dictionary decodes.
    pub field: String,
    labels: BTreeMap<i64, String>,
}

impl LabelDictionary {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            labels: BTreeMap::new(),
        }
    }

    /// Inserts a code-label pair.
    ///
    /// Returns `false` and leaves the dictionary unchanged when the code is
    /// already present.
    pub fn insert(&mut self, code: i64, label: impl Into<String>) -> bool {
        if self.labels.contains_key(&code) {
            return false;
        }
        self.labels.insert(code, label.into());
        true
    }

    pub fn get(&self, code: i64) -> Option<&str> {
        self.labels.get(&code).map(String::as_str)
    }

    /// Looks up a code given in any textual form accepted by [`parse_code`].
    pub fn lookup_text(&self, raw: &str) -> Option<&str> {
        parse_code(raw).and_then(|code| self.get(code))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterates over code-label pairs in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> + '_ {
        self.labels.iter().map(|(code, label)| (*code, label.as_str()))
    }

    pub fn codes(&self) -> impl Iterator<Item = i64> + '_ {
        self.labels.keys().copied()
    }
}

/// Coerces a textual code to an integer.
///
/// Accepts integers and integral floats (`"3"`, `" 3 "`, `"3.0"`, `"3e0"`);
/// anything else, including blanks and fractional values, is not a code.
pub fn parse_code(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(code) = trimmed.parse::<i64>() {
        return Some(code);
    }
    let value = trimmed.parse::<f64>().ok()?;
    integral_f64(value)
}

/// Converts a float to an integer code when it has no fractional part.
pub fn integral_f64(value: f64) -> Option<i64> {
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    if value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return None;
    }
    Some(value as i64)
}
