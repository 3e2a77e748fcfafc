//! Field-level validation errors and the rules shared by request payloads.
//!
//! Messages follow the wording API clients already expect, e.g.
//! `"The email field is required."`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$")
        .expect("email pattern is valid")
});

/// Messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(field, messages)| (field.as_str(), messages.as_slice()))
    }

    /// Total number of messages across all fields
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// First message, suffixed with how many others were collected
    pub fn summary(&self) -> String {
        let first = self
            .0
            .values()
            .flat_map(|messages| messages.iter())
            .next()
            .cloned()
            .unwrap_or_else(|| "The given data was invalid.".to_string());

        match self.len().saturating_sub(1) {
            0 => first,
            1 => format!("{} (and 1 more error)", first),
            n => format!("{} (and {} more errors)", first, n),
        }
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.summary())
    }
}

pub fn required_message(field: &str) -> String {
    format!("The {} field is required.", field.replace('_', " "))
}

/// A present, non-blank string. Records an error and returns `None` otherwise.
pub fn required_str<'a>(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&'a str>,
) -> Option<&'a str> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v),
        _ => {
            errors.add(field, required_message(field));
            None
        }
    }
}

/// A present JSON string. Null, missing and blank values are "required"
/// errors; any other JSON type is a "must be a string" error.
pub fn required_json_str<'a>(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&'a Value>,
) -> Option<&'a str> {
    match value {
        None | Some(Value::Null) => {
            errors.add(field, required_message(field));
            None
        }
        Some(Value::String(s)) => required_str(errors, field, Some(s.as_str())),
        Some(_) => {
            errors.add(field, format!("The {} must be a string.", field.replace('_', " ")));
            None
        }
    }
}

/// A present integer, given either as a JSON number or a numeric string.
pub fn required_json_integer(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&Value>,
) -> Option<i64> {
    let parsed = match value {
        None | Some(Value::Null) => {
            errors.add(field, required_message(field));
            return None;
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.add(field, required_message(field));
            return None;
        }
        Some(Value::Number(n)) => n.as_i64(),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };

    if parsed.is_none() {
        errors.add(
            field,
            format!("The {} must be an integer.", field.replace('_', " ")),
        );
    }
    parsed
}

/// `max:N` on a string, counted in characters
pub fn max_chars(errors: &mut ValidationErrors, field: &str, value: &str, max: usize) -> bool {
    if value.chars().count() > max {
        errors.add(
            field,
            format!(
                "The {} must not be greater than {} characters.",
                field.replace('_', " "),
                max
            ),
        );
        return false;
    }
    true
}

pub fn is_valid_email(email: &str) -> bool {
    email.len() <= 255 && EMAIL_RE.is_match(email)
}

pub fn email(errors: &mut ValidationErrors, field: &str, value: &str) -> bool {
    if !is_valid_email(value) {
        errors.add(
            field,
            format!("The {} must be a valid email address.", field.replace('_', " ")),
        );
        return false;
    }
    true
}
