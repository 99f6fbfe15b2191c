//! Form fields and local validation.

use crate::{display_value, FieldErrors};
use clinic_config::is_valid_email;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;

/// Raw form contents as typed by the user, keyed by wire name.
pub type FormInput = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    NonNegativeInteger,
    PositiveDecimal,
    /// Id of another entity
    Reference,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Wire name in the draft, e.g. `fullName`
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
        }
    }

    /// Check one raw value and convert it to its JSON form.
    pub fn parse(&self, raw: &str) -> Result<Value, String> {
        let raw = raw.trim();
        if raw.is_empty() {
            if self.required {
                return Err(format!("{} is required", self.label));
            }
            return Ok(match self.kind {
                FieldKind::Text | FieldKind::Email => Value::String(String::new()),
                _ => Value::Null,
            });
        }

        match self.kind {
            FieldKind::Text => Ok(Value::String(raw.to_string())),
            FieldKind::Email if is_valid_email(raw) => Ok(Value::String(raw.to_string())),
            FieldKind::Email => Err("Enter a valid email address".to_string()),
            FieldKind::NonNegativeInteger => match raw.parse::<i64>() {
                Ok(n) if n >= 0 => Ok(Value::from(n)),
                _ => Err(format!("{} must be a whole number of zero or more", self.label)),
            },
            FieldKind::PositiveDecimal => raw
                .parse::<f64>()
                .ok()
                .filter(|n| *n > 0.0)
                .and_then(Number::from_f64)
                .map(Value::Number)
                .ok_or_else(|| format!("{} must be greater than zero", self.label)),
            FieldKind::Reference => match raw.parse::<i64>() {
                Ok(id) if id > 0 => Ok(Value::from(id)),
                _ => Err(format!("Select a valid {}", self.label.to_lowercase())),
            },
        }
    }
}

/// Validate every field, collecting all problems at once.
pub(crate) fn validate(fields: &[FieldSpec], form: &FormInput) -> Result<Map<String, Value>, FieldErrors> {
    let mut values = Map::new();
    let mut errors = FieldErrors::default();
    for field in fields {
        let raw = form.get(field.name).map(String::as_str).unwrap_or_default();
        match field.parse(raw) {
            Ok(value) => {
                values.insert(field.name.to_string(), value);
            }
            Err(message) => errors.insert(field.name, message),
        }
    }
    if errors.is_empty() {
        Ok(values)
    } else {
        Err(errors)
    }
}

/// Fill a form from a serialized draft.
pub(crate) fn prefill(fields: &[FieldSpec], draft: &Value) -> FormInput {
    fields
        .iter()
        .map(|field| {
            let shown = draft.get(field.name).map(display_value).unwrap_or_default();
            (field.name.to_string(), shown)
        })
        .collect()
}
