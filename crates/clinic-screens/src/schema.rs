use crate::form::validate;
use crate::{FieldErrors, FieldSpec, FormInput};
use clinic_resources::ResourceSpec;
use serde_json::{Map, Value};

/// A table column: header text and a dotted path into the entity JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub header: &'static str,
    pub path: &'static str,
}

impl Column {
    pub const fn new(header: &'static str, path: &'static str) -> Self {
        Self { header, path }
    }
}

/// Everything that differs between two entity screens.
#[derive(Debug, Clone, Copy)]
pub struct ScreenSchema {
    pub resource: ResourceSpec,
    /// Singular display name, used in notifications
    pub noun: &'static str,
    pub fields: &'static [FieldSpec],
    pub columns: &'static [Column],
    /// Dotted paths searched by the filter box
    pub search_fields: &'static [&'static str],
}

impl ScreenSchema {
    /// Check a form against [`Self::fields`] and build the draft JSON.
    pub fn validate(&self, form: &FormInput) -> Result<Map<String, Value>, FieldErrors> {
        validate(self.fields, form)
    }

    /// Case-insensitive substring match over the search fields.
    /// An empty term matches everything.
    pub fn matches(&self, row: &Value, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.search_fields.iter().any(|path| {
            lookup_path(row, path)
                .map(display_value)
                .is_some_and(|text| text.to_lowercase().contains(&term))
        })
    }

    /// Cell text for each column of `row`.
    pub fn cells(&self, row: &Value) -> Vec<String> {
        self.columns
            .iter()
            .map(|column| lookup_path(row, column.path).map(display_value).unwrap_or_default())
            .collect()
    }
}

/// Follow a dotted path (`owner.fullName`) through nested objects.
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, key| current.get(key))
}

/// Render a JSON value as plain text; null is empty.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
