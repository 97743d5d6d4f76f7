//! Filter state bound to a list view.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mapping of filter field to scalar value. An empty string means "no filter".
///
/// The declared defaults are kept alongside the live values so that
/// [`FilterState::reset`] always restores the initial shape.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    values: BTreeMap<String, String>,
    defaults: BTreeMap<String, String>,
}

impl FilterState {
    /// Declares the filter fields and their default values.
    pub fn new<I, K, V>(defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let defaults: BTreeMap<String, String> = defaults
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: defaults.clone(),
            defaults,
        }
    }

    /// Declares the filter fields, all defaulting to "no filter".
    pub fn with_fields<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        Self::new(fields.into_iter().map(|f| (f, String::new())))
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.values.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Whether any field currently narrows the listing.
    pub fn is_active(&self) -> bool {
        self.values.values().any(|v| !v.trim().is_empty())
    }

    /// Restores every field to its declared default, dropping ad hoc fields.
    pub fn reset(&mut self) {
        self.values = self.defaults.clone();
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Serializes the non-empty fields as a form-encoded query string.
    pub fn to_query(&self) -> String {
        let pairs: Vec<(&str, &str)> = self
            .values
            .iter()
            .map(|(k, v)| (k.as_str(), v.trim()))
            .filter(|(_, v)| !v.is_empty())
            .collect();

        serde_html_form::to_string(&pairs).unwrap_or_default()
    }

    /// Appends the query string to `endpoint`, or returns it unchanged when
    /// nothing is filtered.
    pub fn apply_to(&self, endpoint: &str) -> String {
        let query = self.to_query();
        if query.is_empty() {
            return endpoint.to_string();
        }
        let separator = if endpoint.contains('?') { '&' } else { '?' };
        format!("{endpoint}{separator}{query}")
    }
}
