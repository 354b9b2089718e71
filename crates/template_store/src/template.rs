//! The template record persisted by the store.
//!
//! The store is schema agnostic: apart from `id` and `updated_at`, every field
//! of a template is kept verbatim in [`Template::fields`] and written back
//! unchanged.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;

const ID_FIELD: &str = "id";
const UPDATED_AT_FIELD: &str = "updated_at";

/// A named configuration template.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use template_store::Template;
///
/// let template = Template::new("rate-limit")
///     .with_field("name", json!("Rate limit"))
///     .with_field("plugins", json!({ "limit-count": { "count": 100 } }));
///
/// let stored = serde_json::to_value(&template).unwrap();
/// assert_eq!(stored["id"], "rate-limit");
/// assert_eq!(stored["plugins"]["limit-count"]["count"], 100);
/// ```
///
/// `id` and `updated_at` always come from the struct fields. Entries with
/// those names in [`Template::fields`] are never written.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Template {
    /// Caller-chosen identifier, used verbatim as the last key segment.
    pub id: String,

    /// ISO-8601 timestamp of the last update made through the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    /// All remaining fields of the record.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Template {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            updated_at: None,
            fields: Map::new(),
        }
    }

    /// Adds a field to the record.
    ///
    /// `id` and `updated_at` set the corresponding struct fields instead. A
    /// non-string `id` is ignored; a non-string `updated_at` clears it.
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        let name = name.into();
        if name == ID_FIELD {
            if let Value::String(id) = value {
                self.id = id;
            }
        } else if name == UPDATED_AT_FIELD {
            self.updated_at = match value {
                Value::String(at) => Some(at),
                _ => None,
            };
        } else {
            self.fields.insert(name, value);
        }
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Sets `updated_at` to `now`, formatted as UTC with millisecond precision.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.fields.remove(UPDATED_AT_FIELD);
        self.updated_at = Some(now.to_rfc3339_opts(SecondsFormat::Millis, true));
    }

    fn is_reserved(name: &str) -> bool {
        name == ID_FIELD || name == UPDATED_AT_FIELD
    }
}

impl Serialize for Template {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(ID_FIELD, &self.id)?;
        if let Some(updated_at) = &self.updated_at {
            map.serialize_entry(UPDATED_AT_FIELD, updated_at)?;
        }
        for (name, value) in &self.fields {
            if !Self::is_reserved(name) {
                map.serialize_entry(name, value)?;
            }
        }
        map.end()
    }
}
