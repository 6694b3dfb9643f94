use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use uuid::Uuid;

const LOCAL_ID_PREFIX: &str = "local-";

/// Identifier assigned to a persisted record.
///
/// Servers hand out either numeric or string keys; both are accepted verbatim.
/// Numbers that are not unsigned integers are kept as-is in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(u64),
    Text(String),
    Other(Number),
}

impl RecordId {
    /// Generates a session-unique identifier that never came from the server.
    pub fn local() -> Self {
        RecordId::Text(format!("{}{}", LOCAL_ID_PREFIX, Uuid::new_v4().simple()))
    }

    pub fn is_local(&self) -> bool {
        matches!(self, RecordId::Text(text) if text.starts_with(LOCAL_ID_PREFIX))
    }

    /// Path segment used when addressing the record on the server.
    pub fn as_path_segment(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(value) => write!(f, "{value}"),
            RecordId::Text(value) => f.write_str(value),
            RecordId::Other(value) => write!(f, "{value}"),
        }
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        RecordId::Number(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

/// A user entity as a flat field map plus its server identifier, if any.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Record {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: impl Into<RecordId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Text form of a field suitable for display or for seeding a draft.
    ///
    /// Missing and `null` values read as the empty string.
    pub fn text(&self, name: &str) -> String {
        match self.fields.get(name) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(value)) => value.clone(),
            Some(other) => other.to_string(),
        }
    }

    /// Overlays every field of `patch` onto this record. The identifier is kept.
    pub fn merge(&mut self, patch: &Record) {
        for (key, value) in &patch.fields {
            self.fields.insert(key.clone(), value.clone());
        }
    }
}

impl From<&Draft> for Record {
    fn from(draft: &Draft) -> Self {
        let fields = draft
            .iter()
            .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
            .collect();
        Record { id: None, fields }
    }
}

/// In-progress field values for one form session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct Draft {
    values: BTreeMap<String, String>,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Draft {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}
