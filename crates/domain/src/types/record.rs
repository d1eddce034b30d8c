//! Records and record identifiers

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{Fault, Result};

/// Backend record identifier (always positive)
pub type RecordId = i64;

/// One entity instance: a mapping from field name to value
///
/// Records produced by fetch operations always carry an integer `id`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// The record's `id`, if present and integral
    pub fn id(&self) -> Option<RecordId> {
        self.0.get("id").and_then(Value::as_i64)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Set a field, returning the previous value
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(field.into(), value.into())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Convert a backend value into a record, requiring an integer `id`
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => {
                let record = Self(map);
                if record.id().is_none() {
                    return Err(Fault::malformed("record without an integer id"));
                }
                Ok(record)
            }
            other => Err(Fault::malformed(format!("expected a record object, got {other}"))),
        }
    }

    /// Convert a backend list of objects into records
    pub fn many_from_value(value: Value) -> Result<Vec<Self>> {
        match value {
            Value::Array(items) => items.into_iter().map(Self::from_value).collect(),
            other => Err(Fault::malformed(format!("expected a list of records, got {other}"))),
        }
    }
}

impl From<Map<String, Value>> for Record {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        record.into_value()
    }
}

/// An ordered batch of record ids
///
/// A single id is accepted wherever a batch is and normalized to a
/// one-element sequence.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ids(Vec<RecordId>);

impl Ids {
    pub fn as_slice(&self) -> &[RecordId] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<RecordId> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::from(self.0.clone())
    }
}

impl From<RecordId> for Ids {
    fn from(id: RecordId) -> Self {
        Self(vec![id])
    }
}

impl From<Vec<RecordId>> for Ids {
    fn from(ids: Vec<RecordId>) -> Self {
        Self(ids)
    }
}

impl From<&[RecordId]> for Ids {
    fn from(ids: &[RecordId]) -> Self {
        Self(ids.to_vec())
    }
}

impl<const N: usize> From<[RecordId; N]> for Ids {
    fn from(ids: [RecordId; N]) -> Self {
        Self(ids.to_vec())
    }
}
