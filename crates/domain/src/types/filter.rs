//! Search domains
//!
//! A domain is an ordered list of `(field, operator, value)` triples that the
//! backend interprets. The client never inspects it.

use serde::ser::{Serialize, SerializeTuple, Serializer};
use serde_json::Value;

/// One `(field, operator, value)` filter triple
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub operator: String,
    pub value: Value,
}

impl Condition {
    /// `[field, operator, value]` as sent on the wire
    pub fn to_value(&self) -> Value {
        Value::Array(vec![
            Value::from(self.field.as_str()),
            Value::from(self.operator.as_str()),
            self.value.clone(),
        ])
    }

    pub fn new(
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Self { field: field.into(), operator: operator.into(), value: value.into() }
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut triple = serializer.serialize_tuple(3)?;
        triple.serialize_element(&self.field)?;
        triple.serialize_element(&self.operator)?;
        triple.serialize_element(&self.value)?;
        triple.end()
    }
}

/// Backend filter expression
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
#[serde(transparent)]
pub struct Domain(Vec<Condition>);

impl Domain {
    /// Empty domain, matching every record
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a condition
    pub fn filter(
        mut self,
        field: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        self.0.push(Condition::new(field, operator, value));
        self
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_value(&self) -> Value {
        Value::Array(self.0.iter().map(Condition::to_value).collect())
    }
}

impl From<Vec<Condition>> for Domain {
    fn from(conditions: Vec<Condition>) -> Self {
        Self(conditions)
    }
}
