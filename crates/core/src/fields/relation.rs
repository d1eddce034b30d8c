//! Relation descriptors
//!
//! The two cardinalities share one capability set, `gather_ids` and `merge`,
//! and differ only in how ids are collected and how resolved records are
//! written back.

use std::collections::{HashMap, HashSet};

use erplink_domain::{Fault, Record, RecordId, Result};
use serde_json::Value;

use super::spec::FieldSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// x2many: the field holds a list of foreign ids
    Many,
    /// many2one: the field holds `[foreign_id, display_name]`
    ManyToOne,
}

/// A field to resolve against another model and inline into the result
#[derive(Debug, Clone, PartialEq)]
pub struct RelationDescriptor {
    field_name: String,
    target_model: String,
    sub_fields: FieldSpec,
    cardinality: Cardinality,
}

impl RelationDescriptor {
    pub fn new(
        field_name: impl Into<String>,
        target_model: impl Into<String>,
        sub_fields: impl Into<FieldSpec>,
        cardinality: Cardinality,
    ) -> Self {
        Self {
            field_name: field_name.into(),
            target_model: target_model.into(),
            sub_fields: sub_fields.into(),
            cardinality,
        }
    }

    /// x2many relation: every id of every record is resolved
    pub fn many(
        field_name: impl Into<String>,
        target_model: impl Into<String>,
        sub_fields: impl Into<FieldSpec>,
    ) -> Self {
        Self::new(field_name, target_model, sub_fields, Cardinality::Many)
    }

    /// many2one relation: resolved from the first record of the batch
    pub fn many_to_one(
        field_name: impl Into<String>,
        target_model: impl Into<String>,
        sub_fields: impl Into<FieldSpec>,
    ) -> Self {
        Self::new(field_name, target_model, sub_fields, Cardinality::ManyToOne)
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn target_model(&self) -> &str {
        &self.target_model
    }

    pub fn sub_fields(&self) -> &FieldSpec {
        &self.sub_fields
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Foreign ids the nested fetch must resolve
    ///
    /// `Many` collects the union of every record's ids in first-seen order.
    /// `ManyToOne` only looks at the first record of the batch; the other
    /// records are never consulted.
    ///
    /// # Errors
    /// `MalformedResponse` if the field is absent or not id-shaped.
    pub fn gather_ids(&self, records: &[Record]) -> Result<Vec<RecordId>> {
        match self.cardinality {
            Cardinality::Many => {
                let mut seen = HashSet::new();
                let mut ids = Vec::new();
                for record in records {
                    for id in self.many_ids(record)? {
                        if seen.insert(id) {
                            ids.push(id);
                        }
                    }
                }
                Ok(ids)
            }
            Cardinality::ManyToOne => match records.first() {
                Some(first) => Ok(self.many_to_one_id(first)?.into_iter().collect()),
                None => Ok(Vec::new()),
            },
        }
    }

    /// Replace the relation field of every record with resolved records
    ///
    /// `ids` is the output of [`gather_ids`](Self::gather_ids) and `resolved`
    /// indexes the nested fetch by id. `Many` fields become the list of
    /// nested records in the record's own id order. `ManyToOne` fields of
    /// every record become the single record resolved from the first record
    /// (or `null` when it had none), whatever id each record held.
    ///
    /// # Errors
    /// `MalformedResponse` if a referenced id is missing from `resolved` or a
    /// field is not id-shaped.
    pub fn merge(
        &self,
        records: &mut [Record],
        ids: &[RecordId],
        resolved: &HashMap<RecordId, Record>,
    ) -> Result<()> {
        match self.cardinality {
            Cardinality::Many => {
                for record in records.iter_mut() {
                    let nested = self
                        .many_ids(record)?
                        .into_iter()
                        .map(|id| self.lookup(resolved, id).map(Record::into_value))
                        .collect::<Result<Vec<_>>>()?;
                    record.insert(self.field_name.as_str(), Value::Array(nested));
                }
            }
            Cardinality::ManyToOne => {
                let target = match ids.first() {
                    Some(&id) => self.lookup(resolved, id)?.into_value(),
                    None => Value::Null,
                };
                for record in records.iter_mut() {
                    record.insert(self.field_name.as_str(), target.clone());
                }
            }
        }
        Ok(())
    }

    fn lookup(&self, resolved: &HashMap<RecordId, Record>, id: RecordId) -> Result<Record> {
        resolved.get(&id).cloned().ok_or_else(|| {
            Fault::malformed(format!(
                "{}#{} referenced by '{}' was not returned by the nested fetch",
                self.target_model, id, self.field_name
            ))
        })
    }

    fn field<'r>(&self, record: &'r Record) -> Result<&'r Value> {
        record.get(&self.field_name).ok_or_else(|| {
            Fault::malformed(format!(
                "field '{}' missing from record {:?}",
                self.field_name,
                record.id()
            ))
        })
    }

    // x2many values are id lists; an unset relation may come back as false
    fn many_ids(&self, record: &Record) -> Result<Vec<RecordId>> {
        match self.field(record)? {
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_i64().ok_or_else(|| self.not_id_shaped(item)))
                .collect(),
            Value::Bool(false) | Value::Null => Ok(Vec::new()),
            other => Err(self.not_id_shaped(other)),
        }
    }

    // many2one values are `[id, display_name]`, a bare id, or false when unset
    fn many_to_one_id(&self, record: &Record) -> Result<Option<RecordId>> {
        match self.field(record)? {
            Value::Array(pair) => match pair.first().and_then(Value::as_i64) {
                Some(id) => Ok(Some(id)),
                None => Err(self.not_id_shaped(&Value::Array(pair.clone()))),
            },
            Value::Number(n) => {
                n.as_i64().map(Some).ok_or_else(|| self.not_id_shaped(&Value::Number(n.clone())))
            }
            Value::Bool(false) | Value::Null => Ok(None),
            other => Err(self.not_id_shaped(other)),
        }
    }

    fn not_id_shaped(&self, value: &Value) -> Fault {
        Fault::malformed(format!("field '{}' holds {} instead of ids", self.field_name, value))
    }
}
