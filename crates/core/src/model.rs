//! Model handle: search, read, create, write, and delete on one model

use erplink_domain::{Domain, Fault, FaultKind, Ids, Record, RecordId, Result};
use serde_json::{json, Map, Value};
use tracing::{debug, error, info};

use crate::client::ErpClient;
use crate::connection::classify::{is_linked_record, is_missing_record};
use crate::fields::{split, FieldSpec, RelationExpander};

/// Calls bound to one model of an authenticated client
pub struct Model<'c> {
    client: &'c ErpClient,
    name: String,
}

impl<'c> Model<'c> {
    pub(crate) fn new(client: &'c ErpClient, name: String) -> Self {
        Self { client, name }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn execute(&self, method: &str, args: Vec<Value>, kwargs: Map<String, Value>) -> Result<Value> {
        self.client.execute(&self.name, method, args, kwargs)
    }

    /// Call a record method; `ids` become the first positional argument
    pub fn call(
        &self,
        ids: impl Into<Ids>,
        method: &str,
        args: Vec<Value>,
        kwargs: Map<String, Value>,
    ) -> Result<Value> {
        let ids = ids.into();
        debug!(model = %self.name, ids = ?ids.as_slice(), %method, "Call records");

        let mut call_args = Vec::with_capacity(args.len() + 1);
        call_args.push(ids.to_value());
        call_args.extend(args);
        self.execute(method, call_args, kwargs)
    }

    /// Call a model-level method
    pub fn call_model(
        &self,
        method: &str,
        args: Vec<Value>,
        kwargs: Map<String, Value>,
    ) -> Result<Value> {
        debug!(model = %self.name, %method, "Call model");
        self.execute(method, args, kwargs)
    }

    /// Ids of records matching `domain`
    ///
    /// A zero `offset` or `limit` is treated as unset.
    pub fn search(
        &self,
        domain: &Domain,
        offset: Option<u64>,
        limit: Option<u64>,
    ) -> Result<Vec<RecordId>> {
        debug!(model = %self.name, domain = %domain.to_value(), "Search");

        let mut kwargs = Map::new();
        insert_paging(&mut kwargs, offset, limit);
        let value = self.execute("search", vec![domain.to_value()], kwargs)?;
        parse_ids(value)
    }

    /// Read `ids` with `fields`, expanding relation fields
    pub fn browse(&self, ids: impl Into<Ids>, fields: impl Into<FieldSpec>) -> Result<Vec<Record>> {
        let ids = ids.into();
        debug!(model = %self.name, ids = ?ids.as_slice(), "Read");

        let fields = split(fields.into());
        let records = self.client.dispatcher().read(
            self.client.session(),
            &self.name,
            &ids,
            &fields.plain,
        )?;
        self.expander().expand(records, &fields.relations)
    }

    /// Search and read in one call, expanding relation fields
    pub fn search_browse(
        &self,
        domain: &Domain,
        fields: impl Into<FieldSpec>,
        offset: Option<u64>,
        limit: Option<u64>,
    ) -> Result<Vec<Record>> {
        debug!(model = %self.name, domain = %domain.to_value(), "Search_Read");

        let fields = split(fields.into());
        let mut kwargs = Map::new();
        kwargs.insert("fields".into(), json!(fields.plain));
        insert_paging(&mut kwargs, offset, limit);

        let value = self.execute("search_read", vec![domain.to_value()], kwargs)?;
        let records = Record::many_from_value(value)?;
        self.expander().expand(records, &fields.relations)
    }

    /// Number of records matching `domain`
    pub fn search_count(&self, domain: &Domain) -> Result<u64> {
        debug!(model = %self.name, domain = %domain.to_value(), "Search_Count");

        let value = self.execute("search_count", vec![domain.to_value()], Map::new())?;
        value
            .as_u64()
            .ok_or_else(|| Fault::malformed(format!("search_count returned {value}")))
    }

    /// Create a record and return its id
    pub fn create(&self, values: Map<String, Value>) -> Result<RecordId> {
        info!(model = %self.name, fields = ?values.keys().collect::<Vec<_>>(), "Create");

        let value = self.execute("create", vec![Value::Object(values)], Map::new())?;
        value
            .as_i64()
            .ok_or_else(|| Fault::malformed(format!("create returned {value}")))
    }

    /// Update `ids` with `values`
    pub fn write(&self, ids: impl Into<Ids>, values: Map<String, Value>) -> Result<bool> {
        let ids = ids.into();
        info!(
            model = %self.name,
            ids = ?ids.as_slice(),
            fields = ?values.keys().collect::<Vec<_>>(),
            "Write"
        );

        let value = self.execute("write", vec![ids.to_value(), Value::Object(values)], Map::new())?;
        Ok(is_truthy(&value))
    }

    /// Delete `ids`
    ///
    /// Returns `Ok(false)` instead of a fault when the ids no longer exist or
    /// other records still reference them.
    ///
    /// # Errors
    /// Any other fault, unchanged.
    pub fn delete(&self, ids: impl Into<Ids>) -> Result<bool> {
        let ids = ids.into();
        info!(model = %self.name, ids = ?ids.as_slice(), "Unlink");

        let result = self.client.dispatcher().execute_unlogged(
            self.client.session(),
            &self.name,
            "unlink",
            vec![ids.to_value()],
            Map::new(),
        );

        match result {
            Ok(value) => Ok(is_truthy(&value)),
            Err(fault) => match fault.remote() {
                Some(remote) if is_missing_record(remote) => {
                    error!(
                        model = %self.name,
                        ids = ?ids.as_slice(),
                        kind = %FaultKind::RecordNotFound,
                        "Could not delete records: does not exist"
                    );
                    Ok(false)
                }
                Some(remote) if is_linked_record(remote) => {
                    error!(
                        model = %self.name,
                        ids = ?ids.as_slice(),
                        kind = %FaultKind::RecordLinked,
                        "Could not delete records: other records rely on these"
                    );
                    Ok(false)
                }
                _ => {
                    error!(
                        model = %self.name,
                        ids = ?ids.as_slice(),
                        error = %fault,
                        "Error in execute"
                    );
                    Err(fault)
                }
            },
        }
    }

    fn expander(&self) -> RelationExpander<'_> {
        RelationExpander::new(self.client.dispatcher(), self.client.session())
    }
}

fn insert_paging(kwargs: &mut Map<String, Value>, offset: Option<u64>, limit: Option<u64>) {
    if let Some(offset) = offset.filter(|o| *o > 0) {
        kwargs.insert("offset".into(), json!(offset));
    }
    if let Some(limit) = limit.filter(|l| *l > 0) {
        kwargs.insert("limit".into(), json!(limit));
    }
}

fn parse_ids(value: Value) -> Result<Vec<RecordId>> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_i64()
                    .ok_or_else(|| Fault::malformed(format!("expected record id, got {item}")))
            })
            .collect(),
        other => Err(Fault::malformed(format!("expected a list of ids, got {other}"))),
    }
}

/// Backend truthiness: `false`, `null`, zero, and empty values are falsy
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
