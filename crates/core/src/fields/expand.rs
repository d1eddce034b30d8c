//! Relation expander
//!
//! Resolves relation descriptors against a fetched batch: for each
//! descriptor in order, gather foreign ids, read the related model, index the
//! result by id, and merge it back. Nested fetches run one after another.
//!
//! Expansion is exactly one level deep. Relations inside a descriptor's
//! `sub_fields` are fetched as plain fields (raw ids) and never expanded.

use std::collections::HashMap;

use erplink_domain::{Ids, Record, RecordId, Result, Session};
use tracing::{debug, warn};

use super::relation::RelationDescriptor;
use super::spec::split;
use crate::dispatch::Dispatcher;

/// Merges related records into a primary batch
pub struct RelationExpander<'a> {
    dispatcher: &'a Dispatcher,
    session: &'a Session,
}

impl<'a> RelationExpander<'a> {
    pub fn new(dispatcher: &'a Dispatcher, session: &'a Session) -> Self {
        Self { dispatcher, session }
    }

    /// Expand every relation into `records`
    ///
    /// # Errors
    /// Propagates nested fetch faults and `MalformedResponse` from gather or
    /// merge. Records are returned only when every relation merged.
    pub fn expand(
        &self,
        mut records: Vec<Record>,
        relations: &[RelationDescriptor],
    ) -> Result<Vec<Record>> {
        for relation in relations {
            let ids = relation.gather_ids(&records)?;
            let resolved = self.fetch_related(relation, &ids)?;
            relation.merge(&mut records, &ids, &resolved)?;
        }
        Ok(records)
    }

    /// Single nested read for one descriptor, indexed by id
    fn fetch_related(
        &self,
        relation: &RelationDescriptor,
        ids: &[RecordId],
    ) -> Result<HashMap<RecordId, Record>> {
        if ids.is_empty() {
            debug!(
                field = relation.field_name(),
                model = relation.target_model(),
                "No related ids, skipping nested fetch"
            );
            return Ok(HashMap::new());
        }

        let nested = split(relation.sub_fields().clone());
        if !nested.relations.is_empty() {
            warn!(
                field = relation.field_name(),
                model = relation.target_model(),
                skipped = nested.relations.len(),
                "Nested relations are fetched as raw ids; expansion is one level deep"
            );
        }

        debug!(
            field = relation.field_name(),
            model = relation.target_model(),
            count = ids.len(),
            "Fetching related records"
        );

        let records = self.dispatcher.read(
            self.session,
            relation.target_model(),
            &Ids::from(ids),
            &nested.plain,
        )?;

        Ok(records.into_iter().filter_map(|r| r.id().map(|id| (id, r))).collect())
    }
}
