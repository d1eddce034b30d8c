//! Field specifications and relational field expansion
//!
//! A [`FieldSpec`] lists the fields to fetch. Besides plain field names it
//! may contain [`RelationDescriptor`]s: fields whose ids are resolved with a
//! second fetch against the related model and inlined into the result.
//!
//! ```no_run
//! use erplink_core::fields::{FieldSpec, RelationDescriptor};
//!
//! let fields = FieldSpec::new()
//!     .field("name")
//!     .relation(RelationDescriptor::many("order_line", "sale.order.line", ["product_id", "qty"]))
//!     .relation(RelationDescriptor::many_to_one("partner_id", "res.partner", ["name", "email"]));
//! # let _ = fields;
//! ```
//!
//! The fetch for `sale.order` then works like this:
//! 1. read `sale.order` with `name`, `order_line`, `partner_id`
//! 2. read `sale.order.line` for every line id found in step 1
//! 3. read `res.partner` for the partner of the first order
//! 4. merge the related records into the orders

pub mod expand;
pub mod relation;
pub mod spec;

pub use expand::RelationExpander;
pub use relation::{Cardinality, RelationDescriptor};
pub use spec::{split, Field, FieldSpec, SplitFields};
