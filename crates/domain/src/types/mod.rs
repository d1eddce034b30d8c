//! Domain types and models

pub mod filter;
pub mod record;
pub mod session;

pub use filter::{Condition, Domain};
pub use record::{Ids, Record, RecordId};
pub use session::{Endpoint, Session};
