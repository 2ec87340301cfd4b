//! Core types for DB instance resolution.

mod classification;
mod context;
pub mod predicate;
mod query;
mod record;

pub use classification::{Classification, classify};
pub use context::{CallContext, CancelHandle};
pub use predicate::DynPredicate;
pub use query::{DescribeQuery, Filter, RESOURCE_ID_FILTER};
pub use record::InstanceRecord;
