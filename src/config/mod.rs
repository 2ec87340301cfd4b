//! Configuration types for DB instance resolution.
//!
//! - [`ResolverConfig`]: page size, per-call timeout, and the by-name fallback switch

mod resolver;

pub use resolver::{MAX_MAX_RECORDS, MIN_MAX_RECORDS, ResolverConfig};
