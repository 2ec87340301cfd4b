//! Record predicates applied while draining describe pages.
//!
//! A predicate must be pure: it is called once per record, in page order,
//! and its result alone decides whether the record is kept.
//!
//! ```rust
//! use rds_finder::predicate;
//! use rds_finder::transport::v2::DbInstance;
//!
//! let available = predicate::status_is::<DbInstance>("available");
//! let postgres = |r: &DbInstance| r.engine.as_deref() == Some("postgres");
//! let both = predicate::all(available, postgres);
//!
//! let record = DbInstance {
//!     db_instance_status: Some("available".into()),
//!     engine: Some("postgres".into()),
//!     ..Default::default()
//! };
//! assert!(both(&record));
//! ```

use super::InstanceRecord;

/// A type-erased record predicate, as accepted by listers.
pub type DynPredicate<R> = dyn Fn(&R) -> bool + Send + Sync;

/// Accepts every record.
pub fn accept_all<R>() -> impl Fn(&R) -> bool + Send + Sync + Copy {
    |_| true
}

/// Accepts records that pass both predicates.
pub fn all<R, A, B>(a: A, b: B) -> impl Fn(&R) -> bool + Send + Sync
where
    A: Fn(&R) -> bool + Send + Sync,
    B: Fn(&R) -> bool + Send + Sync,
{
    move |r| a(r) && b(r)
}

/// Accepts records that pass either predicate.
pub fn any<R, A, B>(a: A, b: B) -> impl Fn(&R) -> bool + Send + Sync
where
    A: Fn(&R) -> bool + Send + Sync,
    B: Fn(&R) -> bool + Send + Sync,
{
    move |r| a(r) || b(r)
}

/// Accepts records whose status equals `status`.
pub fn status_is<R: InstanceRecord>(
    status: impl Into<String>,
) -> impl Fn(&R) -> bool + Send + Sync {
    let status = status.into();
    move |r| r.db_instance_status() == Some(status.as_str())
}
