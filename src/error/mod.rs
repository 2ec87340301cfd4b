//! Error types for DB instance resolution.
//!
//! Every operation returns [`Error`], categorized by [`ErrorKind`]:
//!
//! - [`ErrorKind::NotFound`]: no record matched in any applicable namespace
//! - [`ErrorKind::MultipleResults`]: the identifier is ambiguous
//! - anything else: a transport failure from the API client
//!
//! ## Key Invariant
//!
//! Only `NotFound` is interpreted by the resolver (it drives the by-name
//! fallback). All other errors are returned to the caller unchanged.
//!
//! ```rust,ignore
//! match resolver.resolve_by_id(&ctx, "db-BE6UI2KLPQP3OVDYD74ZEV6NUM").await {
//!     Ok(instance) => println!("found {:?}", instance.db_instance_identifier),
//!     Err(e) if e.is_not_found() => println!("instance does not exist"),
//!     Err(e) => return Err(e),
//! }
//! ```

mod core;
mod kind;

pub use core::Error;
pub use kind::ErrorKind;

/// A specialized `Result` type for resolution operations.
pub type Result<T> = std::result::Result<T, Error>;
