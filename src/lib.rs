//! # rds-finder
//!
//! Resolve an RDS DB instance from an identifier that may be either its
//! platform-generated resource ID (`db-...`) or its user-chosen DB instance
//! identifier.
//!
//! ## Quick Start
//!
//! ```rust
//! use rds_finder::prelude::*;
//! use rds_finder::testing::{InMemoryRds, InstanceFixture};
//!
//! # tokio_test::block_on(async {
//! // Any client implementing the v2 describe contract works here.
//! let rds = InMemoryRds::new();
//! rds.insert(InstanceFixture::new("billing", "db-BE6UI2KLPQP3OVDYD74ZEV6NUM"));
//!
//! let resolver = Resolver::v2(rds, ResolverConfig::default())?;
//! let ctx = CallContext::background();
//!
//! let instance = resolver.resolve_by_id(&ctx, "db-BE6UI2KLPQP3OVDYD74ZEV6NUM").await?;
//! assert_eq!(instance.db_instance_identifier.as_deref(), Some("billing"));
//! # Ok::<(), rds_finder::Error>(())
//! # }).unwrap();
//! ```
//!
//! ## Key Concepts
//!
//! - **Classification**: `db-` followed by 2 to 255 ASCII letters or digits
//!   looks like a resource ID; everything else looks like an identifier
//! - **Fallback**: a resource-ID-shaped value that matches nothing is retried
//!   once as an identifier, since identifiers may start with `db-` too
//! - **Exactly one**: zero matches is [`ErrorKind::NotFound`]; more than one
//!   is [`ErrorKind::MultipleResults`] and is never retried
//! - **Two generations**: [`transport::v1`] (page callbacks, string fault
//!   codes) and [`transport::v2`] (markers, typed faults) run the same
//!   algorithm through [`InstanceLister`]

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

// Core modules
pub mod config;
pub mod error;
pub mod resolver;
pub mod types;

// Client generations
pub mod transport;

// Testing utilities
pub mod testing;

// Prelude for convenient imports
pub mod prelude;

// Re-export main types at crate root for convenience
pub use config::ResolverConfig;
pub use error::{Error, ErrorKind};
pub use resolver::{assert_single, Resolver};
pub use transport::{ApiGeneration, InstanceLister};
pub use types::{
    classify, predicate, CallContext, CancelHandle, Classification, DescribeQuery, DynPredicate,
    Filter, InstanceRecord, RESOURCE_ID_FILTER,
};
