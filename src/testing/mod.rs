//! Testing utilities for code that resolves DB instances.
//!
//! - [`InMemoryRds`]: a describe endpoint for both client generations, with
//!   filter semantics, pagination, fault injection and a request log
//! - [`InstanceFixture`]: a stored DB instance
//!
//! ## Quick Start
//!
//! ```rust
//! use rds_finder::{CallContext, ErrorKind, Resolver, ResolverConfig};
//! use rds_finder::testing::{InMemoryRds, InstanceFixture};
//!
//! # tokio_test::block_on(async {
//! let rds = InMemoryRds::new();
//! rds.insert(InstanceFixture::new("orders", "db-ORDERS00001"));
//! rds.insert(InstanceFixture::new("orders-replica", "db-ORDERS00001"));
//!
//! let resolver = Resolver::v1(rds.clone(), ResolverConfig::default()).unwrap();
//! let err = resolver
//!     .resolve_by_id(&CallContext::background(), "db-ORDERS00001")
//!     .await
//!     .unwrap_err();
//!
//! assert_eq!(err.kind(), ErrorKind::MultipleResults);
//! assert_eq!(rds.request_count(), 1);
//! # });
//! ```

mod in_memory;

pub use in_memory::{INVALID_PARAMETER_VALUE, InMemoryRds, InstanceFixture, RecordedRequest};
