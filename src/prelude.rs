//! Prelude module for convenient imports.
//!
//! ```rust
//! use rds_finder::prelude::*;
//! ```
//!
//! This provides access to:
//! - The resolver and its configuration
//! - Error types
//! - Queries, call contexts and the record trait

pub use crate::{
    config::ResolverConfig,
    error::{Error, ErrorKind, Result},
    resolver::{assert_single, Resolver},
    transport::{ApiGeneration, InstanceLister},
    types::{
        classify, predicate, CallContext, CancelHandle, Classification, DescribeQuery,
        DynPredicate, InstanceRecord,
    },
};
