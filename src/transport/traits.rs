//! Lister trait definitions and common types.
//!
//! This module defines the capability the resolver needs from an API client
//! generation: issue a describe query and drain every page of it.

use std::collections::HashSet;

use crate::types::{CallContext, DescribeQuery, DynPredicate, InstanceRecord};
use crate::Error;

// ============================================================================
// API Generation
// ============================================================================

/// API client generations the resolver can drive.
///
/// - **V1**: page callbacks with an explicit last-page flag and string fault
///   codes
/// - **V2**: a single describe call returning a record slice plus an optional
///   marker, with typed fault variants
///
/// ## Example
///
/// ```rust
/// use rds_finder::ApiGeneration;
///
/// let generation = ApiGeneration::V2;
/// assert!(generation.is_v2());
/// assert_eq!(generation.to_string(), "v2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiGeneration {
    /// Page-callback client with string fault codes.
    V1,
    /// Marker-paginated client with typed faults.
    V2,
}

impl ApiGeneration {
    /// Returns `true` if this is the v1 generation.
    pub fn is_v1(&self) -> bool {
        matches!(self, ApiGeneration::V1)
    }

    /// Returns `true` if this is the v2 generation.
    pub fn is_v2(&self) -> bool {
        matches!(self, ApiGeneration::V2)
    }
}

impl std::fmt::Display for ApiGeneration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiGeneration::V1 => write!(f, "v1"),
            ApiGeneration::V2 => write!(f, "v2"),
        }
    }
}

// ============================================================================
// Lister Trait
// ============================================================================

/// Drains a describe-DB-instances query to completion.
///
/// Implementations must:
/// - keep fetching until the API signals the final page;
/// - apply `predicate` to every record and keep passing records in
///   response order;
/// - run every round-trip through [`CallContext::run`];
/// - translate the API's "DB instance not found" fault into
///   [`ErrorKind::NotFound`](crate::ErrorKind::NotFound) carrying the query,
///   and every other fault into a transport kind.
#[async_trait::async_trait]
pub trait InstanceLister: Send + Sync {
    /// The generation's DB instance record type.
    type Record: InstanceRecord + Clone + Send + Sync + 'static;

    /// Returns the client generation this lister drives.
    fn generation(&self) -> ApiGeneration;

    /// Lists every record matching `query` that passes `predicate`.
    async fn list(
        &self,
        ctx: &CallContext,
        query: &DescribeQuery,
        predicate: &DynPredicate<Self::Record>,
    ) -> Result<Vec<Self::Record>, Error>;
}

/// Checks that a paginated drain can make progress to `next`.
///
/// `seen` holds every marker handed out earlier in the same drain. Returns
/// the marker to request next, or a protocol error when the API hands out
/// any marker a second time.
pub(crate) fn advance_marker(
    seen: &mut HashSet<String>,
    next: String,
    query: &DescribeQuery,
) -> Result<String, Error> {
    if !seen.insert(next.clone()) {
        return Err(Error::protocol(format!(
            "describe pagination repeated marker {:?} after {} pages",
            next,
            seen.len() + 1
        ))
        .with_last_request(query.clone()));
    }
    Ok(next)
}
