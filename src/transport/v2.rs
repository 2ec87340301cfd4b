//! V2 client generation: marker pagination and typed faults.
//!
//! The v2 describe call returns an optional output holding a complete
//! record slice and, when more records exist, a `marker`. A client that
//! never returns a marker is simply non-paginated. Faults are variants of
//! [`DescribeDbInstancesError`]; "not found" is its own variant.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;
use crate::transport::traits::{advance_marker, ApiGeneration, InstanceLister};
use crate::types::{CallContext, DescribeQuery, DynPredicate, InstanceRecord};
use crate::Error;

// ============================================================================
// Wire Types
// ============================================================================

/// A v2 describe filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Filter {
    /// Filter name.
    pub name: Option<String>,
    /// Filter values.
    #[serde(default)]
    pub values: Vec<String>,
}

/// Input for a v2 describe-DB-instances call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeDbInstancesInput {
    /// Filters to apply.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
    /// Look up a single instance by identifier.
    #[serde(rename = "DBInstanceIdentifier", skip_serializing_if = "Option::is_none")]
    pub db_instance_identifier: Option<String>,
    /// Marker from the previous output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    /// Page size hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_records: Option<i32>,
}

impl From<&DescribeQuery> for DescribeDbInstancesInput {
    fn from(query: &DescribeQuery) -> Self {
        Self {
            filters: query
                .filters
                .iter()
                .map(|f| Filter {
                    name: Some(f.name.clone()),
                    values: f.values.clone(),
                })
                .collect(),
            db_instance_identifier: query.db_instance_identifier.clone(),
            marker: None,
            max_records: None,
        }
    }
}

/// Network endpoint of a DB instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Endpoint {
    /// DNS address.
    pub address: Option<String>,
    /// Listener port.
    pub port: Option<i32>,
}

/// A v2 DB instance record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DbInstance {
    /// User-chosen identifier.
    #[serde(rename = "DBInstanceIdentifier")]
    pub db_instance_identifier: Option<String>,
    /// Platform-generated resource ID.
    pub dbi_resource_id: Option<String>,
    /// Instance ARN.
    #[serde(rename = "DBInstanceArn")]
    pub db_instance_arn: Option<String>,
    /// Instance class.
    #[serde(rename = "DBInstanceClass")]
    pub db_instance_class: Option<String>,
    /// Instance status.
    #[serde(rename = "DBInstanceStatus")]
    pub db_instance_status: Option<String>,
    /// Engine name.
    pub engine: Option<String>,
    /// Engine version.
    pub engine_version: Option<String>,
    /// Connection endpoint.
    pub endpoint: Option<Endpoint>,
    /// Whether the instance spans availability zones.
    #[serde(rename = "MultiAZ")]
    pub multi_az: Option<bool>,
    /// Creation time.
    pub instance_create_time: Option<DateTime<Utc>>,
}

impl InstanceRecord for DbInstance {
    fn db_instance_identifier(&self) -> Option<&str> {
        self.db_instance_identifier.as_deref()
    }

    fn dbi_resource_id(&self) -> Option<&str> {
        self.dbi_resource_id.as_deref()
    }

    fn db_instance_status(&self) -> Option<&str> {
        self.db_instance_status.as_deref()
    }
}

/// Output of a v2 describe call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeDbInstancesOutput {
    /// Records in this output.
    #[serde(rename = "DBInstances", default)]
    pub db_instances: Vec<DbInstance>,
    /// Marker for the next output; absent on the final one.
    pub marker: Option<String>,
}

/// The typed "no such DB instance" fault.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("DBInstanceNotFound: {message}")]
pub struct DbInstanceNotFoundFault {
    /// Fault message.
    pub message: String,
    /// Service request ID.
    pub request_id: Option<String>,
}

/// Errors a v2 describe call can return.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum DescribeDbInstancesError {
    /// No DB instance has the requested identifier.
    #[error(transparent)]
    DbInstanceNotFoundFault(DbInstanceNotFoundFault),

    /// Any other service-side fault.
    #[error("{code}: {message}")]
    Service {
        /// Fault code.
        code: String,
        /// Fault message.
        message: String,
        /// Service request ID.
        request_id: Option<String>,
    },

    /// The request timed out in the SDK.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// The request could not be dispatched (DNS, TLS, connection).
    #[error("dispatch failure: {0}")]
    Dispatch(String),
}

impl DescribeDbInstancesError {
    /// Creates a not found fault.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::DbInstanceNotFoundFault(DbInstanceNotFoundFault {
            message: message.into(),
            request_id: None,
        })
    }

    /// Creates a service fault.
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Service {
            code: code.into(),
            message: message.into(),
            request_id: None,
        }
    }

    /// Returns `true` for the typed not found fault.
    pub fn is_db_instance_not_found_fault(&self) -> bool {
        matches!(self, Self::DbInstanceNotFoundFault(_))
    }
}

// ============================================================================
// Client Contract
// ============================================================================

/// The v2 describe call the host wraps around its SDK client.
#[async_trait::async_trait]
pub trait DescribeDbInstancesApi: Send + Sync {
    /// Describes DB instances starting at `input.marker`.
    ///
    /// `Ok(None)` means the service returned no output object.
    async fn describe_db_instances(
        &self,
        input: &DescribeDbInstancesInput,
    ) -> Result<Option<DescribeDbInstancesOutput>, DescribeDbInstancesError>;
}

// ============================================================================
// Lister
// ============================================================================

/// Follows v2 describe markers until none is returned.
#[derive(Debug, Clone)]
pub struct PaginatorLister<C> {
    client: C,
    max_records: Option<i32>,
}

impl<C> PaginatorLister<C> {
    /// Creates a lister over a v2 client.
    pub fn new(client: C) -> Self {
        Self {
            client,
            max_records: None,
        }
    }

    /// Sets the page size hint sent with every request.
    #[must_use]
    pub fn with_max_records(mut self, max_records: u32) -> Self {
        self.max_records = Some(i32::try_from(max_records).unwrap_or(i32::MAX));
        self
    }

    /// Returns the wrapped client.
    pub fn client(&self) -> &C {
        &self.client
    }
}

#[async_trait::async_trait]
impl<C: DescribeDbInstancesApi> InstanceLister for PaginatorLister<C> {
    type Record = DbInstance;

    fn generation(&self) -> ApiGeneration {
        ApiGeneration::V2
    }

    async fn list(
        &self,
        ctx: &CallContext,
        query: &DescribeQuery,
        predicate: &DynPredicate<DbInstance>,
    ) -> Result<Vec<DbInstance>, Error> {
        let mut input = DescribeDbInstancesInput::from(query);
        input.max_records = self.max_records;

        let mut output = Vec::new();
        let mut markers = HashSet::new();
        let mut page_number = 0u32;

        loop {
            page_number += 1;
            let operation = format!("v2 describe page {}", page_number);
            let response = ctx
                .run(&operation, async {
                    self.client
                        .describe_db_instances(&input)
                        .await
                        .map_err(|e| translate_error(e, query))
                })
                .await?;

            let Some(response) = response else {
                tracing::trace!(generation = "v2", page = page_number, "describe returned no output");
                break;
            };

            let seen = response.db_instances.len();
            let matched_before = output.len();
            output.extend(response.db_instances.into_iter().filter(|i| predicate(i)));
            tracing::trace!(
                generation = "v2",
                page = page_number,
                seen,
                matched = output.len() - matched_before,
                has_marker = response.marker.is_some(),
                "received describe page"
            );

            match response.marker {
                Some(next) if !next.is_empty() => {
                    input.marker = Some(advance_marker(&mut markers, next, query)?);
                }
                _ => break,
            }
        }

        Ok(output)
    }
}

/// Maps a v2 error onto the crate error taxonomy.
fn translate_error(err: DescribeDbInstancesError, query: &DescribeQuery) -> Error {
    let (kind, message, code, request_id) = match &err {
        DescribeDbInstancesError::DbInstanceNotFoundFault(fault) => (
            ErrorKind::NotFound,
            fault.message.clone(),
            Some("DBInstanceNotFoundFault".to_string()),
            fault.request_id.clone(),
        ),
        DescribeDbInstancesError::Service {
            code,
            message,
            request_id,
        } => (
            ErrorKind::from_fault_code(code),
            message.clone(),
            Some(code.clone()),
            request_id.clone(),
        ),
        DescribeDbInstancesError::Timeout(message) => {
            (ErrorKind::Timeout, message.clone(), None, None)
        }
        DescribeDbInstancesError::Dispatch(message) => {
            (ErrorKind::Connection, message.clone(), None, None)
        }
    };

    let mut translated = Error::new(kind, message).with_last_request(query.clone());
    if let Some(code) = code {
        translated = translated.with_fault_code(code);
    }
    if let Some(request_id) = request_id {
        translated = translated.with_request_id(request_id);
    }
    translated.with_source(err)
}
