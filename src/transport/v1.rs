//! V1 client generation: page callbacks and string fault codes.
//!
//! The v1 describe API hands back one page at a time together with a
//! `last_page` flag. Page objects may be absent and record slots may be
//! null; faults arrive as an [`AwsError`] whose `code` must be compared
//! against [`ERR_CODE_DB_INSTANCE_NOT_FOUND_FAULT`].

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;
use crate::transport::traits::{advance_marker, ApiGeneration, InstanceLister};
use crate::types::{CallContext, DescribeQuery, DynPredicate, InstanceRecord};
use crate::Error;

/// Fault code the v1 API reports when no DB instance has the requested
/// identifier.
pub const ERR_CODE_DB_INSTANCE_NOT_FOUND_FAULT: &str = "DBInstanceNotFound";

// ============================================================================
// Wire Types
// ============================================================================

/// A v1 describe filter. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Filter {
    /// Filter name.
    pub name: Option<String>,
    /// Filter values.
    #[serde(default)]
    pub values: Vec<Option<String>>,
}

/// Input for one v1 describe-DB-instances page request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeDbInstancesInput {
    /// Filters to apply.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
    /// Look up a single instance by identifier.
    #[serde(rename = "DBInstanceIdentifier", skip_serializing_if = "Option::is_none")]
    pub db_instance_identifier: Option<String>,
    /// Marker from the previous page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<String>,
    /// Page size hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_records: Option<i64>,
}

impl From<&DescribeQuery> for DescribeDbInstancesInput {
    fn from(query: &DescribeQuery) -> Self {
        Self {
            filters: query
                .filters
                .iter()
                .map(|f| Filter {
                    name: Some(f.name.clone()),
                    values: f.values.iter().cloned().map(Some).collect(),
                })
                .collect(),
            db_instance_identifier: query.db_instance_identifier.clone(),
            marker: None,
            max_records: None,
        }
    }
}

/// A v1 DB instance record.
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
    /// Instance class (e.g., `db.t3.micro`).
    #[serde(rename = "DBInstanceClass")]
    pub db_instance_class: Option<String>,
    /// Instance status.
    #[serde(rename = "DBInstanceStatus")]
    pub db_instance_status: Option<String>,
    /// Engine name.
    pub engine: Option<String>,
    /// Engine version.
    pub engine_version: Option<String>,
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

/// Body of one v1 describe page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeDbInstancesOutput {
    /// Records on this page. Slots may be null.
    #[serde(rename = "DBInstances", default)]
    pub db_instances: Vec<Option<DbInstance>>,
}

/// One page as delivered by the v1 pager.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageResponse {
    /// The page body, absent when the service returned nothing.
    pub page: Option<DescribeDbInstancesOutput>,
    /// `true` when no pages follow.
    pub last_page: bool,
    /// Marker to request the following page.
    pub next_marker: Option<String>,
}

/// A v1 API fault.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {message}")]
pub struct AwsError {
    /// Fault code (e.g., `DBInstanceNotFound`).
    pub code: String,
    /// Fault message.
    pub message: String,
    /// Service request ID.
    pub request_id: Option<String>,
}

impl AwsError {
    /// Creates a fault with the given code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            request_id: None,
        }
    }

    /// Returns `true` if the fault carries `code`.
    pub fn code_equals(&self, code: &str) -> bool {
        self.code == code
    }
}

// ============================================================================
// Client Contract
// ============================================================================

/// The v1 describe call the host wraps around its SDK client.
#[async_trait::async_trait]
pub trait DescribeDbInstancesPages: Send + Sync {
    /// Fetches the page selected by `input.marker`.
    async fn describe_db_instances_page(
        &self,
        input: &DescribeDbInstancesInput,
    ) -> Result<PageResponse, AwsError>;
}

// ============================================================================
// Lister
// ============================================================================

/// Drains v1 describe pages until the last-page flag is set.
#[derive(Debug, Clone)]
pub struct PagesLister<C> {
    client: C,
    max_records: Option<i64>,
}

impl<C> PagesLister<C> {
    /// Creates a lister over a v1 client.
    pub fn new(client: C) -> Self {
        Self {
            client,
            max_records: None,
        }
    }

    /// Sets the page size hint sent with every request.
    #[must_use]
    pub fn with_max_records(mut self, max_records: u32) -> Self {
        self.max_records = Some(i64::from(max_records));
        self
    }

    /// Returns the wrapped client.
    pub fn client(&self) -> &C {
        &self.client
    }
}

#[async_trait::async_trait]
impl<C: DescribeDbInstancesPages> InstanceLister for PagesLister<C> {
    type Record = DbInstance;

    fn generation(&self) -> ApiGeneration {
        ApiGeneration::V1
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
            let operation = format!("v1 describe page {}", page_number);
            let response = ctx
                .run(&operation, async {
                    self.client
                        .describe_db_instances_page(&input)
                        .await
                        .map_err(|e| translate_fault(e, query))
                })
                .await?;

            let mut seen = 0usize;
            let matched_before = output.len();
            if let Some(page) = response.page {
                for instance in page.db_instances.into_iter().flatten() {
                    seen += 1;
                    if predicate(&instance) {
                        output.push(instance);
                    }
                }
            }
            tracing::trace!(
                generation = "v1",
                page = page_number,
                seen,
                matched = output.len() - matched_before,
                last_page = response.last_page,
                "received describe page"
            );

            if response.last_page {
                break;
            }

            let next = response.next_marker.ok_or_else(|| {
                Error::protocol(format!(
                    "describe page {} is not the last page but carries no marker",
                    page_number
                ))
                .with_last_request(query.clone())
            })?;
            input.marker = Some(advance_marker(&mut markers, next, query)?);
        }

        Ok(output)
    }
}

/// Maps a v1 fault onto the crate error taxonomy.
fn translate_fault(err: AwsError, query: &DescribeQuery) -> Error {
    let kind = if err.code_equals(ERR_CODE_DB_INSTANCE_NOT_FOUND_FAULT) {
        ErrorKind::NotFound
    } else {
        ErrorKind::from_fault_code(&err.code)
    };

    let mut translated = Error::new(kind, err.message.clone())
        .with_fault_code(err.code.clone())
        .with_last_request(query.clone());
    if let Some(ref request_id) = err.request_id {
        translated = translated.with_request_id(request_id.clone());
    }
    translated.with_source(err)
}
