//! InMemoryRds: a describe-API fake with real filter and pagination semantics.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};

use crate::transport::{v1, v2, ApiGeneration};
use crate::types::{DescribeQuery, Filter, RESOURCE_ID_FILTER};

/// Fault code for an invalid filter or marker.
pub const INVALID_PARAMETER_VALUE: &str = "InvalidParameterValue";

/// A DB instance stored in an [`InMemoryRds`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceFixture {
    /// User-chosen identifier.
    pub identifier: String,
    /// Platform-generated resource ID.
    pub resource_id: String,
    /// Instance status.
    pub status: String,
    /// Engine name.
    pub engine: String,
    /// Instance class.
    pub class: String,
}

impl InstanceFixture {
    /// Creates an available `postgres` instance.
    pub fn new(identifier: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            resource_id: resource_id.into(),
            status: "available".to_string(),
            engine: "postgres".to_string(),
            class: "db.t3.micro".to_string(),
        }
    }

    /// Sets the status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Sets the engine.
    #[must_use]
    pub fn with_engine(mut self, engine: impl Into<String>) -> Self {
        self.engine = engine.into();
        self
    }

    /// Sets the instance class.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = class.into();
        self
    }

    fn arn(&self) -> String {
        format!("arn:aws:rds:us-east-1:123456789012:db:{}", self.identifier)
    }

    /// Renders this fixture as a v1 record.
    pub fn to_v1(&self) -> v1::DbInstance {
        v1::DbInstance {
            db_instance_identifier: Some(self.identifier.clone()),
            dbi_resource_id: Some(self.resource_id.clone()),
            db_instance_arn: Some(self.arn()),
            db_instance_class: Some(self.class.clone()),
            db_instance_status: Some(self.status.clone()),
            engine: Some(self.engine.clone()),
            ..Default::default()
        }
    }

    /// Renders this fixture as a v2 record.
    pub fn to_v2(&self) -> v2::DbInstance {
        v2::DbInstance {
            db_instance_identifier: Some(self.identifier.clone()),
            dbi_resource_id: Some(self.resource_id.clone()),
            db_instance_arn: Some(self.arn()),
            db_instance_class: Some(self.class.clone()),
            db_instance_status: Some(self.status.clone()),
            engine: Some(self.engine.clone()),
            endpoint: Some(v2::Endpoint {
                address: Some(format!("{}.abc123.us-east-1.rds.amazonaws.com", self.identifier)),
                port: Some(5432),
            }),
            multi_az: Some(false),
            ..Default::default()
        }
    }
}

/// One describe request received by an [`InMemoryRds`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    /// Which client generation sent it.
    pub generation: ApiGeneration,
    /// Filters and identifier of the request.
    pub query: DescribeQuery,
    /// Marker of the request.
    pub marker: Option<String>,
    /// Page size hint of the request.
    pub max_records: Option<i64>,
}

#[derive(Debug, Clone)]
struct Fault {
    code: String,
    message: String,
}

impl Fault {
    fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    fn into_v1(self) -> v1::AwsError {
        v1::AwsError::new(self.code, self.message)
    }

    fn into_v2(self) -> v2::DescribeDbInstancesError {
        if self.code == v1::ERR_CODE_DB_INSTANCE_NOT_FOUND_FAULT {
            v2::DescribeDbInstancesError::not_found(self.message)
        } else {
            v2::DescribeDbInstancesError::service(self.code, self.message)
        }
    }
}

struct Page {
    instances: Vec<InstanceFixture>,
    next_marker: Option<String>,
}

/// An in-memory RDS describe endpoint for both client generations.
///
/// Supports the `dbi-resource-id`, `db-instance-id` and `engine` filters,
/// identifier lookups (which fail with `DBInstanceNotFound` when nothing
/// matches, as the service does), and offset-marker pagination. Clones share
/// the same instances and request log.
///
/// ## Example
///
/// ```rust
/// use rds_finder::testing::{InMemoryRds, InstanceFixture};
///
/// let rds = InMemoryRds::new().with_page_size(2);
/// rds.insert(InstanceFixture::new("mydb", "db-AAAA1111"));
/// assert_eq!(rds.len(), 1);
/// assert_eq!(rds.request_count(), 0);
/// ```
#[derive(Clone, Default)]
pub struct InMemoryRds {
    instances: Arc<RwLock<Vec<InstanceFixture>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    faults: Arc<Mutex<VecDeque<Fault>>>,
    page_size: Option<usize>,
    latency: Option<Duration>,
}

impl std::fmt::Debug for InMemoryRds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRds")
            .field("instances", &self.len())
            .field("requests", &self.request_count())
            .field("page_size", &self.page_size)
            .field("latency", &self.latency)
            .finish()
    }
}

impl InMemoryRds {
    /// Creates an empty endpoint.
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits every page to `page_size` records.
    ///
    /// A smaller `MaxRecords` on the request still wins.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size.max(1));
        self
    }

    /// Delays every response by `latency`.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Stores an instance. Duplicate resource IDs are kept.
    pub fn insert(&self, instance: InstanceFixture) {
        self.instances.write().push(instance);
    }

    /// Stores several instances.
    pub fn insert_all(&self, instances: impl IntoIterator<Item = InstanceFixture>) {
        self.instances.write().extend(instances);
    }

    /// Removes every instance with `identifier`, returning how many were removed.
    pub fn remove(&self, identifier: &str) -> usize {
        let mut instances = self.instances.write();
        let before = instances.len();
        instances.retain(|i| i.identifier != identifier);
        before - instances.len()
    }

    /// Returns the number of stored instances.
    pub fn len(&self) -> usize {
        self.instances.read().len()
    }

    /// Returns `true` if no instances are stored.
    pub fn is_empty(&self) -> bool {
        self.instances.read().is_empty()
    }

    /// Makes the next request fail with the given fault code.
    ///
    /// Queued faults are consumed one per request, in order. For v2 the
    /// `DBInstanceNotFound` code becomes the typed fault; every other code is
    /// a service fault.
    pub fn fail_next(&self, code: impl Into<String>, message: impl Into<String>) {
        self.faults.lock().push_back(Fault::new(code, message));
    }

    /// Returns every request received so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Returns the number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Clears the request log.
    pub fn reset_requests(&self) {
        self.requests.lock().clear();
    }

    async fn serve(&self, request: RecordedRequest) -> Result<Page, Fault> {
        self.requests.lock().push(request.clone());

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(fault) = self.faults.lock().pop_front() {
            return Err(fault);
        }

        let matching = self.select(&request.query)?;
        let offset = match request.marker.as_deref() {
            None => 0,
            Some(marker) => marker.parse::<usize>().map_err(|_| {
                Fault::new(INVALID_PARAMETER_VALUE, format!("invalid marker: {}", marker))
            })?,
        };

        let limit = match (self.page_size, request.max_records) {
            (Some(size), Some(max)) => size.min(usize::try_from(max).unwrap_or(size)),
            (Some(size), None) => size,
            (None, Some(max)) => usize::try_from(max).unwrap_or(usize::MAX),
            (None, None) => usize::MAX,
        };
        let end = offset.saturating_add(limit).min(matching.len());
        let instances = matching.get(offset..end).map(<[_]>::to_vec).unwrap_or_default();
        let next_marker = (end < matching.len()).then(|| end.to_string());

        Ok(Page {
            instances,
            next_marker,
        })
    }

    fn select(&self, query: &DescribeQuery) -> Result<Vec<InstanceFixture>, Fault> {
        for filter in &query.filters {
            if !matches!(filter.name.as_str(), RESOURCE_ID_FILTER | "db-instance-id" | "engine") {
                return Err(Fault::new(
                    INVALID_PARAMETER_VALUE,
                    format!("unrecognized filter name: {}", filter.name),
                ));
            }
        }

        let matching: Vec<InstanceFixture> = self
            .instances
            .read()
            .iter()
            .filter(|i| {
                query
                    .db_instance_identifier
                    .as_ref()
                    .is_none_or(|id| *id == i.identifier)
            })
            .filter(|i| query.filters.iter().all(|f| filter_matches(f, i)))
            .cloned()
            .collect();

        if let Some(ref id) = query.db_instance_identifier
            && matching.is_empty()
        {
            return Err(Fault::new(
                v1::ERR_CODE_DB_INSTANCE_NOT_FOUND_FAULT,
                format!("DBInstance {} not found.", id),
            ));
        }
        Ok(matching)
    }
}

fn filter_matches(filter: &Filter, instance: &InstanceFixture) -> bool {
    let field = match filter.name.as_str() {
        RESOURCE_ID_FILTER => &instance.resource_id,
        "db-instance-id" => &instance.identifier,
        "engine" => &instance.engine,
        _ => return false,
    };
    filter.values.iter().any(|v| v == field)
}

#[async_trait::async_trait]
impl v1::DescribeDbInstancesPages for InMemoryRds {
    async fn describe_db_instances_page(
        &self,
        input: &v1::DescribeDbInstancesInput,
    ) -> Result<v1::PageResponse, v1::AwsError> {
        let query = DescribeQuery {
            filters: input
                .filters
                .iter()
                .map(|f| Filter {
                    name: f.name.clone().unwrap_or_default(),
                    values: f.values.iter().flatten().cloned().collect(),
                })
                .collect(),
            db_instance_identifier: input.db_instance_identifier.clone(),
        };
        let request = RecordedRequest {
            generation: ApiGeneration::V1,
            query,
            marker: input.marker.clone(),
            max_records: input.max_records,
        };

        let page = self.serve(request).await.map_err(Fault::into_v1)?;
        Ok(v1::PageResponse {
            page: Some(v1::DescribeDbInstancesOutput {
                db_instances: page.instances.iter().map(|i| Some(i.to_v1())).collect(),
            }),
            last_page: page.next_marker.is_none(),
            next_marker: page.next_marker,
        })
    }
}

#[async_trait::async_trait]
impl v2::DescribeDbInstancesApi for InMemoryRds {
    async fn describe_db_instances(
        &self,
        input: &v2::DescribeDbInstancesInput,
    ) -> Result<Option<v2::DescribeDbInstancesOutput>, v2::DescribeDbInstancesError> {
        let query = DescribeQuery {
            filters: input
                .filters
                .iter()
                .map(|f| Filter {
                    name: f.name.clone().unwrap_or_default(),
                    values: f.values.clone(),
                })
                .collect(),
            db_instance_identifier: input.db_instance_identifier.clone(),
        };
        let request = RecordedRequest {
            generation: ApiGeneration::V2,
            query,
            marker: input.marker.clone(),
            max_records: input.max_records.map(i64::from),
        };

        let page = self.serve(request).await.map_err(Fault::into_v2)?;
        Ok(Some(v2::DescribeDbInstancesOutput {
            db_instances: page.instances.iter().map(InstanceFixture::to_v2).collect(),
            marker: page.next_marker,
        }))
    }
}
