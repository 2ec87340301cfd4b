//! Collapsing a result set to exactly one record.

use crate::types::{DescribeQuery, InstanceRecord};
use crate::Error;

/// Returns the only record in `results`.
///
/// - no records: [`ErrorKind::NotFound`](crate::ErrorKind::NotFound)
///   referencing `query`
/// - one record: that record
/// - more: [`ErrorKind::MultipleResults`](crate::ErrorKind::MultipleResults)
///   naming the count and each record as `identifier (resource-id)`
///
/// ## Example
///
/// ```rust
/// use rds_finder::{assert_single, DescribeQuery, ErrorKind};
/// use rds_finder::transport::v2::DbInstance;
///
/// let query = DescribeQuery::by_identifier("mydb");
/// let err = assert_single(Vec::<DbInstance>::new(), &query).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::NotFound);
/// ```
pub fn assert_single<R: InstanceRecord>(
    mut results: Vec<R>,
    query: &DescribeQuery,
) -> Result<R, Error> {
    if results.len() > 1 {
        let ids = results.iter().map(InstanceRecord::display_id).collect();
        return Err(Error::multiple_results(query, ids));
    }
    results.pop().ok_or_else(|| Error::not_found(query))
}
