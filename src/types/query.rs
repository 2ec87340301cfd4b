//! Generation-neutral describe queries.

use serde::{Deserialize, Serialize};

use super::Classification;

/// Filter name the describe API uses for the resource ID namespace.
pub const RESOURCE_ID_FILTER: &str = "dbi-resource-id";

/// A single named filter on a describe call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Filter {
    /// Filter name (e.g., `dbi-resource-id`).
    pub name: String,
    /// Accepted values. A record matches if any value matches.
    pub values: Vec<String>,
}

impl Filter {
    /// Creates a filter with a single value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: vec![value.into()],
        }
    }
}

/// A describe-DB-instances query, independent of client generation.
///
/// The builder constructors ([`for_identifier`](Self::for_identifier),
/// [`by_resource_id`](Self::by_resource_id),
/// [`by_identifier`](Self::by_identifier)) populate exactly one of `filters`
/// or `db_instance_identifier`. A struct literal may set any combination,
/// for example to pass extra filters to [`Resolver::find_instances`](crate::Resolver::find_instances).
/// Adapters translate this into their own wire input type.
///
/// ## Example
///
/// ```rust
/// use rds_finder::{Classification, DescribeQuery};
///
/// let id = "db-BE6UI2KLPQP3OVDYD74ZEV6NUM";
/// let query = DescribeQuery::for_identifier(id, Classification::of(id));
/// assert_eq!(query.filters.len(), 1);
/// assert!(query.db_instance_identifier.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeQuery {
    /// Filters to apply.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<Filter>,
    /// Look up by the user-chosen identifier instead of filtering.
    #[serde(
        rename = "DBInstanceIdentifier",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub db_instance_identifier: Option<String>,
}

impl DescribeQuery {
    /// Builds the query for the namespace the classification guessed.
    pub fn for_identifier(id: &str, classification: Classification) -> Self {
        match classification {
            Classification::LooksLikeResourceId => Self::by_resource_id(id),
            Classification::LooksLikeName => Self::by_identifier(id),
        }
    }

    /// Queries the resource ID namespace via the `dbi-resource-id` filter.
    pub fn by_resource_id(id: impl Into<String>) -> Self {
        Self {
            filters: vec![Filter::new(RESOURCE_ID_FILTER, id)],
            db_instance_identifier: None,
        }
    }

    /// Queries the identifier namespace directly.
    pub fn by_identifier(id: impl Into<String>) -> Self {
        Self {
            filters: Vec::new(),
            db_instance_identifier: Some(id.into()),
        }
    }

    /// Returns `true` if this query looks up by identifier.
    pub fn is_by_identifier(&self) -> bool {
        self.db_instance_identifier.is_some()
    }

    /// Returns the filter values for `name`, if that filter is set.
    pub fn filter_values(&self, name: &str) -> Option<&[String]> {
        self.filters
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.values.as_slice())
    }
}

impl std::fmt::Display for DescribeQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(ref id) = self.db_instance_identifier {
            return write!(f, "identifier {:?}", id);
        }
        let parts: Vec<String> = self
            .filters
            .iter()
            .map(|filter| format!("{}={}", filter.name, filter.values.join(",")))
            .collect();
        write!(f, "filter {}", parts.join(" "))
    }
}
