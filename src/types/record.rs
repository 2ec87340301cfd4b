//! The view of a DB instance record the resolver needs.

/// Accessors common to every client generation's DB instance type.
///
/// The resolver treats records as opaque. These accessors exist so errors
/// can name duplicates and so predicate helpers work across generations.
pub trait InstanceRecord {
    /// The user-chosen DB instance identifier.
    fn db_instance_identifier(&self) -> Option<&str>;

    /// The platform-generated resource ID (`db-...`).
    fn dbi_resource_id(&self) -> Option<&str>;

    /// The instance status (e.g., `available`, `deleting`).
    fn db_instance_status(&self) -> Option<&str>;

    /// Names the record in diagnostics as `identifier (resource-id)`.
    ///
    /// The identifier comes first: records that collide on a resource ID
    /// still differ by identifier.
    fn display_id(&self) -> String {
        match (self.db_instance_identifier(), self.dbi_resource_id()) {
            (Some(identifier), Some(resource_id)) => format!("{} ({})", identifier, resource_id),
            (Some(id), None) | (None, Some(id)) => id.to_string(),
            (None, None) => "<unknown>".to_string(),
        }
    }
}
