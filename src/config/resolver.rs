//! Resolver configuration.

use std::time::Duration;

use crate::Error;

/// Smallest page size the describe API accepts.
pub const MIN_MAX_RECORDS: u32 = 20;

/// Largest page size the describe API accepts.
pub const MAX_MAX_RECORDS: u32 = 100;

/// Configuration for a [`Resolver`](crate::Resolver).
///
/// ## Default Values
///
/// - `max_records`: unset (service default page size)
/// - `timeout`: unset (only the caller's [`CallContext`](crate::CallContext) applies)
/// - `name_fallback`: `true`
///
/// ## Example
///
/// ```rust
/// use rds_finder::ResolverConfig;
/// use std::time::Duration;
///
/// let config = ResolverConfig::new()
///     .with_max_records(50)
///     .with_timeout(Duration::from_secs(20));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Page size hint passed to every describe request.
    pub max_records: Option<u32>,

    /// Budget for one resolution, covering the primary and fallback attempts.
    ///
    /// Combined with the caller's deadline; the earlier one wins.
    pub timeout: Option<Duration>,

    /// Whether a resource-ID-shaped identifier that is not found is retried
    /// as a DB instance identifier.
    pub name_fallback: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_records: None,
            timeout: None,
            name_fallback: true,
        }
    }
}

impl ResolverConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the page size hint.
    #[must_use]
    pub fn with_max_records(mut self, max_records: u32) -> Self {
        self.max_records = Some(max_records);
        self
    }

    /// Sets the per-resolution timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Enables or disables the by-name fallback.
    #[must_use]
    pub fn with_name_fallback(mut self, enabled: bool) -> Self {
        self.name_fallback = enabled;
        self
    }

    /// Checks that every value is within the API's accepted range.
    pub fn validate(&self) -> Result<(), Error> {
        if let Some(max_records) = self.max_records
            && !(MIN_MAX_RECORDS..=MAX_MAX_RECORDS).contains(&max_records)
        {
            return Err(Error::configuration(format!(
                "max_records must be between {} and {}, got {}",
                MIN_MAX_RECORDS, MAX_MAX_RECORDS, max_records
            )));
        }
        if self.timeout == Some(Duration::ZERO) {
            return Err(Error::configuration("timeout must be greater than zero"));
        }
        Ok(())
    }
}
