//! Main error type for DB instance resolution.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use super::ErrorKind;
use crate::types::DescribeQuery;

/// The primary error type for resolution operations.
///
/// `Error` provides rich context for debugging and error handling:
/// - [`kind()`](Error::kind): Categorization for `match` statements
/// - [`last_request()`](Error::last_request): The describe query that failed
/// - [`fault_code()`](Error::fault_code): API fault code, when one was reported
/// - [`match_count()`](Error::match_count) / [`matched_ids()`](Error::matched_ids):
///   Details for [`ErrorKind::MultipleResults`]
///
/// ## Error Hierarchy
///
/// ```text
/// Error
/// ├── kind: ErrorKind          (category for matching)
/// ├── message: String          (human-readable description)
/// ├── request_id: Option       (server-assigned correlation ID)
/// ├── fault_code: Option       (API fault code, e.g. "DBInstanceNotFound")
/// ├── last_request: Option     (the query that produced this error)
/// ├── match_count / matched_ids (ambiguous resolution details)
/// └── source: Option           (underlying cause)
/// ```
///
/// ## Example
///
/// ```rust
/// use rds_finder::{Error, ErrorKind};
///
/// fn describe(err: &Error) -> String {
///     match err.kind() {
///         ErrorKind::NotFound => "gone".to_string(),
///         ErrorKind::MultipleResults => {
///             format!("ambiguous: {:?}", err.matched_ids())
///         }
///         kind => format!("transport failure: {kind}"),
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    message: Cow<'static, str>,
    request_id: Option<String>,
    fault_code: Option<String>,
    last_request: Option<Box<DescribeQuery>>,
    match_count: Option<usize>,
    matched_ids: Vec<String>,
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl Error {
    /// Creates a new error with the given kind and message.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rds_finder::{Error, ErrorKind};
    ///
    /// let err = Error::new(ErrorKind::Protocol, "page marker missing");
    /// assert_eq!(err.kind(), ErrorKind::Protocol);
    /// ```
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            request_id: None,
            fault_code: None,
            last_request: None,
            match_count: None,
            matched_ids: Vec::new(),
            source: None,
        }
    }

    /// Creates an error from a kind with a default message.
    pub fn from_kind(kind: ErrorKind) -> Self {
        let message = match kind {
            ErrorKind::NotFound => "no DB instance matched",
            ErrorKind::MultipleResults => "more than one DB instance matched",
            ErrorKind::Unauthorized => "authentication failed",
            ErrorKind::Forbidden => "permission denied",
            ErrorKind::InvalidArgument => "invalid argument",
            ErrorKind::RateLimited => "rate limit exceeded",
            ErrorKind::Unavailable => "service unavailable",
            ErrorKind::Timeout => "deadline exceeded",
            ErrorKind::Internal => "internal service error",
            ErrorKind::Cancelled => "resolution cancelled",
            ErrorKind::Connection => "connection failed",
            ErrorKind::Protocol => "protocol error",
            ErrorKind::Configuration => "configuration error",
            ErrorKind::Unknown => "unknown error",
        };
        Self::new(kind, message)
    }

    /// Returns the error kind for categorization.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable message without the kind prefix.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the server-assigned request ID, if available.
    #[inline]
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Returns the API fault code reported by the client, if any.
    #[inline]
    pub fn fault_code(&self) -> Option<&str> {
        self.fault_code.as_deref()
    }

    /// Returns the describe query that produced this error, if recorded.
    ///
    /// For [`ErrorKind::NotFound`] after a fallback this is the by-name query,
    /// the last one issued.
    pub fn last_request(&self) -> Option<&DescribeQuery> {
        self.last_request.as_deref()
    }

    /// Returns the number of matches for [`ErrorKind::MultipleResults`].
    pub fn match_count(&self) -> Option<usize> {
        self.match_count
    }

    /// Returns the distinguishing IDs of the duplicate matches.
    ///
    /// Empty unless the kind is [`ErrorKind::MultipleResults`].
    pub fn matched_ids(&self) -> &[String] {
        &self.matched_ids
    }

    /// Returns `true` if this is a "not found" error.
    #[inline]
    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }

    /// Returns `true` if this error came from the underlying client.
    ///
    /// This is a convenience method equivalent to `self.kind().is_transport()`.
    #[inline]
    pub fn is_transport(&self) -> bool {
        self.kind.is_transport()
    }

    /// Sets the request ID for this error.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Sets the API fault code for this error.
    #[must_use]
    pub fn with_fault_code(mut self, code: impl Into<String>) -> Self {
        self.fault_code = Some(code.into());
        self
    }

    /// Records the query that produced this error.
    #[must_use]
    pub fn with_last_request(mut self, query: DescribeQuery) -> Self {
        self.last_request = Some(Box::new(query));
        self
    }

    /// Sets the source error for this error.
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    // Convenience constructors for common error types

    /// Creates a not found error for the given query.
    pub fn not_found(query: &DescribeQuery) -> Self {
        Self::new(
            ErrorKind::NotFound,
            format!("no DB instance matched {}", query),
        )
        .with_last_request(query.clone())
    }

    /// Creates a multiple results error naming the duplicates.
    pub fn multiple_results(query: &DescribeQuery, matched_ids: Vec<String>) -> Self {
        let count = matched_ids.len();
        let mut err = Self::new(
            ErrorKind::MultipleResults,
            format!(
                "{} DB instances matched {} ({})",
                count,
                query,
                matched_ids.join(", ")
            ),
        )
        .with_last_request(query.clone());
        err.match_count = Some(count);
        err.matched_ids = matched_ids;
        err
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Creates a cancelled error.
    pub fn cancelled() -> Self {
        Self::from_kind(ErrorKind::Cancelled)
    }

    /// Creates a protocol error.
    pub fn protocol(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Protocol, message)
    }

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)?;

        if let Some(ref code) = self.fault_code {
            write!(f, " [{}]", code)?;
        }

        if let Some(ref request_id) = self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Self::from_kind(kind)
    }
}
