//! Error kind enumeration for categorizing resolution errors.

/// Categorization of resolution errors.
///
/// This enum provides a stable interface for matching on error types. Two
/// kinds are produced by the resolver itself; everything else comes from the
/// underlying API client and is grouped under "transport".
///
/// ## Resolution vs Transport
///
/// | ErrorKind         | Origin     | Drives fallback | Action                        |
/// |-------------------|------------|-----------------|-------------------------------|
/// | `NotFound`        | resolver   | Yes             | Treat as "does not exist"     |
/// | `MultipleResults` | resolver   | No              | Tighten predicate or rename   |
/// | `Timeout`         | transport  | No              | Extend the deadline           |
/// | `Cancelled`       | transport  | No              | Caller gave up                |
/// | `RateLimited`     | transport  | No              | Retry in the client layer     |
/// | everything else   | transport  | No              | Propagated unchanged          |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// No DB instance matched after exhausting the applicable namespaces.
    ///
    /// Produced when the API reports a `DBInstanceNotFound` fault or when a
    /// describe call returns zero matching records.
    #[error("not found")]
    NotFound,

    /// The identifier resolved to more than one DB instance.
    ///
    /// Either the predicate is too permissive or two instances genuinely
    /// collide. Never resolved by picking the first match.
    #[error("multiple results")]
    MultipleResults,

    /// Authentication failed (invalid or expired credentials).
    #[error("unauthorized")]
    Unauthorized,

    /// Valid credentials but the caller may not describe DB instances.
    #[error("forbidden")]
    Forbidden,

    /// The API rejected a request parameter.
    #[error("invalid argument")]
    InvalidArgument,

    /// The API throttled the request.
    #[error("rate limited")]
    RateLimited,

    /// Service temporarily unavailable.
    #[error("service unavailable")]
    Unavailable,

    /// The call deadline expired before the describe drain finished.
    #[error("timeout")]
    Timeout,

    /// Internal service error.
    #[error("internal error")]
    Internal,

    /// The caller cancelled the resolution.
    #[error("cancelled")]
    Cancelled,

    /// Connection error (DNS, TLS handshake, network unreachable).
    #[error("connection error")]
    Connection,

    /// Protocol error (malformed page, pagination that cannot progress).
    #[error("protocol error")]
    Protocol,

    /// Configuration error (out-of-range page size).
    #[error("configuration error")]
    Configuration,

    /// Unknown or unexpected error.
    #[error("unknown error")]
    Unknown,
}

impl ErrorKind {
    /// Returns `true` for every kind the resolver did not produce itself.
    ///
    /// Transport errors terminate a resolution immediately and are never
    /// retried at this layer.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rds_finder::ErrorKind;
    ///
    /// assert!(ErrorKind::Timeout.is_transport());
    /// assert!(!ErrorKind::NotFound.is_transport());
    /// ```
    #[inline]
    pub fn is_transport(&self) -> bool {
        !matches!(self, ErrorKind::NotFound | ErrorKind::MultipleResults)
    }

    /// Creates an `ErrorKind` from an RDS API fault code.
    ///
    /// Codes follow the RDS Query API naming. Unrecognized codes map to
    /// [`ErrorKind::Unknown`]. Not-found faults are recognized by each client
    /// generation's adapter, never from a bare code here.
    pub fn from_fault_code(code: &str) -> Self {
        match code {
            "InvalidClientTokenId" | "UnrecognizedClientException" | "ExpiredToken"
            | "SignatureDoesNotMatch" => ErrorKind::Unauthorized,
            "AccessDenied" | "AccessDeniedException" | "UnauthorizedOperation" => {
                ErrorKind::Forbidden
            }
            "InvalidParameterValue" | "InvalidParameterCombination" | "ValidationError"
            | "MissingParameter" => ErrorKind::InvalidArgument,
            "Throttling" | "ThrottlingException" | "RequestLimitExceeded" => {
                ErrorKind::RateLimited
            }
            "ServiceUnavailable" => ErrorKind::Unavailable,
            "RequestTimeout" | "RequestTimeoutException" => ErrorKind::Timeout,
            "InternalFailure" | "InternalError" => ErrorKind::Internal,
            "RequestCanceled" => ErrorKind::Cancelled,
            _ => ErrorKind::Unknown,
        }
    }
}
