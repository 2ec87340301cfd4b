//! Shape-based classification of DB instance identifiers.

use std::sync::LazyLock;

use regex::Regex;

/// Resource IDs are `db-` followed by 2 to 255 alphanumerics.
#[allow(clippy::expect_used)]
static RESOURCE_ID_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^db-[0-9A-Za-z]{2,255}$").expect("resource ID pattern is valid")
});

/// Which namespace an identifier string appears to belong to.
///
/// This is a heuristic. A user-chosen identifier such as `db-prod01` has the
/// same shape as a platform-generated resource ID, which is why the resolver
/// retries resource-ID-shaped strings as identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Looks like a `dbi-resource-id` such as `db-BE6UI2KLPQP3OVDYD74ZEV6NUM`.
    LooksLikeResourceId,
    /// Anything else: treated as the user-chosen DB instance identifier.
    LooksLikeName,
}

impl Classification {
    /// Classifies an identifier string by shape.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rds_finder::Classification;
    ///
    /// assert_eq!(
    ///     Classification::of("db-BE6UI2KLPQP3OVDYD74ZEV6NUM"),
    ///     Classification::LooksLikeResourceId
    /// );
    /// assert_eq!(Classification::of("mydb-prod"), Classification::LooksLikeName);
    /// ```
    pub fn of(id: &str) -> Self {
        if RESOURCE_ID_PATTERN.is_match(id) {
            Classification::LooksLikeResourceId
        } else {
            Classification::LooksLikeName
        }
    }

    /// Returns `true` if the identifier looks like a resource ID.
    pub fn is_resource_id(&self) -> bool {
        matches!(self, Classification::LooksLikeResourceId)
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Classification::LooksLikeResourceId => write!(f, "resource-id"),
            Classification::LooksLikeName => write!(f, "identifier"),
        }
    }
}

/// Classifies an identifier string. Shorthand for [`Classification::of`].
pub fn classify(id: &str) -> Classification {
    Classification::of(id)
}
