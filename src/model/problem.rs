//! Semantic problems reported by the validator.

use crate::base::Span;

/// Problem codes.
///
/// Stable identifiers so consumers can filter or suppress individual checks.
pub mod codes {
    /// API role is neither `provider` nor `client`
    pub const INVALID_API_ROLE: &str = "E0001";
    /// Field type does not name a declaration allowed for its owner
    pub const INVALID_FIELD_TYPE: &str = "E0002";
    /// Relationship endpoint is not an entity
    pub const INVALID_RELATIONSHIP_ENTITY: &str = "E0003";
    /// Service aggregate is neither an aggregate nor an `@aggregate` entity
    pub const NOT_AN_AGGREGATE: &str = "E0004";
    /// Method parameter is not an entity or input
    pub const INVALID_PARAMETER: &str = "E0005";
    /// Method return type is not an entity or output
    pub const INVALID_RETURN_TYPE: &str = "E0006";
    /// `withEvents` entry is not an event
    pub const NOT_AN_EVENT: &str = "E0007";
    /// Aggregate root is not an entity
    pub const INVALID_AGGREGATE_ROOT: &str = "E0008";
}

/// A semantic error found in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Problem {
    /// Document path the problem is about
    pub path: String,
    /// Offending value, or empty when there is none
    pub value: String,
    pub message: String,
    /// Span recorded for `path`, if any
    pub location: Option<Span>,
    #[cfg_attr(feature = "json", serde(skip))]
    pub code: &'static str,
}

impl Problem {
    /// Build a problem, substituting `value` for `%s` in `template`.
    pub fn new(
        code: &'static str,
        path: impl Into<String>,
        value: Option<&str>,
        template: &str,
        location: Option<Span>,
    ) -> Self {
        let value = value.unwrap_or_default().to_string();
        Self {
            path: path.into(),
            message: template.replace("%s", &value),
            value,
            location,
            code,
        }
    }
}

impl std::fmt::Display for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.location {
            Some(span) => write!(
                f,
                "{}:{}: {} [{}] at {}",
                span.start.line, span.start.column, self.message, self.code, self.path
            ),
            None => write!(f, "{} [{}] at {}", self.message, self.code, self.path),
        }
    }
}
