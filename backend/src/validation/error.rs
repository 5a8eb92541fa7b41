//! Validation failures and their HTTP mapping.

use serde_json::json;

use crate::models::HttpError;

/// Request section a validation pass reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Matched path segments.
    Path,
    /// Query string.
    Query,
    /// JSON request body.
    Body,
}

impl Location {
    /// Stable lowercase name used in error details.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Body => "body",
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A section that failed to deserialise into its declared model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    location: Location,
    message: String,
}

impl ValidationError {
    /// Record a failure reported by the deserialiser.
    pub fn new(location: Location, message: impl Into<String>) -> Self {
        Self {
            location,
            message: message.into(),
        }
    }

    /// Section that failed.
    #[must_use]
    pub const fn location(&self) -> Location {
        self.location
    }

    /// Deserialiser message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {}: {}", self.location, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for HttpError {
    fn from(value: ValidationError) -> Self {
        Self::bad_request().with_details(json!({
            "location": value.location.as_str(),
            "errors": [{ "msg": value.message }],
        }))
    }
}
