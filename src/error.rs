//! Error types for the search page interaction layer

use thiserror::Error;

/// Result type for frame search operations
pub type Result<T> = std::result::Result<T, SearchUiError>;

/// Rejected constraint edits. These never change state; the caller shows
/// the message as a notice.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    #[error("Object already added.")]
    Duplicate(String),

    #[error("Please choose an object.")]
    EmptyLabel,

    #[error("Unknown object: {0}")]
    UnknownLabel(String),

    #[error("Count must be between 0 and {max}.")]
    CountOutOfRange { count: u32, max: u32 },
}

/// Error types for the search page
#[derive(Error, Debug)]
pub enum SearchUiError {
    #[error(transparent)]
    Constraint(#[from] ConstraintError),

    /// Connection refused, timeout, DNS failure and the like
    #[error("Network error: {0}")]
    Transport(String),

    /// Non-2xx response from the search service
    #[error("{message}")]
    Http { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl SearchUiError {
    /// Message shown in the results area when a search fails.
    pub fn display_message(&self) -> String {
        match self {
            SearchUiError::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for SearchUiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SearchUiError::MalformedResponse(err.to_string())
        } else {
            SearchUiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SearchUiError {
    fn from(err: serde_json::Error) -> Self {
        SearchUiError::MalformedResponse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_shows_server_message_verbatim() {
        let err = SearchUiError::Http {
            status: 400,
            message: "bad query".to_string(),
        };
        assert_eq!(err.display_message(), "bad query");
    }

    #[test]
    fn test_constraint_error_converts() {
        let err: SearchUiError = ConstraintError::Duplicate("person".to_string()).into();
        assert_eq!(err.display_message(), "Object already added.");
    }
}
