//! Client error types

use crate::types::{describe_error, GraphQLError};

/// Error type for schedule queries
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid response JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("GraphQL errors: {}", join_messages(.0))]
    GraphQL(Vec<GraphQLError>),

    #[error("Response contained neither data nor errors")]
    EmptyResponse,

    #[error("No mock response for schedule {0}")]
    NoMock(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

fn join_messages(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(describe_error)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graphql_error_display_joins_messages() {
        let errors: Vec<GraphQLError> = serde_json::from_value(serde_json::json!([
            {"message": "first"},
            {"message": "second", "path": ["scheduler"]}
        ]))
        .unwrap();
        assert_eq!(
            ClientError::GraphQL(errors).to_string(),
            "GraphQL errors: first; second (at scheduler)"
        );
    }
}
