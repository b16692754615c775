//! GraphQL wire envelope helpers
//!
//! Request bodies and response envelopes are the `graphql_client` types; the
//! helpers here turn an envelope into data or a `ClientError`.

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::warn;

use crate::errors::{ClientError, ClientResult};

pub use graphql_client::{
    Error as GraphQLError, GraphQLQuery, Location as GraphQLErrorLocation, PathFragment, QueryBody,
    Response as GraphQLResponse,
};

/// Resolve an envelope into its data.
///
/// Errors next to data are partial failures and only logged.
pub fn into_result<T>(response: GraphQLResponse<T>) -> ClientResult<T> {
    match (response.data, response.errors) {
        (Some(data), errors) => {
            for error in errors.unwrap_or_default() {
                warn!("GraphQL partial error: {}", describe_error(&error));
            }
            Ok(data)
        }
        (None, Some(errors)) if !errors.is_empty() => Err(ClientError::GraphQL(errors)),
        (None, _) => Err(ClientError::EmptyResponse),
    }
}

/// Error message followed by its response path, e.g. `boom (at ticks.0)`
pub fn describe_error(error: &GraphQLError) -> String {
    match error.path.as_deref() {
        Some(path) if !path.is_empty() => {
            let path: Vec<String> = path
                .iter()
                .map(|fragment| match fragment {
                    PathFragment::Key(key) => key.clone(),
                    PathFragment::Index(index) => index.to_string(),
                })
                .collect();
            format!("{} (at {})", error.message, path.join("."))
        }
        _ => error.message.clone(),
    }
}

/// Decode a saved response into `T`.
///
/// Accepts either a full `{data, errors}` envelope or the bare `data` object.
pub fn decode_response<T: DeserializeOwned>(value: JsonValue) -> ClientResult<T> {
    if is_envelope(&value) {
        let envelope: GraphQLResponse<T> = serde_json::from_value(value)?;
        into_result(envelope)
    } else {
        Ok(serde_json::from_value(value)?)
    }
}

fn is_envelope(value: &JsonValue) -> bool {
    match value.as_object() {
        Some(object) => {
            !object.is_empty()
                && object
                    .keys()
                    .all(|key| matches!(key.as_str(), "data" | "errors" | "extensions"))
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: JsonValue) -> GraphQLResponse<JsonValue> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_data_with_errors_is_ok() {
        let response = envelope(json!({
            "data": {"value": 1},
            "errors": [{"message": "partial"}]
        }));

        assert_eq!(into_result(response).unwrap(), json!({"value": 1}));
    }

    #[test]
    fn test_errors_without_data() {
        let response = envelope(json!({
            "data": null,
            "errors": [{
                "message": "Variable \"$scheduleSelector\" got invalid value",
                "locations": [{"line": 1, "column": 25}]
            }]
        }));

        match into_result(response) {
            Err(ClientError::GraphQL(errors)) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(
                    errors[0].locations.as_deref(),
                    Some(&[GraphQLErrorLocation { line: 1, column: 25 }][..])
                );
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_empty_envelope() {
        assert!(matches!(
            into_result(envelope(json!({}))),
            Err(ClientError::EmptyResponse)
        ));
        assert!(matches!(
            into_result(envelope(json!({"data": null, "errors": []}))),
            Err(ClientError::EmptyResponse)
        ));
    }

    #[test]
    fn test_describe_error_includes_path() {
        let error: GraphQLError = serde_json::from_value(json!({
            "message": "boom",
            "path": ["scheduleDefinitionOrError", "ticks", 0]
        }))
        .unwrap();
        assert_eq!(
            describe_error(&error),
            "boom (at scheduleDefinitionOrError.ticks.0)"
        );

        let error: GraphQLError = serde_json::from_value(json!({"message": "boom"})).unwrap();
        assert_eq!(describe_error(&error), "boom");
    }

    #[test]
    fn test_decode_response_accepts_bare_data() {
        let bare = json!({"scheduler": 1});
        let decoded: JsonValue = decode_response(bare.clone()).unwrap();
        assert_eq!(decoded, bare);

        let wrapped: JsonValue = decode_response(json!({"data": bare.clone()})).unwrap();
        assert_eq!(wrapped, bare);
    }
}
