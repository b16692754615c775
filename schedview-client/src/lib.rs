//! GraphQL client for schedule monitoring
//!
//! This crate builds the `ScheduleRootQuery` request, sends it to a GraphQL
//! endpoint over HTTP, and decodes the response envelope into the typed
//! values from `schedview-types`. An offline client serves canned responses
//! for tests and replay of saved responses.

pub mod client;
pub mod config;
pub mod errors;
pub mod query;
pub mod types;

// Re-export main types for convenience
pub use client::{HttpScheduleClient, OfflineScheduleClient, ScheduleClient};
pub use config::ClientConfig;
pub use errors::{ClientError, ClientResult};
pub use query::{schedule_root_request, ScheduleRootOperation, SCHEDULE_ROOT_QUERY};
pub use types::{
    decode_response, describe_error, into_result, GraphQLError, GraphQLErrorLocation, GraphQLQuery,
    GraphQLResponse, QueryBody,
};
