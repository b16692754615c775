//! Response and variable types for the `ScheduleRootQuery` GraphQL operation
//!
//! The operation asks for the active scheduler and one schedule definition,
//! including its tick history, run history and projected future ticks. Both
//! top-level fields are tagged unions discriminated by `__typename`; they map
//! to Rust enums so every consumer matches all variants.

pub mod conversions;
pub mod domain;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod selector;

// Re-export main types for convenience
pub use conversions::{timestamp_to_datetime, TickOutcome};
pub use domain::{
    FutureTick, FutureTicks, PartitionSet, PipelineRun, PipelineTag, RepositoryMetadata,
    RepositoryOrigin, ScheduleDefinition, ScheduleDefinitionNotFoundError,
    ScheduleDefinitionOrError, ScheduleRootQuery, ScheduleState, ScheduleTick,
    ScheduleTickFailureData, ScheduleTickSuccessData, Scheduler, SchedulerNotDefinedError,
    SchedulerOrError, TickRun, TickSpecificData, TickStats,
};
pub use enums::{JobTickStatus, ParseEnumError, PipelineRunStatus, ScheduleStatus};
pub use errors::{LookupError, PythonError, SchedulerError};
pub use ids::ObjectId;
pub use selector::{ScheduleRootQueryVariables, ScheduleSelector, SelectorParseError};

/// Operation name sent alongside the query document
pub const OPERATION_NAME: &str = "ScheduleRootQuery";
