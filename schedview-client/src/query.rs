//! GraphQL document for the `ScheduleRootQuery` operation

use schedview_types::{
    ScheduleRootQuery, ScheduleRootQueryVariables, ScheduleSelector, OPERATION_NAME,
};

use crate::types::{GraphQLQuery, QueryBody};

/// Query document.
///
/// `__typename` is selected wherever the schema returns a union; plain
/// object types are fixed by the schema and carry no tag. `cause` is
/// selected one level deep on the scheduler error and on tick failures.
pub const SCHEDULE_ROOT_QUERY: &str = r#"query ScheduleRootQuery($scheduleSelector: ScheduleSelector!) {
  scheduler {
    __typename
    ... on SchedulerNotDefinedError {
      message
    }
    ... on Scheduler {
      schedulerClass
    }
    ...PythonErrorFragment
  }
  scheduleDefinitionOrError(scheduleSelector: $scheduleSelector) {
    __typename
    ... on ScheduleDefinition {
      ...ScheduleDefinitionFragment
    }
    ... on ScheduleDefinitionNotFoundError {
      message
    }
    ... on PythonError {
      message
      stack
    }
  }
}

fragment PythonErrorFragment on PythonError {
  message
  stack
  cause {
    message
    stack
  }
}

fragment ScheduleDefinitionFragment on ScheduleDefinition {
  id
  name
  cronSchedule
  executionTimezone
  pipelineName
  solidSelection
  mode
  partitionSet {
    name
  }
  scheduleState {
    ...ScheduleStateFragment
  }
  futureTicks(limit: 10) {
    results {
      timestamp
    }
  }
}

fragment ScheduleStateFragment on ScheduleState {
  id
  scheduleOriginId
  repositoryOrigin {
    repositoryLocationName
    repositoryName
    repositoryLocationMetadata {
      key
      value
    }
  }
  repositoryOriginId
  scheduleName
  cronSchedule
  runningScheduleCount
  ticks(limit: 20) {
    tickId
    status
    timestamp
    tickSpecificData {
      __typename
      ... on ScheduleTickSuccessData {
        run {
          id
          pipelineName
          status
          runId
        }
      }
      ... on ScheduleTickFailureData {
        error {
          ...PythonErrorFragment
        }
      }
    }
  }
  runsCount
  runs(limit: 20) {
    id
    runId
    tags {
      key
      value
    }
    pipelineName
    status
  }
  ticksCount
  status
}
"#;

/// The `ScheduleRootQuery` operation, decoding into the hand-written
/// response types
pub struct ScheduleRootOperation;

impl GraphQLQuery for ScheduleRootOperation {
    type Variables = ScheduleRootQueryVariables;
    type ResponseData = ScheduleRootQuery;

    fn build_query(variables: Self::Variables) -> QueryBody<Self::Variables> {
        QueryBody {
            variables,
            query: SCHEDULE_ROOT_QUERY,
            operation_name: OPERATION_NAME,
        }
    }
}

/// Build the request body for one schedule
pub fn schedule_root_request(selector: &ScheduleSelector) -> QueryBody<ScheduleRootQueryVariables> {
    ScheduleRootOperation::build_query(selector.clone().into_variables())
}
