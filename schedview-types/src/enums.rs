//! Closed enumerations referenced by the schedule query.
//!
//! Values travel as SCREAMING_SNAKE_CASE strings. An unknown value is a
//! decode error rather than a catch-all variant.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing an enum value from a string fails
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind} value: '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! string_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            /// Wire representation of the value
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }

            /// Every value, in schema order
            pub fn all() -> &'static [$name] {
                &[$($name::$variant,)+]
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_uppercase().as_str() {
                    $($text => Ok($name::$variant),)+
                    _ => Err(ParseEnumError {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

/// Status of a single schedule tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobTickStatus {
    Started,
    Skipped,
    Success,
    Failure,
}

string_enum!(JobTickStatus, "JobTickStatus", {
    Started => "STARTED",
    Skipped => "SKIPPED",
    Success => "SUCCESS",
    Failure => "FAILURE",
});

/// Status of a pipeline run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineRunStatus {
    Queued,
    NotStarted,
    Managed,
    Starting,
    Started,
    Success,
    Failure,
    Canceling,
    Canceled,
}

string_enum!(PipelineRunStatus, "PipelineRunStatus", {
    Queued => "QUEUED",
    NotStarted => "NOT_STARTED",
    Managed => "MANAGED",
    Starting => "STARTING",
    Started => "STARTED",
    Success => "SUCCESS",
    Failure => "FAILURE",
    Canceling => "CANCELING",
    Canceled => "CANCELED",
});

impl PipelineRunStatus {
    /// The run will not change status again
    pub fn is_finished(&self) -> bool {
        matches!(
            self,
            PipelineRunStatus::Success | PipelineRunStatus::Failure | PipelineRunStatus::Canceled
        )
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, PipelineRunStatus::Failure | PipelineRunStatus::Canceled)
    }

    /// Queued or started but not yet finished
    pub fn is_in_progress(&self) -> bool {
        !self.is_finished()
    }
}

/// Overall status of a schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleStatus {
    Running,
    Stopped,
    Ended,
}

string_enum!(ScheduleStatus, "ScheduleStatus", {
    Running => "RUNNING",
    Stopped => "STOPPED",
    Ended => "ENDED",
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_match_display() {
        for status in PipelineRunStatus::all() {
            let json = serde_json::to_string(status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
        }
        for status in JobTickStatus::all() {
            let json = serde_json::to_string(status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
        }
        for status in ScheduleStatus::all() {
            let json = serde_json::to_string(status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
        }
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("not_started".parse::<PipelineRunStatus>().unwrap(), PipelineRunStatus::NotStarted);
        assert_eq!("SKIPPED".parse::<JobTickStatus>().unwrap(), JobTickStatus::Skipped);
        assert_eq!("running".parse::<ScheduleStatus>().unwrap(), ScheduleStatus::Running);
    }

    #[test]
    fn test_unknown_value_is_rejected() {
        let err = "PAUSED".parse::<ScheduleStatus>().unwrap_err();
        assert_eq!(err.kind, "ScheduleStatus");
        assert_eq!(err.value, "PAUSED");

        assert!(serde_json::from_str::<JobTickStatus>("\"RETRYING\"").is_err());
    }

    #[test]
    fn test_run_status_predicates() {
        assert!(PipelineRunStatus::Success.is_finished());
        assert!(!PipelineRunStatus::Success.is_failed());
        assert!(PipelineRunStatus::Canceled.is_failed());
        assert!(PipelineRunStatus::Queued.is_in_progress());
        assert!(PipelineRunStatus::Canceling.is_in_progress());
    }
}
