//! Conversions from wire values to derived, display-ready values

use chrono::{DateTime, Utc};

use crate::domain::{TickRun, TickSpecificData};
use crate::enums::JobTickStatus;
use crate::errors::PythonError;

/// Convert epoch seconds (with fractional part) into a UTC timestamp.
///
/// Returns `None` for non-finite values and values outside chrono's range.
pub fn timestamp_to_datetime(timestamp: f64) -> Option<DateTime<Utc>> {
    if !timestamp.is_finite() {
        return None;
    }
    let secs = timestamp.floor();
    if secs < i64::MIN as f64 || secs > i64::MAX as f64 {
        return None;
    }
    let nanos = ((timestamp - secs) * 1_000_000_000.0).round() as u32;
    let (secs, nanos) = if nanos >= 1_000_000_000 {
        (secs as i64 + 1, 0)
    } else {
        (secs as i64, nanos)
    };
    DateTime::from_timestamp(secs, nanos)
}

/// What a tick amounted to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome<'a> {
    /// Evaluation still in progress
    Pending,
    /// Evaluated, nothing to launch
    Skipped,
    /// Launched a run; the reference is absent when the run was deleted
    Launched(Option<&'a TickRun>),
    /// Evaluation failed
    Failed(Option<&'a PythonError>),
}

/// Combine tick status and payload into an outcome.
///
/// The status decides the outcome; the payload only contributes the run or
/// the error when it matches the status.
pub fn compute_tick_outcome(
    status: JobTickStatus,
    data: Option<&TickSpecificData>,
) -> TickOutcome<'_> {
    match status {
        JobTickStatus::Started => TickOutcome::Pending,
        JobTickStatus::Skipped => TickOutcome::Skipped,
        JobTickStatus::Success => match data {
            Some(TickSpecificData::ScheduleTickSuccessData(success)) => {
                TickOutcome::Launched(success.run.as_ref())
            }
            Some(TickSpecificData::ScheduleTickFailureData(_)) | None => {
                TickOutcome::Launched(None)
            }
        },
        JobTickStatus::Failure => match data {
            Some(TickSpecificData::ScheduleTickFailureData(failure)) => {
                TickOutcome::Failed(Some(&failure.error))
            }
            Some(TickSpecificData::ScheduleTickSuccessData(_)) | None => TickOutcome::Failed(None),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ScheduleTickFailureData, ScheduleTickSuccessData};
    use crate::enums::PipelineRunStatus;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_timestamp_conversion() {
        let dt = timestamp_to_datetime(1_609_459_200.5).unwrap();
        assert_eq!(dt.year(), 2021);
        assert_eq!(dt.month(), 1);
        assert_eq!(dt.day(), 1);
        assert_eq!(dt.hour(), 0);
        assert_eq!(dt.timestamp_subsec_millis(), 500);
    }

    #[test]
    fn test_timestamp_conversion_rejects_garbage() {
        assert!(timestamp_to_datetime(f64::NAN).is_none());
        assert!(timestamp_to_datetime(f64::INFINITY).is_none());
        assert!(timestamp_to_datetime(1e30).is_none());
    }

    #[test]
    fn test_outcome_follows_status() {
        let run = TickRun {
            typename: None,
            id: "r1".into(),
            pipeline_name: "p".into(),
            status: PipelineRunStatus::Success,
            run_id: "r1".into(),
        };
        let success = TickSpecificData::ScheduleTickSuccessData(ScheduleTickSuccessData {
            run: Some(run.clone()),
        });
        let failure = TickSpecificData::ScheduleTickFailureData(ScheduleTickFailureData {
            error: PythonError::new("boom", vec![]),
        });

        assert_eq!(
            compute_tick_outcome(JobTickStatus::Success, Some(&success)),
            TickOutcome::Launched(Some(&run))
        );
        assert_eq!(
            compute_tick_outcome(JobTickStatus::Success, None),
            TickOutcome::Launched(None)
        );
        assert!(matches!(
            compute_tick_outcome(JobTickStatus::Failure, Some(&failure)),
            TickOutcome::Failed(Some(err)) if err.message == "boom"
        ));
        assert_eq!(
            compute_tick_outcome(JobTickStatus::Skipped, Some(&success)),
            TickOutcome::Skipped
        );
        assert_eq!(compute_tick_outcome(JobTickStatus::Started, None), TickOutcome::Pending);
    }
}
