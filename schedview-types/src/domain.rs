use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::conversions::{compute_tick_outcome, timestamp_to_datetime, TickOutcome};
use crate::enums::*;
use crate::errors::{LookupError, PythonError, SchedulerError};
use crate::ids::ObjectId;

/// Response of the `ScheduleRootQuery` operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRootQuery {
    pub scheduler: SchedulerOrError,
    pub schedule_definition_or_error: ScheduleDefinitionOrError,
}

// ---------------------------------------------------------------------------
// Scheduler
// ---------------------------------------------------------------------------

/// Result of asking for the active scheduler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum SchedulerOrError {
    SchedulerNotDefinedError(SchedulerNotDefinedError),
    Scheduler(Scheduler),
    PythonError(PythonError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerNotDefinedError {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scheduler {
    pub scheduler_class: Option<String>,
}

impl SchedulerOrError {
    pub fn scheduler(&self) -> Result<&Scheduler, SchedulerError> {
        match self {
            SchedulerOrError::Scheduler(scheduler) => Ok(scheduler),
            SchedulerOrError::SchedulerNotDefinedError(err) => {
                Err(SchedulerError::NotDefined(err.message.clone()))
            }
            SchedulerOrError::PythonError(err) => Err(SchedulerError::Server(err.clone())),
        }
    }

    /// Configured scheduler class, if a scheduler is defined and reports one
    pub fn scheduler_class(&self) -> Option<&str> {
        match self {
            SchedulerOrError::Scheduler(scheduler) => scheduler.scheduler_class.as_deref(),
            SchedulerOrError::SchedulerNotDefinedError(_) | SchedulerOrError::PythonError(_) => {
                None
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, SchedulerOrError::Scheduler(_))
    }

    pub fn typename(&self) -> &'static str {
        match self {
            SchedulerOrError::SchedulerNotDefinedError(_) => "SchedulerNotDefinedError",
            SchedulerOrError::Scheduler(_) => "Scheduler",
            SchedulerOrError::PythonError(_) => "PythonError",
        }
    }
}

// ---------------------------------------------------------------------------
// Schedule definition
// ---------------------------------------------------------------------------

/// Result of looking up one schedule by selector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum ScheduleDefinitionOrError {
    ScheduleDefinition(Box<ScheduleDefinition>),
    ScheduleDefinitionNotFoundError(ScheduleDefinitionNotFoundError),
    PythonError(PythonError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleDefinitionNotFoundError {
    pub message: String,
}

impl ScheduleDefinitionOrError {
    pub fn definition(&self) -> Result<&ScheduleDefinition, LookupError> {
        match self {
            ScheduleDefinitionOrError::ScheduleDefinition(definition) => Ok(definition.as_ref()),
            ScheduleDefinitionOrError::ScheduleDefinitionNotFoundError(err) => {
                Err(LookupError::NotFound(err.message.clone()))
            }
            ScheduleDefinitionOrError::PythonError(err) => Err(LookupError::Server(err.clone())),
        }
    }

    pub fn into_definition(self) -> Result<ScheduleDefinition, LookupError> {
        match self {
            ScheduleDefinitionOrError::ScheduleDefinition(definition) => Ok(*definition),
            ScheduleDefinitionOrError::ScheduleDefinitionNotFoundError(err) => {
                Err(LookupError::NotFound(err.message))
            }
            ScheduleDefinitionOrError::PythonError(err) => Err(LookupError::Server(err)),
        }
    }

    pub fn typename(&self) -> &'static str {
        match self {
            ScheduleDefinitionOrError::ScheduleDefinition(_) => "ScheduleDefinition",
            ScheduleDefinitionOrError::ScheduleDefinitionNotFoundError(_) => {
                "ScheduleDefinitionNotFoundError"
            }
            ScheduleDefinitionOrError::PythonError(_) => "PythonError",
        }
    }
}

/// A named, cron-triggered job definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDefinition {
    pub id: ObjectId,
    pub name: String,
    pub cron_schedule: String,
    pub execution_timezone: Option<String>,
    pub pipeline_name: String,
    pub solid_selection: Option<Vec<Option<String>>>,
    pub mode: String,
    pub partition_set: Option<PartitionSet>,
    pub schedule_state: Option<ScheduleState>,
    pub future_ticks: FutureTicks,
}

impl ScheduleDefinition {
    /// Non-null entries of the solid selection, `None` when the whole
    /// pipeline executes
    pub fn selected_solids(&self) -> Option<Vec<&str>> {
        self.solid_selection
            .as_ref()
            .map(|solids| solids.iter().filter_map(|s| s.as_deref()).collect())
    }

    /// Timezone ticks are evaluated in, UTC when the definition names none
    pub fn timezone(&self) -> &str {
        self.execution_timezone.as_deref().unwrap_or("UTC")
    }

    pub fn is_running(&self) -> bool {
        self.schedule_state
            .as_ref()
            .is_some_and(ScheduleState::is_running)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionSet {
    /// Object type name, kept when the response selects it
    #[serde(rename = "__typename", default, skip_serializing_if = "Option::is_none")]
    pub typename: Option<String>,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Schedule state
// ---------------------------------------------------------------------------

/// Runtime status of a schedule as recorded by the instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleState {
    /// Object type name, kept when the response selects it
    #[serde(rename = "__typename", default, skip_serializing_if = "Option::is_none")]
    pub typename: Option<String>,
    pub id: ObjectId,
    pub schedule_origin_id: ObjectId,
    pub repository_origin: RepositoryOrigin,
    pub repository_origin_id: ObjectId,
    pub schedule_name: String,
    pub cron_schedule: String,
    pub running_schedule_count: i32,
    pub ticks: Vec<ScheduleTick>,
    pub runs_count: i32,
    pub runs: Vec<PipelineRun>,
    pub ticks_count: i32,
    pub status: ScheduleStatus,
}

/// Tick counts per status over the fetched tick history
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickStats {
    pub started: usize,
    pub skipped: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl TickStats {
    pub fn total(&self) -> usize {
        self.started + self.skipped + self.succeeded + self.failed
    }
}

impl ScheduleState {
    pub fn is_running(&self) -> bool {
        self.status == ScheduleStatus::Running
    }

    /// More than one scheduler process is running this schedule
    pub fn has_duplicate_runners(&self) -> bool {
        self.running_schedule_count > 1
    }

    /// Most recent tick by timestamp
    pub fn latest_tick(&self) -> Option<&ScheduleTick> {
        self.ticks
            .iter()
            .max_by(|a, b| a.timestamp.total_cmp(&b.timestamp))
    }

    /// Ticks ordered newest first
    pub fn ticks_newest_first(&self) -> Vec<&ScheduleTick> {
        let mut ticks: Vec<&ScheduleTick> = self.ticks.iter().collect();
        ticks.sort_by(|a, b| b.timestamp.total_cmp(&a.timestamp));
        ticks
    }

    pub fn tick_stats(&self) -> TickStats {
        let mut stats = TickStats::default();
        for tick in &self.ticks {
            match tick.status {
                JobTickStatus::Started => stats.started += 1,
                JobTickStatus::Skipped => stats.skipped += 1,
                JobTickStatus::Success => stats.succeeded += 1,
                JobTickStatus::Failure => stats.failed += 1,
            }
        }
        stats
    }

    /// Run counts per status over the fetched run history
    pub fn run_status_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for run in &self.runs {
            *counts.entry(run.status.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Server-side run total exceeds what was fetched
    pub fn has_more_runs(&self) -> bool {
        usize::try_from(self.runs_count).is_ok_and(|count| count > self.runs.len())
    }

    /// Server-side tick total exceeds what was fetched
    pub fn has_more_ticks(&self) -> bool {
        usize::try_from(self.ticks_count).is_ok_and(|count| count > self.ticks.len())
    }
}

/// Where a schedule's code lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryOrigin {
    /// Object type name, kept when the response selects it
    #[serde(rename = "__typename", default, skip_serializing_if = "Option::is_none")]
    pub typename: Option<String>,
    pub repository_location_name: String,
    pub repository_name: String,
    pub repository_location_metadata: Vec<RepositoryMetadata>,
}

impl RepositoryOrigin {
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.repository_location_metadata
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryMetadata {
    /// Object type name, kept when the response selects it
    #[serde(rename = "__typename", default, skip_serializing_if = "Option::is_none")]
    pub typename: Option<String>,
    pub key: String,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Ticks
// ---------------------------------------------------------------------------

/// One historical evaluation of a schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleTick {
    /// Object type name, kept when the response selects it
    #[serde(rename = "__typename", default, skip_serializing_if = "Option::is_none")]
    pub typename: Option<String>,
    pub tick_id: ObjectId,
    pub status: JobTickStatus,
    /// Seconds since the Unix epoch
    pub timestamp: f64,
    pub tick_specific_data: Option<TickSpecificData>,
}

impl ScheduleTick {
    pub fn time(&self) -> Option<DateTime<Utc>> {
        timestamp_to_datetime(self.timestamp)
    }

    pub fn outcome(&self) -> TickOutcome<'_> {
        compute_tick_outcome(self.status, self.tick_specific_data.as_ref())
    }

    /// Error attached to a failed tick
    pub fn error(&self) -> Option<&PythonError> {
        match &self.tick_specific_data {
            Some(TickSpecificData::ScheduleTickFailureData(data)) => Some(&data.error),
            Some(TickSpecificData::ScheduleTickSuccessData(_)) | None => None,
        }
    }

    /// Run launched by a successful tick
    pub fn run(&self) -> Option<&TickRun> {
        match &self.tick_specific_data {
            Some(TickSpecificData::ScheduleTickSuccessData(data)) => data.run.as_ref(),
            Some(TickSpecificData::ScheduleTickFailureData(_)) | None => None,
        }
    }
}

/// Outcome payload of a tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "__typename")]
pub enum TickSpecificData {
    ScheduleTickSuccessData(ScheduleTickSuccessData),
    ScheduleTickFailureData(ScheduleTickFailureData),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTickSuccessData {
    pub run: Option<TickRun>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTickFailureData {
    pub error: PythonError,
}

/// Run reference attached to a successful tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickRun {
    /// Object type name, kept when the response selects it
    #[serde(rename = "__typename", default, skip_serializing_if = "Option::is_none")]
    pub typename: Option<String>,
    pub id: ObjectId,
    pub pipeline_name: String,
    pub status: PipelineRunStatus,
    pub run_id: ObjectId,
}

// ---------------------------------------------------------------------------
// Runs
// ---------------------------------------------------------------------------

/// A triggered execution of the schedule's pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineRun {
    /// Object type name, kept when the response selects it
    #[serde(rename = "__typename", default, skip_serializing_if = "Option::is_none")]
    pub typename: Option<String>,
    pub id: ObjectId,
    pub run_id: ObjectId,
    pub tags: Vec<PipelineTag>,
    pub pipeline_name: String,
    pub status: PipelineRunStatus,
}

impl PipelineRun {
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.key == key)
            .map(|tag| tag.value.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineTag {
    /// Object type name, kept when the response selects it
    #[serde(rename = "__typename", default, skip_serializing_if = "Option::is_none")]
    pub typename: Option<String>,
    pub key: String,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Future ticks
// ---------------------------------------------------------------------------

/// Projected upcoming evaluations, in order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FutureTicks {
    /// Object type name, kept when the response selects it
    #[serde(rename = "__typename", default, skip_serializing_if = "Option::is_none")]
    pub typename: Option<String>,
    pub results: Vec<FutureTick>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FutureTick {
    /// Object type name, kept when the response selects it
    #[serde(rename = "__typename", default, skip_serializing_if = "Option::is_none")]
    pub typename: Option<String>,
    pub timestamp: f64,
}

impl FutureTick {
    pub fn time(&self) -> Option<DateTime<Utc>> {
        timestamp_to_datetime(self.timestamp)
    }
}

impl FutureTicks {
    pub fn next(&self) -> Option<&FutureTick> {
        self.results.first()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Upcoming tick times; timestamps outside chrono's range are skipped
    pub fn times(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.results.iter().filter_map(FutureTick::time)
    }
}
