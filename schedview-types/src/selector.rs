//! Schedule selector and query variables

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifies one schedule inside one repository of one repository location
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSelector {
    pub repository_location_name: String,
    pub repository_name: String,
    pub schedule_name: String,
}

impl ScheduleSelector {
    pub fn new(
        repository_location_name: impl Into<String>,
        repository_name: impl Into<String>,
        schedule_name: impl Into<String>,
    ) -> Self {
        Self {
            repository_location_name: repository_location_name.into(),
            repository_name: repository_name.into(),
            schedule_name: schedule_name.into(),
        }
    }

    /// Wrap into the variables object of `ScheduleRootQuery`
    pub fn into_variables(self) -> ScheduleRootQueryVariables {
        ScheduleRootQueryVariables {
            schedule_selector: self,
        }
    }
}

/// `schedule@repository@location`, the form used on the command line
impl fmt::Display for ScheduleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}@{}",
            self.schedule_name, self.repository_name, self.repository_location_name
        )
    }
}

/// Errors that can occur when parsing a selector string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectorParseError {
    #[error("expected 'schedule@repository@location', got '{0}'")]
    InvalidFormat(String),

    #[error("selector part '{0}' cannot be empty")]
    EmptyPart(&'static str),
}

impl FromStr for ScheduleSelector {
    type Err = SelectorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('@').collect();
        let [schedule, repository, location] = parts.as_slice() else {
            return Err(SelectorParseError::InvalidFormat(s.to_string()));
        };

        for (name, value) in [
            ("schedule", schedule),
            ("repository", repository),
            ("location", location),
        ] {
            if value.trim().is_empty() {
                return Err(SelectorParseError::EmptyPart(name));
            }
        }

        Ok(Self::new(location.trim(), repository.trim(), schedule.trim()))
    }
}

/// Variables of the `ScheduleRootQuery` operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRootQueryVariables {
    pub schedule_selector: ScheduleSelector,
}

impl From<ScheduleSelector> for ScheduleRootQueryVariables {
    fn from(selector: ScheduleSelector) -> Self {
        selector.into_variables()
    }
}
