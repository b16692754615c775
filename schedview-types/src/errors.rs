//! Error shapes that travel inside query responses

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Server-side exception rendered as data.
///
/// `cause` is tri-state so a decoded value re-encodes with the same field
/// set it arrived with:
/// - `None`: the field was not selected
/// - `Some(None)`: selected, server returned null
/// - `Some(Some(_))`: selected, a chained cause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PythonError {
    /// Set on causes and tick failure errors; union positions consume the
    /// tag as the variant
    #[serde(rename = "__typename", default, skip_serializing_if = "Option::is_none")]
    pub typename: Option<String>,
    pub message: String,
    pub stack: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "selected")]
    pub cause: Option<Option<Box<PythonError>>>,
}

impl PythonError {
    /// Error without a selected `cause` field
    pub fn new(message: impl Into<String>, stack: Vec<String>) -> Self {
        Self {
            typename: None,
            message: message.into(),
            stack,
            cause: None,
        }
    }

    /// Select `cause` and set it to `cause`
    pub fn with_cause(mut self, cause: PythonError) -> Self {
        self.cause = Some(Some(Box::new(cause)));
        self
    }

    pub fn cause(&self) -> Option<&PythonError> {
        self.cause.as_ref().and_then(|c| c.as_deref())
    }

    /// Whether the `cause` field was part of the selection
    pub fn has_cause_field(&self) -> bool {
        self.cause.is_some()
    }

    /// This error followed by each of its causes, outermost first
    pub fn chain(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }

    /// Innermost error of the chain
    pub fn root_cause(&self) -> &PythonError {
        let mut current = self;
        while let Some(cause) = current.cause() {
            current = cause;
        }
        current
    }

    /// Stack frames joined into one block, trailing newlines removed
    pub fn stack_trace(&self) -> String {
        self.stack
            .iter()
            .map(|frame| frame.trim_end_matches('\n'))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for PythonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message.trim_end())?;
        for cause in self.chain().skip(1) {
            write!(f, "\ncaused by: {}", cause.message.trim_end())?;
        }
        Ok(())
    }
}

/// Iterator over an error and its causes
pub struct Chain<'a> {
    next: Option<&'a PythonError>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a PythonError;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.cause();
        Some(current)
    }
}

/// Presence-preserving (de)serialization for a nullable field
mod selected {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S, T>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

/// Failure to reach a schedule definition through its result union
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LookupError {
    #[error("schedule definition not found: {0}")]
    NotFound(String),

    #[error("server error while loading schedule definition: {0}")]
    Server(PythonError),
}

/// Failure to reach the scheduler through its result union
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulerError {
    #[error("scheduler not defined: {0}")]
    NotDefined(String),

    #[error("server error while loading scheduler: {0}")]
    Server(PythonError),
}
