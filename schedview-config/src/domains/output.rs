//! Output rendering configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, Validatable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Matches the history page size of the query document
const DEFAULT_HISTORY_ROWS: usize = 20;

/// How command results are printed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// Colorize terminal output
    pub color: bool,

    /// Rows of the tick history table
    pub tick_limit: usize,

    /// Rows of the run history table
    pub run_limit: usize,

    /// Print stack frames under each error
    pub show_stack: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            color: true,
            tick_limit: DEFAULT_HISTORY_ROWS,
            run_limit: DEFAULT_HISTORY_ROWS,
            show_stack: false,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Table => f.write_str("table"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Invalid output format: {}", s)),
        }
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.tick_limit, "tick_limit", self.domain_name())?;
        validate_positive(self.run_limit, "run_limit", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "output"
    }
}
