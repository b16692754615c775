//! Terminal rendering of query results

use colored::*;
use schedview_config::OutputConfig;
use schedview_types::{
    FutureTicks, JobTickStatus, PipelineRunStatus, PythonError, ScheduleDefinition,
    ScheduleDefinitionOrError, ScheduleRootQuery, ScheduleState, ScheduleStatus,
    SchedulerOrError, TickOutcome,
};
use std::io::{self, Write};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Limits and detail level for table output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub tick_limit: usize,
    pub run_limit: usize,
    pub show_stack: bool,
}

impl From<&OutputConfig> for RenderOptions {
    fn from(config: &OutputConfig) -> Self {
        Self {
            tick_limit: config.tick_limit,
            run_limit: config.run_limit,
            show_stack: config.show_stack,
        }
    }
}

/// One table cell; color is applied after padding so widths stay right
struct Cell {
    text: String,
    color: Option<Color>,
}

impl Cell {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
        }
    }

    fn colored(text: impl Into<String>, color: Option<Color>) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

pub struct Renderer {
    options: RenderOptions,
}

impl Renderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render the whole query result
    pub fn render_root<W: Write>(&self, out: &mut W, root: &ScheduleRootQuery) -> io::Result<()> {
        self.render_scheduler(out, &root.scheduler)?;
        writeln!(out)?;
        self.render_definition_result(out, &root.schedule_definition_or_error)
    }

    pub fn render_scheduler<W: Write>(
        &self,
        out: &mut W,
        scheduler: &SchedulerOrError,
    ) -> io::Result<()> {
        match scheduler {
            SchedulerOrError::Scheduler(scheduler) => {
                let class = scheduler.scheduler_class.as_deref().unwrap_or("(unknown class)");
                writeln!(out, "{} {} {}", "✓".bright_green().bold(), "Scheduler:".bold(), class)
            }
            SchedulerOrError::SchedulerNotDefinedError(err) => {
                writeln!(
                    out,
                    "{} {} {}",
                    "⚠".bright_yellow().bold(),
                    "Scheduler not defined:".bold(),
                    err.message.bright_yellow()
                )
            }
            SchedulerOrError::PythonError(err) => {
                writeln!(out, "{} {}", "✗".bright_red().bold(), "Scheduler error".bold())?;
                self.render_error(out, err)
            }
        }
    }

    pub fn render_definition_result<W: Write>(
        &self,
        out: &mut W,
        result: &ScheduleDefinitionOrError,
    ) -> io::Result<()> {
        match result {
            ScheduleDefinitionOrError::ScheduleDefinition(definition) => {
                self.render_definition(out, definition)
            }
            ScheduleDefinitionOrError::ScheduleDefinitionNotFoundError(err) => {
                writeln!(
                    out,
                    "{} {} {}",
                    "✗".bright_red().bold(),
                    "Schedule not found:".bold(),
                    err.message.bright_red()
                )
            }
            ScheduleDefinitionOrError::PythonError(err) => {
                writeln!(out, "{} {}", "✗".bright_red().bold(), "Schedule lookup failed".bold())?;
                self.render_error(out, err)
            }
        }
    }

    fn render_definition<W: Write>(
        &self,
        out: &mut W,
        definition: &ScheduleDefinition,
    ) -> io::Result<()> {
        writeln!(out, "{} {}", "Schedule".bright_cyan().bold(), definition.name.bold())?;
        field(out, "Id", definition.id.as_str())?;
        field(out, "Cron", &definition.cron_schedule)?;
        field(out, "Timezone", definition.timezone())?;
        field(out, "Pipeline", &definition.pipeline_name)?;
        field(out, "Mode", &definition.mode)?;
        if let Some(solids) = definition.selected_solids() {
            field(out, "Solids", &solids.join(", "))?;
        }
        if let Some(partition_set) = &definition.partition_set {
            field(out, "Partition set", &partition_set.name)?;
        }

        match &definition.schedule_state {
            Some(state) => self.render_state(out, state)?,
            None => field(out, "State", "no state recorded")?,
        }

        writeln!(out)?;
        self.render_future_ticks(out, &definition.future_ticks)
    }

    fn render_state<W: Write>(&self, out: &mut W, state: &ScheduleState) -> io::Result<()> {
        let status = state.status.as_str().color(schedule_status_color(state.status));
        writeln!(out, "  {:<14} {}", "Status:".bold(), status)?;

        let origin = &state.repository_origin;
        field(
            out,
            "Repository",
            &format!("{}@{}", origin.repository_name, origin.repository_location_name),
        )?;
        for entry in &origin.repository_location_metadata {
            writeln!(out, "    {}: {}", entry.key.dimmed(), entry.value)?;
        }

        if state.has_duplicate_runners() {
            writeln!(
                out,
                "{} {}",
                "⚠".bright_yellow().bold(),
                format!(
                    "{} schedulers are running this schedule",
                    state.running_schedule_count
                )
                .bright_yellow()
            )?;
        }

        let stats = state.tick_stats();
        field(
            out,
            "Ticks",
            &format!(
                "{} fetched of {} ({} succeeded, {} failed, {} skipped, {} started)",
                stats.total(),
                state.ticks_count,
                stats.succeeded,
                stats.failed,
                stats.skipped,
                stats.started
            ),
        )?;

        writeln!(out)?;
        self.render_ticks(out, state)?;
        writeln!(out)?;
        self.render_runs(out, state)
    }

    fn render_ticks<W: Write>(&self, out: &mut W, state: &ScheduleState) -> io::Result<()> {
        writeln!(out, "{}", "Recent ticks".bright_cyan().bold())?;
        if state.ticks.is_empty() {
            return writeln!(out, "  {}", "No ticks recorded".dimmed());
        }

        let mut failures = Vec::new();
        let rows: Vec<Vec<Cell>> = state
            .ticks_newest_first()
            .into_iter()
            .take(self.options.tick_limit)
            .map(|tick| {
                let detail = match tick.outcome() {
                    TickOutcome::Launched(Some(run)) => format!("run {}", run.run_id.short()),
                    TickOutcome::Launched(None) => "run unavailable".to_string(),
                    TickOutcome::Failed(Some(err)) => {
                        failures.push((tick.tick_id.as_str(), err));
                        first_line(&err.message)
                    }
                    TickOutcome::Failed(None) => "no error recorded".to_string(),
                    TickOutcome::Pending | TickOutcome::Skipped => String::new(),
                };
                vec![
                    Cell::plain(tick.tick_id.as_str()),
                    Cell::plain(format_time(tick.time())),
                    Cell::colored(tick.status.as_str(), tick_status_color(tick.status)),
                    Cell::plain(detail),
                ]
            })
            .collect();

        write_table(out, &["TICK", "TIME", "STATUS", "DETAIL"], &rows)?;
        if state.has_more_ticks() {
            writeln!(out, "  {}", format!("{} ticks in total", state.ticks_count).dimmed())?;
        }

        for (tick_id, err) in failures {
            writeln!(out)?;
            writeln!(out, "{} {}", "Tick".bold(), tick_id.bold())?;
            self.render_error(out, err)?;
        }
        Ok(())
    }

    fn render_runs<W: Write>(&self, out: &mut W, state: &ScheduleState) -> io::Result<()> {
        writeln!(out, "{}", "Recent runs".bright_cyan().bold())?;
        if state.runs.is_empty() {
            return writeln!(out, "  {}", "No runs launched".dimmed());
        }

        let rows: Vec<Vec<Cell>> = state
            .runs
            .iter()
            .take(self.options.run_limit)
            .map(|run| {
                let tags = run
                    .tags
                    .iter()
                    .map(|tag| format!("{}={}", tag.key, tag.value))
                    .collect::<Vec<_>>()
                    .join(" ");
                vec![
                    Cell::plain(run.run_id.short()),
                    Cell::plain(run.pipeline_name.as_str()),
                    Cell::colored(run.status.as_str(), run_status_color(run.status)),
                    Cell::plain(tags),
                ]
            })
            .collect();

        write_table(out, &["RUN", "PIPELINE", "STATUS", "TAGS"], &rows)?;
        if state.has_more_runs() {
            writeln!(out, "  {}", format!("{} runs in total", state.runs_count).dimmed())?;
        }
        Ok(())
    }

    fn render_future_ticks<W: Write>(&self, out: &mut W, ticks: &FutureTicks) -> io::Result<()> {
        writeln!(out, "{}", "Upcoming ticks".bright_cyan().bold())?;
        if ticks.is_empty() {
            return writeln!(out, "  {}", "None scheduled".dimmed());
        }
        for tick in &ticks.results {
            writeln!(out, "  {}", format_time(tick.time()))?;
        }
        Ok(())
    }

    /// Error message with its cause chain, stacks only when requested
    pub fn render_error<W: Write>(&self, out: &mut W, err: &PythonError) -> io::Result<()> {
        for (depth, error) in err.chain().enumerate() {
            let prefix = if depth == 0 { "error:" } else { "caused by:" };
            let indent = "  ".repeat(depth + 1);
            writeln!(out, "{}{} {}", indent, prefix.bright_red().bold(), error.message.trim_end())?;

            if self.options.show_stack && !error.stack.is_empty() {
                for line in error.stack_trace().lines() {
                    writeln!(out, "{}  {}", indent, line.dimmed())?;
                }
            }
        }
        Ok(())
    }
}

fn field<W: Write>(out: &mut W, label: &str, value: &str) -> io::Result<()> {
    writeln!(out, "  {:<14} {}", format!("{}:", label).bold(), value)
}

fn format_time(time: Option<chrono::DateTime<chrono::Utc>>) -> String {
    time.map(|t| t.format(TIME_FORMAT).to_string())
        .unwrap_or_else(|| "invalid timestamp".to_string())
}

fn first_line(message: &str) -> String {
    message.lines().next().unwrap_or_default().trim().to_string()
}

fn tick_status_color(status: JobTickStatus) -> Option<Color> {
    match status {
        JobTickStatus::Success => Some(Color::BrightGreen),
        JobTickStatus::Failure => Some(Color::BrightRed),
        JobTickStatus::Skipped => Some(Color::BrightYellow),
        JobTickStatus::Started => Some(Color::BrightBlue),
    }
}

fn run_status_color(status: PipelineRunStatus) -> Option<Color> {
    if status.is_failed() {
        Some(Color::BrightRed)
    } else if status == PipelineRunStatus::Success {
        Some(Color::BrightGreen)
    } else if matches!(
        status,
        PipelineRunStatus::Starting | PipelineRunStatus::Started | PipelineRunStatus::Canceling
    ) {
        Some(Color::BrightBlue)
    } else {
        None
    }
}

fn schedule_status_color(status: ScheduleStatus) -> Color {
    match status {
        ScheduleStatus::Running => Color::BrightGreen,
        ScheduleStatus::Stopped => Color::BrightYellow,
        ScheduleStatus::Ended => Color::White,
    }
}

fn write_table<W: Write>(out: &mut W, headers: &[&str], rows: &[Vec<Cell>]) -> io::Result<()> {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.text.chars().count());
            }
        }
    }

    write_separator(out, &widths, ('┌', '┬', '┐'))?;
    write!(out, "│")?;
    for (header, width) in headers.iter().zip(&widths) {
        write!(out, " {} │", pad(header, *width).bright_cyan().bold())?;
    }
    writeln!(out)?;
    write_separator(out, &widths, ('├', '┼', '┤'))?;

    for row in rows {
        write!(out, "│")?;
        for (cell, width) in row.iter().zip(&widths) {
            let padded = pad(&cell.text, *width);
            match cell.color {
                Some(color) => write!(out, " {} │", padded.color(color))?,
                None => write!(out, " {} │", padded)?,
            }
        }
        writeln!(out)?;
    }
    write_separator(out, &widths, ('└', '┴', '┘'))
}

fn write_separator<W: Write>(
    out: &mut W,
    widths: &[usize],
    (left, middle, right): (char, char, char),
) -> io::Result<()> {
    let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
    writeln!(out, "{}{}{}", left, segments.join(&middle.to_string()), right)
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}
