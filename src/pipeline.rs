//! Single-pass driver: input events through filter, grouping and
//! reconciliation into the sink.

use serde::Serialize;
use std::io::{BufRead, Write};
use thiserror::Error;
use tracing::{info, trace, warn};

use crate::matching::diagnosis::ExceptionKind;
use crate::matching::engine::reconcile;
use crate::matching::filter::FilterConfig;
use crate::matching::grouping::{Group, GroupAccumulator, GroupingError};
use crate::output::sink::Sink;
use crate::parsing::header::{summarize_header, warn_on_sort_order, HeaderSummary};
use crate::parsing::sam::{EventReader, InputEvent, ParseError};

#[derive(Error, Debug)]
pub enum RearrangeError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Grouping(#[from] GroupingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Settings for one run
#[derive(Debug, Clone, Default)]
pub struct RearrangeConfig {
    pub filter: FilterConfig,

    /// Fail if a read name reappears after its group was closed
    pub check_regrouping: bool,
}

/// Counts collected over a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub header_lines: usize,
    pub data_lines: usize,
    pub eligible_records: usize,
    pub filtered_records: usize,
    pub groups: usize,
    pub singleton_groups: usize,
    pub pairs_emitted: usize,
    pub records_emitted: usize,
    pub group_exceptions: usize,
    pub record_exceptions: usize,
    pub trailing_lines_ignored: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<HeaderSummary>,
}

impl RunSummary {
    /// Fraction of eligible records written to the main output
    #[must_use]
    pub fn emitted_fraction(&self) -> f64 {
        if self.eligible_records == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)] // Record counts fit comfortably in f64
        let fraction = self.records_emitted as f64 / self.eligible_records as f64;
        fraction
    }
}

/// Process one input stream end to end.
///
/// Header lines go straight to the main output. Data lines are filtered,
/// grouped by read name and reconciled one group at a time; the last group
/// is closed by the end marker (a blank line, or EOF).
///
/// # Errors
///
/// Returns `RearrangeError::Parse` for a malformed data line,
/// `RearrangeError::Grouping` if the input is found not to be grouped by
/// read name, or `RearrangeError::Io` if an output cannot be written.
pub fn run<R, A, D>(
    input: R,
    sink: &mut Sink<A, D>,
    config: &RearrangeConfig,
) -> Result<RunSummary, RearrangeError>
where
    R: BufRead,
    A: Write,
    D: Write,
{
    let mut summary = RunSummary::default();
    let mut accumulator = GroupAccumulator::new();
    if config.check_regrouping {
        accumulator = accumulator.with_regrouping_check();
    }

    let mut header_text = String::new();
    let mut in_header = true;
    let mut events = EventReader::new(input);

    for event in events.by_ref() {
        match event? {
            InputEvent::Header(line) => {
                summary.header_lines += 1;
                sink.write_header(&line)?;
                if in_header {
                    header_text.push_str(&line);
                    header_text.push('\n');
                }
            }
            InputEvent::Record(record) => {
                if in_header {
                    in_header = false;
                    summary.header = close_header(&header_text);
                }
                summary.data_lines += 1;

                if let Err(reason) = config.filter.check(&record) {
                    trace!(identifier = record.identifier(), ?reason, "Skipping ineligible record");
                    summary.filtered_records += 1;
                    continue;
                }
                summary.eligible_records += 1;

                if let Some(group) = accumulator.push(record)? {
                    emit_group(group, sink, &mut summary)?;
                }
            }
            InputEvent::End => {
                if let Some(group) = accumulator.finish()? {
                    emit_group(group, sink, &mut summary)?;
                }
            }
        }
    }

    if in_header {
        summary.header = close_header(&header_text);
    }

    summary.trailing_lines_ignored = events.drain_trailing()?;
    if summary.trailing_lines_ignored > 0 {
        warn!(
            lines = summary.trailing_lines_ignored,
            "Ignoring lines after the blank end-of-input line"
        );
    }

    sink.flush()?;

    info!(
        lines = events.lines_read(),
        groups = summary.groups,
        pairs = summary.pairs_emitted,
        group_exceptions = summary.group_exceptions,
        record_exceptions = summary.record_exceptions,
        "Rearrangement complete"
    );

    Ok(summary)
}

fn close_header(text: &str) -> Option<HeaderSummary> {
    if text.is_empty() {
        return None;
    }
    let header = summarize_header(text);
    warn_on_sort_order(&header);
    Some(header)
}

fn emit_group<A: Write, D: Write>(
    group: Group,
    sink: &mut Sink<A, D>,
    summary: &mut RunSummary,
) -> std::io::Result<()> {
    summary.groups += 1;
    if group.len() == 1 {
        summary.singleton_groups += 1;
    }

    let reconciliation = reconcile(group);
    sink.write_reconciliation(&reconciliation)?;

    summary.pairs_emitted += reconciliation.pair_count();
    summary.records_emitted += reconciliation.accepted.len();
    for entry in &reconciliation.exceptions {
        match entry.kind {
            ExceptionKind::UnbalancedGroup => summary.group_exceptions += 1,
            ExceptionKind::UnbalancedReference => summary.record_exceptions += 1,
        }
    }
    Ok(())
}
