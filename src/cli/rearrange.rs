use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::{OutputFormat, PairingArgs};
use crate::output::sink::{open_append, Sink, STDOUT_PATH};
use crate::parsing::sam::open_input;
use crate::pipeline::{self, RunSummary};

#[derive(Args)]
pub struct RearrangeArgs {
    /// Input SAM file grouped by read name (`.gz` allowed, '-' for stdin)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output SAM file, appended to if it exists ('-' for stdout)
    #[arg(short, long, required = true)]
    pub output: PathBuf,

    /// Exceptions file, appended to if it exists
    #[arg(short, long, required = true)]
    pub exceptions: PathBuf,

    #[command(flatten)]
    pub pairing: PairingArgs,
}

/// Execute rearrange subcommand
///
/// # Errors
///
/// Returns an error if an input or output cannot be opened, the input is
/// malformed or not grouped by read name, or writing fails.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: RearrangeArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let input = open_input(&args.input)
        .with_context(|| format!("Failed to open input {}", args.input.display()))?;
    let accepted = open_append(&args.output)
        .with_context(|| format!("Failed to open output {}", args.output.display()))?;
    let diverted = open_append(&args.exceptions).with_context(|| {
        format!("Failed to open exceptions file {}", args.exceptions.display())
    })?;

    if verbose {
        eprintln!(
            "Rearranging {} -> {} (exceptions: {})",
            args.input.display(),
            args.output.display(),
            args.exceptions.display()
        );
    }

    let mut sink = Sink::new(accepted, diverted);
    let summary = pipeline::run(input, &mut sink, &args.pairing.to_config())
        .with_context(|| format!("Failed to rearrange {}", args.input.display()))?;
    drop(sink);

    // Keep stdout clean when it carries the SAM output
    if args.output.as_os_str() == STDOUT_PATH {
        print_summary(&mut io::stderr().lock(), &summary, format)
    } else {
        print_summary(&mut io::stdout().lock(), &summary, format)
    }
}

/// Write a run summary in the requested format
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn print_summary(
    out: &mut dyn Write,
    summary: &RunSummary,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => print_text_summary(out, summary)?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(summary)?)?,
        OutputFormat::Tsv => print_tsv_summary(out, summary)?,
    }
    Ok(())
}

fn print_text_summary(out: &mut dyn Write, summary: &RunSummary) -> io::Result<()> {
    writeln!(out, "Rearrangement Summary")?;
    writeln!(out, "{}", "=".repeat(60))?;

    writeln!(out, "\nInput:")?;
    writeln!(out, "  Header lines: {}", summary.header_lines)?;
    writeln!(out, "  Data lines: {}", summary.data_lines)?;
    writeln!(out, "  Eligible records: {}", summary.eligible_records)?;
    writeln!(out, "  Filtered records: {}", summary.filtered_records)?;
    if summary.trailing_lines_ignored > 0 {
        writeln!(
            out,
            "  Lines ignored after end marker: {}",
            summary.trailing_lines_ignored
        )?;
    }

    if let Some(header) = &summary.header {
        writeln!(out, "\nHeader:")?;
        match header.reference_count {
            Some(n) => writeln!(out, "  Reference sequences: {n}")?,
            None => writeln!(out, "  Reference sequences: unparseable header")?,
        }
        writeln!(
            out,
            "  Sort order: {}",
            header.sort_order.as_deref().unwrap_or("unspecified")
        )?;
        if let Some(group_order) = &header.group_order {
            writeln!(out, "  Group order: {group_order}")?;
        }
    }

    writeln!(out, "\nGroups:")?;
    writeln!(out, "  Read names: {}", summary.groups)?;
    writeln!(out, "  Single-record: {}", summary.singleton_groups)?;

    writeln!(out, "\nOutput:")?;
    writeln!(out, "  Pairs: {}", summary.pairs_emitted)?;
    writeln!(
        out,
        "  Records: {} ({:.2}% of eligible)",
        summary.records_emitted,
        summary.emitted_fraction() * 100.0
    )?;
    writeln!(out, "  Group exceptions: {}", summary.group_exceptions)?;
    writeln!(out, "  Record exceptions: {}", summary.record_exceptions)?;
    Ok(())
}

fn print_tsv_summary(out: &mut dyn Write, summary: &RunSummary) -> io::Result<()> {
    writeln!(
        out,
        "data_lines\teligible_records\tfiltered_records\tgroups\tpairs_emitted\trecords_emitted\tgroup_exceptions\trecord_exceptions"
    )?;
    writeln!(
        out,
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        summary.data_lines,
        summary.eligible_records,
        summary.filtered_records,
        summary.groups,
        summary.pairs_emitted,
        summary.records_emitted,
        summary.group_exceptions,
        summary.record_exceptions,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> RunSummary {
        RunSummary {
            data_lines: 10,
            eligible_records: 8,
            filtered_records: 2,
            groups: 3,
            pairs_emitted: 3,
            records_emitted: 6,
            record_exceptions: 1,
            ..RunSummary::default()
        }
    }

    #[test]
    fn test_tsv_summary() {
        let mut out = Vec::new();
        print_summary(&mut out, &summary(), OutputFormat::Tsv).unwrap();
        let text = String::from_utf8(out).unwrap();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], "10\t8\t2\t3\t3\t6\t0\t1");
    }

    #[test]
    fn test_json_summary() {
        let mut out = Vec::new();
        print_summary(&mut out, &summary(), OutputFormat::Json).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["pairs_emitted"], 3);
        assert!(json.get("header").is_none());
    }

    #[test]
    fn test_text_summary() {
        let mut out = Vec::new();
        print_summary(&mut out, &summary(), OutputFormat::Text).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Pairs: 3"));
        assert!(text.contains("75.00% of eligible"));
        assert!(!text.contains("Header:"));
    }
}
