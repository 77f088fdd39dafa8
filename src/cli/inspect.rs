use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::cli::rearrange::print_summary;
use crate::cli::{OutputFormat, PairingArgs};
use crate::output::sink::Sink;
use crate::parsing::sam::open_input;
use crate::pipeline;

#[derive(Args)]
pub struct InspectArgs {
    /// Input SAM file grouped by read name (`.gz` allowed, '-' for stdin)
    #[arg(required = true)]
    pub input: PathBuf,

    #[command(flatten)]
    pub pairing: PairingArgs,
}

/// Execute inspect subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be opened, is malformed, or is not
/// grouped by read name.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: InspectArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let input = open_input(&args.input)
        .with_context(|| format!("Failed to open input {}", args.input.display()))?;

    if verbose {
        eprintln!("Inspecting {}", args.input.display());
    }

    let mut sink = Sink::new(io::sink(), io::sink());
    let summary = pipeline::run(input, &mut sink, &args.pairing.to_config())
        .with_context(|| format!("Failed to inspect {}", args.input.display()))?;

    print_summary(&mut io::stdout().lock(), &summary, format)
}
