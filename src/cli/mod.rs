//! Command-line interface for mate-rearrange.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **rearrange**: Write mate pairs adjacently, diverting unresolved records
//! - **inspect**: Run the same reconciliation but only report counts
//!
//! ## Usage
//!
//! ```text
//! # Group by name and keep paired reads first
//! samtools sort -n sample.bam | samtools view -h -f 3 - > grouped.sam
//!
//! # Rearrange for RSEM
//! mate-rearrange rearrange grouped.sam -o paired.sam -e exceptions.txt
//!
//! # Stream from stdin to stdout
//! samtools view -h -f 3 grouped.bam | mate-rearrange rearrange - -o - -e exceptions.txt
//!
//! # JSON summary for scripting
//! mate-rearrange inspect grouped.sam --format json
//! ```

use clap::{Args, Parser, Subcommand};

use crate::matching::filter::{FilterConfig, DEFAULT_EXCLUDED_CIGAR_OPS};
use crate::pipeline::RearrangeConfig;

pub mod inspect;
pub mod rearrange;

#[derive(Parser)]
#[command(name = "mate-rearrange")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Place paired alignments next to their mates in name-grouped SAM")]
#[command(
    long_about = "mate-rearrange reads SAM text grouped by read name and writes each resolved mate pair on adjacent lines, as required by expression quantifiers such as RSEM.\n\nMulti-mapped reads are paired per reference, duplicate pairs are collapsed, and records that cannot be resolved into complete pairs are reported in a separate exceptions file."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Run summary format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rearrange alignments so that mates are adjacent
    Rearrange(rearrange::RearrangeArgs),

    /// Report what rearrange would do without writing output
    Inspect(inspect::InspectArgs),
}

/// Options shared by every command that reconciles records
#[derive(Args, Debug, Clone)]
pub struct PairingArgs {
    /// CIGAR operations that exclude a record from pairing
    #[arg(long, default_value = DEFAULT_EXCLUDED_CIGAR_OPS)]
    pub exclude_cigar_ops: String,

    /// FLAG bits every record must carry (e.g. 3 for paired and properly paired)
    #[arg(long, default_value_t = 0)]
    pub require_flags: u16,

    /// Fail if a read name reappears after its group was closed
    /// (memory grows with the number of read names)
    #[arg(long)]
    pub check_grouping: bool,
}

impl PairingArgs {
    #[must_use]
    pub fn to_config(&self) -> RearrangeConfig {
        RearrangeConfig {
            filter: FilterConfig {
                excluded_cigar_ops: self.exclude_cigar_ops.clone(),
                required_flags: self.require_flags,
            },
            check_regrouping: self.check_grouping,
        }
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
