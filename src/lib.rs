//! # mate-rearrange
//!
//! A library for placing paired-end alignments next to their mates.
//!
//! Expression quantifiers such as RSEM expect every paired alignment to be
//! immediately followed by its mate. Aligners that report multi-mapped
//! reads, once sorted by read name, interleave the alignments of a read in
//! arbitrary order and may leave orphans whose mate was filtered out.
//!
//! `mate-rearrange` streams SAM text grouped by read name, resolves the mate
//! of every alignment within its group, and writes each resolved pair on
//! adjacent lines, unchanged. Anything that cannot be resolved into complete
//! pairs is reported on a separate exceptions channel.
//!
//! ## Features
//!
//! - **Streaming**: only one read name's alignments are held in memory
//! - **Multi-mapping aware**: pairs are resolved per reference sequence
//! - **Deduplication**: a pair found in both orientations, or duplicated rows, is emitted once
//! - **Verbatim output**: accepted lines are written byte for byte as read
//! - **Audit trail**: unbalanced groups and records are listed with a reason
//!
//! ## Example
//!
//! ```rust
//! use mate_rearrange::output::sink::Sink;
//! use mate_rearrange::pipeline::{run, RearrangeConfig};
//! use std::io::Cursor;
//!
//! let sam = "@HD\tVN:1.6\tSO:queryname\n\
//!            r1\t99\tchr1\t100\t60\t4M\t=\t200\t104\tACGT\tIIII\n\
//!            r1\t147\tchr1\t200\t60\t4M\t=\t100\t-104\tACGT\tIIII\n\n";
//!
//! let mut sink = Sink::new(Vec::new(), Vec::new());
//! let summary = run(Cursor::new(sam), &mut sink, &RearrangeConfig::default()).unwrap();
//! assert_eq!(summary.pairs_emitted, 1);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Alignment record model
//! - [`parsing`]: SAM line parsing and input events
//! - [`matching`]: Filtering, grouping and mate-pair reconciliation
//! - [`output`]: Main and exceptions output channels
//! - [`pipeline`]: Single-pass driver
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod matching;
pub mod output;
pub mod parsing;
pub mod pipeline;

// Re-export commonly used types for convenience
pub use core::record::Record;
pub use core::types::*;
pub use matching::engine::{reconcile, Reconciliation};
pub use pipeline::{RearrangeConfig, RearrangeError, RunSummary};
