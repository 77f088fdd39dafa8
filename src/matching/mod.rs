//! Mate-pair reconciliation over name-grouped alignments.
//!
//! - [`FilterConfig`]: decides which records may take part in pairing
//! - [`GroupAccumulator`]: collects consecutive records sharing a read name
//! - [`reconcile`]: pairs mates within a group and checks the result
//! - [`ExceptionEntry`]: what gets written to the exceptions channel
//!
//! ## Algorithm
//!
//! 1. **Filter**: mapped, mate on the same reference, non-zero template
//!    length, CIGAR free of clipping, indels and skips
//! 2. **Group**: buffer one read name at a time, close on name change or end of input
//! 3. **Pair**: within each reference name, link records whose mate position
//!    and negated template length point at each other
//! 4. **Deduplicate**: a pair and its reverse are the same pair
//! 5. **Validate**: odd candidate counts divert the group or the record
//!
//! ## Example
//!
//! ```rust
//! use mate_rearrange::matching::{reconcile, Group};
//! use mate_rearrange::parsing::sam::parse_record;
//!
//! let a = parse_record("r\t99\tchr1\t100\t60\t4M\t=\t200\t150\tACGT\tIIII", 1).unwrap();
//! let b = parse_record("r\t147\tchr1\t200\t60\t4M\t=\t100\t-150\tACGT\tIIII", 2).unwrap();
//!
//! let result = reconcile(Group::new(vec![a, b]).unwrap());
//! assert_eq!(result.accepted.len(), 2);
//! assert!(result.exceptions.is_empty());
//! ```

pub mod diagnosis;
pub mod engine;
pub mod filter;
pub mod grouping;

pub use diagnosis::{ExceptionEntry, ExceptionKind};
pub use engine::{reconcile, Reconciliation};
pub use filter::FilterConfig;
pub use grouping::{Group, GroupAccumulator};
