//! Core data types for paired alignment reconciliation.
//!
//! - [`Record`]: one parsed alignment line, immutable, carrying its raw text
//! - [`MateOrder`], [`TagValue`]: small value types derived from a record
//!
//! ## Mate linkage
//!
//! Two records on the same reference are treated as mates when
//!
//! | Field of A | Field of B |
//! |------------|------------|
//! | `PNEXT`    | `POS`      |
//! | `TLEN`     | `-TLEN`    |
//!
//! [`Record`]: record::Record
//! [`MateOrder`]: types::MateOrder
//! [`TagValue`]: types::TagValue

pub mod record;
pub mod types;
