//! Output channels.
//!
//! The main output receives header lines and accepted records, byte for
//! byte as they were read. The exceptions output receives one diagnostic line
//! per group or record that was kept out of the main output. Both are opened
//! in append mode.

pub mod sink;
