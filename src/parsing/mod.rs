//! Parsers for line-oriented SAM text.
//!
//! - **Data lines**: split into the 11 mandatory fields plus optional tags
//! - **Header lines**: passed through verbatim, summarized for diagnostics
//! - **Terminator**: the first blank line (or EOF) ends the input
//!
//! ## Example
//!
//! ```rust
//! use mate_rearrange::parsing::sam::{EventReader, InputEvent};
//! use std::io::Cursor;
//!
//! let text = "@HD\tVN:1.6\tSO:queryname\nr1\t99\tchr1\t100\t60\t4M\t=\t200\t104\tACGT\tIIII\n\n";
//! let events: Vec<InputEvent> = EventReader::new(Cursor::new(text))
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//! assert_eq!(events.len(), 3);
//! assert_eq!(events[2], InputEvent::End);
//! ```
//!
//! ## Mandatory fields
//!
//! | # | Field | Type |
//! |---|-------|------|
//! | 1 | QNAME | string |
//! | 2 | FLAG  | u16 |
//! | 3 | RNAME | string |
//! | 4 | POS   | u32 |
//! | 5 | MAPQ  | u8 |
//! | 6 | CIGAR | string |
//! | 7 | RNEXT | string |
//! | 8 | PNEXT | u32 |
//! | 9 | TLEN  | i64 |
//! | 10 | SEQ  | string |
//! | 11 | QUAL | string |

pub mod header;
pub mod sam;
