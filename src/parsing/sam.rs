use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::core::record::{index_tags, Record};

/// Number of mandatory tab-delimited fields on a SAM data line
pub const MANDATORY_FIELDS: usize = 11;

const FIELD_NAMES: [&str; MANDATORY_FIELDS] = [
    "QNAME", "FLAG", "RNAME", "POS", "MAPQ", "CIGAR", "RNEXT", "PNEXT", "TLEN", "SEQ", "QUAL",
];

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line {line}: missing mandatory field {field}")]
    MissingField { line: usize, field: &'static str },

    #[error("Line {line}: invalid {field} value '{value}'")]
    InvalidField {
        line: usize,
        field: &'static str,
        value: String,
    },
}

/// One unit of input, in stream order.
///
/// The stream always finishes with exactly one [`InputEvent::End`], either
/// because a blank terminator line was read or because the reader hit EOF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// An `@`-prefixed header line, without its line terminator
    Header(String),
    Record(Record),
    End,
}

/// Parse one SAM data line into a [`Record`].
///
/// `line` must not include the trailing newline. `line_number` is 1-based
/// and only used in error messages.
///
/// # Errors
///
/// Returns `ParseError::MissingField` if fewer than 11 fields are present,
/// or `ParseError::InvalidField` if a numeric field does not parse.
pub fn parse_record(line: &str, line_number: usize) -> Result<Record, ParseError> {
    let mut fields = line.trim_end().split('\t');

    let mut mandatory: [&str; MANDATORY_FIELDS] = [""; MANDATORY_FIELDS];
    for (slot, name) in mandatory.iter_mut().zip(FIELD_NAMES) {
        *slot = fields.next().ok_or(ParseError::MissingField {
            line: line_number,
            field: name,
        })?;
    }

    let optional: Vec<String> = fields.map(str::to_string).collect();
    let (optional_tags, tags) = if optional.is_empty() {
        (None, Vec::new())
    } else {
        let tags = index_tags(&optional);
        (Some(optional), tags)
    };

    Ok(Record {
        identifier: mandatory[0].to_string(),
        flags: parse_number(mandatory[1], "FLAG", line_number)?,
        reference_name: mandatory[2].to_string(),
        position: parse_number(mandatory[3], "POS", line_number)?,
        mapping_quality: parse_number(mandatory[4], "MAPQ", line_number)?,
        cigar: mandatory[5].to_string(),
        mate_reference_name: mandatory[6].to_string(),
        mate_position: parse_number(mandatory[7], "PNEXT", line_number)?,
        template_length: parse_number(mandatory[8], "TLEN", line_number)?,
        sequence: mandatory[9].to_string(),
        quality: mandatory[10].to_string(),
        optional_tags,
        tags,
        raw_line: line.to_string(),
    })
}

fn parse_number<T: std::str::FromStr>(
    value: &str,
    field: &'static str,
    line: usize,
) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidField {
        line,
        field,
        value: value.to_string(),
    })
}

/// Input of `-` means standard input
pub const STDIN_PATH: &str = "-";

/// Open SAM text for reading. `-` reads standard input and a `.gz`
/// extension is decompressed (multi-member gzip and BGZF both work).
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be opened.
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead>, ParseError> {
    if path.as_os_str() == STDIN_PATH {
        return Ok(Box::new(BufReader::new(io::stdin().lock())));
    }

    let file = File::open(path)?;
    let gzipped = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"));

    if gzipped {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReaderState {
    Streaming,
    Ended,
}

/// Turns a line-oriented SAM text stream into [`InputEvent`]s.
pub struct EventReader<R> {
    reader: R,
    buf: String,
    line_number: usize,
    state: ReaderState,
}

impl<R: BufRead> EventReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            line_number: 0,
            state: ReaderState::Streaming,
        }
    }

    /// Number of lines consumed so far
    #[must_use]
    pub fn lines_read(&self) -> usize {
        self.line_number
    }

    /// Consume whatever follows the end marker and return how many non-blank
    /// lines were found there. Those lines are never processed.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Io` if the underlying reader fails.
    pub fn drain_trailing(&mut self) -> Result<usize, ParseError> {
        let mut ignored = 0;
        while self.read_line()? {
            if !self.current_line().trim().is_empty() {
                ignored += 1;
            }
        }
        Ok(ignored)
    }

    /// Read the next line into `buf`. Returns `false` at EOF.
    fn read_line(&mut self) -> Result<bool, ParseError> {
        self.buf.clear();
        if self.reader.read_line(&mut self.buf)? == 0 {
            return Ok(false);
        }
        self.line_number += 1;
        Ok(true)
    }

    fn current_line(&self) -> &str {
        self.buf.trim_end_matches(['\n', '\r'])
    }

    fn next_event(&mut self) -> Result<Option<InputEvent>, ParseError> {
        if self.state == ReaderState::Ended {
            return Ok(None);
        }

        if !self.read_line()? {
            debug!(lines = self.line_number, "EOF without terminator line");
            self.state = ReaderState::Ended;
            return Ok(Some(InputEvent::End));
        }

        let line = self.current_line();
        if line.starts_with('@') {
            return Ok(Some(InputEvent::Header(line.to_string())));
        }
        if line.trim().is_empty() {
            self.state = ReaderState::Ended;
            return Ok(Some(InputEvent::End));
        }
        parse_record(line, self.line_number)
            .map(InputEvent::Record)
            .map(Some)
    }
}

impl<R: BufRead> Iterator for EventReader<R> {
    type Item = Result<InputEvent, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_event() {
            Ok(Some(event)) => Some(Ok(event)),
            Ok(None) => None,
            Err(e) => {
                // Fatal: nothing after a malformed line is trusted
                self.state = ReaderState::Ended;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const LINE: &str = "read1\t99\tchr1\t100\t60\t50M\t=\t200\t150\tACGT\tIIII";

    fn events(text: &str) -> Vec<InputEvent> {
        EventReader::new(Cursor::new(text.to_string()))
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_parse_record_keeps_raw_line() {
        let line = format!("{LINE}\tNH:i:1\tXX:Z:a b");
        let record = parse_record(&line, 1).unwrap();
        assert_eq!(record.raw_line(), line);
        assert_eq!(record.template_length(), 150);
    }

    #[test]
    fn test_parse_record_negative_tlen() {
        let record =
            parse_record("r\t147\tchr1\t200\t60\t4M\t=\t100\t-150\tACGT\tIIII", 1).unwrap();
        assert_eq!(record.template_length(), -150);
    }

    #[test]
    fn test_parse_record_missing_field() {
        let err = parse_record("read1\t99\tchr1\t100\t60\t50M\t=\t200\t150\tACGT", 7).unwrap_err();
        match err {
            ParseError::MissingField { line, field } => {
                assert_eq!(line, 7);
                assert_eq!(field, "QUAL");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_record_invalid_number() {
        let err = parse_record("read1\t99\tchr1\tabc\t60\t50M\t=\t200\t150\tACGT\tIIII", 3)
            .unwrap_err();
        assert!(err.to_string().contains("POS"));
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_events_with_terminator() {
        let text = format!("@HD\tVN:1.6\n{LINE}\n\n");
        let events = events(&text);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0], InputEvent::Header("@HD\tVN:1.6".to_string()));
        assert!(matches!(events[1], InputEvent::Record(_)));
        assert_eq!(events[2], InputEvent::End);
    }

    #[test]
    fn test_events_synthetic_end_at_eof() {
        let events = events(&format!("{LINE}\n"));
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], InputEvent::End);
    }

    #[test]
    fn test_events_empty_input() {
        assert_eq!(events(""), vec![InputEvent::End]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let events = events(&format!("{LINE}\r\n\r\n"));
        match &events[0] {
            InputEvent::Record(r) => assert_eq!(r.raw_line(), LINE),
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(events[1], InputEvent::End);
    }

    #[test]
    fn test_drain_trailing() {
        let text = format!("{LINE}\n\n{LINE}\n\n{LINE}\n");
        let mut reader = EventReader::new(Cursor::new(text));
        assert!(matches!(reader.next(), Some(Ok(InputEvent::Record(_)))));
        assert!(matches!(reader.next(), Some(Ok(InputEvent::End))));
        assert!(reader.next().is_none());
        assert_eq!(reader.drain_trailing().unwrap(), 2);
        assert_eq!(reader.lines_read(), 5);
    }

    #[test]
    fn test_open_input_gzip() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.sam.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        write!(encoder, "{LINE}\n\n").unwrap();
        encoder.finish().unwrap();

        let events: Vec<InputEvent> = EventReader::new(open_input(&path).unwrap())
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], InputEvent::Record(r) if r.raw_line() == LINE));
    }

    #[test]
    fn test_open_input_missing_file() {
        let err = open_input(Path::new("/nonexistent/input.sam")).err().unwrap();
        assert!(matches!(err, ParseError::Io(_)));
    }

    #[test]
    fn test_error_stops_stream() {
        let text = format!("bad line\n{LINE}\n");
        let mut reader = EventReader::new(Cursor::new(text));
        assert!(matches!(reader.next(), Some(Err(_))));
        assert!(reader.next().is_none());
    }
}
