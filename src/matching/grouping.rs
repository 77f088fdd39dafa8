//! Streaming grouping of name-grouped records.
//!
//! The accumulator holds at most one open group. A group is handed out
//! exactly once, when the identifier changes or the input ends, so memory
//! is bounded by the largest multi-mapping cluster of a single read.

use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

use crate::core::record::Record;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GroupingError {
    #[error("Cannot build a group from zero records")]
    EmptyGroup,

    #[error("Input is not grouped by read name: group '{expected}' also holds '{found}'")]
    SortViolation { expected: String, found: String },

    #[error("Input is not grouped by read name: '{0}' reappears after its group was closed")]
    ReappearingIdentifier(String),
}

/// All records sharing one identifier, from one contiguous run of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    identifier: String,
    records: Vec<Record>,
}

impl Group {
    /// Build a group, checking that every record carries the same identifier.
    ///
    /// # Errors
    ///
    /// Returns `GroupingError::EmptyGroup` for no records, or
    /// `GroupingError::SortViolation` if a second identifier is present.
    pub fn new(records: Vec<Record>) -> Result<Self, GroupingError> {
        let identifier = records
            .first()
            .ok_or(GroupingError::EmptyGroup)?
            .identifier()
            .to_string();

        if let Some(stray) = records.iter().find(|r| r.identifier() != identifier) {
            return Err(GroupingError::SortViolation {
                expected: identifier,
                found: stray.identifier().to_string(),
            });
        }

        Ok(Self {
            identifier,
            records,
        })
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

#[derive(Debug, Default)]
enum AccumulatorState {
    #[default]
    Empty,
    Open {
        identifier: String,
        records: Vec<Record>,
    },
}

/// Buffers consecutive records with the same identifier
#[derive(Debug, Default)]
pub struct GroupAccumulator {
    state: AccumulatorState,
    /// Identifiers of already-closed groups, only kept when regrouping is checked
    closed: Option<HashSet<String>>,
}

impl GroupAccumulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Also fail when an identifier shows up again after its group closed.
    /// Memory then grows with the number of distinct identifiers.
    #[must_use]
    pub fn with_regrouping_check(mut self) -> Self {
        self.closed = Some(HashSet::new());
        self
    }

    /// Whether a group is currently open
    #[must_use]
    pub fn has_pending(&self) -> bool {
        matches!(self.state, AccumulatorState::Open { .. })
    }

    /// Identifier of the open group, if any
    #[must_use]
    pub fn current_identifier(&self) -> Option<&str> {
        match &self.state {
            AccumulatorState::Empty => None,
            AccumulatorState::Open { identifier, .. } => Some(identifier),
        }
    }

    /// Add a record. Returns the previous group when `record` starts a new one.
    ///
    /// # Errors
    ///
    /// Returns a `GroupingError` if the input is detected not to be grouped
    /// by identifier.
    pub fn push(&mut self, record: Record) -> Result<Option<Group>, GroupingError> {
        match std::mem::take(&mut self.state) {
            AccumulatorState::Empty => {
                self.open(record)?;
                Ok(None)
            }
            AccumulatorState::Open {
                identifier,
                mut records,
            } if identifier == record.identifier() => {
                records.push(record);
                self.state = AccumulatorState::Open {
                    identifier,
                    records,
                };
                Ok(None)
            }
            AccumulatorState::Open { records, .. } => {
                let group = self.close(records)?;
                self.open(record)?;
                Ok(Some(group))
            }
        }
    }

    /// Close the open group at end of input, leaving the accumulator empty.
    ///
    /// # Errors
    ///
    /// Returns a `GroupingError` if the buffered records are inconsistent.
    pub fn finish(&mut self) -> Result<Option<Group>, GroupingError> {
        match std::mem::take(&mut self.state) {
            AccumulatorState::Empty => Ok(None),
            AccumulatorState::Open { records, .. } => self.close(records).map(Some),
        }
    }

    fn open(&mut self, record: Record) -> Result<(), GroupingError> {
        if let Some(closed) = &self.closed {
            if closed.contains(record.identifier()) {
                return Err(GroupingError::ReappearingIdentifier(
                    record.identifier().to_string(),
                ));
            }
        }
        self.state = AccumulatorState::Open {
            identifier: record.identifier().to_string(),
            records: vec![record],
        };
        Ok(())
    }

    fn close(&mut self, records: Vec<Record>) -> Result<Group, GroupingError> {
        let group = Group::new(records)?;
        debug!(identifier = group.identifier(), records = group.len(), "Closing group");
        if let Some(closed) = &mut self.closed {
            closed.insert(group.identifier().to_string());
        }
        Ok(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::sam::parse_record;

    fn record(name: &str, pos: u32) -> Record {
        let line = format!("{name}\t99\tchr1\t{pos}\t60\t4M\t=\t200\t150\tACGT\tIIII");
        parse_record(&line, 1).unwrap()
    }

    #[test]
    fn test_group_new_rejects_mixed_identifiers() {
        let err = Group::new(vec![record("a", 1), record("b", 2)]).unwrap_err();
        assert_eq!(
            err,
            GroupingError::SortViolation {
                expected: "a".to_string(),
                found: "b".to_string()
            }
        );
    }

    #[test]
    fn test_group_new_rejects_empty() {
        assert_eq!(Group::new(vec![]).unwrap_err(), GroupingError::EmptyGroup);
    }

    #[test]
    fn test_accumulator_flushes_on_boundary() {
        let mut acc = GroupAccumulator::new();
        assert!(!acc.has_pending());
        assert!(acc.push(record("a", 1)).unwrap().is_none());
        assert!(acc.push(record("a", 2)).unwrap().is_none());
        assert_eq!(acc.current_identifier(), Some("a"));

        let group = acc.push(record("b", 3)).unwrap().unwrap();
        assert_eq!(group.identifier(), "a");
        assert_eq!(group.len(), 2);
        assert_eq!(group.records()[1].position(), 2);
        assert_eq!(acc.current_identifier(), Some("b"));

        let last = acc.finish().unwrap().unwrap();
        assert_eq!(last.identifier(), "b");
        assert_eq!(last.len(), 1);
        assert!(!acc.has_pending());
        assert!(acc.finish().unwrap().is_none());
    }

    #[test]
    fn test_finish_on_empty() {
        let mut acc = GroupAccumulator::new();
        assert!(acc.finish().unwrap().is_none());
    }

    #[test]
    fn test_reappearing_identifier_allowed_by_default() {
        let mut acc = GroupAccumulator::new();
        acc.push(record("a", 1)).unwrap();
        acc.push(record("b", 1)).unwrap();
        let group = acc.push(record("a", 2)).unwrap().unwrap();
        assert_eq!(group.identifier(), "b");
    }

    #[test]
    fn test_reappearing_identifier_detected() {
        let mut acc = GroupAccumulator::new().with_regrouping_check();
        acc.push(record("a", 1)).unwrap();
        acc.push(record("b", 1)).unwrap();
        let err = acc.push(record("a", 2)).unwrap_err();
        assert_eq!(err, GroupingError::ReappearingIdentifier("a".to_string()));
    }
}
