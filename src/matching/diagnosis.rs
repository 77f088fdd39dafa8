use crate::core::record::Record;

/// Structural problems that keep records out of the main output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExceptionKind {
    /// The group's paired candidates did not come out even; the whole group is dropped
    UnbalancedGroup,
    /// A record's reference name cannot be resolved into complete pairs
    UnbalancedReference,
}

impl ExceptionKind {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::UnbalancedGroup => "Odd number of paired alignments for read",
            Self::UnbalancedReference => "Reference name occurs an odd number of times",
        }
    }
}

/// One line of the exceptions channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionEntry {
    pub kind: ExceptionKind,
    pub identifier: String,
    pub reference_name: Option<String>,
    pub cigar: Option<String>,
}

impl ExceptionEntry {
    /// Group-level entry, naming only the read
    #[must_use]
    pub fn for_group(kind: ExceptionKind, identifier: impl Into<String>) -> Self {
        Self {
            kind,
            identifier: identifier.into(),
            reference_name: None,
            cigar: None,
        }
    }

    /// Record-level entry, naming the read, reference and CIGAR
    #[must_use]
    pub fn for_record(kind: ExceptionKind, record: &Record) -> Self {
        Self {
            kind,
            identifier: record.identifier().to_string(),
            reference_name: Some(record.reference_name().to_string()),
            cigar: Some(record.cigar().to_string()),
        }
    }
}

impl std::fmt::Display for ExceptionEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind.message(), self.identifier)?;
        if let (Some(reference), Some(cigar)) = (&self.reference_name, &self.cigar) {
            write!(f, "\t{reference}\t{cigar}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::sam::parse_record;

    #[test]
    fn test_group_entry_format() {
        let entry = ExceptionEntry::for_group(ExceptionKind::UnbalancedGroup, "read7");
        assert_eq!(entry.to_string(), "Odd number of paired alignments for read: read7");
    }

    #[test]
    fn test_record_entry_format() {
        let record =
            parse_record("read7\t99\tchrX\t10\t60\t8M\t=\t30\t28\tACGTACGT\tIIIIIIII", 1).unwrap();
        let entry = ExceptionEntry::for_record(ExceptionKind::UnbalancedReference, &record);
        assert_eq!(
            entry.to_string(),
            "Reference name occurs an odd number of times: read7\tchrX\t8M"
        );
    }
}
