use crate::core::types::{MateOrder, TagValue};

/// SAM `RNAME`/`RNEXT` value meaning "unmapped"
pub const UNMAPPED: &str = "*";

/// SAM `RNEXT` value meaning "same reference as `RNAME`"
pub const SAME_REFERENCE: &str = "=";

/// One parsed alignment line.
///
/// Records are immutable once parsed. The original line is kept verbatim in
/// [`Record::raw_line`] and is the only thing ever written back out, so no
/// formatting is lost on output.
///
/// Equality and hashing cover every field including the raw line, which
/// makes duplicate input rows compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    pub(crate) identifier: String,
    pub(crate) flags: u16,
    pub(crate) reference_name: String,
    pub(crate) position: u32,
    pub(crate) mapping_quality: u8,
    pub(crate) cigar: String,
    pub(crate) mate_reference_name: String,
    pub(crate) mate_position: u32,
    pub(crate) template_length: i64,
    pub(crate) sequence: String,
    pub(crate) quality: String,
    pub(crate) optional_tags: Option<Vec<String>>,
    pub(crate) tags: Vec<(String, TagValue)>,
    pub(crate) raw_line: String,
}

impl Record {
    /// Read/template name (`QNAME`)
    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub fn flags(&self) -> u16 {
        self.flags
    }

    /// Reference sequence name (`RNAME`), `*` when unmapped
    #[must_use]
    pub fn reference_name(&self) -> &str {
        &self.reference_name
    }

    /// 1-based leftmost position (`POS`)
    #[must_use]
    pub fn position(&self) -> u32 {
        self.position
    }

    #[must_use]
    pub fn mapping_quality(&self) -> u8 {
        self.mapping_quality
    }

    #[must_use]
    pub fn cigar(&self) -> &str {
        &self.cigar
    }

    /// Mate reference name (`RNEXT`), `=` when identical to `RNAME`
    #[must_use]
    pub fn mate_reference_name(&self) -> &str {
        &self.mate_reference_name
    }

    #[must_use]
    pub fn mate_position(&self) -> u32 {
        self.mate_position
    }

    /// Signed observed template length (`TLEN`)
    #[must_use]
    pub fn template_length(&self) -> i64 {
        self.template_length
    }

    #[must_use]
    pub fn sequence(&self) -> &str {
        &self.sequence
    }

    #[must_use]
    pub fn quality(&self) -> &str {
        &self.quality
    }

    /// Raw optional fields in input order, `None` when the line had none
    #[must_use]
    pub fn optional_tags(&self) -> Option<&[String]> {
        self.optional_tags.as_deref()
    }

    /// The exact input line, without its line terminator
    #[must_use]
    pub fn raw_line(&self) -> &str {
        &self.raw_line
    }

    #[must_use]
    pub fn is_mapped(&self) -> bool {
        self.reference_name != UNMAPPED
    }

    #[must_use]
    pub fn mate_on_same_reference(&self) -> bool {
        self.mate_reference_name == SAME_REFERENCE
    }

    /// Look up an optional tag by its two-character name
    #[must_use]
    pub fn tag(&self, name: &str) -> Option<&TagValue> {
        self.tags
            .iter()
            .find(|(tag, _)| tag == name)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn has_tag(&self, name: &str) -> bool {
        self.tag(name).is_some()
    }

    /// Infer which end of the template this record is
    #[must_use]
    pub fn mate_order(&self) -> Option<MateOrder> {
        if self.template_length > 0 && self.position < self.mate_position {
            Some(MateOrder::First)
        } else if self.template_length < 0 && self.position > self.mate_position {
            Some(MateOrder::Second)
        } else {
            None
        }
    }

    /// Whether `self` points at `other` as its mate: its mate position is
    /// `other`'s position and the template lengths have opposite sign.
    #[must_use]
    pub fn is_mate_of(&self, other: &Record) -> bool {
        self.mate_position == other.position
            && self.template_length.checked_neg() == Some(other.template_length)
    }
}

/// Split optional `TAG:TYPE:VALUE` fields into a lookup list.
/// Fields without three `:`-separated parts are skipped.
pub(crate) fn index_tags(fields: &[String]) -> Vec<(String, TagValue)> {
    fields
        .iter()
        .filter_map(|field| {
            let mut parts = field.splitn(3, ':');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(tag), Some(_), Some(value)) => {
                    Some((tag.to_string(), TagValue::parse(value)))
                }
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::sam::parse_record;

    fn record(line: &str) -> Record {
        parse_record(line, 1).unwrap()
    }

    #[test]
    fn test_accessors() {
        let r = record("read1\t99\tchr1\t100\t60\t50M\t=\t200\t150\tACGT\tIIII\tNH:i:2");
        assert_eq!(r.identifier(), "read1");
        assert_eq!(r.flags(), 99);
        assert_eq!(r.reference_name(), "chr1");
        assert_eq!(r.position(), 100);
        assert_eq!(r.mapping_quality(), 60);
        assert_eq!(r.cigar(), "50M");
        assert_eq!(r.mate_reference_name(), "=");
        assert_eq!(r.mate_position(), 200);
        assert_eq!(r.template_length(), 150);
        assert_eq!(r.sequence(), "ACGT");
        assert_eq!(r.quality(), "IIII");
        assert_eq!(r.optional_tags(), Some(&["NH:i:2".to_string()][..]));
        assert!(r.is_mapped());
        assert!(r.mate_on_same_reference());
    }

    #[test]
    fn test_tag_lookup() {
        let r = record("read1\t99\tchr1\t100\t60\t50M\t=\t200\t150\tACGT\tIIII\tNH:i:2\tXS:A:+\tbroken");
        assert_eq!(r.tag("NH"), Some(&TagValue::Int(2)));
        assert_eq!(r.tag("XS"), Some(&TagValue::Str("+".to_string())));
        assert!(!r.has_tag("broken"));
        assert!(!r.has_tag("AS"));
        assert_eq!(r.optional_tags().map(<[String]>::len), Some(3));
    }

    #[test]
    fn test_no_optional_tags() {
        let r = record("read1\t99\tchr1\t100\t60\t50M\t=\t200\t150\tACGT\tIIII");
        assert!(r.optional_tags().is_none());
        assert!(r.tag("NH").is_none());
    }

    #[test]
    fn test_mate_order() {
        let first = record("r\t99\tchr1\t100\t60\t4M\t=\t200\t150\tACGT\tIIII");
        let second = record("r\t147\tchr1\t200\t60\t4M\t=\t100\t-150\tACGT\tIIII");
        let odd = record("r\t147\tchr1\t100\t60\t4M\t=\t200\t-150\tACGT\tIIII");
        assert_eq!(first.mate_order(), Some(MateOrder::First));
        assert_eq!(second.mate_order(), Some(MateOrder::Second));
        assert_eq!(odd.mate_order(), None);
    }

    #[test]
    fn test_is_mate_of() {
        let a = record("r\t99\tchr1\t100\t60\t4M\t=\t200\t150\tACGT\tIIII");
        let b = record("r\t147\tchr1\t200\t60\t4M\t=\t100\t-150\tACGT\tIIII");
        let c = record("r\t147\tchr1\t200\t60\t4M\t=\t100\t150\tACGT\tIIII");
        assert!(a.is_mate_of(&b));
        assert!(b.is_mate_of(&a));
        assert!(!a.is_mate_of(&c));
        assert!(!c.is_mate_of(&a));
    }

    #[test]
    fn test_duplicate_rows_are_equal() {
        let line = "r\t99\tchr1\t100\t60\t4M\t=\t200\t150\tACGT\tIIII";
        assert_eq!(record(line), record(line));
    }
}
