//! Summary of the passed-through SAM header.
//!
//! Header lines are never altered; this only inspects them to warn about
//! inputs that are unlikely to be grouped by read name.

use serde::Serialize;
use tracing::warn;

/// What the header says about the input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HeaderSummary {
    /// Number of `@SQ` reference sequences, `None` if the header did not parse
    pub reference_count: Option<usize>,

    /// `SO` value of the `@HD` line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,

    /// `GO` value of the `@HD` line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_order: Option<String>,
}

impl HeaderSummary {
    /// Whether the header declares read-name sorting or grouping
    #[must_use]
    pub fn declares_name_grouping(&self) -> bool {
        self.sort_order.as_deref() == Some("queryname")
            || self.group_order.as_deref() == Some("query")
    }
}

/// Summarize buffered header text (newline-joined `@` lines).
///
/// Parse failures are logged and reported as an unknown reference count;
/// they never abort a run.
#[must_use]
pub fn summarize_header(text: &str) -> HeaderSummary {
    let reference_count = match text.parse::<noodles::sam::Header>() {
        Ok(header) => Some(header.reference_sequences().len()),
        Err(e) => {
            warn!(error = %e, "Could not parse SAM header, passing it through unchecked");
            None
        }
    };

    let mut summary = HeaderSummary {
        reference_count,
        ..HeaderSummary::default()
    };

    if let Some(hd) = text.lines().find(|line| line.starts_with("@HD")) {
        for field in hd.split('\t').skip(1) {
            if let Some((tag, value)) = field.split_once(':') {
                match tag {
                    "SO" => summary.sort_order = Some(value.to_string()),
                    "GO" => summary.group_order = Some(value.to_string()),
                    _ => {}
                }
            }
        }
    }

    summary
}

/// Log a warning when the header contradicts the grouped-by-name precondition
pub fn warn_on_sort_order(summary: &HeaderSummary) {
    if summary.sort_order.as_deref() == Some("coordinate") {
        warn!("Header declares SO:coordinate; input must be grouped by read name");
    } else if !summary.declares_name_grouping() {
        warn!(
            sort_order = summary.sort_order.as_deref().unwrap_or("none"),
            "Header does not declare SO:queryname or GO:query; assuming input is grouped by read name"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_header() {
        let header = "@HD\tVN:1.6\tSO:queryname\n@SQ\tSN:chr1\tLN:1000\n@SQ\tSN:chr2\tLN:2000\n";
        let summary = summarize_header(header);
        assert_eq!(summary.reference_count, Some(2));
        assert_eq!(summary.sort_order.as_deref(), Some("queryname"));
        assert!(summary.group_order.is_none());
        assert!(summary.declares_name_grouping());
    }

    #[test]
    fn test_group_order_query() {
        let summary = summarize_header("@HD\tVN:1.6\tGO:query\n");
        assert!(summary.declares_name_grouping());
    }

    #[test]
    fn test_coordinate_sorted() {
        let summary = summarize_header("@HD\tVN:1.6\tSO:coordinate\n@SQ\tSN:chr1\tLN:10\n");
        assert!(!summary.declares_name_grouping());
    }

    #[test]
    fn test_no_hd_line() {
        let summary = summarize_header("@SQ\tSN:chr1\tLN:10\n");
        assert_eq!(summary.reference_count, Some(1));
        assert!(summary.sort_order.is_none());
        assert!(!summary.declares_name_grouping());
    }

    #[test]
    fn test_unparseable_header_is_not_fatal() {
        let summary = summarize_header("@SQ\tSN:chr1\tLN:notanumber\n@HD\tVN:1.6\tSO:queryname\n");
        assert!(summary.reference_count.is_none());
        assert_eq!(summary.sort_order.as_deref(), Some("queryname"));
    }
}
