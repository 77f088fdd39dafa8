use serde::{Deserialize, Serialize};

/// Which end of the template a record represents, inferred from its
/// position relative to its mate and the sign of the template length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MateOrder {
    /// Leftmost mate: positive template length, mate lies downstream
    First,
    /// Rightmost mate: negative template length, mate lies upstream
    Second,
}

impl std::fmt::Display for MateOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::First => write!(f, "R1"),
            Self::Second => write!(f, "R2"),
        }
    }
}

/// Value of an optional `TAG:TYPE:VALUE` field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagValue {
    Int(i64),
    Str(String),
}

impl TagValue {
    /// Interpret a raw tag value. Values made only of ASCII digits become
    /// integers; everything else (including signed numbers) stays textual.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = raw.parse::<i64>() {
                return Self::Int(n);
            }
        }
        Self::Str(raw.to_string())
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Str(_) => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Int(_) => None,
        }
    }
}

impl std::fmt::Display for TagValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_value_numeric() {
        assert_eq!(TagValue::parse("42"), TagValue::Int(42));
        assert_eq!(TagValue::parse("42").as_int(), Some(42));
    }

    #[test]
    fn test_tag_value_textual() {
        assert_eq!(TagValue::parse("-3"), TagValue::Str("-3".to_string()));
        assert_eq!(TagValue::parse("3.5"), TagValue::Str("3.5".to_string()));
        assert_eq!(TagValue::parse(""), TagValue::Str(String::new()));
        assert_eq!(TagValue::parse("ACGT").as_str(), Some("ACGT"));
    }

    #[test]
    fn test_tag_value_overflow_stays_textual() {
        let huge = "99999999999999999999999";
        assert_eq!(TagValue::parse(huge), TagValue::Str(huge.to_string()));
    }

    #[test]
    fn test_mate_order_display() {
        assert_eq!(MateOrder::First.to_string(), "R1");
        assert_eq!(MateOrder::Second.to_string(), "R2");
    }
}
