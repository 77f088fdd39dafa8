use serde::Serialize;

use crate::core::record::Record;

/// CIGAR operations that exclude a record: soft clip, deletion, insertion,
/// hard clip, and skipped region
pub const DEFAULT_EXCLUDED_CIGAR_OPS: &str = "SDIHN";

/// Settings for the pairing eligibility predicate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterConfig {
    /// Any of these characters in the CIGAR makes a record ineligible
    pub excluded_cigar_ops: String,

    /// FLAG bits that must all be set; 0 disables the check
    pub required_flags: u16,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            excluded_cigar_ops: DEFAULT_EXCLUDED_CIGAR_OPS.to_string(),
            required_flags: 0,
        }
    }
}

/// Why a record was left out of pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ineligibility {
    Unmapped,
    MateOnOtherReference,
    ZeroTemplateLength,
    ExcludedCigarOp(char),
    MissingFlags,
}

impl FilterConfig {
    /// Check whether a record may take part in pairing.
    ///
    /// # Errors
    ///
    /// Returns the first failed criterion as an [`Ineligibility`].
    pub fn check(&self, record: &Record) -> Result<(), Ineligibility> {
        if !record.is_mapped() {
            return Err(Ineligibility::Unmapped);
        }
        if !record.mate_on_same_reference() {
            return Err(Ineligibility::MateOnOtherReference);
        }
        if record.template_length() == 0 {
            return Err(Ineligibility::ZeroTemplateLength);
        }
        if let Some(op) = record
            .cigar()
            .chars()
            .find(|c| self.excluded_cigar_ops.contains(*c))
        {
            return Err(Ineligibility::ExcludedCigarOp(op));
        }
        if record.flags() & self.required_flags != self.required_flags {
            return Err(Ineligibility::MissingFlags);
        }
        Ok(())
    }

    #[must_use]
    pub fn is_eligible(&self, record: &Record) -> bool {
        self.check(record).is_ok()
    }
}
