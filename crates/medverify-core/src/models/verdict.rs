//! Public verdict types returned by the engine.
//!
//! Field names and status spellings are the wire contract: callers serialize
//! these as-is, so the serde representations here must never change.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Outcome of a verification query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    /// Composite score >= 95 with no conflicts.
    Verified,
    /// Composite score >= 85.
    HighSimilarity,
    /// Score >= 85 with a registration number supplied and conflicts present.
    RequiresConfirmation,
    /// Composite score >= 70.
    PartialMatch,
    /// Composite score >= 50.
    LowConfidence,
    /// Reserved wire spelling; not produced by the current decision table.
    ConflictWarning,
    /// No reliable match. This is data, not an error.
    Unknown,
}

/// Coarse confidence bucket derived from a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

impl Confidence {
    /// Bucket for a composite score: high >= 85, medium >= 70, else low.
    pub fn for_composite(score: f64) -> Self {
        if score >= 85.0 {
            Confidence::High
        } else if score >= 70.0 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }

    /// Bucket for a single field score: high >= 80, medium >= 60, else low.
    pub fn for_field(score: u32) -> Self {
        if score >= 80 {
            Confidence::High
        } else if score >= 60 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

/// A detected inconsistency between high-weight fields.
///
/// Tags never alter the composite score; they downgrade the status and feed
/// the `requires_confirmation` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictTag {
    /// Manufacturer scored < 60 while a supplied name field scored >= 80.
    ManufacturerConflict,
    /// Registration scored < 70 while manufacturer or product name scored >= 80.
    NafdacConflict,
}

/// Per-field scoring detail for the best match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMatchDetail {
    /// Field name ("registration_no", "manufacturer", ...).
    pub field: String,
    /// Match score, 0-100.
    pub score: u32,
    /// Value on the matched registry record, if present.
    pub matched_value: Option<String>,
    /// Value the caller supplied.
    pub input_value: String,
    /// Which matching rule produced the score (e.g., "exact_match").
    pub algorithm: String,
    /// Field-level confidence bucket.
    pub confidence: Confidence,
}

/// A ranked alternate: identity and score only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PossibleMatch {
    pub product_name: String,
    pub generic_name: Option<String>,
    pub manufacturer: Option<String>,
    pub registration_no: Option<String>,
    pub match_score: u32,
}

/// A "did you mean" suggestion produced when nothing clears the score floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistrySuggestion {
    pub product_name: String,
    pub generic_name: Option<String>,
    pub manufacturer: Option<String>,
    pub similarity: u32,
}

/// Full verdict for one verification query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationVerdict {
    /// Status from the score/conflict decision table.
    pub status: VerificationStatus,
    /// Human-readable summary of the status.
    pub message: String,
    /// Best match's registered product name.
    pub product_name: Option<String>,
    /// Best match's generic name.
    pub generic_name: Option<String>,
    /// Best match's dosage form.
    pub dosage_form: Option<String>,
    /// Best match's strength.
    pub strength: Option<String>,
    /// Best match's registration number.
    pub registration_no: Option<String>,
    /// Best match's manufacturer name.
    pub manufacturer: Option<String>,
    /// Composite score, 0-100.
    pub match_score: u32,
    /// Confidence bucket for the composite score.
    pub confidence: Confidence,
    /// Registry id of the best match.
    pub record_id: Option<u64>,
    /// Approval date of the best match, when on record.
    pub last_verified: Option<NaiveDate>,
    /// Per-field scoring breakdown for the best match.
    pub match_details: Vec<FieldMatchDetail>,
    /// Up to five next-best alternates.
    pub possible_matches: Vec<PossibleMatch>,
    /// Conflict tags detected on the best match.
    pub conflicts: Vec<ConflictTag>,
    /// Caller should confirm the match before trusting it.
    pub requires_confirmation: bool,
    /// Supplying a registration number would materially improve confidence.
    pub requires_registration_number: bool,
    /// Advisory notes for the caller.
    pub verification_notes: Vec<String>,
    /// Did-you-mean suggestions; only populated when no candidate cleared the floor.
    pub suggestions: Vec<RegistrySuggestion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_spellings_are_locked() {
        let cases = [
            (VerificationStatus::Verified, "verified"),
            (VerificationStatus::HighSimilarity, "high_similarity"),
            (VerificationStatus::RequiresConfirmation, "requires_confirmation"),
            (VerificationStatus::PartialMatch, "partial_match"),
            (VerificationStatus::LowConfidence, "low_confidence"),
            (VerificationStatus::ConflictWarning, "conflict_warning"),
            (VerificationStatus::Unknown, "unknown"),
        ];
        for (status, wire) in cases {
            assert_eq!(
                serde_json::to_value(status).unwrap(),
                serde_json::Value::String(wire.into())
            );
        }
    }

    #[test]
    fn confidence_and_conflict_spellings_are_locked() {
        assert_eq!(
            serde_json::to_value(Confidence::High).unwrap(),
            serde_json::Value::String("high".into())
        );
        assert_eq!(
            serde_json::to_value(ConflictTag::ManufacturerConflict).unwrap(),
            serde_json::Value::String("manufacturer_conflict".into())
        );
        assert_eq!(
            serde_json::to_value(ConflictTag::NafdacConflict).unwrap(),
            serde_json::Value::String("nafdac_conflict".into())
        );
    }

    #[test]
    fn composite_confidence_buckets() {
        assert_eq!(Confidence::for_composite(85.0), Confidence::High);
        assert_eq!(Confidence::for_composite(84.9), Confidence::Medium);
        assert_eq!(Confidence::for_composite(70.0), Confidence::Medium);
        assert_eq!(Confidence::for_composite(69.9), Confidence::Low);
    }

    #[test]
    fn field_confidence_buckets() {
        assert_eq!(Confidence::for_field(80), Confidence::High);
        assert_eq!(Confidence::for_field(79), Confidence::Medium);
        assert_eq!(Confidence::for_field(60), Confidence::Medium);
        assert_eq!(Confidence::for_field(59), Confidence::Low);
    }
}
