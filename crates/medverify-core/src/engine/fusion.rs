//! Score fusion, conflict detection, and the status decision table.
//!
//! Field weights: registration 0.40, manufacturer 0.25, product name 0.20,
//! generic name 0.10, dosage form 0.05. The composite is the weighted mean
//! over the fields the caller supplied; a supplied field missing from the
//! record scores zero and still counts against the candidate.

use std::cmp::Ordering;

use crate::config::MatchConfig;
use crate::models::{Confidence, ConflictTag, FieldMatchDetail, ReferenceRecord, VerificationStatus};

use super::matchers::{self, FieldScore, SynonymTable};
use super::{NormalizedQuery, Normalizer};

/// Thresholds for the conflict predicates.
const CONFLICT_NAME_HIGH: u32 = 80;
const CONFLICT_MANUFACTURER_LOW: u32 = 60;
const CONFLICT_REGISTRATION_LOW: u32 = 70;

/// Per-field floors for the complete-match bonus. Dosage form tops out at
/// 30, so it gets a floor matching its own scale instead of the shared 70.
const BONUS_FIELD_FLOOR: u32 = 70;
const BONUS_DOSAGE_FLOOR: u32 = 25;

/// One supplied field's contribution to the composite.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WeightedScore {
    pub weight: f64,
    pub score: u32,
    /// Minimum score at which this field counts toward the bonus.
    pub bonus_floor: u32,
}

impl WeightedScore {
    pub(crate) fn new(weight: f64, score: u32) -> Self {
        Self {
            weight,
            score,
            bonus_floor: BONUS_FIELD_FLOOR,
        }
    }

    fn dosage(weight: f64, score: u32) -> Self {
        Self {
            weight,
            score,
            bonus_floor: BONUS_DOSAGE_FLOOR,
        }
    }
}

/// A fully scored candidate, ready for ranking.
#[derive(Debug, Clone)]
pub(crate) struct CandidateScore {
    pub record_id: u64,
    /// Composite score after renormalization, bonus, and clamping (0-100).
    pub score: f64,
    pub details: Vec<FieldMatchDetail>,
    pub conflicts: Vec<ConflictTag>,
}

/// Score one candidate record against the supplied query fields.
pub(crate) fn score_candidate(
    config: &MatchConfig,
    normalizer: &Normalizer,
    synonyms: &SynonymTable,
    query: &NormalizedQuery,
    record: &ReferenceRecord,
) -> CandidateScore {
    let mut details = Vec::new();
    let mut slots: Vec<WeightedScore> = Vec::with_capacity(5);

    let mut registration_score = None;
    let mut manufacturer_score = None;
    let mut product_score = None;
    let mut generic_score = None;

    if let Some(input) = &query.registration_no {
        let reference = record.registration_no.as_deref();
        let scored = reference
            .map(|r| matchers::score_registration(&input.normalized, &normalizer.normalize_registration_no(r)))
            .unwrap_or(FieldScore::NO_MATCH);
        registration_score = Some(scored.score);
        slots.push(WeightedScore::new(config.nafdac_weight, scored.score));
        details.push(detail("registration_no", scored, reference, &input.raw));
    }

    if let Some(input) = &query.manufacturer {
        let reference = record.manufacturer_name();
        let scored = reference
            .map(|r| matchers::score_manufacturer(&input.normalized, &normalizer.normalize_manufacturer(r)))
            .unwrap_or(FieldScore::NO_MATCH);
        manufacturer_score = Some(scored.score);
        slots.push(WeightedScore::new(config.manufacturer_weight, scored.score));
        details.push(detail("manufacturer", scored, reference, &input.raw));
    }

    if let Some(input) = &query.product_name {
        let scored = matchers::score_product_name(
            &input.normalized,
            &normalizer.normalize_text(&record.product_name),
        );
        product_score = Some(scored.score);
        slots.push(WeightedScore::new(config.product_name_weight, scored.score));
        details.push(detail(
            "product_name",
            scored,
            Some(record.product_name.as_str()),
            &input.raw,
        ));
    }

    if let Some(input) = &query.generic_name {
        let reference = record.generic_name.as_deref();
        let scored = reference
            .map(|r| matchers::score_generic_name(synonyms, &input.normalized, &normalizer.normalize_text(r)))
            .unwrap_or(FieldScore::NO_MATCH);
        generic_score = Some(scored.score);
        slots.push(WeightedScore::new(config.generic_name_weight, scored.score));
        details.push(detail("generic_name", scored, reference, &input.raw));
    }

    if let Some(input) = &query.dosage_form {
        let reference = record.dosage_form.as_deref();
        let scored = reference
            .map(|r| matchers::score_dosage_form(&input.normalized, &normalizer.normalize_text(r)))
            .unwrap_or(FieldScore::NO_MATCH);
        slots.push(WeightedScore::dosage(config.dosage_form_weight, scored.score));
        details.push(detail("dosage_form", scored, reference, &input.raw));
    }

    let conflicts = detect_conflicts(
        registration_score,
        manufacturer_score,
        product_score,
        generic_score,
    );

    CandidateScore {
        record_id: record.id,
        score: fuse(config, &slots),
        details,
        conflicts,
    }
}

/// Weighted mean of the supplied field scores, plus the complete-match bonus,
/// clamped to 0-100.
pub(crate) fn fuse(config: &MatchConfig, slots: &[WeightedScore]) -> f64 {
    let weight_total: f64 = slots.iter().map(|s| s.weight).sum();
    if weight_total <= 0.0 {
        return 0.0;
    }

    let weighted: f64 = slots.iter().map(|s| s.weight * f64::from(s.score)).sum();
    let mut composite = weighted / weight_total;

    if slots.iter().all(|s| s.score >= s.bonus_floor) {
        composite += config.complete_match_bonus;
    }

    composite.clamp(0.0, 100.0)
}

/// Conflict tags between fields the caller actually supplied.
///
/// Unsupplied fields never conflict: a name-only query must not be punished
/// for the registration number it never claimed.
fn detect_conflicts(
    registration: Option<u32>,
    manufacturer: Option<u32>,
    product: Option<u32>,
    generic: Option<u32>,
) -> Vec<ConflictTag> {
    let mut conflicts = Vec::new();

    let name_high = product.is_some_and(|s| s >= CONFLICT_NAME_HIGH)
        || generic.is_some_and(|s| s >= CONFLICT_NAME_HIGH);

    if manufacturer.is_some_and(|s| s < CONFLICT_MANUFACTURER_LOW) && name_high {
        conflicts.push(ConflictTag::ManufacturerConflict);
    }

    let anchor_high = manufacturer.is_some_and(|s| s >= CONFLICT_NAME_HIGH)
        || product.is_some_and(|s| s >= CONFLICT_NAME_HIGH);
    if registration.is_some_and(|s| s < CONFLICT_REGISTRATION_LOW) && anchor_high {
        conflicts.push(ConflictTag::NafdacConflict);
    }

    conflicts
}

/// The score/conflict → status decision table.
pub(crate) fn decide_status(
    score: f64,
    conflicts: &[ConflictTag],
    registration_supplied: bool,
) -> VerificationStatus {
    if score >= 95.0 && conflicts.is_empty() {
        VerificationStatus::Verified
    } else if score >= 85.0 {
        if registration_supplied && !conflicts.is_empty() {
            VerificationStatus::RequiresConfirmation
        } else {
            VerificationStatus::HighSimilarity
        }
    } else if score >= 70.0 {
        VerificationStatus::PartialMatch
    } else if score >= 50.0 {
        VerificationStatus::LowConfidence
    } else {
        VerificationStatus::Unknown
    }
}

/// Drop candidates below the floor and rank the rest: score descending,
/// record id ascending on ties.
pub(crate) fn rank(mut scored: Vec<CandidateScore>, floor: f64) -> Vec<CandidateScore> {
    scored.retain(|c| c.score >= floor);
    scored.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.record_id.cmp(&b.record_id))
    });
    scored
}

fn detail(
    field: &str,
    scored: FieldScore,
    reference: Option<&str>,
    input: &str,
) -> FieldMatchDetail {
    FieldMatchDetail {
        field: field.to_string(),
        score: scored.score,
        matched_value: reference.map(String::from),
        input_value: input.to_string(),
        algorithm: scored.algorithm.to_string(),
        confidence: Confidence::for_field(scored.score),
    }
}
