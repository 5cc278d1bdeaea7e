//! Verdict assembly: turn ranked candidates (or the lack of them) into the
//! public response shape.

use tracing::debug;

use crate::models::{
    Confidence, PossibleMatch, RegistrySuggestion, VerificationStatus, VerificationVerdict,
};

use super::fusion::{self, CandidateScore};
use super::index::SearchIndexes;
use super::matchers;
use super::NormalizedQuery;

/// Alternates and suggestions are both capped at five entries.
const MAX_ALTERNATES: usize = 5;

/// Suggestions below this partial-similarity cutoff are noise.
const SUGGESTION_FLOOR: f64 = 40.0;

/// Build the verdict for a non-empty ranked candidate list.
///
/// The first entry is the best match; the next few become `possible_matches`.
pub(crate) fn build_verdict(
    indexes: &SearchIndexes,
    query: &NormalizedQuery,
    ranked: Vec<CandidateScore>,
) -> VerificationVerdict {
    let mut ranked = ranked;
    let best = ranked.remove(0);
    let registration_supplied = query.registration_no.is_some();
    let status = fusion::decide_status(best.score, &best.conflicts, registration_supplied);
    let match_score = best.score.round() as u32;

    debug!(
        record_id = best.record_id,
        score = best.score,
        ?status,
        conflicts = best.conflicts.len(),
        "assembled verdict"
    );

    let possible_matches: Vec<PossibleMatch> = ranked
        .iter()
        .take(MAX_ALTERNATES)
        .filter_map(|candidate| {
            indexes.record(candidate.record_id).map(|record| PossibleMatch {
                product_name: record.product_name.clone(),
                generic_name: record.generic_name.clone(),
                manufacturer: record.manufacturer_name().map(String::from),
                registration_no: record.registration_no.clone(),
                match_score: candidate.score.round() as u32,
            })
        })
        .collect();

    let product_supplied = query.product_name.is_some();
    let name_supplied = product_supplied || query.generic_name.is_some();
    let requires_confirmation = status == VerificationStatus::RequiresConfirmation
        || !best.conflicts.is_empty()
        || (best.score >= 85.0 && !registration_supplied && product_supplied);
    let requires_registration_number =
        best.score < 85.0 && !registration_supplied && name_supplied;

    let verification_notes = notes_for(&best, status, registration_supplied);
    let message = message_for(status);

    let record = indexes.record(best.record_id);
    VerificationVerdict {
        status,
        message,
        product_name: record.map(|r| r.product_name.clone()),
        generic_name: record.and_then(|r| r.generic_name.clone()),
        dosage_form: record.and_then(|r| r.dosage_form.clone()),
        strength: record.and_then(|r| r.strength.clone()),
        registration_no: record.and_then(|r| r.registration_no.clone()),
        manufacturer: record.and_then(|r| r.manufacturer_name().map(String::from)),
        match_score,
        confidence: Confidence::for_composite(best.score),
        record_id: record.map(|r| r.id),
        last_verified: record.and_then(|r| r.approval_date()),
        match_details: best.details,
        possible_matches,
        conflicts: best.conflicts,
        requires_confirmation,
        requires_registration_number,
        verification_notes,
        suggestions: Vec::new(),
    }
}

/// Build the verdict when no candidate cleared the score floor.
///
/// Runs a last-resort partial-similarity scan over the flattened search
/// texts to produce "did you mean" suggestions.
pub(crate) fn no_match_verdict(
    indexes: &SearchIndexes,
    query: &NormalizedQuery,
) -> VerificationVerdict {
    let probe = query.flattened_text();

    let mut hits: Vec<(f64, u64)> = Vec::new();
    if !probe.is_empty() {
        for (text, id) in indexes.search_texts() {
            let similarity = matchers::partial_similarity(&probe, text);
            if similarity > SUGGESTION_FLOOR {
                hits.push((similarity, *id));
            }
        }
    }
    hits.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.1.cmp(&b.1))
    });

    let suggestions: Vec<RegistrySuggestion> = hits
        .into_iter()
        .take(MAX_ALTERNATES)
        .filter_map(|(similarity, id)| {
            indexes.record(id).map(|record| RegistrySuggestion {
                product_name: record.product_name.clone(),
                generic_name: record.generic_name.clone(),
                manufacturer: record.manufacturer_name().map(String::from),
                similarity: similarity.round() as u32,
            })
        })
        .collect();

    debug!(suggestions = suggestions.len(), "no candidate cleared the floor");

    let mut verification_notes = vec![
        "No registry record matched the supplied details.".to_string(),
    ];
    if query.registration_no.is_none() {
        verification_notes.push(
            "Adding the registration number printed on the pack would allow an exact lookup."
                .to_string(),
        );
    }
    if !suggestions.is_empty() {
        verification_notes.push("Similar registered products are listed under suggestions.".to_string());
    }

    VerificationVerdict {
        status: VerificationStatus::Unknown,
        message: message_for(VerificationStatus::Unknown),
        product_name: None,
        generic_name: None,
        dosage_form: None,
        strength: None,
        registration_no: None,
        manufacturer: None,
        match_score: 0,
        confidence: Confidence::Low,
        record_id: None,
        last_verified: None,
        match_details: Vec::new(),
        possible_matches: Vec::new(),
        conflicts: Vec::new(),
        requires_confirmation: false,
        requires_registration_number: query.registration_no.is_none()
            && (query.product_name.is_some() || query.generic_name.is_some()),
        verification_notes,
        suggestions,
    }
}

fn message_for(status: VerificationStatus) -> String {
    match status {
        VerificationStatus::Verified => "Product verified against the registry.",
        VerificationStatus::HighSimilarity => {
            "Strong match found; minor differences from the registry record."
        }
        VerificationStatus::RequiresConfirmation => {
            "Match found but conflicting details need confirmation."
        }
        VerificationStatus::PartialMatch => "Partial match found; verify the remaining details.",
        VerificationStatus::LowConfidence => {
            "Weak match only; treat this product with caution."
        }
        VerificationStatus::ConflictWarning => {
            "Matched record disagrees with the supplied details."
        }
        VerificationStatus::Unknown => "No matching product found in the registry.",
    }
    .to_string()
}

/// Advisory notes derived from the best match's field details and conflicts.
fn notes_for(
    best: &CandidateScore,
    status: VerificationStatus,
    registration_supplied: bool,
) -> Vec<String> {
    let mut notes = Vec::new();

    for detail in &best.details {
        if detail.score == 0 {
            notes.push(format!(
                "Supplied {} did not match the registry record.",
                detail.field
            ));
        }
    }

    for conflict in &best.conflicts {
        notes.push(match conflict {
            crate::models::ConflictTag::ManufacturerConflict => {
                "Manufacturer differs from the registered manufacturer for this product."
                    .to_string()
            }
            crate::models::ConflictTag::NafdacConflict => {
                "Registration number does not agree with the matched record.".to_string()
            }
        });
    }

    if !registration_supplied && status != VerificationStatus::Verified {
        notes.push(
            "Supplying the registration number would raise confidence in this result.".to_string(),
        );
    }

    notes
}
