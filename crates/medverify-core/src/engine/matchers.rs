//! Per-field similarity scoring.
//!
//! Every matcher is a pure function from a normalized (input, reference) pair
//! to a 0-100 score plus the tag of the rule that produced it. Composite
//! weighting happens later, in fusion; matchers know nothing about weights.

use std::collections::{BTreeSet, HashMap};

use strsim::normalized_levenshtein;

/// Similarity tiers for product/generic names.
const NAME_HIGH: f64 = 90.0;
const NAME_MEDIUM: f64 = 75.0;
const NAME_LOW: f64 = 50.0;

/// Similarity tiers for manufacturers.
const MANUFACTURER_HIGH: f64 = 80.0;
const MANUFACTURER_MEDIUM: f64 = 60.0;

/// Registration numbers below this fuzzy ratio score zero.
const REGISTRATION_FUZZY_FLOOR: f64 = 70.0;

/// Score and rule tag for a single field comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldScore {
    pub score: u32,
    pub algorithm: &'static str,
}

impl FieldScore {
    pub(crate) const NO_MATCH: FieldScore = FieldScore {
        score: 0,
        algorithm: "no_match",
    };

    fn new(score: u32, algorithm: &'static str) -> Self {
        Self { score, algorithm }
    }
}

/// Curated brand↔generic synonym pairs.
///
/// A hit short-circuits generic-name fuzzy matching at score 90: the names
/// denote the same molecule even when the strings are dissimilar.
pub struct SynonymTable {
    variants: HashMap<String, Vec<String>>,
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SynonymTable {
    /// Create a table with the default brand↔generic pairs.
    pub fn new() -> Self {
        let mut variants: HashMap<String, Vec<String>> = HashMap::new();
        let defaults: [(&str, &[&str]); 6] = [
            ("paracetamol", &["panadol", "acetaminophen", "tylenol"]),
            ("metronidazole", &["flagyl", "metrogel"]),
            ("amoxicillin", &["amoxil", "amoxycillin"]),
            ("ibuprofen", &["brufen", "advil"]),
            ("diclofenac", &["voltaren", "cataflam"]),
            ("omeprazole", &["prilosec", "losec"]),
        ];
        for (base, names) in defaults {
            variants.insert(base.into(), names.iter().map(|s| s.to_string()).collect());
        }
        Self { variants }
    }

    /// Register an extra synonym for a base (generic) name.
    pub fn add_synonym(&mut self, base: &str, variant: &str) {
        self.variants
            .entry(base.to_lowercase())
            .or_default()
            .push(variant.to_lowercase());
    }

    /// True when the two normalized names are a known base/variant pair,
    /// in either direction.
    pub fn are_synonyms(&self, a: &str, b: &str) -> bool {
        let hit = |base: &str, variant: &str| {
            self.variants
                .get(base)
                .is_some_and(|names| names.iter().any(|n| n == variant))
        };
        hit(a, b) || hit(b, a)
    }
}

/// Score a registration-number pair. Inputs must be pre-normalized.
pub(crate) fn score_registration(input: &str, reference: &str) -> FieldScore {
    if input.is_empty() || reference.is_empty() {
        return FieldScore::NO_MATCH;
    }
    if input == reference {
        return FieldScore::new(100, "exact_match");
    }

    let input_plain = input.replace('-', "");
    let reference_plain = reference.replace('-', "");
    if input_plain == reference_plain {
        return FieldScore::new(95, "format_normalized");
    }

    // A shared issuing prefix still narrows the field considerably.
    let input_prefix: String = input_plain.chars().take(4).collect();
    let reference_prefix: String = reference_plain.chars().take(4).collect();
    if input_plain.chars().count() >= 4
        && reference_plain.chars().count() >= 4
        && (input_plain.starts_with(&reference_prefix) || reference_plain.starts_with(&input_prefix))
    {
        return FieldScore::new(80, "partial_match");
    }

    let similarity = ratio(&input_plain, &reference_plain);
    if similarity > REGISTRATION_FUZZY_FLOOR {
        FieldScore::new(similarity.round() as u32, "fuzzy_match")
    } else {
        FieldScore::NO_MATCH
    }
}

/// Score a product-name pair. Inputs must be pre-normalized.
pub(crate) fn score_product_name(input: &str, reference: &str) -> FieldScore {
    score_name(input, reference)
}

/// Score a generic-name pair, consulting the synonym table first.
pub(crate) fn score_generic_name(
    synonyms: &SynonymTable,
    input: &str,
    reference: &str,
) -> FieldScore {
    if input.is_empty() || reference.is_empty() {
        return FieldScore::NO_MATCH;
    }
    if input == reference {
        return FieldScore::new(100, "exact_match");
    }
    if synonyms.are_synonyms(input, reference) {
        return FieldScore::new(90, "common_variant");
    }
    score_name(input, reference)
}

/// Score a manufacturer pair. Inputs must be pre-normalized
/// (suffix-stripped) manufacturer names.
pub(crate) fn score_manufacturer(input: &str, reference: &str) -> FieldScore {
    if input.is_empty() || reference.is_empty() {
        return FieldScore::NO_MATCH;
    }
    if input == reference {
        return FieldScore::new(100, "exact_match");
    }
    if input.contains(reference) || reference.contains(input) {
        return FieldScore::new(90, "contains_match");
    }

    let best = token_set_similarity(input, reference).max(partial_similarity(input, reference));
    if best >= MANUFACTURER_HIGH {
        FieldScore::new(best.round() as u32, "high_similarity")
    } else if best >= MANUFACTURER_MEDIUM {
        FieldScore::new(best.round() as u32, "medium_similarity")
    } else {
        FieldScore::NO_MATCH
    }
}

/// Score a dosage-form pair. A deliberately weak signal: an exact match after
/// abbreviation expansion is worth 30, a singular/plural collapse 25.
pub(crate) fn score_dosage_form(input: &str, reference: &str) -> FieldScore {
    if input.is_empty() || reference.is_empty() {
        return FieldScore::NO_MATCH;
    }
    if input == reference {
        return FieldScore::new(30, "exact_match");
    }
    if input.trim_end_matches('s') == reference.trim_end_matches('s') {
        return FieldScore::new(25, "singular_plural");
    }
    FieldScore::NO_MATCH
}

fn score_name(input: &str, reference: &str) -> FieldScore {
    if input.is_empty() || reference.is_empty() {
        return FieldScore::NO_MATCH;
    }
    if input == reference {
        return FieldScore::new(100, "exact_match");
    }

    let best = token_set_similarity(input, reference).max(partial_similarity(input, reference));
    if best >= NAME_HIGH {
        FieldScore::new(best.round() as u32, "high_similarity")
    } else if best >= NAME_MEDIUM {
        FieldScore::new(best.round() as u32, "medium_similarity")
    } else if best >= NAME_LOW {
        FieldScore::new(best.round() as u32, "low_similarity")
    } else {
        FieldScore::NO_MATCH
    }
}

/// Plain edit-distance ratio on a 0-100 scale.
fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    normalized_levenshtein(a, b) * 100.0
}

/// Word-order-independent similarity (0-100).
///
/// Splits both strings into token sets and compares the shared core against
/// each side's remainder, so "tablets paracetamol" still matches
/// "paracetamol tablets" at 100.
pub(crate) fn token_set_similarity(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let shared: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let only_a: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let only_b: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    if !shared.is_empty() && only_a.is_empty() && only_b.is_empty() {
        return 100.0;
    }

    let core = shared.join(" ");
    let with_a = join_parts(&core, &only_a);
    let with_b = join_parts(&core, &only_b);

    ratio(&core, &with_a)
        .max(ratio(&core, &with_b))
        .max(ratio(&with_a, &with_b))
}

/// Best alignment of the shorter string inside the longer one (0-100).
///
/// Containment scores 100; otherwise the shorter string is slid across
/// equal-length windows of the longer and the best edit ratio wins.
pub(crate) fn partial_similarity(a: &str, b: &str) -> f64 {
    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    if short.is_empty() {
        return 0.0;
    }
    if long.contains(short) {
        return 100.0;
    }

    let short_len = short.chars().count();
    let long_chars: Vec<char> = long.chars().collect();
    let mut best = 0.0f64;
    for window in long_chars.windows(short_len) {
        let slice: String = window.iter().collect();
        best = best.max(ratio(short, &slice));
    }
    best
}

fn join_parts(core: &str, rest: &[&str]) -> String {
    let tail = rest.join(" ");
    if core.is_empty() {
        tail
    } else if tail.is_empty() {
        core.to_string()
    } else {
        format!("{core} {tail}")
    }
}
