//! Text canonicalization for registry fields and caller input.
//!
//! Handles:
//! - Case folding and accent stripping (NFKD, combining marks removed)
//! - Punctuation removal and whitespace collapsing
//! - Abbreviation expansion (tab→tablet, susp→suspension, ...)
//! - Corporate-suffix stripping for manufacturer names
//! - Registration-number canonicalization (XX-XXXX)

use std::collections::{HashMap, HashSet};

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Normalizer for medicine names, manufacturers, and registration numbers.
///
/// All methods are pure, deterministic, and idempotent: normalizing an
/// already-normalized string returns it unchanged.
pub struct Normalizer {
    /// Abbreviation map: short token → expanded token
    abbreviations: HashMap<String, String>,
    /// Corporate-suffix tokens dropped from manufacturer names
    corp_suffixes: HashSet<String>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer {
    /// Create a normalizer with the default mappings.
    pub fn new() -> Self {
        Self {
            abbreviations: Self::default_abbreviations(),
            corp_suffixes: Self::default_corp_suffixes(),
        }
    }

    /// Canonicalize free text for indexing and matching.
    ///
    /// Lowercase, strip accents, replace punctuation with spaces, collapse
    /// whitespace, and expand known abbreviations token by token.
    pub fn normalize_text(&self, text: &str) -> String {
        // NFKD decomposition with combining marks dropped strips accents
        // while keeping the base letters. Decomposition runs before case
        // folding because it can emit uppercase base letters.
        let decomposed: String = text.nfkd().filter(|c| !is_combining_mark(*c)).collect();
        let lowered = decomposed.to_lowercase();

        let spaced: String = lowered
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
            .collect();

        spaced
            .split_whitespace()
            .map(|token| {
                self.abbreviations
                    .get(token)
                    .map(String::as_str)
                    .unwrap_or(token)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Canonicalize a manufacturer name.
    ///
    /// Applies [`normalize_text`](Self::normalize_text), then drops corporate
    /// suffix tokens (ltd, plc, gmbh, pharmaceuticals, ...).
    pub fn normalize_manufacturer(&self, manufacturer: &str) -> String {
        self.normalize_text(manufacturer)
            .split_whitespace()
            .filter(|token| !self.corp_suffixes.contains(*token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Canonicalize a registration number.
    ///
    /// Strips non-alphanumerics and uppercases. A six-character all-digit
    /// result is reformatted as `XX-XXXX`, the registry's canonical layout;
    /// anything else is returned in stripped form.
    pub fn normalize_registration_no(&self, registration: &str) -> String {
        let stripped: String = registration
            .chars()
            .filter(|c| c.is_alphanumeric())
            .flat_map(|c| c.to_uppercase())
            .collect();

        let digits: Vec<char> = stripped.chars().collect();
        if digits.len() == 6 && digits.iter().all(|c| c.is_ascii_digit()) {
            let (prefix, serial) = stripped.split_at(2);
            format!("{prefix}-{serial}")
        } else {
            stripped
        }
    }

    /// Add a custom abbreviation expansion.
    pub fn add_abbreviation(&mut self, short: &str, expanded: &str) {
        self.abbreviations
            .insert(short.to_lowercase(), expanded.to_lowercase());
    }

    /// Add a custom corporate suffix token to strip from manufacturers.
    pub fn add_corporate_suffix(&mut self, suffix: &str) {
        self.corp_suffixes.insert(suffix.to_lowercase());
    }

    /// Default abbreviation expansions seen on medicine packaging.
    fn default_abbreviations() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("tab".into(), "tablet".into());
        map.insert("cap".into(), "capsule".into());
        map.insert("susp".into(), "suspension".into());
        map.insert("inj".into(), "injection".into());
        map.insert("supp".into(), "suppository".into());
        map.insert("pcm".into(), "paracetamol".into());
        map
    }

    /// Corporate suffixes that carry no identity signal for matching.
    fn default_corp_suffixes() -> HashSet<String> {
        [
            "ltd",
            "limited",
            "plc",
            "inc",
            "incorporated",
            "co",
            "company",
            "corp",
            "corporation",
            "llc",
            "llp",
            "partners",
            "group",
            "holdings",
            "sa",
            "ag",
            "gmbh",
            "industries",
            "pharma",
            "pharmaceutical",
            "pharmaceuticals",
            "pharmacies",
            "healthcare",
            "biotech",
            "biotechnology",
            "medicines",
            "laboratories",
            "labs",
            "research",
            "therapeutics",
            "sciences",
            "formulations",
            "nigeria",
            "nig",
            "ng",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_and_punctuation() {
        let normalizer = Normalizer::new();
        assert_eq!(
            normalizer.normalize_text("Paracetamol (500mg) Tablets!"),
            "paracetamol 500mg tablets"
        );
    }

    #[test]
    fn test_accent_stripping() {
        let normalizer = Normalizer::new();
        assert_eq!(normalizer.normalize_text("Efferalgan Médicament"), "efferalgan medicament");
        assert_eq!(normalizer.normalize_text("Générique"), "generique");
    }

    #[test]
    fn test_abbreviation_expansion() {
        let normalizer = Normalizer::new();
        assert_eq!(normalizer.normalize_text("pcm tab"), "paracetamol tablet");
        assert_eq!(normalizer.normalize_text("amox cap 250"), "amox capsule 250");
        // Expanded forms pass through untouched
        assert_eq!(normalizer.normalize_text("tablet"), "tablet");
    }

    #[test]
    fn test_normalize_text_idempotent() {
        let normalizer = Normalizer::new();
        for input in ["Paracétamol Tab.", "  EMZOR  pharma ", "inj 04-1234"] {
            let once = normalizer.normalize_text(input);
            assert_eq!(normalizer.normalize_text(&once), once);
        }
    }

    #[test]
    fn test_manufacturer_suffix_stripping() {
        let normalizer = Normalizer::new();
        assert_eq!(
            normalizer.normalize_manufacturer("Emzor Pharmaceutical Ltd"),
            "emzor"
        );
        assert_eq!(
            normalizer.normalize_manufacturer("Fidson Healthcare Plc"),
            "fidson"
        );
        assert_eq!(
            normalizer.normalize_manufacturer("May & Baker Nigeria Plc"),
            "may baker"
        );
        // GmbH and friends
        assert_eq!(normalizer.normalize_manufacturer("Bayer AG"), "bayer");
    }

    #[test]
    fn test_manufacturer_idempotent() {
        let normalizer = Normalizer::new();
        let once = normalizer.normalize_manufacturer("Swiss Pharma Nigeria Ltd.");
        assert_eq!(normalizer.normalize_manufacturer(&once), once);
    }

    #[test]
    fn test_registration_reformat() {
        let normalizer = Normalizer::new();
        assert_eq!(normalizer.normalize_registration_no("041234"), "04-1234");
        assert_eq!(normalizer.normalize_registration_no("04-1234"), "04-1234");
        assert_eq!(normalizer.normalize_registration_no("04 1234"), "04-1234");
        // Non-numeric or wrong-length numbers stay stripped/uppercased
        assert_eq!(normalizer.normalize_registration_no("a4-0061"), "A40061");
        assert_eq!(normalizer.normalize_registration_no("0412345"), "0412345");
    }

    #[test]
    fn test_registration_idempotent() {
        let normalizer = Normalizer::new();
        for input in ["041234", "A4-0061", "b1/2222/x"] {
            let once = normalizer.normalize_registration_no(input);
            assert_eq!(normalizer.normalize_registration_no(&once), once);
        }
    }

    #[test]
    fn test_custom_tables() {
        let mut normalizer = Normalizer::new();
        normalizer.add_abbreviation("oint", "ointment");
        normalizer.add_corporate_suffix("ventures");

        assert_eq!(normalizer.normalize_text("OINT 5g"), "ointment 5g");
        assert_eq!(normalizer.normalize_manufacturer("Tuyil Ventures"), "tuyil");
    }
}
