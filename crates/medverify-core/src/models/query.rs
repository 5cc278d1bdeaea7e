//! Caller-supplied verification query.

use serde::{Deserialize, Serialize};

/// Partial, possibly noisy attributes of a medicine to verify.
///
/// Every field is optional, but at least one must be non-blank or the engine
/// rejects the query before matching.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationQuery {
    /// Brand/product name as printed on the pack.
    pub product_name: Option<String>,
    /// Active-ingredient (generic) name.
    pub generic_name: Option<String>,
    /// Regulator-issued registration number.
    pub registration_no: Option<String>,
    /// Manufacturer name.
    pub manufacturer: Option<String>,
    /// Dosage form (e.g., "tab", "suspension").
    pub dosage_form: Option<String>,
    /// Strength (e.g., "500mg"). Accepted for wire compatibility; not scored.
    pub strength: Option<String>,
}

impl VerificationQuery {
    /// True when no field carries a non-blank value.
    pub fn is_empty(&self) -> bool {
        !(is_filled(&self.product_name)
            || is_filled(&self.generic_name)
            || is_filled(&self.registration_no)
            || is_filled(&self.manufacturer)
            || is_filled(&self.dosage_form)
            || is_filled(&self.strength))
    }
}

fn is_filled(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_query_is_empty() {
        assert!(VerificationQuery::default().is_empty());
    }

    #[test]
    fn blank_strings_count_as_empty() {
        let query = VerificationQuery {
            product_name: Some("   ".into()),
            registration_no: Some(String::new()),
            ..Default::default()
        };
        assert!(query.is_empty());
    }

    #[test]
    fn single_field_is_enough() {
        let query = VerificationQuery {
            strength: Some("500mg".into()),
            ..Default::default()
        };
        assert!(!query.is_empty());
    }

    #[test]
    fn deserializes_from_partial_json() {
        let query: VerificationQuery =
            serde_json::from_str(r#"{"registration_no": "04-1234"}"#).unwrap();
        assert_eq!(query.registration_no.as_deref(), Some("04-1234"));
        assert!(query.product_name.is_none());
    }
}
