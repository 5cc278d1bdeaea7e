//! Scoring configuration for the verification engine.
//!
//! All weights, bonuses, and thresholds that shape the composite score live
//! here so deployments can tune them without touching matcher code.

use serde::{Deserialize, Serialize};

/// Field weights and score thresholds used by score fusion.
///
/// The composite score is the weighted mean of the per-field match scores over
/// the fields the caller actually supplied. Defaults reproduce the production
/// tuning: the registration number dominates, the dosage form is a weak
/// tie-breaking signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Weight of the registration-number match. Default: 0.40.
    pub nafdac_weight: f64,
    /// Weight of the manufacturer match. Default: 0.25.
    pub manufacturer_weight: f64,
    /// Weight of the product-name match. Default: 0.20.
    pub product_name_weight: f64,
    /// Weight of the generic-name match. Default: 0.10.
    pub generic_name_weight: f64,
    /// Weight of the dosage-form match. Default: 0.05.
    pub dosage_form_weight: f64,
    /// Added to the composite when every supplied field scored >= 70. Default: 15.
    pub complete_match_bonus: f64,
    /// Candidates scoring below this floor never surface as a best match or
    /// as an alternate. Default: 30.
    pub min_score_floor: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            nafdac_weight: 0.40,
            manufacturer_weight: 0.25,
            product_name_weight: 0.20,
            generic_name_weight: 0.10,
            dosage_form_weight: 0.05,
            complete_match_bonus: 15.0,
            min_score_floor: 30.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_sum_to_one() {
        let config = MatchConfig::default();
        let sum = config.nafdac_weight
            + config.manufacturer_weight
            + config.product_name_weight
            + config.generic_name_weight
            + config.dosage_form_weight;
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn partial_config_fills_defaults() {
        let config: MatchConfig = serde_json::from_str(r#"{"nafdac_weight": 0.5}"#).unwrap();
        assert_eq!(config.nafdac_weight, 0.5);
        assert_eq!(config.min_score_floor, 30.0);
        assert_eq!(config.complete_match_bonus, 15.0);
    }

    #[test]
    fn config_round_trips_with_contract_field_names() {
        let json = serde_json::to_value(MatchConfig::default()).unwrap();
        for key in [
            "nafdac_weight",
            "manufacturer_weight",
            "product_name_weight",
            "generic_name_weight",
            "dosage_form_weight",
            "complete_match_bonus",
            "min_score_floor",
        ] {
            assert!(json.get(key).is_some(), "missing config field {key}");
        }
    }
}
