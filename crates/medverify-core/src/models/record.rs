//! Canonical registry record types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single entry in the authoritative approved-drug registry.
///
/// Records are loaded once from an external snapshot and never mutated for
/// the lifetime of the engine. Nested fields are optional because registry
/// data is untrusted; they are validated at ingest, not defended against at
/// every access site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRecord {
    /// Registry-assigned numeric identifier. Unique within a snapshot.
    pub id: u64,
    /// Brand/product name as registered.
    pub product_name: String,
    /// Active-ingredient (generic) name.
    #[serde(default)]
    pub generic_name: Option<String>,
    /// Dosage form (e.g., "Tablet", "Oral Suspension").
    #[serde(default)]
    pub dosage_form: Option<String>,
    /// Strength (e.g., "500mg"). Carried for display, never scored.
    #[serde(default)]
    pub strength: Option<String>,
    /// Regulator-issued registration number.
    #[serde(default)]
    pub registration_no: Option<String>,
    /// Registered manufacturer.
    #[serde(default)]
    pub manufacturer: Option<Manufacturer>,
    /// Regulatory approval metadata.
    #[serde(default)]
    pub approval: Option<Approval>,
}

/// Manufacturer of record for a registry entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manufacturer {
    /// Registered company name.
    pub name: String,
    /// Country of manufacture.
    #[serde(default)]
    pub country: Option<String>,
}

/// Regulatory approval metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Approval {
    /// Date the registration was approved or last renewed.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Registry approval status (e.g., "approved").
    #[serde(default)]
    pub status: Option<String>,
}

impl ReferenceRecord {
    /// Create a minimal record with required fields only.
    pub fn new(id: u64, product_name: impl Into<String>) -> Self {
        Self {
            id,
            product_name: product_name.into(),
            generic_name: None,
            dosage_form: None,
            strength: None,
            registration_no: None,
            manufacturer: None,
            approval: None,
        }
    }

    /// Manufacturer name, if one is on record.
    pub fn manufacturer_name(&self) -> Option<&str> {
        self.manufacturer.as_ref().map(|m| m.name.as_str())
    }

    /// Approval date, if one is on record.
    pub fn approval_date(&self) -> Option<NaiveDate> {
        self.approval.as_ref().and_then(|a| a.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_nested_snapshot_record() {
        let raw = serde_json::json!({
            "id": 42,
            "product_name": "Paracetamol Tablets",
            "generic_name": "Paracetamol",
            "dosage_form": "Tablet",
            "strength": "500mg",
            "registration_no": "04-1234",
            "manufacturer": { "name": "Emzor Pharmaceutical Ltd", "country": "Nigeria" },
            "approval": { "date": "2022-01-15", "status": "approved" }
        });

        let record: ReferenceRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(record.id, 42);
        assert_eq!(record.manufacturer_name(), Some("Emzor Pharmaceutical Ltd"));
        assert_eq!(
            record.approval_date(),
            NaiveDate::from_ymd_opt(2022, 1, 15)
        );
        assert_eq!(record.approval.unwrap().status.as_deref(), Some("approved"));
    }

    #[test]
    fn optional_fields_default_to_none() {
        let raw = serde_json::json!({ "id": 1, "product_name": "Amoxil" });
        let record: ReferenceRecord = serde_json::from_value(raw).unwrap();
        assert!(record.generic_name.is_none());
        assert!(record.manufacturer.is_none());
        assert!(record.approval_date().is_none());
    }

    #[test]
    fn missing_id_is_an_error() {
        let raw = serde_json::json!({ "product_name": "Amoxil" });
        assert!(serde_json::from_value::<ReferenceRecord>(raw).is_err());
    }
}
