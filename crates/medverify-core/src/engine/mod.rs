//! The verification engine: normalization, candidate generation, scoring,
//! and verdict assembly behind one entry point.
//!
//! The engine is immutable after construction and is `Send + Sync`; callers
//! that need live registry updates build a fresh engine from the new snapshot
//! and swap it in behind an `Arc`.

mod candidates;
mod fusion;
mod index;
mod matchers;
mod normalizer;
mod response;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::MatchConfig;
use crate::models::{ReferenceRecord, VerificationQuery, VerificationVerdict};

pub use index::IndexStats;
pub use matchers::SynonymTable;
pub use normalizer::Normalizer;

/// Errors surfaced to callers. A query that matches nothing is NOT an error;
/// it yields an `unknown` verdict.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VerifyError {
    /// Every query field was missing or blank.
    #[error("query must supply at least one non-empty field")]
    InvalidQuery,
    /// The registry snapshot was not a JSON array of records.
    #[error("registry snapshot must be a JSON array of records")]
    SnapshotFormat,
}

/// One supplied query field, kept in both raw and normalized form.
///
/// The raw spelling goes back out in match details; the normalized form is
/// what the matchers compare.
#[derive(Debug, Clone)]
pub(crate) struct FieldInput {
    pub raw: String,
    pub normalized: String,
}

/// A query after normalization. Fields whose normalized form came out empty
/// are treated as not supplied at all.
#[derive(Debug, Clone, Default)]
pub(crate) struct NormalizedQuery {
    pub product_name: Option<FieldInput>,
    pub generic_name: Option<FieldInput>,
    pub registration_no: Option<FieldInput>,
    pub manufacturer: Option<FieldInput>,
    pub dosage_form: Option<FieldInput>,
}

impl NormalizedQuery {
    pub(crate) fn from_query(query: &VerificationQuery, normalizer: &Normalizer) -> Self {
        let field = |value: &Option<String>, normalize: &dyn Fn(&str) -> String| {
            value.as_deref().and_then(|raw| {
                let normalized = normalize(raw);
                if normalized.is_empty() {
                    None
                } else {
                    Some(FieldInput {
                        raw: raw.trim().to_string(),
                        normalized,
                    })
                }
            })
        };

        Self {
            product_name: field(&query.product_name, &|s| normalizer.normalize_text(s)),
            generic_name: field(&query.generic_name, &|s| normalizer.normalize_text(s)),
            registration_no: field(&query.registration_no, &|s| {
                normalizer.normalize_registration_no(s)
            }),
            manufacturer: field(&query.manufacturer, &|s| {
                normalizer.normalize_manufacturer(s)
            }),
            dosage_form: field(&query.dosage_form, &|s| normalizer.normalize_text(s)),
        }
    }

    /// Supplied normalized fields joined into one probe string, for the
    /// last-resort suggestion scan.
    pub(crate) fn flattened_text(&self) -> String {
        [
            &self.product_name,
            &self.generic_name,
            &self.manufacturer,
            &self.registration_no,
        ]
        .into_iter()
        .filter_map(|f| f.as_ref().map(|i| i.normalized.as_str()))
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Medicine identity-resolution engine over one registry snapshot.
pub struct VerificationEngine {
    config: MatchConfig,
    normalizer: Normalizer,
    synonyms: SynonymTable,
    indexes: index::SearchIndexes,
}

impl VerificationEngine {
    /// Build an engine with the default configuration and tables.
    pub fn new(records: Vec<ReferenceRecord>) -> Self {
        Self::with_config(records, MatchConfig::default())
    }

    /// Build an engine with a custom match configuration.
    pub fn with_config(records: Vec<ReferenceRecord>, config: MatchConfig) -> Self {
        Self::with_components(records, config, Normalizer::new(), SynonymTable::new())
    }

    /// Build an engine with custom normalization and synonym tables.
    pub fn with_components(
        records: Vec<ReferenceRecord>,
        config: MatchConfig,
        normalizer: Normalizer,
        synonyms: SynonymTable,
    ) -> Self {
        let indexes = index::SearchIndexes::build(records, &normalizer);
        info!(records = indexes.len(), "verification engine ready");
        Self {
            config,
            normalizer,
            synonyms,
            indexes,
        }
    }

    /// Build an engine from a raw JSON snapshot (an array of records).
    ///
    /// Individual records that fail to deserialize are skipped with a
    /// warning; only a non-array snapshot is an error.
    pub fn from_snapshot(snapshot: &Value) -> Result<Self, VerifyError> {
        let entries = snapshot.as_array().ok_or(VerifyError::SnapshotFormat)?;

        let mut records = Vec::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            match serde_json::from_value::<ReferenceRecord>(entry.clone()) {
                Ok(record) => records.push(record),
                Err(error) => {
                    warn!(position, %error, "skipping malformed registry record");
                }
            }
        }

        Ok(Self::new(records))
    }

    /// Verify a query against the registry.
    ///
    /// Returns `Err(InvalidQuery)` only when every field is blank. A query
    /// that matches nothing yields an `unknown` verdict with suggestions.
    pub fn verify(&self, query: &VerificationQuery) -> Result<VerificationVerdict, VerifyError> {
        if query.is_empty() {
            return Err(VerifyError::InvalidQuery);
        }

        let normalized = NormalizedQuery::from_query(query, &self.normalizer);
        let candidate_ids = candidates::find_candidates(&self.indexes, &normalized);
        debug!(candidates = candidate_ids.len(), "scoring candidates");

        let mut scored = Vec::with_capacity(candidate_ids.len());
        for id in candidate_ids {
            let Some(record) = self.indexes.record(id) else {
                warn!(record_id = id, "candidate id missing from the record map");
                continue;
            };
            scored.push(fusion::score_candidate(
                &self.config,
                &self.normalizer,
                &self.synonyms,
                &normalized,
                record,
            ));
        }

        let ranked = fusion::rank(scored, self.config.min_score_floor);
        if ranked.is_empty() {
            Ok(response::no_match_verdict(&self.indexes, &normalized))
        } else {
            Ok(response::build_verdict(&self.indexes, &normalized, ranked))
        }
    }

    /// Active match configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Active normalizer.
    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    /// Per-dimension index sizes.
    pub fn index_stats(&self) -> IndexStats {
        self.indexes.stats()
    }

    /// Number of indexed registry records.
    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Manufacturer;
    use serde_json::json;

    fn sample_records() -> Vec<ReferenceRecord> {
        let mut a = ReferenceRecord::new(1, "Paracetamol Tablets");
        a.generic_name = Some("Paracetamol".into());
        a.registration_no = Some("04-1234".into());
        a.manufacturer = Some(Manufacturer {
            name: "Emzor Pharmaceutical Ltd".into(),
            country: Some("Nigeria".into()),
        });
        vec![a]
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<VerificationEngine>();
    }

    #[test]
    fn test_empty_query_is_invalid() {
        let engine = VerificationEngine::new(sample_records());
        let blank = VerificationQuery {
            product_name: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(engine.verify(&blank), Err(VerifyError::InvalidQuery));
        assert_eq!(
            engine.verify(&VerificationQuery::default()),
            Err(VerifyError::InvalidQuery)
        );
    }

    #[test]
    fn test_from_snapshot_skips_malformed_entries() {
        let snapshot = json!([
            {
                "id": 1,
                "product_name": "Paracetamol Tablets",
                "registration_no": "04-1234"
            },
            { "product_name": "missing id" },
            { "id": 2, "product_name": "Amoxil Capsules" }
        ]);

        let engine = VerificationEngine::from_snapshot(&snapshot).unwrap();
        assert_eq!(engine.len(), 2);
    }

    #[test]
    fn test_from_snapshot_rejects_non_array() {
        let snapshot = json!({ "records": [] });
        assert!(matches!(
            VerificationEngine::from_snapshot(&snapshot),
            Err(VerifyError::SnapshotFormat)
        ));
    }

    #[test]
    fn test_normalized_query_drops_blank_fields() {
        let normalizer = Normalizer::new();
        let query = VerificationQuery {
            product_name: Some("Paracetamol".into()),
            manufacturer: Some("Ltd".into()), // suffix-only normalizes to empty
            ..Default::default()
        };
        let normalized = NormalizedQuery::from_query(&query, &normalizer);
        assert!(normalized.product_name.is_some());
        assert!(normalized.manufacturer.is_none());
    }

    #[test]
    fn test_index_stats_exposed() {
        let engine = VerificationEngine::new(sample_records());
        let stats = engine.index_stats();
        assert_eq!(stats.records, 1);
        assert_eq!(stats.registrations, 1);
        assert!(!engine.is_empty());
    }
}
