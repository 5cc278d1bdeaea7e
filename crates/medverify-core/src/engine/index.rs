//! Immutable lookup indexes over a registry snapshot.
//!
//! Built once, single-threaded, at engine construction; read-only afterwards.
//! Registry data is untrusted: individual bad records are skipped with a
//! warning, never allowed to abort the build.

use std::collections::{BTreeMap, HashMap};

use tracing::warn;

use crate::models::ReferenceRecord;

use super::Normalizer;

/// Normalized-key lookup maps for one registry generation.
///
/// `by_registration` is expected to be 1:1; a duplicate registration number
/// overwrites the earlier entry (and is logged so operators can repair the
/// registry). The four dimension maps are 1:many. Rebuilding from the same
/// snapshot yields identical indexes.
pub(crate) struct SearchIndexes {
    by_id: BTreeMap<u64, ReferenceRecord>,
    by_registration: HashMap<String, u64>,
    by_product_name: HashMap<String, Vec<u64>>,
    by_generic_name: HashMap<String, Vec<u64>>,
    by_manufacturer: HashMap<String, Vec<u64>>,
    by_dosage_form: HashMap<String, Vec<u64>>,
    /// Flattened normalized text per record, for the last-resort
    /// suggestion scan.
    search_texts: Vec<(String, u64)>,
}

/// Per-dimension index sizes, for observability and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexStats {
    pub records: usize,
    pub registrations: usize,
    pub product_names: usize,
    pub generic_names: usize,
    pub manufacturers: usize,
    pub dosage_forms: usize,
}

impl SearchIndexes {
    /// Build indexes from a typed snapshot. O(n) over the record count.
    pub(crate) fn build(records: Vec<ReferenceRecord>, normalizer: &Normalizer) -> Self {
        let mut indexes = Self {
            by_id: BTreeMap::new(),
            by_registration: HashMap::new(),
            by_product_name: HashMap::new(),
            by_generic_name: HashMap::new(),
            by_manufacturer: HashMap::new(),
            by_dosage_form: HashMap::new(),
            search_texts: Vec::with_capacity(records.len()),
        };

        for record in records {
            if record.product_name.trim().is_empty() {
                warn!(record_id = record.id, "skipping registry record without a product name");
                continue;
            }
            if indexes.by_id.contains_key(&record.id) {
                warn!(record_id = record.id, "duplicate record id in snapshot, keeping the later entry");
            }
            indexes.insert(record, normalizer);
        }

        indexes
    }

    fn insert(&mut self, record: ReferenceRecord, normalizer: &Normalizer) {
        let id = record.id;
        let mut search_parts: Vec<String> = Vec::with_capacity(5);

        let product_key = normalizer.normalize_text(&record.product_name);
        if !product_key.is_empty() {
            self.by_product_name.entry(product_key.clone()).or_default().push(id);
            search_parts.push(product_key);
        }

        if let Some(generic) = record.generic_name.as_deref() {
            let key = normalizer.normalize_text(generic);
            if !key.is_empty() {
                self.by_generic_name.entry(key.clone()).or_default().push(id);
                search_parts.push(key);
            }
        }

        if let Some(name) = record.manufacturer_name() {
            let key = normalizer.normalize_manufacturer(name);
            if !key.is_empty() {
                self.by_manufacturer.entry(key.clone()).or_default().push(id);
                search_parts.push(key);
            }
        }

        if let Some(form) = record.dosage_form.as_deref() {
            let key = normalizer.normalize_text(form);
            if !key.is_empty() {
                self.by_dosage_form.entry(key.clone()).or_default().push(id);
                search_parts.push(key);
            }
        }

        if let Some(registration) = record.registration_no.as_deref() {
            let key = normalizer.normalize_registration_no(registration);
            if !key.is_empty() {
                if let Some(previous) = self.by_registration.insert(key.clone(), id) {
                    warn!(
                        registration = %key,
                        previous_id = previous,
                        record_id = id,
                        "duplicate registration number, later record wins"
                    );
                }
                search_parts.push(key);
            }
        }

        self.search_texts.push((search_parts.join(" "), id));
        self.by_id.insert(id, record);
    }

    /// Full record by id.
    pub(crate) fn record(&self, id: u64) -> Option<&ReferenceRecord> {
        self.by_id.get(&id)
    }

    /// Record id for an exact normalized registration number.
    pub(crate) fn registration_hit(&self, normalized: &str) -> Option<u64> {
        self.by_registration.get(normalized).copied()
    }

    /// Record ids for an exact normalized product name.
    pub(crate) fn product_name_hits(&self, normalized: &str) -> &[u64] {
        self.by_product_name.get(normalized).map_or(&[], Vec::as_slice)
    }

    /// Record ids for an exact normalized manufacturer.
    pub(crate) fn manufacturer_hits(&self, normalized: &str) -> &[u64] {
        self.by_manufacturer.get(normalized).map_or(&[], Vec::as_slice)
    }

    /// All record ids, in ascending order.
    pub(crate) fn all_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.by_id.keys().copied()
    }

    /// Flattened search text per record, for the suggestion scan.
    pub(crate) fn search_texts(&self) -> &[(String, u64)] {
        &self.search_texts
    }

    pub(crate) fn len(&self) -> usize {
        self.by_id.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub(crate) fn stats(&self) -> IndexStats {
        IndexStats {
            records: self.by_id.len(),
            registrations: self.by_registration.len(),
            product_names: self.by_product_name.len(),
            generic_names: self.by_generic_name.len(),
            manufacturers: self.by_manufacturer.len(),
            dosage_forms: self.by_dosage_form.len(),
        }
    }
}
