//! Candidate generation: pick the bounded set of records worth scoring.

use std::collections::BTreeSet;

use super::index::SearchIndexes;
use super::NormalizedQuery;

/// Select candidate record ids for a query.
///
/// 1. An exact registration-number hit is authoritative: that single record
///    is the entire candidate set.
/// 2. Otherwise, union the exact-key index hits for product name and
///    manufacturer.
/// 3. If the union is empty, fall back to every record — full-scan recall is
///    preferred over a false "unknown" when index lookups miss.
///
/// Ids come back sorted ascending so downstream scoring is deterministic.
pub(crate) fn find_candidates(indexes: &SearchIndexes, query: &NormalizedQuery) -> Vec<u64> {
    if let Some(registration) = &query.registration_no {
        if let Some(id) = indexes.registration_hit(&registration.normalized) {
            return vec![id];
        }
    }

    let mut ids: BTreeSet<u64> = BTreeSet::new();
    if let Some(product) = &query.product_name {
        ids.extend(indexes.product_name_hits(&product.normalized));
    }
    if let Some(manufacturer) = &query.manufacturer {
        ids.extend(indexes.manufacturer_hits(&manufacturer.normalized));
    }

    if ids.is_empty() {
        return indexes.all_ids().collect();
    }
    ids.into_iter().collect()
}
