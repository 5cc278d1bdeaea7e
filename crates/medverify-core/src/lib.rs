//! MedVerify Core Library
//!
//! Medicine identity resolution against a regulator registry snapshot:
//! weighted multi-field fuzzy matching with conflict detection.
//!
//! # Architecture
//!
//! ```text
//! VerificationQuery
//!        │
//!        ▼
//!  Normalization ──── case folding, accents, abbreviations,
//!        │            corporate suffixes, registration format
//!        ▼
//!  Candidate Generation ── exact-key index hits
//!        │                 (registration short-circuit)
//!        ▼
//!  Per-field Matchers ──── registration / product / generic /
//!        │                 manufacturer / dosage form
//!        ▼
//!  Score Fusion ─────────── weighted mean over supplied fields
//!        │                  + complete-match bonus, conflicts
//!        ▼
//!  VerificationVerdict ──── status, breakdown, alternates,
//!                           or "unknown" with suggestions
//! ```
//!
//! # Core Principle
//!
//! **A query that matches nothing is data, not an error.** The engine returns
//! an `unknown` verdict with did-you-mean suggestions; only a fully blank
//! query is rejected.
//!
//! # Modules
//!
//! - [`config`]: field weights, bonus, and score floor
//! - [`models`]: registry records, queries, and the verdict shape
//! - [`engine`]: normalizer, indexes, matchers, fusion, verdict assembly

pub mod config;
pub mod engine;
pub mod models;

// Re-export the types most callers need
pub use config::MatchConfig;
pub use engine::{IndexStats, Normalizer, SynonymTable, VerificationEngine, VerifyError};
pub use models::{
    Confidence, ConflictTag, FieldMatchDetail, Manufacturer, PossibleMatch, ReferenceRecord,
    RegistrySuggestion, VerificationQuery, VerificationStatus, VerificationVerdict,
};
