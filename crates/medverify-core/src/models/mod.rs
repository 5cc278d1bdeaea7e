//! Domain types: registry records, caller queries, and verdicts.

mod query;
mod record;
mod verdict;

pub use query::*;
pub use record::*;
pub use verdict::*;
