//! Candidate queries against a trained forest.
//!
//! A query vector descends every tree with the rules stored in its nodes and
//! collects the rows of the leaf it reaches. Results come back per tree
//! ([`ForestResults`]), as a deduplicated union ([`DedupResults`]), or
//! reranked by exact distance ([`Neighbor`] lists).

mod engine;
mod results;
mod traversal;

pub use engine::{QueryEngine, QueryError};
pub use results::{DedupResults, ForestResults, Neighbor};
pub use traversal::{find_leaf, leaf_rows_for};
