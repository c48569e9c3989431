//! Full-text search over directories of text documents.
//!
//! An index is built in memory at startup from each configured source
//! directory. Queries are answered against every index and the results are
//! merged into one relevance-ordered list.

pub mod index;
pub mod processor;

pub use index::{tokenize, SearchIndex};
pub use processor::{QueryProcessor, QueryResult, RankingEngine};
