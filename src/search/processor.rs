use anyhow::Result;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::search::index::SearchIndex;

/// One ranked document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    pub document_name: String,
    pub rank: u32,
}

/// Turns lowercase query tokens into a relevance-ordered document list.
///
/// Highest relevance comes first. An empty token list yields no results.
pub trait RankingEngine: Send + Sync {
    fn process_query(&self, tokens: &[String]) -> Vec<QueryResult>;
}

/// Answers queries against a fixed set of indices.
///
/// A document matches only if it contains every token. Its rank is the sum
/// of the tokens' occurrence counts.
#[derive(Debug, Default)]
pub struct QueryProcessor {
    indices: Vec<SearchIndex>,
}

impl QueryProcessor {
    pub fn new(indices: Vec<SearchIndex>) -> Self {
        Self { indices }
    }

    /// Builds one index per source directory.
    pub fn load(sources: &[PathBuf]) -> Result<Self> {
        let indices = sources
            .iter()
            .map(SearchIndex::build)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(indices))
    }

    pub fn indices(&self) -> &[SearchIndex] {
        &self.indices
    }

    fn matches_in(index: &SearchIndex, tokens: &[String]) -> HashMap<String, u32> {
        let Some((first, rest)) = tokens.split_first() else {
            return HashMap::new();
        };

        let mut matches = match index.lookup(first) {
            Some(docs) => docs.clone(),
            None => return HashMap::new(),
        };

        for token in rest {
            let Some(docs) = index.lookup(token) else {
                return HashMap::new();
            };
            matches.retain(|name, rank| match docs.get(name) {
                Some(count) => {
                    *rank += count;
                    true
                }
                None => false,
            });
            if matches.is_empty() {
                break;
            }
        }

        matches
    }
}

impl RankingEngine for QueryProcessor {
    fn process_query(&self, tokens: &[String]) -> Vec<QueryResult> {
        if tokens.is_empty() {
            return Vec::new();
        }

        let mut merged: HashMap<String, u32> = HashMap::new();
        for index in &self.indices {
            for (name, rank) in Self::matches_in(index, tokens) {
                *merged.entry(name).or_insert(0) += rank;
            }
        }

        let mut results: Vec<QueryResult> = merged
            .into_iter()
            .map(|(document_name, rank)| QueryResult { document_name, rank })
            .collect();

        results.sort_by(|a, b| {
            b.rank
                .cmp(&a.rank)
                .then_with(|| a.document_name.cmp(&b.document_name))
        });

        results
    }
}
