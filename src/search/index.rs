use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Inverted index for one source directory.
///
/// Maps each lowercase word to the documents containing it and the number of
/// times it occurs there.
#[derive(Debug, Default)]
pub struct SearchIndex {
    source: PathBuf,
    postings: HashMap<String, HashMap<String, u32>>,
    documents: usize,
}

/// Splits text into lowercase words. Anything that isn't alphabetic separates words.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphabetic())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}

impl SearchIndex {
    /// Crawls `source` recursively and indexes every regular file in it.
    ///
    /// Documents are named by their crawled path, i.e. `source` joined with
    /// the path relative to it. Files that are not UTF-8 are indexed lossily.
    pub fn build(source: impl AsRef<Path>) -> Result<Self> {
        let source = source.as_ref();
        if !source.is_dir() {
            anyhow::bail!("index source {} is not a directory", source.display());
        }

        let pattern = format!(
            "{}/**/*",
            glob::Pattern::escape(&source.to_string_lossy())
        );

        let mut index = SearchIndex {
            source: source.to_path_buf(),
            ..Default::default()
        };

        let mut paths: Vec<PathBuf> = glob::glob(&pattern)
            .with_context(|| format!("invalid index source {}", source.display()))?
            .filter_map(|entry| match entry {
                Ok(path) => Some(path),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable index entry");
                    None
                }
            })
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        for path in paths {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let text = String::from_utf8_lossy(&bytes);
            index.add_document(&path.to_string_lossy(), &text);
        }

        tracing::info!(
            source = %source.display(),
            documents = index.documents,
            words = index.postings.len(),
            "index built"
        );

        Ok(index)
    }

    /// Builds an index from in-memory `(name, text)` pairs.
    pub fn from_documents<'a, I>(source: impl Into<PathBuf>, documents: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut index = SearchIndex {
            source: source.into(),
            ..Default::default()
        };
        for (name, text) in documents {
            index.add_document(name, text);
        }
        index
    }

    fn add_document(&mut self, name: &str, text: &str) {
        self.documents += 1;
        for word in tokenize(text) {
            *self
                .postings
                .entry(word)
                .or_default()
                .entry(name.to_string())
                .or_insert(0) += 1;
        }
    }

    /// Documents containing `word` and how often it occurs in each.
    pub fn lookup(&self, word: &str) -> Option<&HashMap<String, u32>> {
        self.postings.get(word)
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn num_documents(&self) -> usize {
        self.documents
    }

    pub fn num_words(&self) -> usize {
        self.postings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenize_splits_and_lowercases() {
        let words: Vec<String> = tokenize("Hello, World! it's 42x").collect();
        assert_eq!(words, vec!["hello", "world", "it", "s", "x"]);
    }

    #[test]
    fn counts_occurrences_per_document() {
        let index = SearchIndex::from_documents(
            "mem",
            [("a.txt", "bike bike ride"), ("b.txt", "Bike")],
        );

        let bike = index.lookup("bike").unwrap();
        assert_eq!(bike.get("a.txt"), Some(&2));
        assert_eq!(bike.get("b.txt"), Some(&1));
        assert!(index.lookup("car").is_none());
        assert_eq!(index.num_documents(), 2);
    }
}
