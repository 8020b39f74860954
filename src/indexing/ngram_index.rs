//! N-gram inverted index for nearest-match search
//!
//! Documents are appended to an ordered store and never removed; a document's
//! id is its position in that store. Each distinct gram of a document adds the
//! id once to that gram's posting list, so posting lists are in insertion
//! order.
//!
//! A search first looks for an exact copy of the query. Failing that, every
//! document is scored by how many of the query's distinct grams it shares and
//! the highest tally wins. Ties go to the smallest id.

use std::cmp::{Ordering, Reverse};
use std::ops::Range;

use ahash::AHashMap;
use log::{debug, trace};
use rayon::prelude::*;

use crate::algorithms::ngram::{Ngram, NgramConfig, Splitter};
use crate::algorithms::Similarity;
use crate::error::Result;
use crate::PARALLEL_THRESHOLD;

/// Result from a rescored search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchMatch {
    pub id: usize,
    pub text: String,
    /// Number of distinct query grams the document contains
    pub shared_grams: usize,
    pub similarity: f64,
}

/// Inverted index from gram to the ids of the documents containing it
#[derive(Debug, Clone)]
pub struct NgramIndex<S = Ngram> {
    splitter: S,
    postings: AHashMap<String, Vec<usize>>,
    documents: Vec<String>,
    /// First id of every distinct document text
    exact_lookup: AHashMap<String, usize>,
}

impl NgramIndex<Ngram> {
    /// Create an index over grams of `gram_size` code points.
    ///
    /// Fails if `gram_size` is zero.
    pub fn new(gram_size: usize, padded: bool) -> Result<Self> {
        let splitter = Ngram::from_config(NgramConfig::new(gram_size, padded)?)?;
        Ok(Self::with_splitter(splitter))
    }

    /// Gram size this index was built with
    #[must_use]
    pub fn gram_size(&self) -> usize {
        self.splitter.n()
    }
}

impl Default for NgramIndex<Ngram> {
    fn default() -> Self {
        Self::with_splitter(Ngram::default())
    }
}

impl<S: Splitter> NgramIndex<S> {
    /// Create an index that shingles documents with `splitter`
    pub fn with_splitter(splitter: S) -> Self {
        Self {
            splitter,
            postings: AHashMap::new(),
            documents: Vec::new(),
            exact_lookup: AHashMap::new(),
        }
    }

    #[must_use]
    pub fn splitter(&self) -> &S {
        &self.splitter
    }

    /// Append a document and return its id
    pub fn add(&mut self, text: impl Into<String>) -> usize {
        let text = text.into();
        let id = self.documents.len();

        for gram in self.splitter.split(&text) {
            self.postings.entry(gram).or_default().push(id);
        }
        // Keep the earliest id for repeated texts
        self.exact_lookup.entry(text.clone()).or_insert(id);
        self.documents.push(text);
        id
    }

    /// Append documents in order and return the range of ids they received
    pub fn add_all<I, T>(&mut self, iter: I) -> Range<usize>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let start = self.documents.len();
        for text in iter {
            self.add(text);
        }
        debug!(
            "indexed {} documents ({} total, {} distinct grams)",
            self.documents.len() - start,
            self.documents.len(),
            self.postings.len()
        );
        start..self.documents.len()
    }

    /// Document text by id, `None` when out of range
    #[must_use]
    pub fn get(&self, id: usize) -> Option<&str> {
        self.documents.get(id).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Whether some document is exactly `query`
    #[must_use]
    pub fn contains(&self, query: &str) -> bool {
        self.exact_lookup.contains_key(query)
    }

    /// Ids of the documents that contain `gram`, in insertion order
    #[must_use]
    pub fn postings(&self, gram: &str) -> &[usize] {
        self.postings.get(gram).map(Vec::as_slice).unwrap_or_default()
    }

    /// Per-document count of shared distinct grams
    fn tally(&self, query: &str) -> AHashMap<usize, usize> {
        let mut counts: AHashMap<usize, usize> = AHashMap::new();
        for gram in self.splitter.split(query) {
            for &id in self.postings(&gram) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Id of the document closest to `query`.
    ///
    /// Returns the first exact copy if there is one, otherwise the document
    /// sharing the most grams with the query (smallest id on a tie). `None`
    /// means no gram of the query occurs in the index.
    ///
    /// # Example
    /// ```
    /// use fuzzband::indexing::NgramIndex;
    ///
    /// let mut index = NgramIndex::new(3, true).unwrap();
    /// index.add_all(["apple", "banana", "cherry"]);
    ///
    /// assert_eq!(index.search("banana"), Some(1));
    /// assert_eq!(index.search("bananb"), Some(1));
    /// assert_eq!(index.search("zzz"), None);
    /// ```
    #[must_use]
    pub fn search(&self, query: &str) -> Option<usize> {
        if let Some(&id) = self.exact_lookup.get(query) {
            return Some(id);
        }

        let best = self
            .tally(query)
            .into_iter()
            .max_by_key(|&(id, hits)| (hits, Reverse(id)))
            .map(|(id, _)| id);
        trace!("search {:?} -> {:?}", query, best);
        best
    }

    /// Ids of every document sharing at least one gram with `query`, ascending
    #[must_use]
    pub fn candidates(&self, query: &str) -> Vec<usize> {
        let mut ids: Vec<usize> = self.tally(query).into_keys().collect();
        ids.sort_unstable();
        ids
    }

    /// Rescore the gram candidates of `query` with `similarity`.
    ///
    /// Keeps matches scoring at least `min_similarity`, best first, ties by
    /// ascending id, truncated to `limit` when given.
    pub fn search_with<M: Similarity + ?Sized>(
        &self,
        query: &str,
        similarity: &M,
        min_similarity: f64,
        limit: Option<usize>,
    ) -> Vec<SearchMatch> {
        let tally: Vec<(usize, usize)> = self.tally(query).into_iter().collect();
        let score = |(id, shared_grams): (usize, usize)| {
            let text = &self.documents[id];
            let sim = similarity.similarity(query, text);
            (sim >= min_similarity).then(|| SearchMatch {
                id,
                text: text.clone(),
                shared_grams,
                similarity: sim,
            })
        };

        let mut matches: Vec<SearchMatch> = if tally.len() >= PARALLEL_THRESHOLD {
            tally.into_par_iter().filter_map(score).collect()
        } else {
            tally.into_iter().filter_map(score).collect()
        };

        matches.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(Ordering::Equal)
                .then(a.id.cmp(&b.id))
        });
        if let Some(limit) = limit {
            matches.truncate(limit);
        }
        matches
    }

    /// [`search`](Self::search) for many queries, in parallel for large batches
    pub fn batch_search<Q: AsRef<str> + Sync>(&self, queries: &[Q]) -> Vec<Option<usize>> {
        if queries.len() >= PARALLEL_THRESHOLD {
            queries.par_iter().map(|q| self.search(q.as_ref())).collect()
        } else {
            queries.iter().map(|q| self.search(q.as_ref())).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::JaroWinkler;
    use crate::error::ConfigError;

    fn fruit_index() -> NgramIndex {
        let mut index = NgramIndex::new(3, true).unwrap();
        index.add_all(["apple", "banana", "cherry", "grape"]);
        index
    }

    #[test]
    fn test_zero_gram_size_rejected() {
        assert_eq!(NgramIndex::new(0, true).unwrap_err(), ConfigError::InvalidGramSize(0));
    }

    #[test]
    fn test_add_and_get() {
        let mut index = NgramIndex::new(2, false).unwrap();
        assert!(index.is_empty());
        assert_eq!(index.add_all(["a", "b", "c"]), 0..3);
        assert_eq!(index.add("d"), 3);
        assert_eq!(index.len(), 4);
        assert_eq!(index.get(2), Some("c"));
        assert_eq!(index.get(4), None);
    }

    #[test]
    fn test_exact_match_fast_path() {
        let mut index = NgramIndex::new(3, true).unwrap();
        index.add_all(["a", "b", "c"]);
        assert_eq!(index.search("a"), Some(0));
        assert_eq!(index.search("c"), Some(2));
        assert!(index.contains("b"));
        assert!(!index.contains("d"));
    }

    #[test]
    fn test_exact_match_prefers_first_copy() {
        let mut index = NgramIndex::new(2, true).unwrap();
        index.add_all(["dup", "other", "dup"]);
        assert_eq!(index.search("dup"), Some(0));
    }

    #[test]
    fn test_nearest_by_gram_overlap() {
        let index = fruit_index();
        assert_eq!(index.search("banan"), Some(1));
        assert_eq!(index.search("chery"), Some(2));
        assert_eq!(index.search("grap"), Some(3));
        assert_eq!(index.search("xyz"), None);
    }

    #[test]
    fn test_tie_goes_to_smallest_id() {
        // "ab" shares "b " with doc 0 and " a" with doc 2
        let mut index = NgramIndex::new(2, true).unwrap();
        index.add_all(["zzb", "xay", "a"]);
        assert_eq!(index.search("ab"), Some(0));

        let mut index = NgramIndex::new(3, false).unwrap();
        index.add_all(["xxabc", "abcyy", "zabcz"]);
        assert_eq!(index.search("abc!"), Some(0));
    }

    #[test]
    fn test_posting_lists_deduplicate_per_document() {
        let mut index = NgramIndex::new(2, false).unwrap();
        index.add_all(["aaaa", "baa"]);
        assert_eq!(index.postings("aa"), &[0, 1]);
        assert!(index.postings("zz").is_empty());
    }

    #[test]
    fn test_candidates_sorted() {
        let index = fruit_index();
        assert_eq!(index.candidates("grape apple"), vec![0, 3]);
    }

    #[test]
    fn test_search_with_rescoring() {
        let mut index = NgramIndex::new(2, true).unwrap();
        index.add_all(["hello", "hallo", "hullo", "world", "help"]);

        let jw = JaroWinkler::new();
        let results = index.search_with("hello", &jw, 0.8, Some(3));
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].id, 0);
        assert_eq!(results[0].similarity, 1.0);
        assert!(results.windows(2).all(|w| w[0].similarity >= w[1].similarity));
        assert!(results.iter().all(|m| m.id != 3));
    }

    #[test]
    fn test_batch_search() {
        let index = fruit_index();
        let queries: Vec<String> = (0..150).map(|i| if i % 2 == 0 { "aple" } else { "zzz" }.to_string()).collect();
        let results = index.batch_search(&queries);
        assert_eq!(results.len(), 150);
        assert_eq!(results[0], Some(0));
        assert_eq!(results[1], None);
        assert_eq!(index.batch_search(&["cherry"]), vec![Some(2)]);
    }
}
