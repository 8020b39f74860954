//! Thread-safe wrapper for the n-gram index.
//!
//! [`NgramIndex`] itself is read-only once built, so plain `&NgramIndex`
//! references can already be shared across threads for searching. This
//! wrapper is for the case where documents keep arriving while other threads
//! search: it uses `parking_lot::RwLock` so that
//!
//! - searches acquire a shared read lock and run concurrently,
//! - `add` acquires an exclusive write lock and waits for readers to drain.
//!
//! ```
//! use fuzzband::indexing::SharedNgramIndex;
//!
//! let index = SharedNgramIndex::new(3, true).unwrap();
//! let writer = index.clone();
//! std::thread::spawn(move || {
//!     writer.add("hello");
//! })
//! .join()
//! .unwrap();
//! assert_eq!(index.search("helo"), Some(0));
//! ```

use std::ops::Range;
use std::sync::Arc;

use parking_lot::RwLock;

use super::ngram_index::{NgramIndex, SearchMatch};
use crate::algorithms::ngram::{Ngram, Splitter};
use crate::algorithms::Similarity;
use crate::error::Result;

/// Cloneable handle to an index behind a read-write lock
#[derive(Debug)]
pub struct SharedNgramIndex<S = Ngram> {
    inner: Arc<RwLock<NgramIndex<S>>>,
}

impl<S> Clone for SharedNgramIndex<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl SharedNgramIndex<Ngram> {
    /// Create an empty shared index; fails if `gram_size` is zero
    pub fn new(gram_size: usize, padded: bool) -> Result<Self> {
        Ok(Self::from_index(NgramIndex::new(gram_size, padded)?))
    }
}

impl<S: Splitter> SharedNgramIndex<S> {
    /// Publish an already-built index
    pub fn from_index(index: NgramIndex<S>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(index)),
        }
    }

    /// Append one document. Acquires an exclusive write lock.
    pub fn add(&self, text: impl Into<String>) -> usize {
        self.inner.write().add(text)
    }

    /// Append documents under a single write lock
    pub fn add_all<I, T>(&self, iter: I) -> Range<usize>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.inner.write().add_all(iter)
    }

    /// Owned copy of a document, since the lock is released on return
    #[must_use]
    pub fn get(&self, id: usize) -> Option<String> {
        self.inner.read().get(id).map(str::to_owned)
    }

    #[must_use]
    pub fn search(&self, query: &str) -> Option<usize> {
        self.inner.read().search(query)
    }

    pub fn search_with<M: Similarity + ?Sized>(
        &self,
        query: &str,
        similarity: &M,
        min_similarity: f64,
        limit: Option<usize>,
    ) -> Vec<SearchMatch> {
        self.inner.read().search_with(query, similarity, min_similarity, limit)
    }

    pub fn batch_search<Q: AsRef<str> + Sync>(&self, queries: &[Q]) -> Vec<Option<usize>> {
        self.inner.read().batch_search(queries)
    }

    #[must_use]
    pub fn contains(&self, query: &str) -> bool {
        self.inner.read().contains(query)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Run `f` with shared access to the underlying index
    pub fn with_read<R>(&self, f: impl FnOnce(&NgramIndex<S>) -> R) -> R {
        f(&self.inner.read())
    }
}
