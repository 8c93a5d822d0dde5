//! TF-IDF similarity index over indexed question text.
//!
//! The corpus lives behind one `RwLock`: `index` takes the write lock and
//! rebuilds document frequencies and all vectors (corpora here are a few
//! thousand questions at most), queries take the read lock. Readers may
//! miss a question indexed concurrently; they never observe a partial
//! rebuild.

use std::collections::HashMap;

use parking_lot::RwLock;
use prepa_algo::tfidf::{self, SparseVector};
use tracing::debug;

use crate::config::SimilarityParams;
use crate::models::Question;

#[derive(Default)]
struct IndexInner {
    /// Raw term counts per question id, kept so IDF can be rebuilt.
    counts: HashMap<String, SparseVector>,
    /// L2-normalized TF-IDF vectors, consistent with `df`.
    vectors: HashMap<String, SparseVector>,
    df: HashMap<String, usize>,
}

impl IndexInner {
    fn rebuild(&mut self) {
        self.df = tfidf::document_frequencies(self.counts.values());
        let doc_count = self.counts.len();
        self.vectors = self
            .counts
            .iter()
            .map(|(id, counts)| (id.clone(), tfidf::tfidf_vector(counts, &self.df, doc_count)))
            .collect();
    }

    fn candidate_vector(&self, text: &str) -> SparseVector {
        let counts = tfidf::term_counts(&tfidf::tokenize(text));
        tfidf::tfidf_vector(&counts, &self.df, self.counts.len().max(1))
    }
}

pub struct SimilarityIndex {
    params: SimilarityParams,
    inner: RwLock<IndexInner>,
}

impl SimilarityIndex {
    pub fn new(params: SimilarityParams) -> Self {
        Self {
            params,
            inner: RwLock::new(IndexInner::default()),
        }
    }

    /// Add a question's text to the corpus and refresh IDF weights.
    pub fn index(&self, question: &Question) {
        let counts = tfidf::term_counts(&tfidf::tokenize(&question.text));
        let mut inner = self.inner.write();
        inner.counts.insert(question.id.clone(), counts);
        inner.rebuild();
        debug!(question_id = %question.id, corpus = inner.counts.len(), "question indexed");
    }

    /// Bulk variant of `index`: one rebuild for the whole batch.
    pub fn index_all<'a>(&self, questions: impl Iterator<Item = &'a Question>) -> usize {
        let mut inner = self.inner.write();
        let mut added = 0usize;
        for question in questions {
            let counts = tfidf::term_counts(&tfidf::tokenize(&question.text));
            inner.counts.insert(question.id.clone(), counts);
            added += 1;
        }
        inner.rebuild();
        added
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.inner.read().vectors.contains_key(question_id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cosine similarity of two indexed questions; 0 if either is missing
    /// or has no vocabulary.
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        let inner = self.inner.read();
        match (inner.vectors.get(a), inner.vectors.get(b)) {
            (Some(va), Some(vb)) => tfidf::cosine(va, vb),
            _ => 0.0,
        }
    }

    /// Top-k indexed questions most similar to `text`, descending, ties
    /// broken by question id.
    pub fn most_similar(&self, text: &str, k: usize) -> Vec<(String, f64)> {
        let inner = self.inner.read();
        let candidate = inner.candidate_vector(text);

        let mut scored: Vec<(String, f64)> = inner
            .vectors
            .iter()
            .map(|(id, vector)| (id.clone(), tfidf::cosine(&candidate, vector)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        scored.truncate(k);
        scored
    }

    /// Whether `text` is a near-duplicate of any indexed question.
    pub fn is_duplicate(&self, text: &str) -> bool {
        self.most_similar(text, 1)
            .first()
            .is_some_and(|(_, score)| *score > self.params.duplicate_threshold)
    }

    pub fn duplicate_threshold(&self) -> f64 {
        self.params.duplicate_threshold
    }
}
