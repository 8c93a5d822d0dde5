//! Sparse TF-IDF vectors and cosine similarity for question text.
//!
//! Tokenization lowercases, splits on non-alphanumeric characters, drops
//! single-character tokens and a fixed stop-word list. IDF uses the
//! smoothed form `ln((1 + n) / (1 + df)) + 1` so terms present in every
//! document still carry a small positive weight, and vectors are
//! L2-normalized so cosine similarity reduces to a sparse dot product.

use std::collections::HashMap;

/// Function words that carry no signal for near-duplicate detection.
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has",
    "if", "in", "into", "is", "it", "its", "of", "on", "or", "that", "the",
    "then", "this", "to", "was", "what", "when", "which", "will", "with",
];

/// Sparse term-weight vector keyed by token.
pub type SparseVector = HashMap<String, f64>;

pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= 2)
        .filter(|token| !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}

/// Raw term frequencies for one document.
pub fn term_counts(tokens: &[String]) -> SparseVector {
    let mut counts = SparseVector::with_capacity(tokens.len());
    for token in tokens {
        *counts.entry(token.clone()).or_insert(0.0) += 1.0;
    }
    counts
}

/// Number of documents containing each term.
pub fn document_frequencies<'a>(
    docs: impl Iterator<Item = &'a SparseVector>,
) -> HashMap<String, usize> {
    let mut df: HashMap<String, usize> = HashMap::new();
    for doc in docs {
        for term in doc.keys() {
            *df.entry(term.clone()).or_insert(0) += 1;
        }
    }
    df
}

/// Smoothed inverse document frequency.
pub fn idf(doc_count: usize, term_df: usize) -> f64 {
    (((1 + doc_count) as f64) / ((1 + term_df) as f64)).ln() + 1.0
}

/// L2-normalized TF-IDF vector for one document against a corpus.
///
/// Terms absent from `df` (possible when the vector is built for a
/// candidate not yet in the corpus) take df = 0.
pub fn tfidf_vector(
    counts: &SparseVector,
    df: &HashMap<String, usize>,
    doc_count: usize,
) -> SparseVector {
    let mut vector: SparseVector = counts
        .iter()
        .map(|(term, tf)| {
            let term_df = df.get(term).copied().unwrap_or(0);
            (term.clone(), tf * idf(doc_count, term_df))
        })
        .collect();

    let norm = vector.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for weight in vector.values_mut() {
            *weight /= norm;
        }
    }
    vector
}

/// Cosine similarity of two L2-normalized sparse vectors, in [0, 1].
///
/// Returns 0 when either vector is empty.
pub fn cosine(a: &SparseVector, b: &SparseVector) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(term, wa)| large.get(term).map(|wb| wa * wb))
        .sum();
    dot.clamp(0.0, 1.0)
}
