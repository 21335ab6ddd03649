//! TF-IDF index with cosine-similarity ranking.
//!
//! The vocabulary and idf weights are fitted once, when the index is built
//! from a chunk sequence. Queries are encoded into that fixed vocabulary:
//! terms never seen during fitting contribute nothing, and querying never
//! changes the weights.
//!
//! Weighting follows the usual smoothed scheme:
//!
//! - `tf(t, d)` is the raw count of `t` in chunk `d`
//! - `idf(t) = ln((1 + n) / (1 + df(t))) + 1`
//! - each row is L2-normalised, so cosine similarity is a dot product

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::types::{AppError, Result};

// ============================================================================
// Sparse Vectors
// ============================================================================

/// A sparse vector with strictly increasing column indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    indices: Vec<usize>,
    values: Vec<f64>,
}

impl SparseVector {
    fn from_weights(weights: BTreeMap<usize, f64>) -> Self {
        let (indices, values) = weights.into_iter().unzip();
        Self { indices, values }
    }

    /// Number of non-zero entries
    pub fn nnz(&self) -> usize {
        self.indices.len()
    }

    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }

    /// Weight at `column`, zero if absent
    pub fn get(&self, column: usize) -> f64 {
        match self.indices.binary_search(&column) {
            Ok(pos) => self.values[pos],
            Err(_) => 0.0,
        }
    }

    pub fn norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }

    fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for value in &mut self.values {
                *value /= norm;
            }
        }
    }

    fn max_column(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    /// Dot product by merging the two sorted index lists.
    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }
}

// ============================================================================
// TF-IDF Index
// ============================================================================

/// TF-IDF matrix over one chunk sequence: one row per chunk, one column per
/// vocabulary term.
#[derive(Debug, Clone)]
pub struct TfidfIndex {
    /// Term -> column; columns follow lexicographic term order
    vocabulary: HashMap<String, usize>,
    /// Inverse document frequency per column
    idf: Vec<f64>,
    /// L2-normalised chunk vectors
    rows: Vec<SparseVector>,
}

impl TfidfIndex {
    /// Tokenize text into lowercase terms of two or more word characters
    pub fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|s| s.chars().nth(1).is_some())
            .map(String::from)
            .collect()
    }

    /// Fit the vocabulary over `chunks` and encode every chunk.
    ///
    /// Returns `None` for an empty chunk sequence: there is nothing to fit.
    pub fn fit<S: AsRef<str>>(chunks: &[S]) -> Option<Self> {
        if chunks.is_empty() {
            return None;
        }

        let tokenized: Vec<Vec<String>> = chunks
            .iter()
            .map(|chunk| Self::tokenize(chunk.as_ref()))
            .collect();

        // Document frequencies, sorted by term
        let mut document_frequencies: BTreeMap<&str, usize> = BTreeMap::new();
        for tokens in &tokenized {
            let unique_terms: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in unique_terms {
                *document_frequencies.entry(term).or_insert(0) += 1;
            }
        }

        let n = chunks.len() as f64;
        let mut vocabulary = HashMap::with_capacity(document_frequencies.len());
        let mut idf = Vec::with_capacity(document_frequencies.len());
        for (column, (term, df)) in document_frequencies.into_iter().enumerate() {
            vocabulary.insert(term.to_string(), column);
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
        }

        let mut index = Self {
            vocabulary,
            idf,
            rows: Vec::with_capacity(tokenized.len()),
        };
        index.rows = tokenized
            .iter()
            .map(|tokens| index.encode_tokens(tokens))
            .collect();

        Some(index)
    }

    fn encode_tokens<S: AsRef<str>>(&self, tokens: &[S]) -> SparseVector {
        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in tokens {
            if let Some(&column) = self.vocabulary.get(token.as_ref()) {
                *counts.entry(column).or_insert(0.0) += 1.0;
            }
        }
        for (column, weight) in counts.iter_mut() {
            *weight *= self.idf[*column];
        }

        let mut vector = SparseVector::from_weights(counts);
        vector.normalize();
        vector
    }

    /// Encode `text` into the fitted vocabulary space.
    pub fn transform(&self, text: &str) -> SparseVector {
        self.encode_tokens(&Self::tokenize(text))
    }

    /// Cosine similarity between the query and every chunk, in chunk order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Retrieval`] if a vector falls outside the fitted
    /// vocabulary or a similarity is not finite.
    pub fn similarities(&self, query: &str) -> Result<Vec<f64>> {
        let query_vector = self.transform(query);
        self.check_dimension(&query_vector, "query")?;

        self.rows
            .iter()
            .enumerate()
            .map(|(position, row)| {
                self.check_dimension(row, "chunk")?;
                let score = query_vector.dot(row);
                if score.is_finite() {
                    Ok(score)
                } else {
                    Err(AppError::Retrieval(format!(
                        "Non-finite similarity {} for chunk {}",
                        score, position
                    )))
                }
            })
            .collect()
    }

    fn check_dimension(&self, vector: &SparseVector, what: &str) -> Result<()> {
        match vector.max_column() {
            Some(column) if column >= self.idf.len() => Err(AppError::Retrieval(format!(
                "{} vector column {} outside vocabulary of {} terms",
                what,
                column,
                self.idf.len()
            ))),
            _ => Ok(()),
        }
    }

    /// Rank chunks against `query` and return the top `k` as
    /// `(position, score)` pairs.
    ///
    /// Ordered by descending score; equal scores keep chunk order.
    pub fn rank(&self, query: &str, k: usize) -> Result<Vec<(usize, f64)>> {
        if k == 0 {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(usize, f64)> =
            self.similarities(query)?.into_iter().enumerate().collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);

        Ok(scored)
    }

    /// Number of rows (chunks)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns (distinct terms)
    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    /// Fitted idf for `term`, if it is in the vocabulary
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.vocabulary
            .get(&term.to_lowercase())
            .map(|&column| self.idf[column])
    }

    pub fn row(&self, position: usize) -> Option<&SparseVector> {
        self.rows.get(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "{} != {}", a, b);
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(
            TfidfIndex::tokenize("The cat's dog_house, a B-52!"),
            vec!["the", "cat", "dog_house", "52"]
        );
        assert!(TfidfIndex::tokenize("a b c . !").is_empty());
    }

    #[test]
    fn test_fit_empty_is_absent() {
        let chunks: Vec<String> = Vec::new();
        assert!(TfidfIndex::fit(&chunks).is_none());
    }

    #[test]
    fn test_vocabulary_and_idf() {
        let index = TfidfIndex::fit(&["apple banana", "apple cherry"]).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.vocabulary_size(), 3);

        // apple in both chunks: ln(3/3) + 1
        assert_close(index.idf("apple").unwrap(), 1.0);
        // banana in one chunk: ln(3/2) + 1
        assert_close(index.idf("Banana").unwrap(), (1.5f64).ln() + 1.0);
        assert!(index.idf("durian").is_none());
    }

    #[test]
    fn test_rows_are_unit_length() {
        let index = TfidfIndex::fit(&["apple apple banana", "cherry", "!!"]).unwrap();
        assert_close(index.row(0).unwrap().norm(), 1.0);
        assert_close(index.row(1).unwrap().norm(), 1.0);
        // No tokens at all: zero row
        assert!(index.row(2).unwrap().is_zero());
    }

    #[test]
    fn test_term_frequency_raises_score() {
        let index =
            TfidfIndex::fit(&["apple apple apple", "apple banana", "banana banana banana"])
                .unwrap();
        let ranked = index.rank("apple", 3).unwrap();
        assert_eq!(ranked[0].0, 0);
        assert_eq!(ranked[1].0, 1);
        assert_close(ranked[2].1, 0.0);
    }

    #[test]
    fn test_unseen_query_terms_score_zero() {
        let index = TfidfIndex::fit(&["apple banana", "cherry"]).unwrap();
        let query = index.transform("zebra quokka");
        assert_eq!(query.nnz(), 0);

        let similarities = index.similarities("zebra").unwrap();
        assert_eq!(similarities, vec![0.0, 0.0]);
    }

    #[test]
    fn test_query_does_not_refit() {
        let index = TfidfIndex::fit(&["apple banana", "cherry"]).unwrap();
        let before = index.vocabulary_size();
        let _ = index.rank("entirely new words here", 2).unwrap();
        assert_eq!(index.vocabulary_size(), before);
        assert!(index.idf("entirely").is_none());
    }

    #[test]
    fn test_ties_keep_chunk_order() {
        let index = TfidfIndex::fit(&["same words", "other", "same words"]).unwrap();
        let ranked = index.rank("same", 3).unwrap();
        assert_eq!(ranked[0].0, 0);
        assert_eq!(ranked[1].0, 2);
        assert_eq!(ranked[2].0, 1);
        assert_eq!(ranked[0].1, ranked[1].1);
    }

    #[test]
    fn test_rank_k_bounds() {
        let index = TfidfIndex::fit(&["one two", "three four"]).unwrap();
        assert!(index.rank("one", 0).unwrap().is_empty());
        assert_eq!(index.rank("one", 10).unwrap().len(), 2);
    }

    #[test]
    fn test_identical_text_similarity_is_one() {
        let index = TfidfIndex::fit(&["red fox jumps", "blue whale swims"]).unwrap();
        let similarities = index.similarities("red fox jumps").unwrap();
        assert_close(similarities[0], 1.0);
        assert_close(similarities[1], 0.0);
    }

    #[test]
    fn test_sparse_dot() {
        let a = SparseVector::from_weights(BTreeMap::from([(0, 1.0), (3, 2.0), (7, 1.0)]));
        let b = SparseVector::from_weights(BTreeMap::from([(3, 4.0), (7, 0.5), (9, 1.0)]));
        assert_close(a.dot(&b), 8.5);
        assert_close(a.get(3), 2.0);
        assert_close(a.get(4), 0.0);
    }
}
