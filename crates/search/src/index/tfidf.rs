//! In-memory TF-IDF similarity index
//!
//! Exact cosine ranking over smoothed TF-IDF vectors:
//! - tokens are lower-cased runs of 2+ word characters
//! - idf(t) = ln((1 + n) / (1 + df(t))) + 1
//! - document and query vectors are L2-normalized

use super::SimilarityIndex;
use kagforge_common::errors::{AppError, Result};
use kagforge_common::models::Chunk;
use regex_lite::Regex;
use std::collections::HashMap;
use tracing::debug;

const TOKEN_PATTERN: &str = r"\w{2,}";

/// Sparse vector: (term id, weight), sorted by term id
type SparseVector = Vec<(usize, f32)>;

/// Exact TF-IDF index over a fixed corpus
pub struct TfIdfIndex {
    texts: Vec<String>,
    vectors: Vec<SparseVector>,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f32>,
    min_score: Option<f32>,
    token: Regex,
}

impl TfIdfIndex {
    /// Fit the index on passage texts
    pub fn fit(texts: Vec<String>) -> Result<Self> {
        if texts.is_empty() {
            return Err(AppError::EmptyCorpus {
                message: "cannot fit a similarity index on zero passages".to_string(),
            });
        }

        let token = Regex::new(TOKEN_PATTERN).map_err(|e| AppError::Internal {
            message: format!("invalid token pattern: {}", e),
        })?;

        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut doc_freq: Vec<usize> = Vec::new();
        let mut term_counts: Vec<HashMap<usize, usize>> = Vec::with_capacity(texts.len());

        for text in &texts {
            let mut counts: HashMap<usize, usize> = HashMap::new();
            for term in tokenize(&token, text) {
                let next_id = vocabulary.len();
                let id = *vocabulary.entry(term).or_insert(next_id);
                if id == doc_freq.len() {
                    doc_freq.push(0);
                }
                *counts.entry(id).or_insert(0) += 1;
            }
            for &id in counts.keys() {
                doc_freq[id] += 1;
            }
            term_counts.push(counts);
        }

        let n = texts.len() as f32;
        let idf: Vec<f32> = doc_freq
            .iter()
            .map(|&df| ((1.0 + n) / (1.0 + df as f32)).ln() + 1.0)
            .collect();

        let vectors = term_counts
            .into_iter()
            .map(|counts| weigh(counts, &idf))
            .collect();

        debug!(passages = texts.len(), terms = vocabulary.len(), "Fitted TF-IDF index");

        Ok(Self {
            texts,
            vectors,
            vocabulary,
            idf,
            min_score: None,
            token,
        })
    }

    /// Fit the index on chunks
    pub fn from_chunks(chunks: &[Chunk]) -> Result<Self> {
        Self::fit(chunks.iter().map(|c| c.text.clone()).collect())
    }

    /// Drop hits scoring below `min_score`
    pub fn with_min_score(mut self, min_score: Option<f32>) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// Scored ranking of passage positions, best first, ties by corpus order
    pub fn rank(&self, query: &str, k: usize) -> Vec<(usize, f32)> {
        let mut counts: HashMap<usize, usize> = HashMap::new();
        for term in tokenize(&self.token, query) {
            if let Some(&id) = self.vocabulary.get(&term) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
        let query_vector: HashMap<usize, f32> = weigh(counts, &self.idf).into_iter().collect();

        let mut scored: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(pos, vector)| {
                let score = vector
                    .iter()
                    .filter_map(|(id, w)| query_vector.get(id).map(|q| q * w))
                    .sum::<f32>();
                (pos, score)
            })
            .filter(|(_, score)| self.min_score.map_or(true, |min| *score >= min))
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        scored.truncate(k);
        scored
    }
}

#[async_trait::async_trait]
impl SimilarityIndex for TfIdfIndex {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<String>> {
        Ok(self
            .rank(query, k)
            .into_iter()
            .map(|(pos, _)| self.texts[pos].clone())
            .collect())
    }

    fn name(&self) -> &str {
        "tfidf"
    }
}

fn tokenize(token: &Regex, text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    token
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Raw term counts to an L2-normalized TF-IDF vector
fn weigh(counts: HashMap<usize, usize>, idf: &[f32]) -> SparseVector {
    let mut vector: SparseVector = counts
        .into_iter()
        .map(|(id, count)| (id, count as f32 * idf[id]))
        .collect();
    vector.sort_by_key(|(id, _)| *id);

    let norm = vector.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
    if norm > 0.0 {
        for (_, w) in vector.iter_mut() {
            *w /= norm;
        }
    }
    vector
}
