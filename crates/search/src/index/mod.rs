//! Similarity search over text passages
//!
//! The index is an external collaborator behind `SimilarityIndex`; the
//! in-memory TF-IDF index and the chunk-file loader make the engine usable
//! without one.

mod corpus;
mod tfidf;

pub use corpus::load_chunks_dir;
pub use tfidf::TfIdfIndex;

use kagforge_common::errors::Result;

/// Ranked passage search
#[async_trait::async_trait]
pub trait SimilarityIndex: Send + Sync {
    /// Up to `k` passage texts matching the query, best first
    async fn search(&self, query: &str, k: usize) -> Result<Vec<String>>;

    /// Name used in logs
    fn name(&self) -> &str;
}
