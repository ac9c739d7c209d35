use std::sync::Arc;

use crate::types::ScoredMatch;

pub trait EmbeddingProvider: Send + Sync {
    fn dim(&self) -> usize;

    /// Embeds every input text; the output preserves input order.
    fn embed_many(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;

    fn embed_query(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        self.embed_many(&[text.to_string()])?
            .pop()
            .ok_or_else(|| anyhow::anyhow!("embedding provider returned no vector for the query"))
    }
}

pub trait VectorIndex: Send + Sync {
    /// Returns at most `k` matches sorted ascending by distance. An empty
    /// index yields an empty vector, not an error.
    fn search(&self, query: &str, k: usize) -> anyhow::Result<Vec<ScoredMatch>>;

    /// Searches with a query vector already produced by `embedder`.
    ///
    /// Returns `None` unless `embedder` is the index's own provider, in which
    /// case the caller must fall back to `search`.
    fn search_embedded(
        &self,
        _embedder: &Arc<dyn EmbeddingProvider>,
        _query_vec: &[f32],
        _k: usize,
    ) -> anyhow::Result<Option<Vec<ScoredMatch>>> {
        Ok(None)
    }
}

impl<T: EmbeddingProvider + ?Sized> EmbeddingProvider for Box<T> {
    fn dim(&self) -> usize { (**self).dim() }
    fn embed_many(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> { (**self).embed_many(texts) }
    fn embed_query(&self, text: &str) -> anyhow::Result<Vec<f32>> { (**self).embed_query(text) }
}

impl<T: EmbeddingProvider + ?Sized> EmbeddingProvider for Arc<T> {
    fn dim(&self) -> usize { (**self).dim() }
    fn embed_many(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> { (**self).embed_many(texts) }
    fn embed_query(&self, text: &str) -> anyhow::Result<Vec<f32>> { (**self).embed_query(text) }
}

impl<T: VectorIndex + ?Sized> VectorIndex for Box<T> {
    fn search(&self, query: &str, k: usize) -> anyhow::Result<Vec<ScoredMatch>> { (**self).search(query, k) }
    fn search_embedded(&self, embedder: &Arc<dyn EmbeddingProvider>, query_vec: &[f32], k: usize) -> anyhow::Result<Option<Vec<ScoredMatch>>> {
        (**self).search_embedded(embedder, query_vec, k)
    }
}

impl<T: VectorIndex + ?Sized> VectorIndex for Arc<T> {
    fn search(&self, query: &str, k: usize) -> anyhow::Result<Vec<ScoredMatch>> { (**self).search(query, k) }
    fn search_embedded(&self, embedder: &Arc<dyn EmbeddingProvider>, query_vec: &[f32], k: usize) -> anyhow::Result<Option<Vec<ScoredMatch>>> {
        (**self).search_embedded(embedder, query_vec, k)
    }
}
