use anyhow::{Result, ensure};
use std::sync::Arc;

use docqa_core::traits::{EmbeddingProvider, VectorIndex};
use docqa_core::types::{Chunk, ScoredMatch};

/// Brute-force index over a handful of chunks, scored by squared L2
/// distance like a flat FAISS index.
pub struct InMemoryIndex {
    entries: Vec<(Chunk, Vec<f32>)>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl InMemoryIndex {
    pub fn from_chunks(chunks: Vec<Chunk>, embedder: Arc<dyn EmbeddingProvider>) -> Result<Self> {
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let vectors = embedder.embed_many(&texts)?;
        ensure!(vectors.len() == chunks.len(), "embedder returned {} vectors for {} chunks", vectors.len(), chunks.len());
        for v in &vectors { ensure!(v.len() == embedder.dim(), "vector has {} dims, expected {}", v.len(), embedder.dim()); }
        Ok(Self { entries: chunks.into_iter().zip(vectors).collect(), embedder })
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn search_vec(&self, query_vec: &[f32], k: usize) -> Result<Vec<ScoredMatch>> {
        ensure!(query_vec.len() == self.embedder.dim(), "query has {} dims, expected {}", query_vec.len(), self.embedder.dim());
        let mut scored: Vec<ScoredMatch> = self
            .entries
            .iter()
            .map(|(chunk, v)| ScoredMatch::new(chunk.clone(), squared_l2(query_vec, v)))
            .collect();
        // stable: equal distances keep insertion order
        scored.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        scored.truncate(k);
        Ok(scored)
    }
}

impl VectorIndex for InMemoryIndex {
    fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredMatch>> {
        if self.entries.is_empty() || k == 0 { return Ok(Vec::new()); }
        let query_vec = self.embedder.embed_query(query)?;
        self.search_vec(&query_vec, k)
    }

    fn search_embedded(&self, embedder: &Arc<dyn EmbeddingProvider>, query_vec: &[f32], k: usize) -> Result<Option<Vec<ScoredMatch>>> {
        if !Arc::ptr_eq(&self.embedder, embedder) { return Ok(None); }
        if self.entries.is_empty() || k == 0 { return Ok(Some(Vec::new())); }
        self.search_vec(query_vec, k).map(Some)
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
