use std::sync::Arc;

use docqa_core::config::Settings;
use docqa_core::error::{Error, Result};
use docqa_core::traits::{EmbeddingProvider, VectorIndex};
use docqa_core::types::{EvidenceSnippet, RetrievalResult, ScoredMatch};

use crate::confidence;
use crate::context::format_context;
use crate::evidence::EvidenceSelector;
use crate::filter::SourceFilter;

/// Question answering retrieval over a read-only vector index.
///
/// Holds no mutable state; concurrent `retrieve` calls are as safe as the
/// index and embedding provider it wraps.
pub struct Retriever<I: VectorIndex> {
    index: I,
    k: usize,
    selector: EvidenceSelector,
    filter: SourceFilter,
}

impl<I: VectorIndex> Retriever<I> {
    pub fn new(index: I, k: usize) -> Self {
        Self { index, k, selector: EvidenceSelector::default(), filter: SourceFilter::default() }
    }

    pub fn with_selector(mut self, selector: EvidenceSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_filter(mut self, filter: SourceFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn from_settings(index: I, settings: &Settings, embedder: Option<Arc<dyn EmbeddingProvider>>) -> Result<Self> {
        settings.validate()?;
        let selector = EvidenceSelector::from_kind(
            settings.retrieval.evidence,
            settings.retrieval.max_evidence_lines,
            embedder,
        )?;
        Ok(Self::new(index, settings.retrieval.k)
            .with_selector(selector)
            .with_filter(SourceFilter::from_settings(&settings.filter)))
    }

    pub fn k(&self) -> usize { self.k }

    pub fn selector(&self) -> &EvidenceSelector { &self.selector }

    pub fn filter(&self) -> &SourceFilter { &self.filter }

    /// Runs search, confidence scoring, evidence selection and filtering for
    /// one question. Fails as a whole on any collaborator error.
    pub fn retrieve(&self, question: &str) -> Result<RetrievalResult> {
        let question_embedding = self.selector.embed_question(question)?;
        let matches = self.search(question, question_embedding.as_deref())?;
        tracing::debug!(k = self.k, hits = matches.len(), "vector search done");
        if matches.is_empty() {
            return Ok(RetrievalResult::not_found());
        }
        validate_distances(&matches)?;

        let context = format_context(matches.iter().map(|m| &m.chunk), false);
        let confidence = confidence::estimate(&matches, self.k);

        let mut sources = Vec::with_capacity(matches.len());
        for m in &matches {
            let snippet = self.selector.select(&m.chunk.content, question, question_embedding.as_deref())?;
            if snippet.is_none() {
                match self.selector {
                    EvidenceSelector::SentenceEmbedding(_) => {
                        tracing::warn!(source = m.chunk.source_or_unknown(), "no evidence sentence survived filtering, using full chunk");
                    }
                    _ => tracing::debug!(source = m.chunk.source_or_unknown(), "no evidence span, using full chunk"),
                }
            }
            sources.push(EvidenceSnippet {
                source: m.chunk.source_or_unknown().to_string(),
                page: m.chunk.metadata.page,
                content: snippet.unwrap_or_else(|| m.chunk.content.clone()),
                score: Some(m.distance),
            });
        }

        let candidates = sources.len();
        let sources = self.filter.apply(sources);
        tracing::debug!(confidence, candidates, kept = sources.len(), "retrieval done");
        Ok(RetrievalResult { context, sources, confidence })
    }

    /// Reuses the question vector when the index embeds with the same
    /// provider as the evidence selector.
    fn search(&self, question: &str, question_embedding: Option<&[f32]>) -> Result<Vec<ScoredMatch>> {
        if let (EvidenceSelector::SentenceEmbedding(embedder), Some(q)) = (&self.selector, question_embedding) {
            if let Some(matches) = self.index.search_embedded(embedder, q, self.k).map_err(Error::search)? {
                return Ok(matches);
            }
        }
        self.index.search(question, self.k).map_err(Error::search)
    }
}

fn validate_distances(matches: &[ScoredMatch]) -> Result<()> {
    match matches.iter().find(|m| !m.distance.is_finite() || m.distance < 0.0) {
        Some(bad) => {
            tracing::warn!(distance = bad.distance, "vector index returned a malformed distance");
            Err(Error::InvalidDistance { distance: bad.distance })
        }
        None => Ok(()),
    }
}
