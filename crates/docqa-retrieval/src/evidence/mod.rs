//! Narrowing a retrieved chunk down to the text that supports it.

use std::fmt;
use std::sync::Arc;

use docqa_core::config::EvidenceKind;
use docqa_core::error::{Error, Result};
use docqa_core::traits::EmbeddingProvider;

pub mod overlap;
pub mod sentence;

pub use overlap::{extract_relevant_snippet, DEFAULT_MAX_LINES};
pub use sentence::select_best_sentence;

/// Evidence strategy, chosen per deployment.
#[derive(Clone)]
pub enum EvidenceSelector {
    /// Keep the whole chunk.
    Chunk,
    /// Best single sentence by cosine similarity to the question embedding.
    SentenceEmbedding(Arc<dyn EmbeddingProvider>),
    /// Lines sharing tokens with the question, at most `max_lines`.
    TokenOverlap { max_lines: usize },
}

impl fmt::Debug for EvidenceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chunk => f.write_str("Chunk"),
            Self::SentenceEmbedding(e) => f.debug_tuple("SentenceEmbedding").field(&e.dim()).finish(),
            Self::TokenOverlap { max_lines } => f.debug_struct("TokenOverlap").field("max_lines", max_lines).finish(),
        }
    }
}

impl Default for EvidenceSelector {
    fn default() -> Self { Self::TokenOverlap { max_lines: DEFAULT_MAX_LINES } }
}

impl EvidenceSelector {
    pub fn from_kind(kind: EvidenceKind, max_lines: usize, embedder: Option<Arc<dyn EmbeddingProvider>>) -> Result<Self> {
        match kind {
            EvidenceKind::Chunk => Ok(Self::Chunk),
            EvidenceKind::TokenOverlap => Ok(Self::TokenOverlap { max_lines }),
            EvidenceKind::SentenceEmbedding => embedder
                .map(Self::SentenceEmbedding)
                .ok_or_else(|| Error::InvalidConfig("sentence_embedding evidence needs an embedding provider".to_string())),
        }
    }

    /// Embeds the question once per retrieval, only for strategies that use it.
    pub fn embed_question(&self, question: &str) -> Result<Option<Vec<f32>>> {
        match self {
            Self::SentenceEmbedding(embedder) => embedder.embed_query(question).map(Some).map_err(Error::embedding),
            Self::Chunk | Self::TokenOverlap { .. } => Ok(None),
        }
    }

    /// Supporting span of `chunk_text`, or `None` when the caller should
    /// fall back to the full chunk.
    pub fn select(&self, chunk_text: &str, question: &str, question_embedding: Option<&[f32]>) -> Result<Option<String>> {
        match self {
            Self::Chunk => Ok(None),
            Self::TokenOverlap { max_lines } => {
                let snippet = extract_relevant_snippet(chunk_text, question, *max_lines);
                Ok((!snippet.is_empty()).then_some(snippet))
            }
            Self::SentenceEmbedding(embedder) => {
                let owned;
                let q = match question_embedding {
                    Some(q) => q,
                    None => {
                        owned = embedder.embed_query(question).map_err(Error::embedding)?;
                        &owned
                    }
                };
                select_best_sentence(chunk_text, q, embedder.as_ref()).map_err(Error::embedding)
            }
        }
    }
}
