//! Domain types exchanged between the vector index, the embedding provider
//! and the retriever.

use serde::{Deserialize, Serialize};

/// Placeholder used when a chunk carries no `source` metadata.
pub const UNKNOWN_SOURCE: &str = "unknown";

/// Metadata attached to a chunk at ingestion time.
///
/// - `source`: path or identifier of the originating document
/// - `page`: page number inside the source, when the format has pages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMeta {
    pub source: Option<String>,
    pub page: Option<u32>,
}

/// A contiguous span of document text stored in the vector index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub content: String,
    #[serde(default)]
    pub metadata: ChunkMeta,
}

impl Chunk {
    pub fn new(content: impl Into<String>) -> Self {
        Self { content: content.into(), metadata: ChunkMeta::default() }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.metadata.source = Some(source.into());
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.metadata.page = Some(page);
        self
    }

    pub fn source_or_unknown(&self) -> &str {
        self.metadata.source.as_deref().unwrap_or(UNKNOWN_SOURCE)
    }
}

/// A chunk together with the distance reported by the index.
///
/// `distance` is non-negative and lower is better. Indexes return matches
/// sorted ascending by distance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch {
    pub chunk: Chunk,
    pub distance: f32,
}

impl ScoredMatch {
    pub fn new(chunk: Chunk, distance: f32) -> Self {
        Self { chunk, distance }
    }
}

/// The minimal text that justifies one retrieved chunk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceSnippet {
    pub source: String,
    pub page: Option<u32>,
    pub content: String,
    pub score: Option<f32>,
}

/// Outcome of a single `retrieve` call.
///
/// `context` feeds the answer prompt verbatim; `sources` and `confidence`
/// are shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub context: String,
    pub sources: Vec<EvidenceSnippet>,
    pub confidence: f32,
}

impl RetrievalResult {
    pub const NOT_FOUND: &'static str = "Not found in document";

    /// Sentinel returned when the index has nothing for the question.
    pub fn not_found() -> Self {
        Self { context: Self::NOT_FOUND.to_string(), sources: Vec::new(), confidence: 0.0 }
    }

    pub fn is_not_found(&self) -> bool {
        self.sources.is_empty() && self.context == Self::NOT_FOUND
    }
}
