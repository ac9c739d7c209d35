use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Vector search failed: {0}")]
    Search(#[source] BoxError),

    #[error("Embedding failed: {0}")]
    Embedding(#[source] BoxError),

    #[error("Invalid distance {distance} returned by the vector index")]
    InvalidDistance { distance: f32 },
}

impl Error {
    pub fn search(err: anyhow::Error) -> Self {
        Self::Search(err.into())
    }

    pub fn embedding(err: anyhow::Error) -> Self {
        Self::Embedding(err.into())
    }

    /// Collaborator failures; callers should report these as a temporary
    /// system error rather than "not in the document".
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Search(_) | Self::Embedding(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
