//! docqa-retrieval
//!
//! Confidence-scored retrieval with per-chunk evidence selection and
//! source filtering.

#![deny(unused_imports)]
#![deny(unused_variables)]

pub mod confidence;
pub mod context;
pub mod evidence;
pub mod filter;
pub mod retriever;
pub mod score;
pub mod session;

pub use context::{format_context, trim_context};
pub use evidence::{extract_relevant_snippet, select_best_sentence, EvidenceSelector};
pub use filter::{filter_by_score, filter_by_snippet_quality, SourceFilter};
pub use retriever::Retriever;
pub use score::normalize;
pub use session::{SessionId, SessionStore};
