//! Post-processing of candidate sources before they reach the user.

use std::cmp::Ordering;

use docqa_core::config::{FilterPolicy, FilterSettings};
use docqa_core::types::EvidenceSnippet;

/// Snippet values that carry no information even when long enough.
const DEGENERATE_SNIPPETS: &[&str] = &["time"];

/// Keeps sources scoring at or below `threshold` (lower is better), then
/// takes the first `top_k`.
///
/// When nothing passes, falls back to every candidate sorted ascending by
/// score, with missing scores last; the sort is stable.
pub fn filter_by_score(sources: &[EvidenceSnippet], threshold: f32, top_k: usize) -> Vec<EvidenceSnippet> {
    let passing: Vec<&EvidenceSnippet> = sources
        .iter()
        .filter(|s| s.score.is_some_and(|score| score <= threshold))
        .collect();

    let ranked = if passing.is_empty() {
        let mut all: Vec<&EvidenceSnippet> = sources.iter().collect();
        all.sort_by(|a, b| compare_scores(a.score, b.score));
        all
    } else {
        passing
    };
    ranked.into_iter().take(top_k).cloned().collect()
}

fn compare_scores(a: Option<f32>, b: Option<f32>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Keeps at most one source whose trimmed snippet has at least `min_len`
/// characters and is not a known degenerate value.
pub fn filter_by_snippet_quality(sources: &[EvidenceSnippet], min_len: usize) -> Vec<EvidenceSnippet> {
    sources
        .iter()
        .filter(|s| {
            let text = s.content.trim();
            text.chars().count() >= min_len && !DEGENERATE_SNIPPETS.contains(&text.to_lowercase().as_str())
        })
        .take(1)
        .cloned()
        .collect()
}

/// Filtering policy applied by the retriever as its last step.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SourceFilter {
    #[default]
    None,
    Score { threshold: f32, top_k: usize },
    SnippetQuality { min_len: usize },
    /// Applies each filter in order to the previous output.
    Chain(Vec<SourceFilter>),
}

impl SourceFilter {
    pub fn from_settings(settings: &FilterSettings) -> Self {
        match settings.policy {
            FilterPolicy::None => Self::None,
            FilterPolicy::Score => Self::Score { threshold: settings.threshold, top_k: settings.top_k },
            FilterPolicy::SnippetQuality => Self::SnippetQuality { min_len: settings.min_len },
        }
    }

    pub fn apply(&self, sources: Vec<EvidenceSnippet>) -> Vec<EvidenceSnippet> {
        match self {
            Self::None => sources,
            Self::Score { threshold, top_k } => filter_by_score(&sources, *threshold, *top_k),
            Self::SnippetQuality { min_len } => filter_by_snippet_quality(&sources, *min_len),
            Self::Chain(filters) => filters.iter().fold(sources, |acc, f| f.apply(acc)),
        }
    }
}
