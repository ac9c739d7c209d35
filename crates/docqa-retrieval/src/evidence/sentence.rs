//! Sentence-level evidence chosen by embedding similarity to the question.

use anyhow::{Result, ensure};
use once_cell::sync::Lazy;
use regex::Regex;

use docqa_core::traits::EmbeddingProvider;

/// Split candidates must be longer than this many characters.
const MIN_CANDIDATE_CHARS: usize = 21;
/// Shorter sentences are treated as headers/footers.
const MIN_EVIDENCE_CHARS: usize = 30;

static NOISE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"page \d+ of \d+|powered by|demo|copyright|all rights reserved").expect("noise pattern compiles")
});

/// Splits on whitespace that follows `.`, `!` or `?`. Tolerates OCR text
/// with missing capitals or stray line breaks.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((_, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') { continue; }
        let Some(&(boundary, next)) = chars.peek() else { break };
        if !next.is_whitespace() { continue; }
        pieces.push(&text[start..boundary]);
        start = boundary;
        while let Some(&(idx, ch)) = chars.peek() {
            if !ch.is_whitespace() { break; }
            start = idx + ch.len_utf8();
            chars.next();
        }
    }
    pieces.push(&text[start..]);
    pieces
        .into_iter()
        .map(str::trim)
        .filter(|s| s.chars().count() >= MIN_CANDIDATE_CHARS)
        .map(str::to_string)
        .collect()
}

pub fn is_noise_sentence(sentence: &str) -> bool {
    let lower = sentence.to_lowercase();
    lower.chars().count() < MIN_EVIDENCE_CHARS || NOISE.is_match(&lower)
}

/// Cosine similarity; zero when either vector has no magnitude.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 { 0.0 } else { dot / (norm_a * norm_b) }
}

/// Picks the sentence of `chunk_text` closest to `question_embedding`.
///
/// Returns `None` when every candidate is too short or boilerplate. Ties on
/// similarity go to the longer sentence, then to the earlier one.
pub fn select_best_sentence(
    chunk_text: &str,
    question_embedding: &[f32],
    embedder: &dyn EmbeddingProvider,
) -> Result<Option<String>> {
    let candidates: Vec<String> = split_sentences(chunk_text)
        .into_iter()
        .filter(|s| !is_noise_sentence(s))
        .collect();
    if candidates.is_empty() {
        return Ok(None);
    }

    let embeddings = embedder.embed_many(&candidates)?;
    ensure!(
        embeddings.len() == candidates.len(),
        "embedder returned {} vectors for {} sentences",
        embeddings.len(),
        candidates.len()
    );

    let mut best: Option<(f32, usize, usize)> = None;
    for (i, (sentence, vector)) in candidates.iter().zip(&embeddings).enumerate() {
        ensure!(
            vector.len() == question_embedding.len(),
            "sentence vector has {} dims, question has {}",
            vector.len(),
            question_embedding.len()
        );
        let score = cosine_similarity(question_embedding, vector);
        let len = sentence.chars().count();
        let better = match best {
            None => true,
            Some((best_score, best_len, _)) => score > best_score || (score == best_score && len > best_len),
        };
        if better { best = Some((score, len, i)); }
    }
    Ok(best.map(|(_, _, i)| candidates[i].clone()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_after_terminal_punctuation_only() {
        let text = "The consignee is Fontana Distribution Center. Total weight was 42,000 lbs!  Was the load inspected on arrival? v1.2 stays intact here";
        let sentences = split_sentences(text);
        assert_eq!(
            sentences,
            vec![
                "The consignee is Fontana Distribution Center.",
                "Total weight was 42,000 lbs!",
                "Was the load inspected on arrival?",
                "v1.2 stays intact here",
            ]
        );
    }

    #[test]
    fn short_fragments_are_dropped() {
        assert!(split_sentences("Too short. Also short.").is_empty());
    }

    #[test]
    fn boilerplate_is_noise() {
        assert!(is_noise_sentence("Page 1 of 2 - generated automatically by the system"));
        assert!(is_noise_sentence("This document was Powered By Acme Document Cloud"));
        assert!(is_noise_sentence("Copyright 2024 Acme Freight, every page reserved"));
        assert!(is_noise_sentence("Short line."));
        assert!(!is_noise_sentence("The shipment will be picked up on March 2nd."));
    }

    #[test]
    fn cosine_of_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert!((cosine_similarity(&[1.0, 1.0], &[2.0, 2.0]) - 1.0).abs() < 1e-6);
    }
}
