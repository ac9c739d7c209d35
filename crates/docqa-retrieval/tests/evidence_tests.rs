use std::sync::Arc;

use anyhow::Result;
use docqa_core::config::EvidenceKind;
use docqa_core::error::Error;
use docqa_core::traits::EmbeddingProvider;
use docqa_embed::HashingEmbedder;
use docqa_retrieval::evidence::{extract_relevant_snippet, select_best_sentence, EvidenceSelector};

/// Every text maps to the same vector, so all sentences tie.
struct ConstantEmbedder;

impl EmbeddingProvider for ConstantEmbedder {
    fn dim(&self) -> usize { 2 }
    fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
    }
}

/// Drops the last vector of every batch.
struct ShortBatchEmbedder;

impl EmbeddingProvider for ShortBatchEmbedder {
    fn dim(&self) -> usize { 2 }
    fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().skip(1).map(|_| vec![1.0, 0.0]).collect())
    }
}

const BOILERPLATE: &str = "Page 1 of 2 generated for the freight office. Powered by Acme Document Cloud services. \
Page 1 of 2 generated for the freight office. Powered by Acme Document Cloud services.";

#[test]
fn boilerplate_only_chunk_has_no_sentence() {
    let embedder = HashingEmbedder::new(64);
    let q = embedder.embed_text("who is the consignee");
    assert_eq!(select_best_sentence(BOILERPLATE, &q, &embedder).expect("select"), None);
}

#[test]
fn similarity_tie_goes_to_longer_sentence() {
    let text = "The truck arrives at the Fontana dock at noon. The consignee signed for all forty two pallets on arrival.";
    let best = select_best_sentence(text, &[1.0, 0.0], &ConstantEmbedder).expect("select");
    assert_eq!(best.as_deref(), Some("The consignee signed for all forty two pallets on arrival."));
}

#[test]
fn full_tie_goes_to_earlier_sentence() {
    let text = "Pallet count verified at origin dock A. Pallet count verified at origin dock B.";
    let best = select_best_sentence(text, &[1.0, 0.0], &ConstantEmbedder).expect("select");
    assert_eq!(best.as_deref(), Some("Pallet count verified at origin dock A."));
}

#[test]
fn most_similar_sentence_wins() {
    let embedder = HashingEmbedder::new(256);
    let text = "The truck arrives at the Fontana dock at noon. The consignee signed for all forty two pallets on arrival.";
    let q = embedder.embed_text("consignee signed forty two pallets");
    let best = select_best_sentence(text, &q, &embedder).expect("select");
    assert_eq!(best.as_deref(), Some("The consignee signed for all forty two pallets on arrival."));
}

#[test]
fn short_embedding_batch_is_an_error() {
    let text = "The truck arrives at the Fontana dock at noon. The consignee signed for all forty two pallets on arrival.";
    assert!(select_best_sentence(text, &[1.0, 0.0], &ShortBatchEmbedder).is_err());
}

#[test]
fn overlap_caps_three_matching_lines_at_two() {
    let text = "Pickup: Fontana yard\nCarrier: Swift\nDrop: Fontana warehouse\nFontana contact: Dana";
    assert_eq!(extract_relevant_snippet(text, "fontana", 2), "Pickup: Fontana yard Drop: Fontana warehouse");
}

#[test]
fn overlap_without_match_returns_first_non_empty_line() {
    let text = "\n\nBILL OF LADING\nShipper: Acme";
    assert_eq!(extract_relevant_snippet(text, "temperature", 2), "BILL OF LADING");
}

#[test]
fn chunk_selector_defers_to_full_text() {
    let selector = EvidenceSelector::Chunk;
    assert_eq!(selector.embed_question("anything").expect("embed"), None);
    assert_eq!(selector.select("whole chunk", "anything", None).expect("select"), None);
}

#[test]
fn overlap_selector_on_blank_chunk_returns_none() {
    let selector = EvidenceSelector::TokenOverlap { max_lines: 2 };
    assert_eq!(selector.select("  \n ", "fontana", None).expect("select"), None);
    assert_eq!(
        selector.select("Drop: Fontana warehouse", "fontana", None).expect("select").as_deref(),
        Some("Drop: Fontana warehouse")
    );
}

#[test]
fn sentence_selector_embeds_question_when_not_given() {
    let selector = EvidenceSelector::SentenceEmbedding(Arc::new(ConstantEmbedder));
    let text = "The truck arrives at the Fontana dock at noon. The consignee signed for all forty two pallets on arrival.";
    let best = selector.select(text, "pallets", None).expect("select");
    assert_eq!(best.as_deref(), Some("The consignee signed for all forty two pallets on arrival."));
}

#[test]
fn sentence_selector_errors_are_embedding_errors() {
    let selector = EvidenceSelector::SentenceEmbedding(Arc::new(ShortBatchEmbedder));
    let text = "The truck arrives at the Fontana dock at noon. The consignee signed for all forty two pallets on arrival.";
    let err = selector.select(text, "pallets", Some(&[1.0, 0.0])).expect_err("short batch");
    assert!(matches!(err, Error::Embedding(_)));
    assert!(err.is_transient());
}

#[test]
fn sentence_kind_requires_embedder() {
    let err = EvidenceSelector::from_kind(EvidenceKind::SentenceEmbedding, 2, None).expect_err("no embedder");
    assert!(matches!(err, Error::InvalidConfig(_)));

    let ok = EvidenceSelector::from_kind(EvidenceKind::TokenOverlap, 3, None).expect("overlap");
    assert!(matches!(ok, EvidenceSelector::TokenOverlap { max_lines: 3 }));
}
