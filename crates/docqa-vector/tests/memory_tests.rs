use std::sync::Arc;

use docqa_core::traits::{EmbeddingProvider, VectorIndex};
use docqa_core::types::Chunk;
use docqa_embed::HashingEmbedder;
use docqa_vector::InMemoryIndex;

fn chunks() -> Vec<Chunk> {
    vec![
        Chunk::new("Shipper: Acme Logistics").with_source("bol.pdf").with_page(1),
        Chunk::new("Consignee: Fontana Warehouse").with_source("bol.pdf").with_page(1),
        Chunk::new("Weight: 42000 lbs").with_source("bol.pdf").with_page(2),
    ]
}

#[test]
fn results_are_sorted_and_capped_at_k() {
    let index = InMemoryIndex::from_chunks(chunks(), Arc::new(HashingEmbedder::new(128))).expect("index");
    assert_eq!(index.len(), 3);

    let matches = index.search("Weight: 42000 lbs", 2).expect("search");
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].chunk.content, "Weight: 42000 lbs");
    assert!(matches[0].distance < 1e-6);
    assert!(matches.windows(2).all(|w| w[0].distance <= w[1].distance));
}

#[test]
fn empty_index_returns_empty() {
    let index = InMemoryIndex::from_chunks(Vec::new(), Arc::new(HashingEmbedder::new(8))).expect("index");
    assert!(index.is_empty());
    assert!(index.search("anything", 4).expect("search").is_empty());
}

#[test]
fn distances_are_squared_l2_over_unit_vectors() {
    let embedder = Arc::new(HashingEmbedder::new(64));
    let index = InMemoryIndex::from_chunks(chunks(), embedder.clone()).expect("index");
    let q = embedder.embed_query("completely unrelated words").expect("query");
    for m in index.search_vec(&q, 3).expect("search") {
        assert!((0.0..=4.0 + 1e-4).contains(&m.distance), "distance {} out of range", m.distance);
    }
}

#[test]
fn query_dimension_mismatch_is_an_error() {
    let index = InMemoryIndex::from_chunks(chunks(), Arc::new(HashingEmbedder::new(64))).expect("index");
    assert!(index.search_vec(&[0.0; 8], 2).is_err());
}

#[test]
fn precomputed_vector_only_accepted_from_own_embedder() {
    let own: Arc<dyn EmbeddingProvider> = Arc::new(HashingEmbedder::new(64));
    let foreign: Arc<dyn EmbeddingProvider> = Arc::new(HashingEmbedder::new(64));
    let index = InMemoryIndex::from_chunks(chunks(), own.clone()).expect("index");
    let q = own.embed_query("Weight: 42000 lbs").expect("query");

    assert!(index.search_embedded(&foreign, &q, 2).expect("search").is_none());
    let matches = index.search_embedded(&own, &q, 2).expect("search").expect("own embedder");
    assert_eq!(matches, index.search("Weight: 42000 lbs", 2).expect("search"));
}
