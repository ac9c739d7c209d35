use std::sync::Arc;

use arrow_array::{FixedSizeListArray, Int32Array, RecordBatch, RecordBatchIterator, StringArray};
use docqa_core::config::DistanceMetric;
use docqa_core::traits::{EmbeddingProvider, VectorIndex};
use docqa_embed::HashingEmbedder;
use docqa_vector::schema::build_chunk_schema;
use docqa_vector::LanceVectorIndex;

const DIM: usize = 16;

struct Row { content: &'static str, source: Option<&'static str>, page: Option<i32> }

fn seed_table(uri: &str, table: &str, rows: &[Row], embedder: &HashingEmbedder) -> anyhow::Result<()> {
    let schema = build_chunk_schema(DIM as i32);
    let vectors: Vec<Option<Vec<Option<f32>>>> = rows
        .iter()
        .map(|r| Some(embedder.embed_text(r.content).into_iter().map(Some).collect()))
        .collect();
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(rows.iter().map(|r| r.content).collect::<Vec<_>>())),
            Arc::new(StringArray::from(rows.iter().map(|r| r.source).collect::<Vec<_>>())),
            Arc::new(Int32Array::from(rows.iter().map(|r| r.page).collect::<Vec<_>>())),
            Arc::new(FixedSizeListArray::from_iter_primitive::<arrow_array::types::Float32Type, _, _>(vectors.into_iter(), DIM as i32)),
        ],
    )?;
    let batches: Vec<Result<RecordBatch, arrow_schema::ArrowError>> = if rows.is_empty() { vec![] } else { vec![Ok(batch)] };
    let reader = Box::new(RecordBatchIterator::new(batches.into_iter(), schema));
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let conn = lancedb::connect(uri).execute().await?;
        conn.create_table(table, reader).execute().await?;
        Ok::<_, anyhow::Error>(())
    })
}

#[test]
fn search_returns_nearest_chunks_with_metadata() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let uri = tmp.path().to_string_lossy().to_string();
    let embedder = HashingEmbedder::new(DIM);
    let rows = [
        Row { content: "Consignee: Fontana Distribution Center", source: Some("bol.pdf"), page: Some(1) },
        Row { content: "Freight charges are prepaid by shipper", source: Some("bol.pdf"), page: Some(2) },
        Row { content: "Equipment type: 53ft dry van", source: None, page: None },
    ];
    seed_table(&uri, "documents", &rows, &embedder)?;

    let index = LanceVectorIndex::open(&uri, "documents", Arc::new(HashingEmbedder::new(DIM)), DistanceMetric::L2)?;
    let query = embedder.embed_query("Equipment type: 53ft dry van")?;
    let matches = index.search_vec(&query, 2)?;

    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].chunk.content, "Equipment type: 53ft dry van");
    assert!(matches[0].distance.abs() < 1e-4, "exact match has ~zero distance");
    assert_eq!(matches[0].chunk.metadata.source, None);
    assert_eq!(matches[0].chunk.metadata.page, None);
    assert!(matches[0].distance <= matches[1].distance);
    assert_eq!(matches[1].chunk.metadata.source.as_deref(), Some("bol.pdf"));
    Ok(())
}

#[test]
fn text_search_embeds_the_query() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let uri = tmp.path().to_string_lossy().to_string();
    let embedder = HashingEmbedder::new(DIM);
    let rows = [
        Row { content: "Pickup at Cherry Avenue", source: Some("a.txt"), page: None },
        Row { content: "Delivery Date 2024-03-04", source: Some("a.txt"), page: None },
    ];
    seed_table(&uri, "documents", &rows, &embedder)?;

    let index = LanceVectorIndex::open(&uri, "documents", Arc::new(HashingEmbedder::new(DIM)), DistanceMetric::L2)?;
    let matches = index.search("Delivery Date 2024-03-04", 4)?;
    assert_eq!(matches.len(), 2, "never more than the table holds");
    assert_eq!(matches[0].chunk.content, "Delivery Date 2024-03-04");
    Ok(())
}

#[test]
fn empty_table_yields_no_matches() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let uri = tmp.path().to_string_lossy().to_string();
    let embedder = HashingEmbedder::new(DIM);
    seed_table(&uri, "documents", &[], &embedder)?;

    let index = LanceVectorIndex::open(&uri, "documents", Arc::new(HashingEmbedder::new(DIM)), DistanceMetric::L2)?;
    assert!(index.search("anything", 4)?.is_empty());
    Ok(())
}

#[test]
fn opening_a_missing_table_fails() -> anyhow::Result<()> {
    let tmp = tempfile::tempdir()?;
    let uri = tmp.path().to_string_lossy().to_string();
    assert!(LanceVectorIndex::open(&uri, "nope", Arc::new(HashingEmbedder::new(DIM)), DistanceMetric::L2).is_err());
    Ok(())
}
