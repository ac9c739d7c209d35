//! Read-only `VectorIndex` over a pre-built LanceDB chunk table.
//!
//! The table must follow `schema::build_chunk_schema`. Searches run on a
//! private current-thread runtime so callers stay synchronous.

use anyhow::{Result, anyhow};
use arrow_array::{Array, Float32Array, Int32Array, RecordBatch, StringArray};
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::{connect, DistanceType, Table};
use std::sync::Arc;
use tokio::runtime::Runtime;

use docqa_core::config::DistanceMetric;
use docqa_core::traits::{EmbeddingProvider, VectorIndex};
use docqa_core::types::{Chunk, ScoredMatch};

use crate::schema::{CONTENT_COL, DISTANCE_COL, PAGE_COL, SOURCE_COL};

pub struct LanceVectorIndex {
    runtime: Runtime,
    table: Table,
    embedder: Arc<dyn EmbeddingProvider>,
    metric: DistanceMetric,
}

impl LanceVectorIndex {
    pub fn open(uri: &str, table_name: &str, embedder: Arc<dyn EmbeddingProvider>, metric: DistanceMetric) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
        let table = runtime.block_on(async {
            let db = connect(uri).execute().await?;
            Ok::<_, anyhow::Error>(db.open_table(table_name).execute().await?)
        })?;
        tracing::info!(uri, table = table_name, "opened LanceDB table");
        Ok(Self { runtime, table, embedder, metric })
    }

    /// Nearest chunks to an already-embedded query, ascending by distance.
    pub fn search_vec(&self, query_vec: &[f32], k: usize) -> Result<Vec<ScoredMatch>> {
        if k == 0 { return Ok(Vec::new()); }
        let batches = self.runtime.block_on(async {
            if self.table.count_rows(None).await? == 0 {
                return Ok::<_, anyhow::Error>(Vec::new());
            }
            let stream = self
                .table
                .vector_search(query_vec.to_vec())?
                .distance_type(distance_type(self.metric))
                .limit(k)
                .execute()
                .await?;
            Ok(stream.try_collect::<Vec<RecordBatch>>().await?)
        })?;
        let mut matches = Vec::new();
        for batch in &batches { push_matches(batch, &mut matches)?; }
        matches.truncate(k);
        tracing::debug!(k, returned = matches.len(), "lance vector search");
        Ok(matches)
    }
}

impl VectorIndex for LanceVectorIndex {
    fn search(&self, query: &str, k: usize) -> Result<Vec<ScoredMatch>> {
        let query_vec = self.embedder.embed_query(query)?;
        self.search_vec(&query_vec, k)
    }

    fn search_embedded(&self, embedder: &Arc<dyn EmbeddingProvider>, query_vec: &[f32], k: usize) -> Result<Option<Vec<ScoredMatch>>> {
        if !Arc::ptr_eq(&self.embedder, embedder) { return Ok(None); }
        self.search_vec(query_vec, k).map(Some)
    }
}

fn distance_type(metric: DistanceMetric) -> DistanceType {
    match metric {
        DistanceMetric::L2 => DistanceType::L2,
        DistanceMetric::Cosine => DistanceType::Cosine,
        DistanceMetric::Dot => DistanceType::Dot,
    }
}

fn push_matches(batch: &RecordBatch, out: &mut Vec<ScoredMatch>) -> Result<()> {
    let content = batch
        .column_by_name(CONTENT_COL)
        .and_then(|c| c.as_any().downcast_ref::<StringArray>())
        .ok_or_else(|| anyhow!("{} column missing", CONTENT_COL))?;
    let distance = batch
        .column_by_name(DISTANCE_COL)
        .and_then(|c| c.as_any().downcast_ref::<Float32Array>())
        .ok_or_else(|| anyhow!("{} column missing", DISTANCE_COL))?;
    // metadata columns are optional
    let source = batch.column_by_name(SOURCE_COL).and_then(|c| c.as_any().downcast_ref::<StringArray>());
    let page = batch.column_by_name(PAGE_COL).and_then(|c| c.as_any().downcast_ref::<Int32Array>());
    for i in 0..batch.num_rows() {
        let mut chunk = Chunk::new(content.value(i));
        chunk.metadata.source = source.filter(|s| s.is_valid(i)).map(|s| s.value(i).to_string());
        chunk.metadata.page = page.filter(|p| p.is_valid(i)).and_then(|p| u32::try_from(p.value(i)).ok());
        out.push(ScoredMatch::new(chunk, distance.value(i)));
    }
    Ok(())
}
