use arrow_schema::{Schema, Field, DataType};
use std::sync::Arc;

pub const CONTENT_COL: &str = "content";
pub const SOURCE_COL: &str = "source";
pub const PAGE_COL: &str = "page";
pub const VECTOR_COL: &str = "vector";
/// Column LanceDB appends to vector search results.
pub const DISTANCE_COL: &str = "_distance";

/// Layout of a chunk table: text, optional source/page, and a fixed-size vector.
pub fn build_chunk_schema(dim: i32) -> Arc<Schema> {
	Arc::new(Schema::new(vec![
		Field::new(CONTENT_COL, DataType::Utf8, false),
		Field::new(SOURCE_COL, DataType::Utf8, true),
		Field::new(PAGE_COL, DataType::Int32, true),
		Field::new(VECTOR_COL, DataType::FixedSizeList(Arc::new(Field::new("item", DataType::Float32, true)), dim), true),
	]))
}
