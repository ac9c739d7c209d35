//! docqa-vector
//!
//! `VectorIndex` implementations: a LanceDB table reader for real documents
//! and an in-memory index for tests and small inputs.

pub mod lance;
pub mod memory;
pub mod schema;

pub use lance::LanceVectorIndex;
pub use memory::InMemoryIndex;
