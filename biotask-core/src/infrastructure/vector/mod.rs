//! Vector similarity store holding embedded task results

#[cfg(feature = "http-providers")]
mod pinecone;
mod types;

#[cfg(feature = "http-providers")]
pub use pinecone::PineconeIndex;
pub use types::{VectorMatch, VectorQuery, VectorRecord, VectorStore, VectorStoreError};
