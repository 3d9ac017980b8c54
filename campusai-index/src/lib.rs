//! Embedding index and retriever for CampusAI
//!
//! The index is built offline (fetch pages, extract text, chunk, embed,
//! snapshot to disk) and loaded read-only by the serving process. There is
//! no incremental update: a re-ingestion run replaces the snapshot wholesale.

pub mod builder;
pub mod embedder;
pub mod extract;
pub mod fetch;
pub mod retriever;
pub mod store;

pub use builder::IndexBuilder;
pub use embedder::EmbeddingClient;
pub use fetch::{PageFetcher, PageSnapshot};
pub use retriever::{PassageRetriever, RetrievedPassage, TextEmbedder};
pub use store::{DistanceMetric, DocumentChunk, EmbeddingIndex};
