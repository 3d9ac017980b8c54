//! Passage retrieval
//!
//! Embeds a query with the same pinned model the index was built with, then
//! runs nearest-neighbor search. The index is immutable after load, so a
//! single retriever is shared across concurrent requests without locking.

use crate::embedder::EmbeddingClient;
use crate::store::EmbeddingIndex;
use async_trait::async_trait;
use campusai_core::{AssistantError, CoreResult};
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// A retrieved passage with provenance, ordered by similarity rank.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievedPassage {
    pub text: String,
    pub source_url: String,
    pub score: f32,
}

/// Seam for query embedding so retrieval is testable without a network.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    async fn embed(&self, text: &str) -> CoreResult<Vec<f32>>;
}

#[async_trait]
impl TextEmbedder for EmbeddingClient {
    async fn embed(&self, text: &str) -> CoreResult<Vec<f32>> {
        self.embed_one(text).await
    }
}

pub struct PassageRetriever {
    index: Arc<EmbeddingIndex>,
    embedder: Arc<dyn TextEmbedder>,
}

impl PassageRetriever {
    pub fn new(index: Arc<EmbeddingIndex>, embedder: Arc<dyn TextEmbedder>) -> Self {
        Self { index, embedder }
    }

    /// Retrieve up to k passages ordered most-similar first. An empty index
    /// yields an empty result; how to serve with no context is the caller's
    /// policy, not the retriever's.
    pub async fn search(&self, query: &str, k: usize) -> CoreResult<Vec<RetrievedPassage>> {
        if self.index.is_empty() {
            debug!("embedding index is empty, returning no passages");
            return Ok(Vec::new());
        }

        let query_embedding = self.embedder.embed(query).await?;
        if query_embedding.len() != self.index.dimension() {
            return Err(AssistantError::config(format!(
                "query embedding dimension {} does not match index dimension {}",
                query_embedding.len(),
                self.index.dimension()
            )));
        }

        let results = self
            .index
            .search(&query_embedding, k)
            .into_iter()
            .filter_map(|(idx, score)| {
                self.index.get_chunk(idx).map(|chunk| RetrievedPassage {
                    text: chunk.text.clone(),
                    source_url: chunk.source_url.clone(),
                    score,
                })
            })
            .collect::<Vec<_>>();

        debug!(count = results.len(), k, "retrieved passages");
        Ok(results)
    }

    pub fn index(&self) -> &EmbeddingIndex {
        &self.index
    }
}
