//! Offline index build pipeline
//!
//! fetch snapshot -> extract text -> chunk -> embed -> [`EmbeddingIndex`].
//! Runs as a batch job via the `build-index` binary; the serving process
//! only ever loads the resulting snapshot.

use crate::embedder::EmbeddingClient;
use crate::extract::{chunk_text, html_to_text};
use crate::fetch::PageSnapshot;
use crate::store::{DocumentChunk, EmbeddingIndex};
use campusai_core::{CoreResult, IndexConfig};
use std::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

pub struct IndexBuilder {
    embedder: EmbeddingClient,
    chunk_size: usize,
    chunk_overlap: usize,
    batch_size: usize,
}

/// Summary of one build run.
#[derive(Debug, Clone)]
pub struct BuildStats {
    pub pages: usize,
    pub chunks: usize,
    pub build_time_ms: u64,
}

impl BuildStats {
    pub fn summary(&self) -> String {
        format!(
            "{} pages -> {} chunks ({}ms)",
            self.pages, self.chunks, self.build_time_ms
        )
    }
}

impl IndexBuilder {
    pub fn new(embedder: EmbeddingClient, config: &IndexConfig, batch_size: usize) -> Self {
        Self {
            embedder,
            chunk_size: config.chunk_size,
            chunk_overlap: config.chunk_overlap,
            batch_size: batch_size.max(1),
        }
    }

    /// Build a fresh index from a page snapshot.
    pub async fn build(&self, snapshot: &PageSnapshot) -> CoreResult<(EmbeddingIndex, BuildStats)> {
        let start = Instant::now();

        // Extract and chunk every page, keeping provenance per chunk.
        let mut texts: Vec<String> = Vec::new();
        let mut sources: Vec<String> = Vec::new();
        for page in snapshot.pages() {
            let text = html_to_text(&page.html);
            let chunks = chunk_text(&text, self.chunk_size, self.chunk_overlap);
            debug!(url = %page.url, chunks = chunks.len(), "chunked page");
            for chunk in chunks {
                texts.push(chunk);
                sources.push(page.url.clone());
            }
        }

        info!(
            pages = snapshot.len(),
            chunks = texts.len(),
            model = %self.embedder.model(),
            "embedding chunks"
        );

        let mut index = EmbeddingIndex::new(self.embedder.dimension(), self.embedder.model());

        for (batch, batch_sources) in texts
            .chunks(self.batch_size)
            .zip(sources.chunks(self.batch_size))
        {
            let vectors = self.embedder.embed_batch(batch).await?;
            let chunks: Vec<DocumentChunk> = batch
                .iter()
                .zip(batch_sources.iter())
                .zip(vectors)
                .map(|((text, source_url), embedding)| DocumentChunk {
                    id: Uuid::new_v4(),
                    source_url: source_url.clone(),
                    text: text.clone(),
                    embedding,
                })
                .collect();
            index.add_chunks(chunks)?;
        }

        let stats = BuildStats {
            pages: snapshot.len(),
            chunks: index.len(),
            build_time_ms: start.elapsed().as_millis() as u64,
        };

        info!("index build complete: {}", stats.summary());
        Ok((index, stats))
    }
}
