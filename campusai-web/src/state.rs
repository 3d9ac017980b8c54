//! Shared application state

use crate::auth::UserStore;
use crate::{WebError, WebResult};
use campusai_core::AppConfig;
use campusai_index::{EmbeddingClient, EmbeddingIndex, PassageRetriever};
use campusai_rag::{CourseCatalog, OpenAiChatClient, QueryPipeline};
use std::sync::Arc;
use tracing::{info, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<QueryPipeline>,
    pub users: UserStore,
}

impl AppState {
    /// Build the state from configuration: load the embedding index snapshot
    /// and wire up the real HTTP clients.
    ///
    /// A missing or unreadable snapshot is a degraded start, not a fatal
    /// one: queries are answered from an empty index until it is rebuilt.
    pub fn new(config: &AppConfig) -> WebResult<Self> {
        let index = match EmbeddingIndex::load(&config.index.snapshot_path) {
            Ok(index) => {
                info!(
                    chunks = index.len(),
                    path = %config.index.snapshot_path.display(),
                    "loaded embedding index"
                );
                index
            }
            Err(e) => {
                warn!(
                    path = %config.index.snapshot_path.display(),
                    error = %e,
                    "embedding index unavailable, serving with empty index"
                );
                EmbeddingIndex::new(config.embedding.dimension, config.embedding.model.as_str())
            }
        };

        if !index.is_empty() && index.dimension() != config.embedding.dimension {
            return Err(WebError::Startup(format!(
                "index snapshot dimension {} does not match configured embedding dimension {}",
                index.dimension(),
                config.embedding.dimension
            )));
        }

        let embedder = EmbeddingClient::new(&config.embedding)
            .map_err(|e| WebError::Startup(format!("embedding client: {e}")))?;
        let retriever = PassageRetriever::new(Arc::new(index), Arc::new(embedder));

        let catalog = CourseCatalog::over_http(&config.catalog)
            .map_err(|e| WebError::Startup(format!("catalog client: {e}")))?;

        let completion = OpenAiChatClient::new(config.generation.clone())
            .map_err(|e| WebError::Startup(format!("completion client: {e}")))?;

        let pipeline = QueryPipeline::new(
            Arc::new(retriever),
            Arc::new(catalog),
            Arc::new(completion),
            config.retrieval.clone(),
            config.catalog.limit,
        );

        Ok(Self {
            pipeline: Arc::new(pipeline),
            users: UserStore::new(),
        })
    }

    /// Assemble state from pre-built parts. Tests use this to swap in
    /// doubles for the retrieval, catalog, and completion collaborators.
    pub fn from_parts(pipeline: QueryPipeline, users: UserStore) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            users,
        }
    }
}
