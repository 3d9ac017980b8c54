//! Core types for CampusAI
//!
//! Shared error taxonomy, configuration and logging used by the index,
//! rag and web crates.

pub mod config;
pub mod error;
pub mod identity;
pub mod logging;

pub use config::{
    AppConfig, CatalogConfig, EmbeddingConfig, GenerationConfig, IndexConfig, RetrievalConfig,
};
pub use error::{AssistantError, CoreResult};
pub use identity::Identity;
pub use logging::init_logging;
