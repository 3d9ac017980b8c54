//! Configuration management
//!
//! All tunables live here with defaults that carry the system's behavioral
//! contract. Generation sampling parameters in particular are a deliberate
//! tuning decision: changing them changes answer character.

use crate::error::{AssistantError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub embedding: EmbeddingConfig,
    pub generation: GenerationConfig,
    pub retrieval: RetrievalConfig,
    pub catalog: CatalogConfig,
    pub index: IndexConfig,
}

/// Embedding service configuration. The model identifier is pinned and
/// recorded in the index snapshot: query vectors must come from the same
/// model/version as the indexed vectors or search results are silently wrong.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// OpenAI-compatible API base URL
    pub endpoint: String,
    /// Embedding model identifier, pinned per index build
    pub model: String,
    /// Vector dimensionality D, constant across the whole index
    pub dimension: usize,
    /// Batch size for index builds
    pub batch_size: usize,
    /// API key; falls back to the OPENAI_API_KEY environment variable
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimension: 1536,
            batch_size: 64,
            api_key: None,
            timeout_secs: 30,
        }
    }
}

/// Completion service configuration with fixed sampling parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// OpenAI-compatible API base URL
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
    /// API key; falls back to the OPENAI_API_KEY environment variable
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 800,
            presence_penalty: 0.6,
            frequency_penalty: 0.3,
            api_key: None,
            timeout_secs: 60,
        }
    }
}

/// Retrieval configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of top passages to retrieve per query
    pub top_k: usize,
    /// Ceiling on assembled context length in characters; lowest-ranked
    /// passages are dropped first when exceeded
    pub max_context_chars: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            max_context_chars: 12000,
        }
    }
}

/// Course catalog service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub base_url: String,
    /// Maximum number of records requested from general search
    pub limit: usize,
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://courses.northgate.dev".to_string(),
            limit: 5,
            timeout_secs: 10,
        }
    }
}

/// Offline index build configuration. Chunk size and overlap are build-time
/// constants: changing them requires a full rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Path of the index snapshot produced by the builder and loaded
    /// read-only by the server
    pub snapshot_path: PathBuf,
    /// Source pages ingested at build time
    pub source_urls: Vec<String>,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub fetch_timeout_secs: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("data/index.json"),
            source_urls: vec![
                "https://www.northgate.edu/academics.html".to_string(),
                "https://www.northgate.edu/students/registration.html".to_string(),
                "https://www.northgate.edu/students/success.html".to_string(),
                "https://www.northgate.edu/students/financial-support.html".to_string(),
                "https://www.northgate.edu/campus-life/clubs.html".to_string(),
                "https://www.northgate.edu/admissions.html".to_string(),
            ],
            chunk_size: 1000,
            chunk_overlap: 200,
            fetch_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file. Missing sections fall back to
    /// defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&content)
            .map_err(|e| AssistantError::config(format!("invalid config file: {}", e)))
    }

    /// Load from a file when a path is given, otherwise defaults.
    pub fn load(path: Option<&Path>) -> CoreResult<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }

    /// Validate cross-field invariants that serde cannot express.
    pub fn validate(&self) -> CoreResult<()> {
        if self.embedding.dimension == 0 {
            return Err(AssistantError::config("embedding dimension must be > 0"));
        }
        if self.index.chunk_overlap >= self.index.chunk_size {
            return Err(AssistantError::config(
                "chunk overlap must be smaller than chunk size",
            ));
        }
        if self.retrieval.top_k == 0 {
            return Err(AssistantError::config("retrieval top_k must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_carry_generation_contract() {
        let config = AppConfig::default();
        assert_eq!(config.generation.temperature, 0.7);
        assert_eq!(config.generation.max_tokens, 800);
        assert_eq!(config.generation.presence_penalty, 0.6);
        assert_eq!(config.generation.frequency_penalty, 0.3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[retrieval]\ntop_k = 3\n\n[generation]\nmodel = \"gpt-4o\"\n"
        )
        .unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.generation.model, "gpt-4o");
        // Untouched sections keep their defaults
        assert_eq!(config.generation.temperature, 0.7);
        assert_eq!(config.index.chunk_size, 1000);
    }

    #[test]
    fn overlap_must_stay_below_chunk_size() {
        let mut config = AppConfig::default();
        config.index.chunk_overlap = config.index.chunk_size;
        assert!(config.validate().is_err());
    }
}
