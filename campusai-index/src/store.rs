//! In-memory embedding index with snapshot persistence
//!
//! Every chunk carries exactly one vector of the index's fixed dimension D.
//! The embedding model identifier and distance metric are recorded in the
//! snapshot so a serving process can refuse a mismatched configuration
//! instead of returning silently wrong results.

use campusai_core::{AssistantError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// Snapshot format version; bumped on incompatible layout changes.
const SNAPSHOT_VERSION: u32 = 1;

/// A text chunk with provenance and its embedding. Immutable once indexed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: Uuid,
    pub source_url: String,
    pub text: String,
    pub embedding: Vec<f32>,
}

/// Distance metric fixed at index-build time. Search always uses the metric
/// the index was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    Cosine,
}

/// Ordered collection of chunks plus the search structure over their vectors.
#[derive(Debug)]
pub struct EmbeddingIndex {
    chunks: Vec<DocumentChunk>,
    dimension: usize,
    embedding_model: String,
    metric: DistanceMetric,
}

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    embedding_model: String,
    dimension: usize,
    metric: DistanceMetric,
    chunks: Vec<DocumentChunk>,
}

impl EmbeddingIndex {
    /// Create an empty index for the given dimension and pinned model.
    pub fn new(dimension: usize, embedding_model: impl Into<String>) -> Self {
        Self {
            chunks: Vec::new(),
            dimension,
            embedding_model: embedding_model.into(),
            metric: DistanceMetric::Cosine,
        }
    }

    /// Add chunks, rejecting any vector whose dimension differs from D.
    pub fn add_chunks(&mut self, chunks: Vec<DocumentChunk>) -> CoreResult<()> {
        for chunk in chunks {
            if chunk.embedding.len() != self.dimension {
                return Err(AssistantError::config(format!(
                    "embedding dimension mismatch: expected {}, got {}",
                    self.dimension,
                    chunk.embedding.len()
                )));
            }
            self.chunks.push(chunk);
        }
        Ok(())
    }

    /// Search for the k most similar chunks, ordered by descending cosine
    /// similarity. k larger than the index is clamped; an empty index yields
    /// an empty result. Ties break on insertion order, keeping results
    /// deterministic for a fixed index.
    pub fn search(&self, query_embedding: &[f32], k: usize) -> Vec<(usize, f32)> {
        if query_embedding.len() != self.dimension || self.chunks.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = self
            .chunks
            .iter()
            .enumerate()
            .map(|(idx, chunk)| (idx, cosine_similarity(query_embedding, &chunk.embedding)))
            .collect();

        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });

        scored.truncate(k.min(self.chunks.len()));
        scored
    }

    pub fn get_chunk(&self, index: usize) -> Option<&DocumentChunk> {
        self.chunks.get(index)
    }

    pub fn chunks(&self) -> &[DocumentChunk] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Identifier of the embedding model the index was built with.
    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Write the index snapshot to disk, replacing any previous one.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> CoreResult<()> {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            embedding_model: self.embedding_model.clone(),
            dimension: self.dimension,
            metric: self.metric,
            chunks: self.chunks.clone(),
        };

        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = std::fs::File::create(path.as_ref())?;
        serde_json::to_writer(std::io::BufWriter::new(file), &snapshot)?;

        info!(
            chunks = self.chunks.len(),
            model = %self.embedding_model,
            path = %path.as_ref().display(),
            "wrote index snapshot"
        );
        Ok(())
    }

    /// Load a snapshot produced by [`EmbeddingIndex::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        let snapshot: Snapshot = serde_json::from_reader(std::io::BufReader::new(file))?;

        if snapshot.version != SNAPSHOT_VERSION {
            return Err(AssistantError::config(format!(
                "unsupported index snapshot version {}",
                snapshot.version
            )));
        }

        info!(
            chunks = snapshot.chunks.len(),
            model = %snapshot.embedding_model,
            path = %path.as_ref().display(),
            "loaded index snapshot"
        );

        Ok(Self {
            chunks: snapshot.chunks,
            dimension: snapshot.dimension,
            embedding_model: snapshot.embedding_model,
            metric: snapshot.metric,
        })
    }
}

/// Cosine similarity between two vectors of equal length.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, embedding: Vec<f32>) -> DocumentChunk {
        DocumentChunk {
            id: Uuid::new_v4(),
            source_url: "https://example.edu/page.html".to_string(),
            text: text.to_string(),
            embedding,
        }
    }

    #[test]
    fn cosine_similarity_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn search_orders_by_descending_similarity() {
        let mut index = EmbeddingIndex::new(2, "test-model");
        index
            .add_chunks(vec![
                chunk("far", vec![0.0, 1.0]),
                chunk("close", vec![0.9, 0.1]),
                chunk("closest", vec![1.0, 0.0]),
            ])
            .unwrap();

        let results = index.search(&[1.0, 0.0], 3);
        assert_eq!(results.len(), 3);
        assert_eq!(index.get_chunk(results[0].0).unwrap().text, "closest");
        assert_eq!(index.get_chunk(results[1].0).unwrap().text, "close");
        // Non-increasing scores
        assert!(results[0].1 >= results[1].1);
        assert!(results[1].1 >= results[2].1);
    }

    #[test]
    fn k_is_clamped_to_index_size() {
        let mut index = EmbeddingIndex::new(2, "test-model");
        index
            .add_chunks(vec![chunk("a", vec![1.0, 0.0]), chunk("b", vec![0.5, 0.5])])
            .unwrap();

        assert_eq!(index.search(&[1.0, 0.0], 10).len(), 2);
        assert_eq!(index.search(&[1.0, 0.0], 1).len(), 1);
    }

    #[test]
    fn empty_index_returns_empty() {
        let index = EmbeddingIndex::new(2, "test-model");
        assert!(index.search(&[1.0, 0.0], 3).is_empty());
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let mut index = EmbeddingIndex::new(3, "test-model");
        let err = index.add_chunks(vec![chunk("bad", vec![1.0, 0.0])]);
        assert!(err.is_err());

        // Mismatched query vectors yield no results rather than garbage
        assert!(index.search(&[1.0, 0.0], 3).is_empty());
    }

    #[test]
    fn snapshot_preserves_pinned_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.json");

        let mut index = EmbeddingIndex::new(2, "text-embedding-3-small");
        index.add_chunks(vec![chunk("hello", vec![1.0, 0.0])]).unwrap();
        index.save(&path).unwrap();

        let loaded = EmbeddingIndex::load(&path).unwrap();
        assert_eq!(loaded.embedding_model(), "text-embedding-3-small");
        assert_eq!(loaded.dimension(), 2);
        assert_eq!(loaded.metric(), DistanceMetric::Cosine);
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded.get_chunk(0).unwrap().text, "hello");
    }
}
