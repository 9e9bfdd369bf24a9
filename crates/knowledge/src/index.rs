//! In-memory vector index over one document's chunks.

use leavedesk_core::error::RetrievalError;
use leavedesk_core::provider::{EmbeddingRequest, Provider};
use tracing::{debug, info};

use crate::splitter::Chunk;
use crate::vector::top_k;

/// A chunk together with its embedding.
#[derive(Debug, Clone)]
pub struct IndexedChunk {
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}

/// Embedded chunks of a single document, searchable by similarity.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    name: String,
    embedding_model: String,
    entries: Vec<IndexedChunk>,
}

impl VectorIndex {
    /// Embed `chunks` in batches of `batch_size` and build the index.
    pub async fn build(
        name: impl Into<String>,
        provider: &dyn Provider,
        embedding_model: impl Into<String>,
        chunks: Vec<Chunk>,
        batch_size: usize,
    ) -> Result<Self, RetrievalError> {
        let name = name.into();
        let embedding_model = embedding_model.into();

        if chunks.is_empty() {
            return Err(RetrievalError::EmptyIndex { engine: name });
        }

        let mut entries = Vec::with_capacity(chunks.len());
        for batch in chunks.chunks(batch_size.max(1)) {
            let request = EmbeddingRequest {
                model: embedding_model.clone(),
                inputs: batch.iter().map(|c| c.content.clone()).collect(),
            };
            let response = provider.embed(request).await.map_err(|e| RetrievalError::Embedding {
                engine: name.clone(),
                reason: e.to_string(),
            })?;

            if response.embeddings.len() != batch.len() {
                return Err(RetrievalError::Embedding {
                    engine: name.clone(),
                    reason: format!(
                        "expected {} embeddings, got {}",
                        batch.len(),
                        response.embeddings.len()
                    ),
                });
            }

            entries.extend(
                batch
                    .iter()
                    .cloned()
                    .zip(response.embeddings)
                    .map(|(chunk, embedding)| IndexedChunk { chunk, embedding }),
            );
            debug!(index = %name, embedded = entries.len(), "Embedded batch");
        }

        info!(index = %name, chunks = entries.len(), model = %embedding_model, "Vector index built");

        Ok(Self {
            name,
            embedding_model,
            entries,
        })
    }

    /// The `k` chunks most similar to `query_embedding`.
    pub fn search(&self, query_embedding: &[f32], k: usize) -> Vec<(f32, &IndexedChunk)> {
        top_k(&self.entries, query_embedding, k)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
