//! Shared test helpers for retrieval tests.

use std::sync::Mutex;

use leavedesk_core::error::ProviderError;
use leavedesk_core::provider::{
    EmbeddingRequest, EmbeddingResponse, Provider, ProviderRequest, ProviderResponse,
};

const DIMENSIONS: usize = 64;

/// A provider with deterministic character-hash embeddings and a fixed
/// completion. Records every completion request it receives.
pub struct HashingProvider {
    answer: String,
    requests: Mutex<Vec<ProviderRequest>>,
    embed_calls: Mutex<usize>,
}

impl HashingProvider {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.into(),
            requests: Mutex::new(Vec::new()),
            embed_calls: Mutex::new(0),
        }
    }

    /// Bag-of-characters vector: texts sharing characters score higher.
    pub fn embed_text(text: &str) -> Vec<f32> {
        let mut v = vec![0.0; DIMENSIONS];
        for c in text.chars().filter(|c| !c.is_whitespace()) {
            v[(c as usize) % DIMENSIONS] += 1.0;
        }
        v
    }

    pub fn embed_calls(&self) -> usize {
        *self.embed_calls.lock().unwrap()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for HashingProvider {
    fn name(&self) -> &str {
        "hashing_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let model = request.model.clone();
        self.requests.lock().unwrap().push(request);
        Ok(ProviderResponse {
            content: self.answer.clone(),
            usage: None,
            model,
        })
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse, ProviderError> {
        *self.embed_calls.lock().unwrap() += 1;
        Ok(EmbeddingResponse {
            embeddings: request.inputs.iter().map(|t| Self::embed_text(t)).collect(),
            model: request.model,
        })
    }
}
