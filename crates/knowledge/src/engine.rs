//! Retrieval-augmented query engine over a single policy document.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use leavedesk_config::AppConfig;
use leavedesk_core::error::{Result, RetrievalError};
use leavedesk_core::provider::{ChatMessage, EmbeddingRequest, Provider, ProviderRequest};
use leavedesk_core::retrieval::QueryEngine;
use tracing::{debug, info};

use crate::index::{IndexedChunk, VectorIndex};
use crate::loader::load_document;
use crate::splitter::SentenceSplitter;

const SYSTEM_PROMPT: &str = "你是公司人資助理。請只根據提供的文件條文，以繁體中文回答問題。\
若條文中沒有相關內容，請回答「查無明確規則」，不要自行推測。";

/// Model parameters used for one engine's calls.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub chat_model: String,
    pub embedding_model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub top_k: usize,
}

impl EngineSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            chat_model: config.default_model.clone(),
            embedding_model: config.retrieval.embedding_model.clone(),
            temperature: config.default_temperature,
            max_tokens: Some(config.default_max_tokens),
            top_k: config.retrieval.top_k,
        }
    }
}

/// Answers prompts from one indexed document.
pub struct VectorQueryEngine {
    index: VectorIndex,
    provider: Arc<dyn Provider>,
    settings: EngineSettings,
}

impl VectorQueryEngine {
    pub fn new(index: VectorIndex, provider: Arc<dyn Provider>, settings: EngineSettings) -> Self {
        Self {
            index,
            provider,
            settings,
        }
    }

    /// Load, split and embed the document at `path`.
    pub async fn from_document(
        name: &str,
        path: &Path,
        provider: Arc<dyn Provider>,
        config: &AppConfig,
    ) -> Result<Self> {
        let document = load_document(path)?;
        let splitter =
            SentenceSplitter::new(config.retrieval.chunk_size, config.retrieval.chunk_overlap);
        let chunks = splitter.split(&document);
        info!(engine = name, path = %path.display(), chunks = chunks.len(), "Indexing document");

        let settings = EngineSettings::from_config(config);
        let index = VectorIndex::build(
            name,
            provider.as_ref(),
            settings.embedding_model.clone(),
            chunks,
            config.retrieval.embed_batch_size,
        )
        .await?;

        Ok(Self::new(index, provider, settings))
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    async fn embed_query(&self, prompt: &str) -> std::result::Result<Vec<f32>, RetrievalError> {
        let request = EmbeddingRequest {
            model: self.index.embedding_model().to_string(),
            inputs: vec![prompt.to_string()],
        };
        let response = self
            .provider
            .embed(request)
            .await
            .map_err(|e| RetrievalError::Embedding {
                engine: self.index.name().to_string(),
                reason: e.to_string(),
            })?;

        response
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| RetrievalError::Embedding {
                engine: self.index.name().to_string(),
                reason: "no embedding returned for query".into(),
            })
    }
}

/// Number the retrieved chunks and wrap them around the question.
fn build_user_message(context: &[(f32, &IndexedChunk)], prompt: &str) -> String {
    let mut out = String::from("以下是相關文件條文：\n---------------------\n");
    for (i, (_, entry)) in context.iter().enumerate() {
        out.push_str(&format!("[{}] {}\n\n", i + 1, entry.chunk.content));
    }
    out.push_str("---------------------\n");
    out.push_str(&format!("問題：{prompt}\n回答："));
    out
}

#[async_trait]
impl QueryEngine for VectorQueryEngine {
    fn name(&self) -> &str {
        self.index.name()
    }

    async fn query(&self, prompt: &str) -> std::result::Result<String, RetrievalError> {
        let query_embedding = self.embed_query(prompt).await?;
        let context = self.index.search(&query_embedding, self.settings.top_k);
        debug!(
            engine = self.index.name(),
            retrieved = context.len(),
            best_score = context.first().map(|(s, _)| *s).unwrap_or(0.0),
            "Retrieved context"
        );

        let request = ProviderRequest {
            model: self.settings.chat_model.clone(),
            messages: vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(build_user_message(&context, prompt)),
            ],
            temperature: self.settings.temperature,
            max_tokens: self.settings.max_tokens,
        };

        let response =
            self.provider
                .complete(request)
                .await
                .map_err(|source| RetrievalError::Provider {
                    engine: self.index.name().to_string(),
                    source,
                })?;

        Ok(response.content.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::HashingProvider;
    use leavedesk_core::error::{Error, IngestError, ProviderError};
    use leavedesk_core::provider::{ChatRole, ProviderResponse};

    fn config_with_small_chunks() -> AppConfig {
        let mut config = AppConfig::default();
        config.retrieval.chunk_size = 30;
        config.retrieval.chunk_overlap = 0;
        config.retrieval.top_k = 1;
        config
    }

    fn write_policy(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("leave_policy.txt");
        std::fs::write(
            &path,
            "婚假八日，應於結婚前後三個月內請畢。\n事假全年合計不得超過十四日。\n",
        )
        .unwrap();
        path
    }

    #[tokio::test]
    async fn query_sends_retrieved_context_and_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_policy(dir.path());
        let provider = Arc::new(HashingProvider::new("  事假每年十四天。 \n"));

        let engine = VectorQueryEngine::from_document(
            "leave_policy",
            &path,
            provider.clone(),
            &config_with_small_chunks(),
        )
        .await
        .unwrap();
        assert_eq!(engine.name(), "leave_policy");
        assert_eq!(engine.index().len(), 2);

        let answer = engine.query("事假十四日").await.unwrap();
        assert_eq!(answer, "事假每年十四天。");

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        let messages = &requests[0].messages;
        assert_eq!(messages[0].role, ChatRole::System);
        assert!(messages[0].content.contains("查無明確規則"));
        assert!(messages[1].content.contains("[1] 事假全年合計不得超過十四日。"));
        assert!(!messages[1].content.contains("婚假"));
        assert!(messages[1].content.ends_with("問題：事假十四日\n回答："));
    }

    #[tokio::test]
    async fn missing_document_is_ingest_error() {
        let provider = Arc::new(HashingProvider::new("unused"));
        let result = VectorQueryEngine::from_document(
            "approval_flow",
            Path::new("/nonexistent/approval_flow.pdf"),
            provider,
            &AppConfig::default(),
        )
        .await;
        assert!(matches!(result, Err(Error::Ingest(IngestError::Read { .. }))));
    }

    struct DownProvider;

    #[async_trait]
    impl Provider for DownProvider {
        fn name(&self) -> &str {
            "down"
        }

        async fn complete(
            &self,
            _request: ProviderRequest,
        ) -> std::result::Result<ProviderResponse, ProviderError> {
            Err(ProviderError::Timeout("300s".into()))
        }

        async fn embed(
            &self,
            request: EmbeddingRequest,
        ) -> std::result::Result<leavedesk_core::provider::EmbeddingResponse, ProviderError>
        {
            HashingProvider::new("").embed(request).await
        }
    }

    #[tokio::test]
    async fn completion_failure_names_the_engine() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_policy(dir.path());

        let engine = VectorQueryEngine::from_document(
            "leave_policy",
            &path,
            Arc::new(DownProvider),
            &config_with_small_chunks(),
        )
        .await
        .unwrap();

        let err = engine.query("事假").await.unwrap_err();
        match err {
            RetrievalError::Provider { engine, source } => {
                assert_eq!(engine, "leave_policy");
                assert!(matches!(source, ProviderError::Timeout(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
