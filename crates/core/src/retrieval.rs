//! QueryEngine trait — the retrieval collaborator.
//!
//! A query engine is scoped to one policy document. Given a natural-language
//! prompt it performs top-k semantic retrieval over that document and
//! returns a generated answer. The composer only ever sees this call shape.

use async_trait::async_trait;
use crate::error::RetrievalError;

/// Answers prompts grounded in a single document.
///
/// An engine that cannot find an applicable rule answers with ordinary
/// text (e.g. "查無明確規則"); only transport or indexing failures are
/// errors.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    /// Engine name used in logs and errors (e.g., "leave_policy").
    fn name(&self) -> &str;

    /// Answer a prompt using the engine's document.
    async fn query(&self, prompt: &str) -> std::result::Result<String, RetrievalError>;
}
