//! Policy-document retrieval for LeaveDesk.
//!
//! The pipeline is: load a document → split it into overlapping
//! sentence-aligned chunks → embed every chunk into a [`VectorIndex`] →
//! answer prompts through a [`VectorQueryEngine`], which retrieves the
//! top-k chunks and asks the LLM to answer from them.

pub mod engine;
pub mod index;
pub mod loader;
pub mod splitter;
pub mod vector;

pub use engine::{EngineSettings, VectorQueryEngine};
pub use index::{IndexedChunk, VectorIndex};
pub use loader::{load_document, Document};
pub use splitter::{Chunk, SentenceSplitter};
pub use vector::{cosine_similarity, top_k};

#[cfg(test)]
pub(crate) mod test_helpers;
