//! In-process retrieval store for Postwright.
//!
//! Documents (brand profiles, training samples, successful and competitor
//! posts) are embedded on insert and ranked by cosine similarity at query
//! time. Every search is scoped to one user.
//!
//! ```text
//!   add_*() ──► Embedder ──► VectorStore (RwLock<HashMap<id, doc>>)
//!                                 │
//!   search_similar_content() ─────┤ user / type / platform filter
//!                                 ▼ cosine ≥ min_score, best-first, limit
//!                            MemoryRetriever
//!                 brand context · examples · training insights
//! ```
//!
//! The bundled [`HashEmbedder`] only measures lexical overlap. Swap in a
//! real model through [`VectorStore::with_embedder`].

pub mod embedding;
pub mod retrieval;
pub mod store;
pub mod types;

pub use embedding::{Embedder, EmbeddingError, HashEmbedder, cosine_similarity};
pub use retrieval::{MemoryRetriever, TrainingInsights};
pub use store::VectorStore;
pub use types::{
    DocumentMetadata, DocumentType, MemoryConfig, SearchOptions, SearchResult, VectorDocument,
};
