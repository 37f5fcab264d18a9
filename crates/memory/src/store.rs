//! In-process vector store.

use crate::embedding::{Embedder, HashEmbedder, cosine_similarity};
use crate::types::{DocumentType, MemoryConfig, SearchOptions, SearchResult, VectorDocument};
use postwright_common::{BrandProfile, Platform, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Documents keyed by id, embedded on insert.
///
/// Nothing is persisted; the contents are lost when the store is dropped.
/// Inserts for the same id are last-write-wins.
pub struct VectorStore {
    config: MemoryConfig,
    embedder: Arc<dyn Embedder>,
    documents: RwLock<HashMap<String, VectorDocument>>,
}

impl VectorStore {
    /// Create a store using the hash embedder.
    pub fn new(config: MemoryConfig) -> Self {
        let embedder = Arc::new(HashEmbedder::new(config.embedding_dim));
        Self::with_embedder(config, embedder)
    }

    /// Create a store with a custom embedder.
    pub fn with_embedder(config: MemoryConfig, embedder: Arc<dyn Embedder>) -> Self {
        info!(
            embedder = embedder.name(),
            dimension = embedder.dimension(),
            "Initializing vector store"
        );
        Self {
            config,
            embedder,
            documents: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Configured limit and threshold for searches over one document type.
    pub fn search_options(&self, doc_type: DocumentType) -> SearchOptions {
        self.config.search_options_for(doc_type)
    }

    /// Embed and store `document`, replacing any document with the same id.
    pub async fn add_document(&self, mut document: VectorDocument) -> Result<String> {
        let embedding = self.embedder.embed(&document.content).await?;
        document.embedding = Some(embedding);

        debug!(
            document_id = %document.id,
            doc_type = ?document.metadata.doc_type,
            user_id = %document.metadata.user_id,
            "Adding document"
        );

        let id = document.id.clone();
        self.documents.write().await.insert(id.clone(), document);
        Ok(id)
    }

    /// Store a brand profile as pretty-printed JSON under a stable per-user id.
    pub async fn add_brand_profile(&self, user_id: &str, profile: &BrandProfile) -> Result<String> {
        let content = serde_json::to_string_pretty(profile)?;
        let document = VectorDocument::new(user_id, DocumentType::BrandProfile, content)
            .with_id(format!("brand_{user_id}"));
        self.add_document(document).await
    }

    pub async fn add_training_content(
        &self,
        user_id: &str,
        content: &str,
        platform: Option<Platform>,
        tags: Vec<String>,
    ) -> Result<String> {
        let mut document = VectorDocument::new(user_id, DocumentType::TrainingContent, content)
            .with_tags(tags);
        document.metadata.platform = platform;
        self.add_document(document).await
    }

    pub async fn add_successful_post(
        &self,
        user_id: &str,
        content: &str,
        platform: Platform,
        engagement_score: f64,
        tags: Vec<String>,
    ) -> Result<String> {
        let document = VectorDocument::new(user_id, DocumentType::SuccessfulPost, content)
            .with_platform(platform)
            .with_engagement_score(engagement_score)
            .with_tags(tags);
        self.add_document(document).await
    }

    pub async fn add_competitor_content(
        &self,
        user_id: &str,
        content: &str,
        platform: Platform,
        competitor: &str,
    ) -> Result<String> {
        let document = VectorDocument::new(user_id, DocumentType::CompetitorContent, content)
            .with_platform(platform)
            .with_tags(vec![format!("competitor:{competitor}")]);
        self.add_document(document).await
    }

    pub async fn get_document(&self, id: &str) -> Option<VectorDocument> {
        self.documents.read().await.get(id).cloned()
    }

    pub async fn document_count(&self) -> usize {
        self.documents.read().await.len()
    }

    /// All documents of one type owned by `user_id`, in no particular order.
    pub async fn documents_for_user(
        &self,
        user_id: &str,
        doc_type: Option<DocumentType>,
    ) -> Vec<VectorDocument> {
        self.documents
            .read()
            .await
            .values()
            .filter(|d| d.metadata.user_id == user_id)
            .filter(|d| doc_type.is_none_or(|t| d.metadata.doc_type == t))
            .cloned()
            .collect()
    }

    /// Rank `user_id`'s documents by cosine similarity to `query`.
    ///
    /// Only documents owned by `user_id` are considered. Scores below
    /// `options.min_score` are dropped; the rest are sorted best-first and
    /// cut to `options.limit`.
    pub async fn search_similar_content(
        &self,
        query: &str,
        user_id: &str,
        options: SearchOptions,
    ) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedder.embed(query).await?;

        let documents = self.documents.read().await;
        let mut results: Vec<SearchResult> = documents
            .values()
            .filter(|d| d.metadata.user_id == user_id)
            .filter(|d| options.doc_type.is_none_or(|t| d.metadata.doc_type == t))
            .filter(|d| {
                options
                    .platform
                    .as_ref()
                    .is_none_or(|p| d.metadata.platform.as_ref() == Some(p))
            })
            .filter_map(|d| {
                let embedding = d.embedding.as_deref()?;
                let score = cosine_similarity(&query_embedding, embedding);
                (score >= options.min_score).then(|| SearchResult {
                    document: d.clone(),
                    score,
                })
            })
            .collect();
        drop(documents);

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(options.limit);

        debug!(
            user_id,
            doc_type = ?options.doc_type,
            limit = options.limit,
            hits = results.len(),
            "Searched similar content"
        );

        Ok(results)
    }
}

impl Default for VectorStore {
    fn default() -> Self {
        Self::new(MemoryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_document_embeds_and_overwrites() {
        let store = VectorStore::default();
        let doc = VectorDocument::new("u1", DocumentType::TrainingContent, "first draft")
            .with_id("fixed");
        store.add_document(doc).await.unwrap();

        let doc = VectorDocument::new("u1", DocumentType::TrainingContent, "second draft")
            .with_id("fixed");
        store.add_document(doc).await.unwrap();

        assert_eq!(store.document_count().await, 1);
        let stored = store.get_document("fixed").await.unwrap();
        assert_eq!(stored.content, "second draft");
        assert_eq!(stored.embedding.unwrap().len(), 384);
    }

    #[tokio::test]
    async fn brand_profile_uses_stable_id() {
        let store = VectorStore::default();
        let profile = BrandProfile {
            name: Some("Acme".into()),
            ..Default::default()
        };
        let id = store.add_brand_profile("u1", &profile).await.unwrap();
        store.add_brand_profile("u1", &profile).await.unwrap();

        assert_eq!(id, "brand_u1");
        assert_eq!(store.document_count().await, 1);
        assert!(store.get_document(&id).await.unwrap().content.contains("Acme"));
    }

    #[tokio::test]
    async fn search_filters_sorts_and_limits() {
        let store = VectorStore::default();
        store
            .add_successful_post("u1", "rust async tips", Platform::Twitter, 80.0, vec![])
            .await
            .unwrap();
        store
            .add_successful_post("u1", "rust async tips and tricks", Platform::Twitter, 60.0, vec![])
            .await
            .unwrap();
        store
            .add_successful_post("u1", "rust async tips", Platform::LinkedIn, 90.0, vec![])
            .await
            .unwrap();
        store
            .add_training_content("u1", "rust async tips", None, vec![])
            .await
            .unwrap();

        let options = SearchOptions::of_type(DocumentType::SuccessfulPost)
            .with_platform(Some(Platform::Twitter))
            .with_min_score(0.0);
        let results = store
            .search_similar_content("rust async tips", "u1", options)
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].document.content, "rust async tips");
        assert!((results[0].score - 1.0).abs() < 1e-5);
        assert!(results[0].score >= results[1].score);

        let options = SearchOptions::default().with_min_score(0.0).with_limit(1);
        let results = store
            .search_similar_content("rust async tips", "u1", options)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn min_score_drops_weak_matches() {
        let store = VectorStore::default();
        store
            .add_training_content("u1", "completely unrelated words here", None, vec![])
            .await
            .unwrap();

        let results = store
            .search_similar_content("rust async tips", "u1", SearchOptions::default())
            .await
            .unwrap();
        assert!(results.is_empty());
    }
}
