//! Document types and configuration.

use chrono::{DateTime, Utc};
use postwright_common::Platform;
use serde::{Deserialize, Serialize};

/// What kind of text a document holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Serialised brand profile
    BrandProfile,
    /// Writing samples supplied for style training
    TrainingContent,
    /// Published posts that performed well
    SuccessfulPost,
    /// Posts captured from competitors
    CompetitorContent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    #[serde(rename = "type")]
    pub doc_type: DocumentType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,

    /// Engagement score (0-100) for published posts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement_score: Option<f64>,

    pub created_at: DateTime<Utc>,

    pub user_id: String,

    #[serde(default)]
    pub tags: Vec<String>,
}

/// A stored, embedded text document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorDocument {
    pub id: String,

    pub content: String,

    pub metadata: DocumentMetadata,

    /// Populated by the store on insert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
}

impl VectorDocument {
    pub fn new(user_id: impl Into<String>, doc_type: DocumentType, content: impl Into<String>) -> Self {
        Self {
            id: format!("doc_{}", uuid::Uuid::new_v4()),
            content: content.into(),
            metadata: DocumentMetadata {
                doc_type,
                platform: None,
                engagement_score: None,
                created_at: Utc::now(),
                user_id: user_id.into(),
                tags: vec![],
            },
            embedding: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.metadata.platform = Some(platform);
        self
    }

    pub fn with_engagement_score(mut self, score: f64) -> Self {
        self.metadata.engagement_score = Some(score.clamp(0.0, 100.0));
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.metadata.tags = tags;
        self
    }
}

/// Filters and bounds for a similarity search.
#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub doc_type: Option<DocumentType>,
    pub platform: Option<Platform>,
    pub limit: usize,
    /// Results scoring below this are dropped
    pub min_score: f32,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            doc_type: None,
            platform: None,
            limit: 5,
            min_score: 0.7,
        }
    }
}

impl SearchOptions {
    pub fn of_type(doc_type: DocumentType) -> Self {
        Self {
            doc_type: Some(doc_type),
            ..Default::default()
        }
    }

    pub fn with_doc_type(mut self, doc_type: DocumentType) -> Self {
        self.doc_type = Some(doc_type);
        self
    }

    pub fn with_platform(mut self, platform: Option<Platform>) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_min_score(mut self, min_score: f32) -> Self {
        self.min_score = min_score;
        self
    }
}

#[derive(Debug, Clone)]
pub struct SearchResult {
    pub document: VectorDocument,
    pub score: f32,
}

/// Configuration for the retrieval store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Embedding dimension
    #[serde(default = "default_embedding_dim")]
    pub embedding_dim: usize,

    /// Results returned when a search names no limit
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    /// Minimum similarity for searches that set no threshold of their own
    #[serde(default = "default_min_score")]
    pub min_score: f32,

    /// Minimum similarity when pulling example posts into a prompt
    #[serde(default = "default_example_min_score")]
    pub example_min_score: f32,
}

fn default_embedding_dim() -> usize {
    crate::embedding::DEFAULT_DIMENSION
}

fn default_limit() -> usize {
    5
}

fn default_min_score() -> f32 {
    0.7
}

fn default_example_min_score() -> f32 {
    0.3
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            embedding_dim: default_embedding_dim(),
            default_limit: default_limit(),
            min_score: default_min_score(),
            example_min_score: default_example_min_score(),
        }
    }
}

impl MemoryConfig {
    /// Search options seeded from this configuration.
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            limit: self.default_limit,
            min_score: self.min_score,
            ..Default::default()
        }
    }

    /// As [`search_options`](Self::search_options), restricted to one type.
    pub fn search_options_for(&self, doc_type: DocumentType) -> SearchOptions {
        self.search_options().with_doc_type(doc_type)
    }
}
