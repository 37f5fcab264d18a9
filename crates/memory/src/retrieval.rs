//! Prompt-ready views over the vector store.

use crate::store::VectorStore;
use crate::types::{DocumentType, SearchResult, VectorDocument};
use postwright_common::{Platform, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

const BRAND_QUERY: &str = "brand voice tone values audience";

/// Summary of what has worked for a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingInsights {
    /// Mean over successful posts that carry a score; 0 when none do
    pub average_engagement: f64,
    pub top_performing_content: Vec<String>,
    pub common_tags: Vec<String>,
    pub total_posts: usize,
}

impl TrainingInsights {
    /// Render as a prompt section, or `None` when there is nothing to say.
    pub fn to_prompt_section(&self) -> Option<String> {
        if self.total_posts == 0 {
            return None;
        }

        let mut out = format!(
            "Past performance: {} successful posts, average engagement {:.1}.",
            self.total_posts, self.average_engagement
        );
        if !self.common_tags.is_empty() {
            out.push_str(&format!("\nRecurring themes: {}", self.common_tags.join(", ")));
        }
        for content in &self.top_performing_content {
            out.push_str(&format!("\n- {}", truncate(content, 200)));
        }
        Some(out)
    }
}

/// Fixed-query compositions of [`VectorStore`] searches.
#[derive(Clone)]
pub struct MemoryRetriever {
    store: Arc<VectorStore>,
}

impl MemoryRetriever {
    pub fn new(store: Arc<VectorStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<VectorStore> {
        &self.store
    }

    /// Brand profile documents for `user_id`, formatted for a prompt.
    ///
    /// Profiles are included whatever their similarity to the query.
    pub async fn get_brand_context(&self, user_id: &str) -> Result<Option<String>> {
        let options = self
            .store
            .search_options(DocumentType::BrandProfile)
            .with_min_score(0.0);
        let results = self
            .store
            .search_similar_content(BRAND_QUERY, user_id, options)
            .await?;

        if results.is_empty() {
            return Ok(None);
        }
        let parts: Vec<String> = results.iter().map(|r| r.document.content.clone()).collect();
        Ok(Some(parts.join("\n\n")))
    }

    /// Successful posts lexically close to `topic`.
    pub async fn get_relevant_examples(
        &self,
        user_id: &str,
        topic: &str,
        platform: Option<Platform>,
    ) -> Result<Vec<SearchResult>> {
        let options = self
            .store
            .search_options(DocumentType::SuccessfulPost)
            .with_platform(platform)
            .with_min_score(self.store.config().example_min_score);
        let results = self
            .store
            .search_similar_content(topic, user_id, options)
            .await?;
        debug!(user_id, topic, examples = results.len(), "Retrieved examples");
        Ok(results)
    }

    /// Examples rendered as a prompt section; empty when there are none.
    pub async fn format_examples(
        &self,
        user_id: &str,
        topic: &str,
        platform: Option<Platform>,
    ) -> Result<String> {
        let results = self.get_relevant_examples(user_id, topic, platform).await?;
        Ok(results
            .iter()
            .map(|r| format_example(&r.document))
            .collect::<Vec<_>>()
            .join("\n\n"))
    }

    /// Aggregate every successful post stored for `user_id`.
    pub async fn get_training_insights(&self, user_id: &str) -> Result<TrainingInsights> {
        let mut posts = self
            .store
            .documents_for_user(user_id, Some(DocumentType::SuccessfulPost))
            .await;

        let scores: Vec<f64> = posts
            .iter()
            .filter_map(|d| d.metadata.engagement_score)
            .collect();
        let average_engagement = if scores.is_empty() {
            0.0
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };

        posts.sort_by(|a, b| {
            let a = a.metadata.engagement_score.unwrap_or(0.0);
            let b = b.metadata.engagement_score.unwrap_or(0.0);
            b.total_cmp(&a)
        });

        let top_performing_content = posts
            .iter()
            .take(3)
            .map(|d| d.content.clone())
            .collect();

        Ok(TrainingInsights {
            average_engagement,
            top_performing_content,
            common_tags: common_tags(&posts, 5),
            total_posts: posts.len(),
        })
    }
}

/// Most frequent tags, ties broken alphabetically.
fn common_tags(posts: &[VectorDocument], limit: usize) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for tag in posts.iter().flat_map(|d| &d.metadata.tags) {
        *counts.entry(tag.as_str()).or_default() += 1;
    }
    let mut counts: Vec<(&str, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    counts
        .into_iter()
        .take(limit)
        .map(|(tag, _)| tag.to_string())
        .collect()
}

fn format_example(doc: &VectorDocument) -> String {
    let platform = doc
        .metadata
        .platform
        .as_ref()
        .map(Platform::as_str)
        .unwrap_or("any");
    match doc.metadata.engagement_score {
        Some(score) => format!(
            "**[{platform}]** (engagement {score:.0})\n{}",
            truncate(&doc.content, 500)
        ),
        None => format!("**[{platform}]**\n{}", truncate(&doc.content, 500)),
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    match s.char_indices().nth(max_len) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}
