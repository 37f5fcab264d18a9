//! Research agent: trends, competitors and content ideas.

use std::sync::Arc;

use postwright_common::{AgentResult, Platform};
use postwright_llm::{ModelPreset, PromptTemplate, TemplateVars};
use postwright_memory::{DocumentType, VectorStore};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::base::{AgentCore, AgentSettings, join_or, or_default};

const TRENDING_PROMPT: PromptTemplate = PromptTemplate::new(
    r#"You are a social media trend researcher.

Identify current trending angles for the topic "{topic}" in the {industry} industry on: {platforms}.

Respond with a JSON array only:
[{{"title": "...", "description": "...", "relevanceScore": 0-100, "hashtags": ["..."], "platforms": ["..."]}}]"#,
);

const COMPETITOR_PROMPT: PromptTemplate = PromptTemplate::new(
    r#"You are a competitive analyst for social media marketing.

Analyse these competitors on {platform}: {competitors}

Recent competitor posts we have on file:
{stored_posts}

Respond with a JSON array only, one entry per competitor:
[{{"competitor": "...", "strengths": ["..."], "weaknesses": ["..."], "contentStrategy": "...", "postingFrequency": "...", "engagementTactics": ["..."]}}]"#,
);

const INSPIRATION_PROMPT: PromptTemplate = PromptTemplate::new(
    r#"You are a creative director brainstorming social content.

Suggest fresh content ideas about "{topic}" for {platforms}.
Brand tone: {tone}
Target audience: {audience}

Respond with a JSON array only:
[{{"title": "...", "description": "...", "format": "...", "hook": "...", "platforms": ["..."]}}]"#,
);

/// Input to trend research.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchRequest {
    pub topic: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub target_audience: Option<String>,
    #[serde(default)]
    pub tone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingTopic {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub relevance_score: f64,
    #[serde(default)]
    pub hashtags: Vec<String>,
    #[serde(default)]
    pub platforms: Vec<Platform>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorAnalysis {
    pub competitor: String,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub content_strategy: String,
    #[serde(default)]
    pub posting_frequency: String,
    #[serde(default)]
    pub engagement_tactics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentInspiration {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub hook: String,
    #[serde(default)]
    pub platforms: Vec<Platform>,
}

pub struct ResearchAgent {
    core: AgentCore,
    store: Option<Arc<VectorStore>>,
}

impl ResearchAgent {
    pub fn new(settings: &AgentSettings) -> Self {
        Self {
            core: AgentCore::new("research", settings, ModelPreset::Analytical),
            store: settings.store.clone(),
        }
    }

    pub async fn research_trending_content(
        &self,
        request: &ResearchRequest,
    ) -> AgentResult<Vec<TrendingTopic>> {
        info!(topic = %request.topic, "Researching trends");
        let vars = TemplateVars::from([
            ("topic", request.topic.clone()),
            ("industry", or_default(request.industry.as_deref(), "general")),
            ("platforms", platform_list(&request.platforms)),
        ]);
        let topic = request.topic.clone();
        self.core
            .generate_structured("trend research", &TRENDING_PROMPT, &vars, |_| {
                fallback_trends(&topic)
            })
            .await
    }

    /// Analyse `competitors`, folding in any competitor posts stored for
    /// `user_id`.
    pub async fn analyze_competitors(
        &self,
        competitors: &[String],
        platform: &Platform,
        user_id: Option<&str>,
    ) -> AgentResult<Vec<CompetitorAnalysis>> {
        info!(competitors = competitors.len(), %platform, "Analysing competitors");
        let stored_posts = self
            .stored_competitor_posts(competitors, platform, user_id)
            .await;
        let vars = TemplateVars::from([
            ("platform", platform.to_string()),
            ("competitors", join_or(competitors, "Unnamed competitors")),
            ("stored_posts", join_or(&stored_posts, "None")),
        ]);
        let first = competitors.first().cloned();
        self.core
            .generate_structured("competitor analysis", &COMPETITOR_PROMPT, &vars, |_| {
                fallback_competitors(first.as_deref())
            })
            .await
    }

    pub async fn generate_content_inspiration(
        &self,
        request: &ResearchRequest,
    ) -> AgentResult<Vec<ContentInspiration>> {
        info!(topic = %request.topic, "Generating inspiration");
        let vars = TemplateVars::from([
            ("topic", request.topic.clone()),
            ("platforms", platform_list(&request.platforms)),
            ("tone", or_default(request.tone.as_deref(), "Professional")),
            ("audience", or_default(request.target_audience.as_deref(), "General audience")),
        ]);
        let topic = request.topic.clone();
        self.core
            .generate_structured("content inspiration", &INSPIRATION_PROMPT, &vars, |_| {
                fallback_inspiration(&topic)
            })
            .await
    }

    async fn stored_competitor_posts(
        &self,
        competitors: &[String],
        platform: &Platform,
        user_id: Option<&str>,
    ) -> Vec<String> {
        let (Some(store), Some(user_id)) = (&self.store, user_id) else {
            return vec![];
        };
        let query = competitors.join(" ");
        let options = store
            .search_options(DocumentType::CompetitorContent)
            .with_platform(Some(platform.clone()));
        match store.search_similar_content(&query, user_id, options).await {
            Ok(results) => results
                .into_iter()
                .map(|r| format!("- {}", r.document.content))
                .collect(),
            Err(e) => {
                warn!(user_id, error = %e, "Competitor lookup failed");
                vec![]
            }
        }
    }
}

fn platform_list(platforms: &[Platform]) -> String {
    if platforms.is_empty() {
        return "all major platforms".to_string();
    }
    platforms
        .iter()
        .map(Platform::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn fallback_trends(topic: &str) -> Vec<TrendingTopic> {
    vec![TrendingTopic {
        title: format!("Practical takes on {topic}"),
        description: "Hands-on, experience-based posts consistently outperform announcements."
            .into(),
        relevance_score: 50.0,
        hashtags: vec![],
        platforms: vec![Platform::LinkedIn, Platform::Twitter],
    }]
}

pub fn fallback_competitors(competitor: Option<&str>) -> Vec<CompetitorAnalysis> {
    vec![CompetitorAnalysis {
        competitor: competitor.unwrap_or("Competitor").to_string(),
        strengths: vec!["Consistent posting schedule".into()],
        weaknesses: vec!["Limited audience interaction".into()],
        content_strategy: "Educational content mixed with product updates".into(),
        posting_frequency: "3-5 times per week".into(),
        engagement_tactics: vec!["Questions in captions".into()],
    }]
}

pub fn fallback_inspiration(topic: &str) -> Vec<ContentInspiration> {
    vec![ContentInspiration {
        title: format!("Behind the scenes: {topic}"),
        description: "Show how your team actually works with this topic day to day.".into(),
        format: "carousel".into(),
        hook: "Here's what nobody tells you...".into(),
        platforms: vec![Platform::LinkedIn, Platform::Instagram],
    }]
}
