//! Content agent: one post per platform and post type.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::try_join_all;
use postwright_common::{
    AgentResult, ContentRequest, GeneratedContent, Platform, PostType, PostwrightError, content_key,
};
use postwright_llm::{ModelPreset, PromptTemplate, TemplateVars};
use postwright_memory::{MemoryRetriever, VectorStore};
use serde::Deserialize;
use tracing::{info, warn};

use crate::base::{AgentCore, AgentSettings, decode_or_else, join_or, or_default};

const CONTENT_PROMPT: PromptTemplate = PromptTemplate::new(
    r#"You are an expert social media copywriter.

Write one {post_type} for {platform} about: {topic}
Brief: {brief}

Brand: {brand_name}
Tone: {tone}
Writing style: {writing_style}
Target audience: {audience}
Brand values: {brand_values}
Preferred words: {preferred_words}
Words to avoid: {avoided_words}
Content pillars: {pillars}
Campaign: {campaign}

Platform guidelines: {guidelines}
Maximum length: {max_length} characters

Current trends worth referencing:
{insights}

Brand knowledge:
{brand_context}

Posts that performed well before:
{examples}

Respond with JSON only:
{{"content": "...", "hashtags": ["..."], "mediaDescription": "...", "schedulingSuggestion": "...", "engagementTips": ["..."]}}"#,
);

/// Extra inputs gathered outside the request itself.
#[derive(Debug, Clone, Default)]
pub struct ContentContext {
    /// Short research findings (trend titles) to weave in
    pub insights: Vec<String>,
    /// Owner of stored brand context and examples
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentReply {
    content: String,
    #[serde(default)]
    hashtags: Vec<String>,
    #[serde(default)]
    media_description: String,
    #[serde(default)]
    scheduling_suggestion: String,
    #[serde(default)]
    engagement_tips: Vec<String>,
}

/// Generates platform-specific posts.
pub struct ContentAgent {
    core: AgentCore,
    retriever: Option<MemoryRetriever>,
}

impl ContentAgent {
    pub fn new(settings: &AgentSettings) -> Self {
        Self {
            core: AgentCore::new("content", settings, ModelPreset::Creative),
            retriever: settings.store.clone().map(MemoryRetriever::new),
        }
    }

    pub fn with_store(mut self, store: Arc<VectorStore>) -> Self {
        self.retriever = Some(MemoryRetriever::new(store));
        self
    }

    /// One post per distinct (platform, post type) pair in `request`.
    pub async fn generate_content(
        &self,
        request: &ContentRequest,
    ) -> AgentResult<BTreeMap<String, GeneratedContent>> {
        self.generate_content_with_context(request, &ContentContext::default())
            .await
    }

    /// As [`generate_content`](Self::generate_content), with research
    /// insights and stored brand knowledge folded into each prompt.
    ///
    /// All pairs are generated concurrently within one retried operation,
    /// so a single failing pair retries the whole set.
    pub async fn generate_content_with_context(
        &self,
        request: &ContentRequest,
        context: &ContentContext,
    ) -> AgentResult<BTreeMap<String, GeneratedContent>> {
        let pairs = request.pairs();
        info!(
            topic = %request.topic,
            pairs = pairs.len(),
            user_id = ?context.user_id,
            "Generating content"
        );

        let brand_context = self.brand_context(context.user_id.as_deref()).await;
        let mut jobs = Vec::with_capacity(pairs.len());
        for (platform, post_type) in pairs {
            let examples = self
                .examples(context.user_id.as_deref(), &request.topic, &platform)
                .await;
            let vars = content_vars(request, &platform, &post_type, context, &brand_context, &examples);
            jobs.push((platform, post_type, vars));
        }

        let client = self.core.client();
        self.core
            .execute(
                || {
                    try_join_all(jobs.iter().map(|(platform, post_type, vars)| async move {
                        let raw = client.generate(&CONTENT_PROMPT, vars).await?;
                        let content = parse_content(platform, post_type, &raw);
                        Ok::<_, PostwrightError>((
                            content_key(platform, post_type),
                            content,
                        ))
                    }))
                },
                "content generation",
            )
            .await
            .map(|items| items.into_iter().collect())
    }

    async fn brand_context(&self, user_id: Option<&str>) -> String {
        let (Some(retriever), Some(user_id)) = (&self.retriever, user_id) else {
            return "None".to_string();
        };
        match retriever.get_brand_context(user_id).await {
            Ok(Some(context)) => context,
            Ok(None) => "None".to_string(),
            Err(e) => {
                warn!(user_id, error = %e, "Brand context lookup failed");
                "None".to_string()
            }
        }
    }

    async fn examples(&self, user_id: Option<&str>, topic: &str, platform: &Platform) -> String {
        let (Some(retriever), Some(user_id)) = (&self.retriever, user_id) else {
            return "None".to_string();
        };
        match retriever
            .format_examples(user_id, topic, Some(platform.clone()))
            .await
        {
            Ok(examples) if !examples.is_empty() => examples,
            Ok(_) => "None".to_string(),
            Err(e) => {
                warn!(user_id, error = %e, "Example lookup failed");
                "None".to_string()
            }
        }
    }
}

fn content_vars(
    request: &ContentRequest,
    platform: &Platform,
    post_type: &PostType,
    context: &ContentContext,
    brand_context: &str,
    examples: &str,
) -> TemplateVars {
    let brand = request.brand_profile.clone().unwrap_or_default();
    let campaign = request
        .campaign
        .as_ref()
        .map(|c| match &c.objective {
            Some(objective) => format!("{} ({objective})", c.name),
            None => c.name.clone(),
        });
    let insights = if context.insights.is_empty() {
        "None".to_string()
    } else {
        context
            .insights
            .iter()
            .map(|i| format!("- {i}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    TemplateVars::from([
        ("platform", platform.to_string()),
        ("post_type", post_type.to_string()),
        ("topic", request.topic.clone()),
        ("brief", or_default(Some(request.brief.as_str()), "No additional brief")),
        ("brand_name", or_default(brand.name.as_deref(), "Our brand")),
        ("tone", or_default(brand.tone.as_deref(), "Professional")),
        ("writing_style", or_default(brand.writing_style.as_deref(), "Clear and engaging")),
        ("audience", or_default(request.audience(), "General audience")),
        ("brand_values", join_or(&brand.brand_values, "Not specified")),
        ("preferred_words", join_or(&brand.preferred_words, "None")),
        ("avoided_words", join_or(&brand.avoided_words, "None")),
        ("pillars", join_or(request.pillars(), "None")),
        ("campaign", campaign.unwrap_or_else(|| "None".to_string())),
        ("guidelines", platform_guidelines(platform, post_type).to_string()),
        (
            "max_length",
            platform
                .max_length()
                .map(|n| n.to_string())
                .unwrap_or_else(|| "No limit".to_string()),
        ),
        ("insights", insights),
        ("brand_context", brand_context.to_string()),
        ("examples", examples.to_string()),
    ])
}

fn parse_content(platform: &Platform, post_type: &PostType, raw: &str) -> GeneratedContent {
    decode_or_else("content", "content generation", raw, fallback_reply)
        .into_generated(platform, post_type)
}

fn fallback_reply(raw: &str) -> ContentReply {
    ContentReply {
        content: raw.to_string(),
        hashtags: vec![],
        media_description: String::new(),
        scheduling_suggestion: String::new(),
        engagement_tips: vec![],
    }
}

impl ContentReply {
    fn into_generated(self, platform: &Platform, post_type: &PostType) -> GeneratedContent {
        GeneratedContent {
            platform: platform.clone(),
            post_type: post_type.clone(),
            content: self.content,
            hashtags: self.hashtags,
            media_description: self.media_description,
            scheduling_suggestion: self.scheduling_suggestion,
            engagement_tips: self.engagement_tips,
        }
    }
}

/// Content used when a reply carries no structure: the raw text as the post
/// body, everything else empty.
pub fn fallback_content(platform: &Platform, post_type: &PostType, raw: &str) -> GeneratedContent {
    fallback_reply(raw).into_generated(platform, post_type)
}

const GENERIC_GUIDELINES: &str =
    "Follow platform best practices: open with a hook, keep it concise, and end with a clear call to action.";

/// Writing rules for a platform and post type.
///
/// Every pair has an answer; pairs without dedicated rules get the generic
/// best-practices text.
pub fn platform_guidelines(platform: &Platform, post_type: &PostType) -> &'static str {
    use PostType::*;
    match (platform, post_type) {
        (Platform::Twitter, Post) => {
            "Max 280 characters. Lead with the key point, use 1-2 hashtags, and invite replies."
        }
        (Platform::Twitter, Thread) => {
            "Number each tweet, keep each under 280 characters, make the first tweet a strong hook and finish with a summary."
        }
        (Platform::LinkedIn, Post) => {
            "Professional tone. Open with a one-line hook, use short paragraphs, share an insight or lesson, 3-5 hashtags."
        }
        (Platform::LinkedIn, Article) => {
            "Long-form with a headline, subheadings and actionable takeaways. Establish thought leadership."
        }
        (Platform::LinkedIn, Carousel) => {
            "One idea per slide, bold slide titles, a cover slide that promises value and a closing call to action."
        }
        (Platform::Instagram, Post) => {
            "Visual-first caption. Hook in the first line, line breaks for readability, up to 30 hashtags at the end."
        }
        (Platform::Instagram, Story) => {
            "Very short text overlays, interactive stickers (polls, questions), vertical 9:16 framing."
        }
        (Platform::Instagram, Reel) => {
            "Hook within 3 seconds, trending audio, on-screen captions, 15-30 seconds."
        }
        (Platform::Instagram, Carousel) => {
            "Up to 10 slides telling one story, consistent visual style, swipe prompt on the first slide."
        }
        (Platform::Facebook, Post) => {
            "Conversational and community-focused. Ask a question, keep it under 80 words, 1-2 hashtags at most."
        }
        (Platform::Facebook, Video) => {
            "Captions on by default, value in the first 3 seconds, 1-3 minutes long."
        }
        (Platform::TikTok, Video | Short | Post) => {
            "Authentic and fast-paced. Hook instantly, follow trends and sounds, 15-60 seconds, few hashtags."
        }
        (Platform::YouTube, Video) => {
            "Searchable title, strong thumbnail concept, hook in 15 seconds, chapters and a call to subscribe."
        }
        (Platform::YouTube, Short) => {
            "Vertical, under 60 seconds, loopable ending, one clear idea."
        }
        (
            Platform::Twitter
            | Platform::LinkedIn
            | Platform::Instagram
            | Platform::Facebook
            | Platform::TikTok
            | Platform::YouTube
            | Platform::Other(_),
            _,
        ) => GENERIC_GUIDELINES,
    }
}
