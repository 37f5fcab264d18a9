//! Scheduling agent: when to publish a piece of content.

use postwright_common::{AgentResult, Platform, PostType};
use postwright_llm::{ModelPreset, PromptTemplate, TemplateVars};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::base::{AgentCore, AgentSettings, or_default};

const SCHEDULING_PROMPT: PromptTemplate = PromptTemplate::new(
    r#"You are a social media strategist who knows when audiences are active.

Suggest the best time to publish this {post_type} on {platform}.

Content:
{content}

Target audience: {audience}
Timezone: {timezone}
Industry: {industry}

Respond with JSON only:
{{"optimalTime": "...", "alternativeTimes": ["..."], "reasoning": "...", "dayOfWeek": "...", "engagement_prediction": 0-100, "best_practices": ["..."]}}"#,
);

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingRequest {
    pub platform: Platform,
    #[serde(default = "default_post_type")]
    pub post_type: PostType,
    pub content: String,
    #[serde(default)]
    pub target_audience: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub industry: Option<String>,
}

fn default_post_type() -> PostType {
    PostType::Post
}

impl SchedulingRequest {
    pub fn new(platform: Platform, post_type: PostType, content: impl Into<String>) -> Self {
        Self {
            platform,
            post_type,
            content: content.into(),
            target_audience: None,
            timezone: None,
            industry: None,
        }
    }
}

/// When to post, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingSuggestion {
    pub optimal_time: String,
    #[serde(default)]
    pub alternative_times: Vec<String>,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub day_of_week: String,
    /// Expected engagement on a 0-100 scale
    #[serde(rename = "engagement_prediction", default)]
    pub engagement_prediction: f64,
    #[serde(rename = "best_practices", default)]
    pub best_practices: Vec<String>,
}

pub struct SchedulingAgent {
    core: AgentCore,
}

impl SchedulingAgent {
    pub fn new(settings: &AgentSettings) -> Self {
        Self {
            core: AgentCore::new("scheduling", settings, ModelPreset::Analytical),
        }
    }

    pub async fn suggest_optimal_timing(
        &self,
        request: &SchedulingRequest,
    ) -> AgentResult<SchedulingSuggestion> {
        info!(platform = %request.platform, post_type = %request.post_type, "Suggesting timing");

        let vars = TemplateVars::from([
            ("platform", request.platform.to_string()),
            ("post_type", request.post_type.to_string()),
            ("content", request.content.clone()),
            ("audience", or_default(request.target_audience.as_deref(), "General audience")),
            ("timezone", or_default(request.timezone.as_deref(), "UTC")),
            ("industry", or_default(request.industry.as_deref(), "General")),
        ]);

        let platform = request.platform.clone();
        self.core
            .generate_structured(
                "scheduling suggestion",
                &SCHEDULING_PROMPT,
                &vars,
                |_| default_schedule(&platform),
            )
            .await
            .map(|mut suggestion: SchedulingSuggestion| {
                suggestion.engagement_prediction = suggestion.engagement_prediction.clamp(0.0, 100.0);
                suggestion
            })
    }
}

/// Static schedule used when a reply carries no structure.
///
/// LinkedIn, Twitter and Instagram have their own profile; every other
/// platform uses the LinkedIn one.
pub fn default_schedule(platform: &Platform) -> SchedulingSuggestion {
    match platform {
        Platform::Twitter => SchedulingSuggestion {
            optimal_time: "12:00 PM".into(),
            alternative_times: vec!["9:00 AM".into(), "5:00 PM".into()],
            reasoning: "Twitter activity peaks around lunch and the end of the working day.".into(),
            day_of_week: "Wednesday".into(),
            engagement_prediction: 70.0,
            best_practices: vec![
                "Post during commute and lunch hours".into(),
                "Reply to early comments quickly".into(),
                "Use 1-2 relevant hashtags".into(),
            ],
        },
        Platform::Instagram => SchedulingSuggestion {
            optimal_time: "11:00 AM".into(),
            alternative_times: vec!["2:00 PM".into(), "7:00 PM".into()],
            reasoning: "Instagram users browse late morning and again in the evening.".into(),
            day_of_week: "Wednesday".into(),
            engagement_prediction: 72.0,
            best_practices: vec![
                "Post consistently at the same times".into(),
                "Use Stories to promote new posts".into(),
                "Engage with comments in the first hour".into(),
            ],
        },
        Platform::LinkedIn
        | Platform::Facebook
        | Platform::TikTok
        | Platform::YouTube
        | Platform::Other(_) => SchedulingSuggestion {
            optimal_time: "9:00 AM".into(),
            alternative_times: vec!["12:00 PM".into(), "5:00 PM".into()],
            reasoning: "Professionals check feeds at the start of the workday and during lunch.".into(),
            day_of_week: "Tuesday".into(),
            engagement_prediction: 75.0,
            best_practices: vec![
                "Post on weekdays during business hours".into(),
                "Avoid weekends".into(),
                "Respond to comments within the first hour".into(),
            ],
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedClient;
    use std::sync::Arc;

    #[test]
    fn unknown_platforms_use_linkedin_profile() {
        let linkedin = default_schedule(&Platform::LinkedIn);
        assert_eq!(default_schedule(&Platform::TikTok), linkedin);
        assert_eq!(default_schedule(&Platform::Other("threads".into())), linkedin);
        assert_ne!(default_schedule(&Platform::Twitter), linkedin);
    }

    #[tokio::test]
    async fn parses_structured_reply() {
        let client = Arc::new(ScriptedClient::always(
            r#"{"optimalTime": "8:30 AM", "alternativeTimes": ["1:00 PM"], "reasoning": "r",
                "dayOfWeek": "Monday", "engagement_prediction": 140, "best_practices": ["x"]}"#,
        ));
        let agent = SchedulingAgent::new(&AgentSettings::new(client.clone()));

        let request = SchedulingRequest::new(Platform::Twitter, PostType::Post, "Hello");
        let result = agent.suggest_optimal_timing(&request).await;
        let suggestion = result.data.unwrap();
        assert_eq!(suggestion.optimal_time, "8:30 AM");
        assert_eq!(suggestion.day_of_week, "Monday");
        assert_eq!(suggestion.engagement_prediction, 100.0);

        let prompt = client.prompts().pop().unwrap();
        assert!(prompt.contains("Timezone: UTC"));
        assert!(prompt.contains("Target audience: General audience"));
    }

    #[tokio::test]
    async fn garbage_reply_uses_platform_default() {
        let client = Arc::new(ScriptedClient::always("Tuesdays are nice"));
        let agent = SchedulingAgent::new(&AgentSettings::new(client));

        let request = SchedulingRequest::new(Platform::Instagram, PostType::Reel, "Hello");
        let result = agent.suggest_optimal_timing(&request).await;
        assert!(result.success);
        assert_eq!(result.data.unwrap(), default_schedule(&Platform::Instagram));
    }

    #[test]
    fn suggestion_keeps_snake_case_fields() {
        let json = serde_json::to_value(default_schedule(&Platform::LinkedIn)).unwrap();
        assert!(json.get("optimalTime").is_some());
        assert!(json.get("engagement_prediction").is_some());
        assert!(json.get("best_practices").is_some());
    }
}
