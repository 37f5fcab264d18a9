//! Media agent: video and image analysis, scripts and ideas.
//!
//! Media is described in text (a transcript, a caption, an uploader's
//! notes); no binary decoding happens here.

use postwright_common::{AgentResult, Platform};
use postwright_llm::{ModelPreset, PromptTemplate, TemplateVars};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::base::{AgentCore, AgentSettings, or_default};

const VIDEO_ANALYSIS_PROMPT: PromptTemplate = PromptTemplate::new(
    r#"You are a video editor preparing social media cuts.

Video description: {description}
Transcript: {transcript}
Duration: {duration} seconds
Target platform: {platform}

Respond with JSON only:
{{"summary": "...", "keyMoments": [{{"timestamp": "0:15", "description": "..."}}], "suggestedClips": ["..."], "caption": "...", "hashtags": ["..."]}}"#,
);

const IMAGE_ANALYSIS_PROMPT: PromptTemplate = PromptTemplate::new(
    r#"You are a social media designer reviewing an image.

Image description: {description}
Target platform: {platform}

Respond with JSON only:
{{"description": "...", "altText": "...", "suggestedCaptions": ["..."], "hashtags": ["..."], "themes": ["..."]}}"#,
);

const VIDEO_SCRIPT_PROMPT: PromptTemplate = PromptTemplate::new(
    r#"You are a scriptwriter for short-form social video.

Write a {duration}-second {platform} video script about: {topic}
Tone: {tone}
Target audience: {audience}

Include a hook in the first seconds, scene directions in brackets and a closing call to action."#,
);

const VIDEO_IDEAS_PROMPT: PromptTemplate = PromptTemplate::new(
    r#"You are a video content strategist.

Suggest {count} video ideas about "{topic}" for {platform}.

Respond with a JSON array only:
[{{"title": "...", "concept": "...", "hook": "...", "format": "...", "estimatedDuration": "..."}}]"#,
);

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInput {
    pub description: String,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub duration_secs: Option<u32>,
    #[serde(default)]
    pub platform: Option<Platform>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInput {
    pub description: String,
    #[serde(default)]
    pub platform: Option<Platform>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyMoment {
    pub timestamp: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoAnalysis {
    pub summary: String,
    pub key_moments: Vec<KeyMoment>,
    pub suggested_clips: Vec<String>,
    pub caption: String,
    pub hashtags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImageAnalysis {
    pub description: String,
    pub alt_text: String,
    pub suggested_captions: Vec<String>,
    pub hashtags: Vec<String>,
    pub themes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoScriptRequest {
    pub topic: String,
    pub platform: Platform,
    #[serde(default = "default_duration")]
    pub duration_secs: u32,
    #[serde(default)]
    pub tone: Option<String>,
    #[serde(default)]
    pub target_audience: Option<String>,
}

fn default_duration() -> u32 {
    60
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoIdea {
    pub title: String,
    #[serde(default)]
    pub concept: String,
    #[serde(default)]
    pub hook: String,
    #[serde(default)]
    pub format: String,
    #[serde(default)]
    pub estimated_duration: String,
}

pub struct MediaAgent {
    core: AgentCore,
}

impl MediaAgent {
    pub fn new(settings: &AgentSettings) -> Self {
        Self {
            core: AgentCore::new("media", settings, ModelPreset::Creative),
        }
    }

    pub async fn process_video(&self, input: &VideoInput) -> AgentResult<VideoAnalysis> {
        info!(duration_secs = ?input.duration_secs, "Analysing video");
        let vars = TemplateVars::from([
            ("description", input.description.clone()),
            ("transcript", or_default(input.transcript.as_deref(), "Not available")),
            (
                "duration",
                input
                    .duration_secs
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
            ),
            ("platform", platform_or_any(input.platform.as_ref())),
        ]);
        self.core
            .generate_structured("video analysis", &VIDEO_ANALYSIS_PROMPT, &vars, |_| {
                VideoAnalysis::default()
            })
            .await
    }

    pub async fn process_image(&self, input: &ImageInput) -> AgentResult<ImageAnalysis> {
        info!("Analysing image");
        let vars = TemplateVars::from([
            ("description", input.description.clone()),
            ("platform", platform_or_any(input.platform.as_ref())),
        ]);
        self.core
            .generate_structured("image analysis", &IMAGE_ANALYSIS_PROMPT, &vars, |_| {
                ImageAnalysis::default()
            })
            .await
    }

    /// Plain-text script; the reply is returned as written.
    pub async fn generate_video_script(&self, request: &VideoScriptRequest) -> AgentResult<String> {
        info!(topic = %request.topic, platform = %request.platform, "Writing video script");
        let vars = TemplateVars::from([
            ("topic", request.topic.clone()),
            ("platform", request.platform.to_string()),
            ("duration", request.duration_secs.to_string()),
            ("tone", or_default(request.tone.as_deref(), "Engaging")),
            ("audience", or_default(request.target_audience.as_deref(), "General audience")),
        ]);
        self.core
            .generate_text("video script", &VIDEO_SCRIPT_PROMPT, &vars)
            .await
            .map(|script| script.trim().to_string())
    }

    pub async fn generate_video_ideas(
        &self,
        topic: &str,
        platform: &Platform,
        count: usize,
    ) -> AgentResult<Vec<VideoIdea>> {
        info!(topic, %platform, count, "Generating video ideas");
        let vars = TemplateVars::from([
            ("topic", topic.to_string()),
            ("platform", platform.to_string()),
            ("count", count.max(1).to_string()),
        ]);
        self.core
            .generate_structured("video ideas", &VIDEO_IDEAS_PROMPT, &vars, |_| {
                fallback_video_ideas(topic)
            })
            .await
    }
}

fn platform_or_any(platform: Option<&Platform>) -> String {
    platform
        .map(Platform::to_string)
        .unwrap_or_else(|| "any platform".to_string())
}

pub fn fallback_video_ideas(topic: &str) -> Vec<VideoIdea> {
    vec![VideoIdea {
        title: format!("3 things to know about {topic}"),
        concept: "Quick-fire list with one visual per point.".into(),
        hook: "Most people get this wrong...".into(),
        format: "talking head with captions".into(),
        estimated_duration: "30-45 seconds".into(),
    }]
}
