//! Brand, campaign and content-request model.
//!
//! These are read-only inputs supplied by the surrounding product; the core
//! never mutates them.

use crate::platform::{Platform, PostType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Descriptive attributes of the brand a piece of content speaks for.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BrandProfile {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub description: Option<String>,
    pub tone: Option<String>,
    pub writing_style: Option<String>,
    pub target_audience: Option<String>,
    pub brand_values: Vec<String>,
    pub preferred_words: Vec<String>,
    pub avoided_words: Vec<String>,
    pub topics: Vec<String>,
}

/// A grouping of content pillars and target platforms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Campaign {
    pub name: String,
    pub description: Option<String>,
    pub objective: Option<String>,
    pub content_pillars: Vec<String>,
    pub target_platforms: Vec<Platform>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Input to content generation.
///
/// One request fans out into one generated item per platform × post type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRequest {
    pub topic: String,
    #[serde(default)]
    pub brief: String,
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub post_types: HashMap<Platform, Vec<PostType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign: Option<Campaign>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_profile: Option<BrandProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content_pillars: Vec<String>,
}

impl ContentRequest {
    pub fn new(topic: impl Into<String>, brief: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            brief: brief.into(),
            ..Default::default()
        }
    }

    /// Add a platform with the post types to generate for it.
    pub fn with_platform(mut self, platform: Platform, post_types: Vec<PostType>) -> Self {
        if !self.platforms.contains(&platform) {
            self.platforms.push(platform.clone());
        }
        self.post_types.insert(platform, post_types);
        self
    }

    pub fn with_brand_profile(mut self, profile: BrandProfile) -> Self {
        self.brand_profile = Some(profile);
        self
    }

    pub fn with_campaign(mut self, campaign: Campaign) -> Self {
        self.campaign = Some(campaign);
        self
    }

    /// Distinct (platform, post type) pairs in request order.
    ///
    /// A platform without an explicit post-type list produces a single
    /// `Post`. Repeated pairs appear once, so result keys stay unique.
    pub fn pairs(&self) -> Vec<(Platform, PostType)> {
        let mut pairs: Vec<(Platform, PostType)> = Vec::new();
        for platform in &self.platforms {
            let post_types = match self.post_types.get(platform) {
                Some(types) if !types.is_empty() => types.clone(),
                _ => vec![PostType::Post],
            };
            for post_type in post_types {
                let pair = (platform.clone(), post_type);
                if !pairs.contains(&pair) {
                    pairs.push(pair);
                }
            }
        }
        pairs
    }

    /// Audience from the request, falling back to the brand profile.
    pub fn audience(&self) -> Option<&str> {
        self.target_audience.as_deref().or_else(|| {
            self.brand_profile
                .as_ref()
                .and_then(|b| b.target_audience.as_deref())
        })
    }

    /// Pillars from the request, falling back to the campaign.
    pub fn pillars(&self) -> &[String] {
        if !self.content_pillars.is_empty() {
            return &self.content_pillars;
        }
        self.campaign
            .as_ref()
            .map(|c| c.content_pillars.as_slice())
            .unwrap_or(&[])
    }
}

/// One generated post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub platform: Platform,
    pub post_type: PostType,
    pub content: String,
    pub hashtags: Vec<String>,
    pub media_description: String,
    pub scheduling_suggestion: String,
    pub engagement_tips: Vec<String>,
}

/// Result-map key for a platform and post type: `"{platform}-{postType}"`.
pub fn content_key(platform: &Platform, post_type: &PostType) -> String {
    format!("{platform}-{post_type}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_default_to_post_and_deduplicate() {
        let mut request = ContentRequest::new("AI tools", "brief")
            .with_platform(Platform::Twitter, vec![PostType::Post, PostType::Post]);
        request.platforms.push(Platform::LinkedIn);
        request.platforms.push(Platform::Twitter);

        let pairs = request.pairs();
        assert_eq!(
            pairs,
            vec![
                (Platform::Twitter, PostType::Post),
                (Platform::LinkedIn, PostType::Post),
            ]
        );
    }

    #[test]
    fn content_key_format() {
        assert_eq!(
            content_key(&Platform::Instagram, &PostType::Reel),
            "instagram-reel"
        );
    }

    #[test]
    fn request_deserializes_from_camel_case() {
        let json = r#"{
            "topic": "AI tools",
            "brief": "Short intro",
            "platforms": ["twitter", "linkedin"],
            "postTypes": {"twitter": ["post", "thread"]},
            "brandProfile": {"tone": "Playful", "avoidedWords": ["synergy"]},
            "targetAudience": "Developers"
        }"#;
        let request: ContentRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.platforms, vec![Platform::Twitter, Platform::LinkedIn]);
        assert_eq!(request.pairs().len(), 3);
        let brand = request.brand_profile.as_ref().unwrap();
        assert_eq!(brand.tone.as_deref(), Some("Playful"));
        assert_eq!(brand.avoided_words, vec!["synergy".to_string()]);
        assert_eq!(request.audience(), Some("Developers"));
    }

    #[test]
    fn pillars_fall_back_to_campaign() {
        let request = ContentRequest::new("t", "b").with_campaign(Campaign {
            name: "Launch".into(),
            content_pillars: vec!["education".into()],
            ..Default::default()
        });
        assert_eq!(request.pillars(), &["education".to_string()]);
    }
}
