//! Social platforms and post formats.
//!
//! Both enums are total: any name that is not a known variant parses into
//! `Other`, keeping the original text so keys built from it stay distinct.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A social network the product can publish to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Platform {
    Twitter,
    LinkedIn,
    Instagram,
    Facebook,
    TikTok,
    YouTube,
    /// Any platform without dedicated rules
    Other(String),
}

impl Platform {
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "twitter" | "x" => Self::Twitter,
            "linkedin" => Self::LinkedIn,
            "instagram" => Self::Instagram,
            "facebook" => Self::Facebook,
            "tiktok" => Self::TikTok,
            "youtube" => Self::YouTube,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Twitter => "twitter",
            Self::LinkedIn => "linkedin",
            Self::Instagram => "instagram",
            Self::Facebook => "facebook",
            Self::TikTok => "tiktok",
            Self::YouTube => "youtube",
            Self::Other(name) => name,
        }
    }

    /// Maximum characters accepted in a single post body.
    pub fn max_length(&self) -> Option<usize> {
        match self {
            Self::Twitter => Some(280),
            Self::LinkedIn => Some(3000),
            Self::Instagram => Some(2200),
            Self::Facebook => Some(63_206),
            Self::TikTok => Some(2200),
            Self::YouTube => Some(5000),
            Self::Other(_) => None,
        }
    }
}

impl From<String> for Platform {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for Platform {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<Platform> for String {
    fn from(value: Platform) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The format of a single piece of content on a platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PostType {
    Post,
    Thread,
    Story,
    Reel,
    Carousel,
    Article,
    Video,
    Short,
    Other(String),
}

impl PostType {
    pub fn parse(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "post" => Self::Post,
            "thread" => Self::Thread,
            "story" => Self::Story,
            "reel" => Self::Reel,
            "carousel" => Self::Carousel,
            "article" => Self::Article,
            "video" => Self::Video,
            "short" => Self::Short,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Post => "post",
            Self::Thread => "thread",
            Self::Story => "story",
            Self::Reel => "reel",
            Self::Carousel => "carousel",
            Self::Article => "article",
            Self::Video => "video",
            Self::Short => "short",
            Self::Other(name) => name,
        }
    }
}

impl From<String> for PostType {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for PostType {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<PostType> for String {
    fn from(value: PostType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
