//! Specialist agents for Postwright.
//!
//! - **Content Agent**: one post per platform × post type
//! - **Scheduling Agent**: best time to publish
//! - **Research Agent**: trends, competitors and content ideas
//! - **Media Agent**: video/image analysis, scripts and video ideas
//! - **Social-Accounts Agent**: simulated account linking and publishing
//!
//! Every generation-backed agent owns an [`AgentCore`]: a
//! [`GenerationClient`](postwright_llm::GenerationClient) at the agent's
//! preset plus a [`RetryExecutor`](postwright_llm::RetryExecutor). Replies
//! are decoded as JSON; a reply that does not decode degrades to a fixed
//! default and the call still succeeds.
//!
//! ```text
//!  ┌─────────┐ ┌────────────┐ ┌──────────┐ ┌───────┐   ┌────────────────┐
//!  │ Content │ │ Scheduling │ │ Research │ │ Media │   │ Social-Accounts│
//!  └────┬────┘ └─────┬──────┘ └────┬─────┘ └───┬───┘   │  (no LLM)      │
//!       └────────────┴──────┬──────┴───────────┘       └────────────────┘
//!                           ▼
//!                AgentCore: retry ─► generate ─► decode / fallback
//! ```

pub mod base;
pub mod content;
pub mod media;
pub mod parsing;
pub mod research;
pub mod scheduling;
pub mod social;

#[cfg(test)]
mod testing;

pub use base::{AgentCore, AgentSettings};
pub use content::{ContentAgent, ContentContext, fallback_content, platform_guidelines};
pub use media::{
    ImageAnalysis, ImageInput, KeyMoment, MediaAgent, VideoAnalysis, VideoIdea, VideoInput,
    VideoScriptRequest,
};
pub use parsing::{ParseError, decode_structured, extract_json};
pub use research::{
    CompetitorAnalysis, ContentInspiration, ResearchAgent, ResearchRequest, TrendingTopic,
};
pub use scheduling::{SchedulingAgent, SchedulingRequest, SchedulingSuggestion, default_schedule};
pub use social::{
    AccountAnalytics, AccountStatus, ConnectAccountRequest, PostingRequest, PostingResult,
    POST_HISTORY_LIMIT, SocialAccount, SocialAccountsAgent, SyncResult,
};
