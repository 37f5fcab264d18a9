//! Generation service boundary for Postwright agents.
//!
//! - [`LlmClient`]: one stateless completion per call
//! - [`GenerationClient`]: renders a [`PromptTemplate`] and completes it at a
//!   [`ModelPreset`] temperature
//! - [`RetryExecutor`]: retry/backoff wrapper that turns any async operation
//!   into an [`AgentResult`](postwright_common::AgentResult)

pub mod client;
pub mod config;
pub mod generation;
pub mod openai;
pub mod retry;
pub mod template;

pub use client::{ChatMessage, LlmClient, LlmRequest, LlmResponse, Role, TokenUsage};
pub use config::{GenerationConfig, ModelPreset, PresetTemperatures, build_llm_client};
pub use generation::GenerationClient;
pub use openai::OpenAiClient;
pub use retry::{RetryConfig, RetryExecutor};
pub use template::{PromptTemplate, TemplateVars};
