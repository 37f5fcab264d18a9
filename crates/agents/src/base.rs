//! Shared plumbing for the generation-backed agents.

use std::future::Future;
use std::sync::Arc;

use postwright_common::{AgentResult, Result};
use postwright_llm::{
    GenerationClient, GenerationConfig, LlmClient, ModelPreset, PromptTemplate, RetryConfig,
    RetryExecutor, TemplateVars,
};
use postwright_memory::VectorStore;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::parsing::decode_structured;

/// Everything an agent needs at construction time.
///
/// Owned by the caller and cloned into each agent; there is no global
/// client.
#[derive(Clone)]
pub struct AgentSettings {
    pub llm: Arc<dyn LlmClient>,
    pub generation: GenerationConfig,
    pub retry: RetryConfig,
    pub store: Option<Arc<VectorStore>>,
}

impl AgentSettings {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            generation: GenerationConfig::default(),
            retry: RetryConfig::default(),
            store: None,
        }
    }

    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_store(mut self, store: Arc<VectorStore>) -> Self {
        self.store = Some(store);
        self
    }
}

/// A generation client at one preset plus the retry executor wrapping it.
#[derive(Clone)]
pub struct AgentCore {
    name: &'static str,
    client: GenerationClient,
    executor: RetryExecutor,
}

impl AgentCore {
    pub fn new(name: &'static str, settings: &AgentSettings, preset: ModelPreset) -> Self {
        let client = GenerationClient::new(settings.llm.clone(), &settings.generation, preset);
        let executor = RetryExecutor::new(settings.retry.clone(), client.model_name());
        Self {
            name,
            client,
            executor,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn client(&self) -> &GenerationClient {
        &self.client
    }

    /// Run `operation` through the retry executor.
    pub async fn execute<T, F, Fut>(&self, operation: F, context: &str) -> AgentResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.executor.execute_with_retry(operation, context).await
    }

    /// Render and complete `template`, retrying on failure.
    pub async fn generate_text(
        &self,
        context: &str,
        template: &PromptTemplate,
        vars: &TemplateVars,
    ) -> AgentResult<String> {
        debug!(agent = self.name, context, "Generating text");
        self.execute(|| self.client.generate(template, vars), context)
            .await
    }

    /// Like [`generate_text`](Self::generate_text), then decode the reply.
    ///
    /// A reply that does not decode is handed to `fallback`; the result
    /// still reports success.
    pub async fn generate_structured<T, F>(
        &self,
        context: &str,
        template: &PromptTemplate,
        vars: &TemplateVars,
        fallback: F,
    ) -> AgentResult<T>
    where
        T: DeserializeOwned,
        F: FnOnce(&str) -> T,
    {
        let agent = self.name;
        self.generate_text(context, template, vars)
            .await
            .map(|raw| decode_or_else(agent, context, &raw, fallback))
    }
}

/// Decode `raw` as `T`, handing it to `fallback` when that fails.
pub fn decode_or_else<T, F>(agent: &str, context: &str, raw: &str, fallback: F) -> T
where
    T: DeserializeOwned,
    F: FnOnce(&str) -> T,
{
    match decode_structured(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(agent, context, error = %e, "Unstructured reply, using fallback");
            fallback(raw)
        }
    }
}

/// `value` or `default` when it is absent or blank.
pub(crate) fn or_default(value: Option<&str>, default: &str) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

/// Comma-joined list, or `default` when empty.
pub(crate) fn join_or(values: &[String], default: &str) -> String {
    if values.is_empty() {
        default.to_string()
    } else {
        values.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textual_fallbacks() {
        assert_eq!(or_default(None, "Professional"), "Professional");
        assert_eq!(or_default(Some("  "), "Professional"), "Professional");
        assert_eq!(or_default(Some("Witty"), "Professional"), "Witty");
        assert_eq!(join_or(&[], "None"), "None");
        assert_eq!(join_or(&["a".into(), "b".into()], "None"), "a, b");
    }

    #[test]
    fn decode_or_else_uses_fallback() {
        let value: Vec<u32> = decode_or_else("test", "ctx", "not json", |_| vec![7]);
        assert_eq!(value, vec![7]);
        let value: Vec<u32> = decode_or_else("test", "ctx", "[1, 2]", |_| vec![7]);
        assert_eq!(value, vec![1, 2]);
    }
}
