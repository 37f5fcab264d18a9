//! The generation client every agent is built on.

use std::sync::Arc;

use postwright_common::Result;
use tracing::debug;

use crate::client::{LlmClient, LlmRequest};
use crate::config::{GenerationConfig, ModelPreset};
use crate::template::{PromptTemplate, TemplateVars};

/// Renders a prompt template and requests a single completion.
///
/// Every call is stateless: no conversation history is kept between calls.
#[derive(Clone)]
pub struct GenerationClient {
    llm: Arc<dyn LlmClient>,
    preset: ModelPreset,
    temperature: f32,
    max_tokens: Option<u32>,
}

impl GenerationClient {
    pub fn new(llm: Arc<dyn LlmClient>, config: &GenerationConfig, preset: ModelPreset) -> Self {
        Self {
            llm,
            preset,
            temperature: config.temperature(preset),
            max_tokens: config.max_tokens,
        }
    }

    pub fn preset(&self) -> ModelPreset {
        self.preset
    }

    pub fn temperature(&self) -> f32 {
        self.temperature
    }

    pub fn model_name(&self) -> &str {
        self.llm.model_name()
    }

    /// Render `template` with `vars` and return the completion text.
    pub async fn generate(&self, template: &PromptTemplate, vars: &TemplateVars) -> Result<String> {
        let prompt = template.render(vars)?;
        debug!(
            preset = ?self.preset,
            prompt_len = prompt.len(),
            "Requesting completion"
        );

        let request = LlmRequest::prompt(prompt, self.temperature).with_max_tokens(self.max_tokens);
        let response = self.llm.complete(request).await?;
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LlmResponse;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct EchoClient {
        seen: Mutex<Vec<(String, Option<f32>)>>,
    }

    #[async_trait]
    impl LlmClient for EchoClient {
        async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
            let prompt = request.user_prompt().unwrap_or_default().to_string();
            self.seen
                .lock()
                .unwrap()
                .push((prompt.clone(), request.temperature));
            Ok(LlmResponse {
                content: format!("echo: {prompt}"),
                model: "echo".into(),
                usage: None,
                finish_reason: None,
            })
        }
        fn model_name(&self) -> &str {
            "echo"
        }
    }

    #[tokio::test]
    async fn generate_renders_and_uses_preset_temperature() {
        let llm = Arc::new(EchoClient::default());
        let client = GenerationClient::new(
            llm.clone(),
            &GenerationConfig::default(),
            ModelPreset::Analytical,
        );

        let template = PromptTemplate::new("Best time to post on {platform}?");
        let vars: TemplateVars = [("platform", "linkedin".to_string())].into_iter().collect();
        let reply = client.generate(&template, &vars).await.unwrap();

        assert_eq!(reply, "echo: Best time to post on linkedin?");
        let seen = llm.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].1, Some(0.3));
        assert_eq!(client.model_name(), "echo");
    }

    #[tokio::test]
    async fn render_failure_skips_the_service() {
        let llm = Arc::new(EchoClient::default());
        let client =
            GenerationClient::new(llm.clone(), &GenerationConfig::default(), ModelPreset::Creative);

        let template = PromptTemplate::new("Needs {missing}");
        assert!(client.generate(&template, &TemplateVars::new()).await.is_err());
        assert!(llm.seen.lock().unwrap().is_empty());
    }
}
