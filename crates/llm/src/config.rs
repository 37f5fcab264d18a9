use std::sync::Arc;

use postwright_common::{PostwrightError, Result};
use serde::{Deserialize, Serialize};

use crate::client::LlmClient;
use crate::openai::OpenAiClient;

/// Use-case category an agent is built for.
///
/// Presets differ only in sampling temperature and are chosen once, when the
/// agent is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelPreset {
    Creative,
    Analytical,
    Conversational,
}

/// Temperature per preset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetTemperatures {
    pub creative: f32,
    pub analytical: f32,
    pub conversational: f32,
}

impl Default for PresetTemperatures {
    fn default() -> Self {
        Self {
            creative: 0.8,
            analytical: 0.3,
            conversational: 0.7,
        }
    }
}

impl PresetTemperatures {
    pub fn for_preset(&self, preset: ModelPreset) -> f32 {
        match preset {
            ModelPreset::Creative => self.creative,
            ModelPreset::Analytical => self.analytical,
            ModelPreset::Conversational => self.conversational,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// If not set, `OPENAI_API_KEY` is read when the client is built.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperatures: PresetTemperatures,
}

fn default_provider() -> String {
    "openai".into()
}

fn default_model() -> String {
    "gpt-4o".into()
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            api_key: None,
            api_url: None,
            max_tokens: None,
            temperatures: PresetTemperatures::default(),
        }
    }
}

impl GenerationConfig {
    /// Resolve the API credential.
    ///
    /// An explicit non-empty `api_key` wins; otherwise `OPENAI_API_KEY` is
    /// read from the process environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.resolve_api_key_with(|name| std::env::var(name).ok())
    }

    fn resolve_api_key_with(&self, env: impl Fn(&str) -> Option<String>) -> Option<String> {
        if let Some(ref key) = self.api_key {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }
        env("OPENAI_API_KEY").filter(|key| !key.is_empty())
    }

    pub fn temperature(&self, preset: ModelPreset) -> f32 {
        self.temperatures.for_preset(preset)
    }
}

/// Build the generation-service client described by `config`.
pub fn build_llm_client(config: &GenerationConfig) -> Result<Arc<dyn LlmClient>> {
    match config.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAiClient::new(
            config.api_url.clone(),
            config.model.clone(),
            config.resolve_api_key(),
        ))),
        other => Err(PostwrightError::Config(format!(
            "Unknown generation provider: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML_CONFIG: &str = r#"
model = "gpt-4o-mini"
api_url = "http://localhost:11434"
max_tokens = 800

[temperatures]
creative = 0.9
"#;

    #[test]
    fn deserialize_config_from_toml() {
        let config: GenerationConfig = toml::from_str(TOML_CONFIG).unwrap();
        assert_eq!(config.provider, "openai");
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.api_url.as_deref(), Some("http://localhost:11434"));
        assert_eq!(config.max_tokens, Some(800));
        assert!((config.temperature(ModelPreset::Creative) - 0.9).abs() < f32::EPSILON);
        // unspecified presets keep their defaults
        assert!((config.temperature(ModelPreset::Analytical) - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn presets_have_distinct_temperatures() {
        let temps = PresetTemperatures::default();
        assert!(temps.for_preset(ModelPreset::Creative) > temps.for_preset(ModelPreset::Conversational));
        assert!(
            temps.for_preset(ModelPreset::Conversational) > temps.for_preset(ModelPreset::Analytical)
        );
    }

    #[test]
    fn explicit_api_key_wins_over_environment() {
        let config = GenerationConfig {
            api_key: Some("sk-config".into()),
            ..Default::default()
        };
        let key = config.resolve_api_key_with(|_| Some("sk-env".into()));
        assert_eq!(key.as_deref(), Some("sk-config"));
    }

    #[test]
    fn empty_api_key_falls_back_to_environment() {
        let config = GenerationConfig {
            api_key: Some(String::new()),
            ..Default::default()
        };
        let key = config.resolve_api_key_with(|name| {
            assert_eq!(name, "OPENAI_API_KEY");
            Some("sk-env".into())
        });
        assert_eq!(key.as_deref(), Some("sk-env"));
    }

    #[test]
    fn build_openai_client() {
        let config = GenerationConfig {
            api_key: Some("sk-test".into()),
            ..Default::default()
        };
        let client = build_llm_client(&config).unwrap();
        assert_eq!(client.model_name(), "gpt-4o");
    }

    #[test]
    fn build_unknown_provider_fails() {
        let config = GenerationConfig {
            provider: "gemini".into(),
            ..Default::default()
        };
        assert!(build_llm_client(&config).is_err());
    }
}
