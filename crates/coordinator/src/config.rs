//! Configuration for the orchestrator.
//!
//! Loaded from a TOML file; every section and field has a default, so an
//! empty file is a valid configuration.
//!
//! On Unix, [`PostwrightConfig::from_file`] refuses world-writable files and
//! world-readable files that carry an API key.

use anyhow::{Context, bail};
use postwright_llm::{GenerationConfig, RetryConfig};
use postwright_memory::MemoryConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostwrightConfig {
    /// Generation service: provider, model, credential, preset temperatures
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Retry policy shared by every agent
    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub orchestrator: OrchestratorConfig,

    /// Retrieval store
    #[serde(default)]
    pub memory: MemoryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Plans generated concurrently per bulk chunk
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Pause between bulk chunks
    #[serde(default = "default_delay_ms")]
    pub batch_delay_ms: u64,

    /// Pause after every post in a bulk post
    #[serde(default = "default_delay_ms")]
    pub post_delay_ms: u64,
}

fn default_batch_size() -> usize {
    3
}

fn default_delay_ms() -> u64 {
    2000
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            batch_delay_ms: default_delay_ms(),
            post_delay_ms: default_delay_ms(),
        }
    }
}

impl OrchestratorConfig {
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    pub fn post_delay(&self) -> Duration {
        Duration::from_millis(self.post_delay_ms)
    }
}

impl PostwrightConfig {
    /// Load configuration from a TOML file.
    ///
    /// On Unix the file must be a regular file, not world-writable, and not
    /// world-readable when it contains an API key.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = read_config(path)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;

            let metadata = std::fs::symlink_metadata(path)
                .with_context(|| format!("cannot stat config file {}", path.display()))?;
            if !metadata.is_file() {
                bail!("config path {} must be a regular file", path.display());
            }
            check_mode(path, metadata.permissions().mode() & 0o777, &content)?;
        }

        let config = Self::parse(path, &content)?;
        if config.generation.api_key.is_some() {
            warn!(
                path = %path.display(),
                "API key stored in config file; OPENAI_API_KEY is preferred"
            );
        }
        Ok(config)
    }

    /// Load configuration without permission checks.
    pub fn from_file_unchecked(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        Self::parse(path, &read_config(path)?)
    }

    fn parse(path: &Path, content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).with_context(|| format!("invalid config file {}", path.display()))
    }
}

fn read_config(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config file {}", path.display()))
}

fn mentions_api_key(content: &str) -> bool {
    content
        .lines()
        .any(|line| line.trim_start().starts_with("api_key"))
}

/// Reject modes that expose the file to other users.
#[cfg_attr(not(unix), allow(dead_code))]
fn check_mode(path: &Path, mode: u32, content: &str) -> anyhow::Result<()> {
    if mode & 0o002 != 0 {
        bail!(
            "config file {} is world-writable (mode {mode:04o}); run chmod o-w on it",
            path.display()
        );
    }

    if !mentions_api_key(content) {
        return Ok(());
    }
    if mode & 0o004 != 0 {
        bail!(
            "config file {} holds an API key and is world-readable (mode {mode:04o}); run chmod 600 on it",
            path.display()
        );
    }
    if mode & 0o040 != 0 {
        warn!(
            path = %path.display(),
            mode = format!("{mode:04o}"),
            "Config file with API key is group-readable"
        );
    }
    Ok(())
}
