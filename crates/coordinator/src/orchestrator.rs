//! Content-plan orchestration.
//!
//! A plan runs research (optional, non-fatal), content generation (fatal on
//! failure) and per-item scheduling (optional, failures recorded per item).
//! Step failures become strings in [`ContentPlan::errors`]; the plan itself
//! is always returned.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use postwright_agents::{
    AgentSettings, ContentAgent, ContentContext, PostingRequest, PostingResult, ResearchAgent,
    ResearchRequest, SchedulingAgent, SchedulingRequest, SchedulingSuggestion, SocialAccountsAgent,
    TrendingTopic,
};
use postwright_common::{ContentRequest, GeneratedContent};
use postwright_llm::{LlmClient, build_llm_client};
use postwright_memory::VectorStore;
use serde::{Deserialize, Serialize};
use tokio::task::JoinError;
use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::config::{OrchestratorConfig, PostwrightConfig};

/// A content request plus the optional pipeline steps to run around it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPlanRequest {
    #[serde(flatten)]
    pub request: ContentRequest,

    #[serde(default)]
    pub include_research: bool,

    #[serde(default)]
    pub include_scheduling: bool,

    /// Owner of stored brand context and examples
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl ContentPlanRequest {
    pub fn new(request: ContentRequest) -> Self {
        Self {
            request,
            ..Default::default()
        }
    }

    pub fn with_research(mut self) -> Self {
        self.include_research = true;
        self
    }

    pub fn with_scheduling(mut self) -> Self {
        self.include_scheduling = true;
        self
    }

    pub fn for_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

/// Aggregate result of one plan.
///
/// `success` is true exactly when content was produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPlan {
    pub content: Option<BTreeMap<String, GeneratedContent>>,
    pub scheduling: Option<BTreeMap<String, SchedulingSuggestion>>,
    pub research: Option<Vec<TrendingTopic>>,
    pub success: bool,
    pub errors: Vec<String>,
}

/// Sequences the agents into content plans and runs bulk work in batches.
pub struct Orchestrator {
    content: ContentAgent,
    scheduling: Arc<SchedulingAgent>,
    research: ResearchAgent,
    social: Arc<SocialAccountsAgent>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(settings: &AgentSettings, config: OrchestratorConfig) -> Self {
        Self {
            content: ContentAgent::new(settings),
            scheduling: Arc::new(SchedulingAgent::new(settings)),
            research: ResearchAgent::new(settings),
            social: Arc::new(SocialAccountsAgent::new(config.post_delay())),
            config,
        }
    }

    /// Build an orchestrator and its retrieval store from configuration.
    pub fn from_config(config: &PostwrightConfig) -> anyhow::Result<Self> {
        let llm = build_llm_client(&config.generation)?;
        Ok(Self::with_client(config, llm))
    }

    /// As [`from_config`](Self::from_config) with an explicit generation client.
    pub fn with_client(config: &PostwrightConfig, llm: Arc<dyn LlmClient>) -> Self {
        let store = Arc::new(VectorStore::new(config.memory.clone()));
        let settings = AgentSettings::new(llm)
            .with_generation(config.generation.clone())
            .with_retry(config.retry.clone())
            .with_store(store);
        Self::new(&settings, config.orchestrator.clone())
    }

    /// Share an existing social-accounts agent, so accounts connected
    /// elsewhere can be posted to.
    pub fn with_social_agent(mut self, social: Arc<SocialAccountsAgent>) -> Self {
        self.social = social;
        self
    }

    pub fn social(&self) -> &Arc<SocialAccountsAgent> {
        &self.social
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Run research, content and scheduling for one request.
    pub async fn generate_complete_content_plan(&self, plan: &ContentPlanRequest) -> ContentPlan {
        let started = Instant::now();
        info!(
            topic = %plan.request.topic,
            research = plan.include_research,
            scheduling = plan.include_scheduling,
            "Generating content plan"
        );

        let mut result = ContentPlan::default();
        if let Err(e) = self.run_plan(plan, &mut result).await {
            error!(error = %e, "Content plan aborted");
            result.errors.push(format!("Orchestrator error: {e}"));
        }
        result.success = result.content.is_some();

        info!(
            topic = %plan.request.topic,
            success = result.success,
            errors = result.errors.len(),
            duration_ms = started.elapsed().as_millis() as u64,
            "Content plan finished"
        );
        result
    }

    async fn run_plan(&self, plan: &ContentPlanRequest, result: &mut ContentPlan) -> Result<(), JoinError> {
        let request = &plan.request;

        if plan.include_research {
            let research = self
                .research
                .research_trending_content(&ResearchRequest {
                    topic: request.topic.clone(),
                    industry: request
                        .brand_profile
                        .as_ref()
                        .and_then(|b| b.industry.clone()),
                    platforms: request.platforms.clone(),
                    target_audience: request.audience().map(str::to_string),
                    tone: request.brand_profile.as_ref().and_then(|b| b.tone.clone()),
                })
                .await;
            match research.into_data() {
                Ok(topics) => result.research = Some(topics),
                Err(e) => {
                    warn!(error = %e, "Research step failed");
                    result.errors.push(format!("Research failed: {e}"));
                }
            }
        }

        let context = ContentContext {
            insights: result
                .research
                .iter()
                .flatten()
                .map(|t| t.title.clone())
                .collect(),
            user_id: plan.user_id.clone(),
        };
        let content = match self
            .content
            .generate_content_with_context(request, &context)
            .await
            .into_data()
        {
            Ok(content) => content,
            Err(e) => {
                error!(error = %e, "Content step failed");
                result.errors.push(format!("Content generation failed: {e}"));
                return Ok(());
            }
        };

        if plan.include_scheduling {
            let audience = request.audience().map(str::to_string);
            let handles: Vec<_> = content
                .iter()
                .map(|(key, item)| {
                    let agent = self.scheduling.clone();
                    let mut scheduling = SchedulingRequest::new(
                        item.platform.clone(),
                        item.post_type.clone(),
                        item.content.clone(),
                    );
                    scheduling.target_audience = audience.clone();
                    let key = key.clone();
                    tokio::spawn(async move {
                        let suggestion = agent.suggest_optimal_timing(&scheduling).await;
                        (key, suggestion)
                    })
                })
                .collect();
            result.content = Some(content);

            let mut schedules = BTreeMap::new();
            for handle in handles {
                let (key, suggestion) = handle.await?;
                match suggestion.into_data() {
                    Ok(suggestion) => {
                        schedules.insert(key, suggestion);
                    }
                    Err(e) => {
                        warn!(%key, error = %e, "Scheduling step failed");
                        result.errors.push(format!("Scheduling failed for {key}: {e}"));
                    }
                }
            }
            result.scheduling = Some(schedules);
        } else {
            result.content = Some(content);
        }
        Ok(())
    }

    /// Generate plans in consecutive chunks of `batch_size`.
    ///
    /// Members of a chunk run concurrently and the whole chunk finishes
    /// before the next starts. The batch delay separates chunks; none is
    /// added before the first or after the last. Results keep input order.
    pub async fn bulk_generate_content(
        &self,
        requests: &[ContentPlanRequest],
        batch_size: Option<usize>,
    ) -> Vec<ContentPlan> {
        let batch_size = batch_size.unwrap_or(self.config.batch_size).max(1);
        let chunks = requests.len().div_ceil(batch_size);
        info!(requests = requests.len(), batch_size, chunks, "Bulk generating content");

        let mut results = Vec::with_capacity(requests.len());
        for (index, chunk) in requests.chunks(batch_size).enumerate() {
            if index > 0 {
                sleep(self.config.batch_delay()).await;
            }
            let plans = join_all(
                chunk
                    .iter()
                    .map(|request| self.generate_complete_content_plan(request)),
            )
            .await;
            info!(chunk = index + 1, of = chunks, "Chunk complete");
            results.extend(plans);
        }
        results
    }

    /// Publish each request in order through the social-accounts agent.
    pub async fn bulk_post(&self, requests: &[PostingRequest]) -> Vec<PostingResult> {
        self.social.bulk_post(requests).await
    }
}
