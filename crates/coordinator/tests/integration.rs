//! Integration tests for the orchestrator's plan and bulk pipelines.
//!
//! A scripted generation service stands in for the real one, and the tokio
//! clock is paused where exact delays matter.

use async_trait::async_trait;
use postwright_agents::{AgentSettings, ConnectAccountRequest, PostingRequest};
use postwright_common::{ContentRequest, Platform, PostType, PostwrightError, Result};
use postwright_coordinator::{ContentPlanRequest, Orchestrator, OrchestratorConfig, PostwrightConfig};
use postwright_llm::{LlmClient, LlmRequest, LlmResponse, RetryConfig};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Clone, Copy, PartialEq)]
enum Mode {
    Valid,
    Down,
    ResearchDown,
    SchedulingDown,
    SchedulingPanics,
}

struct ScriptedService {
    mode: Mode,
    calls: Mutex<Vec<(Instant, String)>>,
}

impl ScriptedService {
    fn new(mode: Mode) -> Arc<Self> {
        Arc::new(Self {
            mode,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn call_instants(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(at, _)| *at).collect()
    }
}

#[async_trait]
impl LlmClient for ScriptedService {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        let prompt = request.user_prompt().unwrap_or_default().to_string();
        self.calls.lock().unwrap().push((Instant::now(), prompt.clone()));

        let is_research = prompt.contains("trend researcher");
        let is_scheduling = prompt.contains("strategist");
        if self.mode == Mode::SchedulingPanics && is_scheduling {
            panic!("scheduling backend crashed");
        }
        let fail = match self.mode {
            Mode::Valid | Mode::SchedulingPanics => false,
            Mode::Down => true,
            Mode::ResearchDown => is_research,
            Mode::SchedulingDown => is_scheduling,
        };
        if fail {
            return Err(PostwrightError::Generation("upstream unavailable".into()));
        }

        let content = if is_research {
            r#"[{"title": "Copilots for everything", "relevanceScore": 88}]"#
        } else if is_scheduling {
            r#"{"optimalTime": "9:30 AM", "dayOfWeek": "Tuesday", "engagement_prediction": 77}"#
        } else {
            r##"{"content": "Five AI tools worth trying this week.", "hashtags": ["#AI"]}"##
        };
        Ok(LlmResponse {
            content: content.to_string(),
            model: "scripted".into(),
            usage: None,
            finish_reason: None,
        })
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

fn orchestrator(service: Arc<ScriptedService>) -> Orchestrator {
    let settings = AgentSettings::new(service).with_retry(RetryConfig {
        retry_attempts: 2,
        retry_delay_ms: 100,
        attempt_timeout_ms: None,
    });
    Orchestrator::new(&settings, OrchestratorConfig::default())
}

fn twitter_plan() -> ContentPlanRequest {
    ContentPlanRequest::new(
        ContentRequest::new("AI tools", "A short roundup").with_platform(Platform::Twitter, vec![PostType::Post]),
    )
}

#[tokio::test]
async fn test_plan_with_scheduling_succeeds() {
    let orchestrator = orchestrator(ScriptedService::new(Mode::Valid));

    let plan = orchestrator
        .generate_complete_content_plan(&twitter_plan().with_scheduling())
        .await;

    assert!(plan.success);
    assert!(plan.errors.is_empty());
    let content = plan.content.unwrap();
    assert_eq!(content.keys().collect::<Vec<_>>(), vec!["twitter-post"]);
    let scheduling = plan.scheduling.unwrap();
    assert_eq!(scheduling["twitter-post"].optimal_time, "9:30 AM");
    assert!(plan.research.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_plan_with_failing_service_reports_content_failure() {
    let orchestrator = orchestrator(ScriptedService::new(Mode::Down));

    let plan = orchestrator
        .generate_complete_content_plan(&twitter_plan().with_scheduling())
        .await;

    assert!(!plan.success);
    assert!(plan.content.is_none());
    assert!(plan.scheduling.is_none());
    assert_eq!(plan.errors.len(), 1);
    assert!(plan.errors[0].starts_with("Content generation failed:"));
}

#[tokio::test(start_paused = true)]
async fn test_research_failure_is_not_fatal() {
    let service = ScriptedService::new(Mode::ResearchDown);
    let orchestrator = orchestrator(service);

    let plan = orchestrator
        .generate_complete_content_plan(&twitter_plan().with_research())
        .await;

    assert!(plan.success);
    assert!(plan.research.is_none());
    assert!(plan.content.is_some());
    assert_eq!(plan.errors.len(), 1);
    assert!(plan.errors[0].starts_with("Research failed: Failed after 2 attempts"));
}

#[tokio::test]
async fn test_research_titles_reach_content_prompt() {
    let service = ScriptedService::new(Mode::Valid);
    let orchestrator = orchestrator(service.clone());

    let plan = orchestrator
        .generate_complete_content_plan(&twitter_plan().with_research())
        .await;

    assert!(plan.success);
    assert_eq!(plan.research.unwrap()[0].title, "Copilots for everything");
    let calls = service.calls.lock().unwrap();
    let content_prompt = &calls.last().unwrap().1;
    assert!(content_prompt.contains("- Copilots for everything"));
}

#[tokio::test(start_paused = true)]
async fn test_scheduling_failures_are_per_item() {
    let orchestrator = orchestrator(ScriptedService::new(Mode::SchedulingDown));
    let request = ContentRequest::new("AI tools", "")
        .with_platform(Platform::Twitter, vec![PostType::Post])
        .with_platform(Platform::LinkedIn, vec![PostType::Post]);

    let plan = orchestrator
        .generate_complete_content_plan(&ContentPlanRequest::new(request).with_scheduling())
        .await;

    assert!(plan.success);
    assert_eq!(plan.content.unwrap().len(), 2);
    assert!(plan.scheduling.unwrap().is_empty());
    assert_eq!(plan.errors.len(), 2);
    assert!(plan.errors.iter().any(|e| e.starts_with("Scheduling failed for linkedin-post:")));
    assert!(plan.errors.iter().any(|e| e.starts_with("Scheduling failed for twitter-post:")));
}

#[tokio::test]
async fn test_panicked_scheduling_keeps_generated_content() {
    let orchestrator = orchestrator(ScriptedService::new(Mode::SchedulingPanics));

    let plan = orchestrator
        .generate_complete_content_plan(&twitter_plan().with_scheduling())
        .await;

    assert!(plan.success);
    assert!(plan.content.unwrap().contains_key("twitter-post"));
    assert!(plan.scheduling.is_none());
    assert_eq!(plan.errors.len(), 1);
    assert!(plan.errors[0].starts_with("Orchestrator error:"));
}

#[tokio::test(start_paused = true)]
async fn test_bulk_generation_runs_in_chunks() {
    let service = ScriptedService::new(Mode::Valid);
    let orchestrator = orchestrator(service.clone());
    let requests: Vec<ContentPlanRequest> = (0..7).map(|_| twitter_plan()).collect();

    let started = Instant::now();
    let plans = orchestrator.bulk_generate_content(&requests, Some(3)).await;

    assert_eq!(plans.len(), 7);
    assert!(plans.iter().all(|p| p.success));
    // two inter-chunk delays, none before the first or after the last
    assert_eq!(started.elapsed(), Duration::from_millis(4000));

    let offsets: Vec<u128> = service
        .call_instants()
        .iter()
        .map(|at| (*at - started).as_millis())
        .collect();
    assert_eq!(offsets, vec![0, 0, 0, 2000, 2000, 2000, 4000]);
}

#[tokio::test(start_paused = true)]
async fn test_bulk_generation_uses_configured_batch_size() {
    let orchestrator = orchestrator(ScriptedService::new(Mode::Valid));
    let requests: Vec<ContentPlanRequest> = (0..3).map(|_| twitter_plan()).collect();

    let started = Instant::now();
    let plans = orchestrator.bulk_generate_content(&requests, None).await;

    assert_eq!(plans.len(), 3);
    assert_eq!(started.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_bulk_post_is_sequential_and_tolerates_failures() {
    let orchestrator = orchestrator(ScriptedService::new(Mode::Valid));
    let account = orchestrator
        .social()
        .connect_account(ConnectAccountRequest {
            user_id: "u1".into(),
            platform: Platform::Twitter,
            account_name: "acme".into(),
            access_token: "token".into(),
            expires_at: None,
        })
        .data
        .unwrap();

    let requests = vec![
        PostingRequest::new(&account.id, "one"),
        PostingRequest::new(&account.id, "x".repeat(400)),
        PostingRequest::new(&account.id, "three"),
    ];

    let started = Instant::now();
    let results = orchestrator.bulk_post(&requests).await;

    assert_eq!(started.elapsed(), Duration::from_millis(6000));
    assert_eq!(
        results.iter().map(|r| r.success).collect::<Vec<_>>(),
        vec![true, false, true]
    );
}

#[test]
fn test_plan_request_deserializes_flattened() {
    let json = r#"{
        "topic": "AI tools",
        "brief": "...",
        "platforms": ["twitter"],
        "postTypes": {"twitter": ["post"]},
        "includeScheduling": true,
        "userId": "u1"
    }"#;
    let plan: ContentPlanRequest = serde_json::from_str(json).unwrap();

    assert_eq!(plan.request.topic, "AI tools");
    assert!(plan.include_scheduling);
    assert!(!plan.include_research);
    assert_eq!(plan.user_id.as_deref(), Some("u1"));
    assert_eq!(plan.request.pairs(), vec![(Platform::Twitter, PostType::Post)]);
}

#[tokio::test]
async fn test_with_client_wires_configuration() {
    let config = PostwrightConfig::default();
    let orchestrator = Orchestrator::with_client(&config, ScriptedService::new(Mode::Valid));

    assert_eq!(orchestrator.config().batch_size, 3);
    let plan = orchestrator
        .generate_complete_content_plan(&twitter_plan().for_user("u1"))
        .await;
    assert!(plan.success);
}
