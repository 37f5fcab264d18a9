//! Scripted generation client for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use postwright_common::{PostwrightError, Result};
use postwright_llm::{LlmClient, LlmRequest, LlmResponse};

type Responder = Box<dyn Fn(usize, &str) -> Result<String> + Send + Sync>;

pub(crate) struct ScriptedClient {
    respond: Responder,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new(respond: impl Fn(usize, &str) -> Result<String> + Send + Sync + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn always(reply: &str) -> Self {
        let reply = reply.to_string();
        Self::new(move |_, _| Ok(reply.clone()))
    }

    /// Fails the listed (1-indexed) calls and answers `reply` otherwise.
    pub fn failing_on(calls: &[usize], reply: &str) -> Self {
        let calls = calls.to_vec();
        let reply = reply.to_string();
        Self::new(move |n, _| {
            if calls.contains(&n) {
                Err(PostwrightError::Generation(format!("scripted failure on call {n}")))
            } else {
                Ok(reply.clone())
            }
        })
    }

    pub fn failing() -> Self {
        Self::new(|_, _| Err(PostwrightError::Generation("service unavailable".into())))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        let prompt = request.user_prompt().unwrap_or_default().to_string();
        self.prompts.lock().unwrap().push(prompt.clone());
        let content = (self.respond)(n, &prompt)?;
        Ok(LlmResponse {
            content,
            model: "scripted".into(),
            usage: None,
            finish_reason: None,
        })
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
