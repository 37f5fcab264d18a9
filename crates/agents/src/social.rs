//! Social-accounts agent.
//!
//! Simulates the platform side of account linking and publishing: accounts
//! live in an in-memory registry and posts are recorded locally. No real
//! platform API or OAuth exchange is performed.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use postwright_common::{AgentResult, Platform};
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{info, warn};
use uuid::Uuid;

/// Connection state of a linked account. A plain tag: any state may follow
/// any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Connected,
    Error,
    Expired,
    Pending,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialAccount {
    pub id: String,
    pub user_id: String,
    pub platform: Platform,
    pub account_name: String,
    /// Identifier on the platform side
    pub platform_account_id: String,
    pub status: AccountStatus,
    #[serde(skip_serializing, default)]
    pub access_token: String,
    pub token_expires_at: Option<DateTime<Utc>>,
    pub connected_at: DateTime<Utc>,
    pub last_sync: Option<DateTime<Utc>>,
    pub followers: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectAccountRequest {
    pub user_id: String,
    pub platform: Platform,
    pub account_name: String,
    pub access_token: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostingRequest {
    pub account_id: String,
    pub content: String,
    #[serde(default)]
    pub media_urls: Vec<String>,
    #[serde(default)]
    pub scheduled_time: Option<DateTime<Utc>>,
}

impl PostingRequest {
    pub fn new(account_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            content: content.into(),
            media_urls: vec![],
            scheduled_time: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostingResult {
    pub account_id: String,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PostingResult {
    /// Result recorded for a request that could not be posted.
    pub fn failed(account_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            success: false,
            post_id: None,
            posted_at: None,
            scheduled_for: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub account_id: String,
    pub followers: u64,
    pub posts_synced: usize,
    pub synced_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountAnalytics {
    pub account_id: String,
    pub platform: Platform,
    pub period_days: u32,
    pub posts_published: usize,
    pub posts_scheduled: usize,
    pub followers: u64,
    pub average_post_length: f64,
}

#[derive(Debug, Clone)]
struct PostRecord {
    account_id: String,
    content: String,
    published_at: Option<DateTime<Utc>>,
    scheduled_for: Option<DateTime<Utc>>,
}

/// Post records kept per account; the oldest are dropped first.
pub const POST_HISTORY_LIMIT: usize = 500;

/// Account registry and simulated publisher.
///
/// Like the vector store, everything lives for the life of the process.
/// Post history is capped per account and dropped on disconnect.
pub struct SocialAccountsAgent {
    accounts: RwLock<HashMap<String, SocialAccount>>,
    posts: RwLock<HashMap<String, VecDeque<PostRecord>>>,
    post_delay: Duration,
}

impl Default for SocialAccountsAgent {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000))
    }
}

impl SocialAccountsAgent {
    /// `post_delay` is the pause after every post in [`bulk_post`](Self::bulk_post).
    pub fn new(post_delay: Duration) -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            posts: RwLock::new(HashMap::new()),
            post_delay,
        }
    }

    pub fn connect_account(&self, request: ConnectAccountRequest) -> AgentResult<SocialAccount> {
        if request.access_token.trim().is_empty() {
            return AgentResult::failure("Missing access token");
        }

        let now = Utc::now();
        let account = SocialAccount {
            id: format!("acct_{}", Uuid::new_v4()),
            user_id: request.user_id,
            platform: request.platform,
            account_name: request.account_name,
            platform_account_id: Uuid::new_v4().simple().to_string(),
            status: AccountStatus::Connected,
            access_token: request.access_token,
            token_expires_at: request.expires_at,
            connected_at: now,
            last_sync: None,
            followers: 0,
        };

        info!(
            account_id = %account.id,
            platform = %account.platform,
            user_id = %account.user_id,
            "Connected account"
        );
        self.accounts
            .write()
            .insert(account.id.clone(), account.clone());
        AgentResult::ok(account)
    }

    /// Remove an account from the registry and return it.
    pub fn disconnect_account(&self, account_id: &str) -> AgentResult<SocialAccount> {
        match self.accounts.write().remove(account_id) {
            Some(account) => {
                self.posts.write().remove(account_id);
                info!(account_id, "Disconnected account");
                AgentResult::ok(account)
            }
            None => AgentResult::failure(format!("Account not found: {account_id}")),
        }
    }

    pub fn get_account(&self, account_id: &str) -> Option<SocialAccount> {
        self.accounts.read().get(account_id).cloned()
    }

    pub fn list_accounts(&self, user_id: &str) -> Vec<SocialAccount> {
        let mut accounts: Vec<SocialAccount> = self
            .accounts
            .read()
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        accounts.sort_by_key(|a| a.connected_at);
        accounts
    }

    /// Overwrite an account's status tag.
    pub fn set_status(&self, account_id: &str, status: AccountStatus) -> bool {
        match self.accounts.write().get_mut(account_id) {
            Some(account) => {
                account.status = status;
                true
            }
            None => false,
        }
    }

    /// Publish immediately.
    pub fn post_content(&self, request: &PostingRequest) -> AgentResult<PostingResult> {
        let account = match self.postable_account(&request.account_id) {
            Ok(account) => account,
            Err(e) => return AgentResult::failure(e),
        };
        if let Err(e) = check_length(&account.platform, &request.content) {
            return AgentResult::failure(e);
        }

        let now = Utc::now();
        let post_id = format!("post_{}", Uuid::new_v4());
        self.record_post(PostRecord {
            account_id: account.id.clone(),
            content: request.content.clone(),
            published_at: Some(now),
            scheduled_for: None,
        });

        info!(account_id = %account.id, platform = %account.platform, %post_id, "Posted content");
        AgentResult::ok(PostingResult {
            account_id: account.id,
            success: true,
            post_id: Some(post_id),
            posted_at: Some(now),
            scheduled_for: None,
            error: None,
        })
    }

    /// Queue a post for `request.scheduled_time`, which must be in the future.
    pub fn schedule_post(&self, request: &PostingRequest) -> AgentResult<PostingResult> {
        let Some(when) = request.scheduled_time else {
            return AgentResult::failure("Scheduled time is required");
        };
        if when <= Utc::now() {
            return AgentResult::failure(format!("Scheduled time {when} is in the past"));
        }
        let account = match self.postable_account(&request.account_id) {
            Ok(account) => account,
            Err(e) => return AgentResult::failure(e),
        };
        if let Err(e) = check_length(&account.platform, &request.content) {
            return AgentResult::failure(e);
        }

        let post_id = format!("post_{}", Uuid::new_v4());
        self.record_post(PostRecord {
            account_id: account.id.clone(),
            content: request.content.clone(),
            published_at: None,
            scheduled_for: Some(when),
        });

        info!(account_id = %account.id, %post_id, scheduled_for = %when, "Scheduled post");
        AgentResult::ok(PostingResult {
            account_id: account.id,
            success: true,
            post_id: Some(post_id),
            posted_at: None,
            scheduled_for: Some(when),
            error: None,
        })
    }

    pub fn sync_account_data(&self, account_id: &str) -> AgentResult<SyncResult> {
        let now = Utc::now();
        let posts_synced = self.published_count(account_id);

        let mut accounts = self.accounts.write();
        let Some(account) = accounts.get_mut(account_id) else {
            return AgentResult::failure(format!("Account not found: {account_id}"));
        };
        if account.status != AccountStatus::Connected {
            return AgentResult::failure(format!(
                "Account {account_id} is not connected ({:?})",
                account.status
            ));
        }
        account.last_sync = Some(now);

        AgentResult::ok(SyncResult {
            account_id: account_id.to_string(),
            followers: account.followers,
            posts_synced,
            synced_at: now,
        })
    }

    /// Activity recorded for an account over the last `period_days`.
    pub fn get_account_analytics(&self, account_id: &str, period_days: u32) -> AgentResult<AccountAnalytics> {
        let Some(account) = self.get_account(account_id) else {
            return AgentResult::failure(format!("Account not found: {account_id}"));
        };
        let since = Utc::now() - chrono::Duration::days(i64::from(period_days));

        let posts = self.posts.read();
        let history = posts.get(account_id);
        let published: Vec<&PostRecord> = history
            .into_iter()
            .flatten()
            .filter(|p| p.published_at.is_some_and(|t| t >= since))
            .collect();
        let posts_scheduled = history
            .into_iter()
            .flatten()
            .filter(|p| p.scheduled_for.is_some())
            .count();
        let average_post_length = if published.is_empty() {
            0.0
        } else {
            published
                .iter()
                .map(|p| p.content.chars().count() as f64)
                .sum::<f64>()
                / published.len() as f64
        };

        AgentResult::ok(AccountAnalytics {
            account_id: account.id,
            platform: account.platform,
            period_days,
            posts_published: published.len(),
            posts_scheduled,
            followers: account.followers,
            average_post_length,
        })
    }

    /// Post each request in order, pausing after every one.
    ///
    /// A failed post becomes a failed [`PostingResult`] and processing
    /// continues with the next request.
    pub async fn bulk_post(&self, requests: &[PostingRequest]) -> Vec<PostingResult> {
        info!(count = requests.len(), "Bulk posting");
        let mut results = Vec::with_capacity(requests.len());

        for request in requests {
            let result = match self.post_content(request).into_data() {
                Ok(result) => result,
                Err(e) => {
                    warn!(account_id = %request.account_id, error = %e, "Bulk post failed");
                    PostingResult::failed(&request.account_id, e)
                }
            };
            results.push(result);
            sleep(self.post_delay).await;
        }

        results
    }

    fn postable_account(&self, account_id: &str) -> Result<SocialAccount, String> {
        let mut accounts = self.accounts.write();
        let account = accounts
            .get_mut(account_id)
            .ok_or_else(|| format!("Account not found: {account_id}"))?;

        if account.token_expires_at.is_some_and(|t| t <= Utc::now()) {
            account.status = AccountStatus::Expired;
        }
        match account.status {
            AccountStatus::Connected => Ok(account.clone()),
            AccountStatus::Expired => Err(format!("Account {account_id} token has expired")),
            AccountStatus::Error | AccountStatus::Pending => {
                Err(format!("Account {account_id} is not connected"))
            }
        }
    }

    fn published_count(&self, account_id: &str) -> usize {
        self.posts
            .read()
            .get(account_id)
            .map_or(0, |history| {
                history.iter().filter(|p| p.published_at.is_some()).count()
            })
    }

    fn record_post(&self, record: PostRecord) {
        let mut posts = self.posts.write();
        let history = posts.entry(record.account_id.clone()).or_default();
        if history.len() == POST_HISTORY_LIMIT {
            history.pop_front();
        }
        history.push_back(record);
    }
}

fn check_length(platform: &Platform, content: &str) -> Result<(), String> {
    if content.trim().is_empty() {
        return Err("Content is empty".to_string());
    }
    let length = content.chars().count();
    match platform.max_length() {
        Some(max) if length > max => Err(format!(
            "Content is {length} characters; {platform} allows {max}"
        )),
        _ => Ok(()),
    }
}
