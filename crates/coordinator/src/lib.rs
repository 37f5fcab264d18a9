//! Content-plan orchestrator for Postwright.
//!
//! The orchestrator sequences the specialist agents into content plans and
//! runs bulk work in bounded batches.
//!
//! ```text
//! ContentPlanRequest
//!      │
//!      ▼
//! ┌──────────────┐   optional, non-fatal
//! │   Research   │ ───────────────┐
//! └──────┬───────┘                │ trend titles
//!        ▼                        ▼
//! ┌──────────────┐   fatal   ┌──────────────────┐
//! │   Content    │ ◄──────── │ Retrieval Store  │
//! └──────┬───────┘           └──────────────────┘
//!        │ one task per item
//!    ┌───┴────┬────────┐
//!    ▼        ▼        ▼
//! [Sched]  [Sched]  [Sched]      optional, per-item errors
//!        │
//!        ▼
//!   ContentPlan { content, scheduling, research, success, errors }
//! ```

pub mod config;
pub mod orchestrator;

pub use config::{OrchestratorConfig, PostwrightConfig};
pub use orchestrator::{ContentPlan, ContentPlanRequest, Orchestrator};
