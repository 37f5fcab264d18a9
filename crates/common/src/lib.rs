//! Common types shared across Postwright crates.
//!
//! This crate holds the data every agent speaks: the uniform
//! [`AgentResult`] envelope, the platform and post-type vocabulary, and the
//! brand/campaign/content request model supplied by external collaborators.

pub mod content;
pub mod error;
pub mod platform;
pub mod result;

pub use content::{BrandProfile, Campaign, ContentRequest, GeneratedContent, content_key};
pub use error::{PostwrightError, Result};
pub use platform::{Platform, PostType};
pub use result::{AgentMetadata, AgentResult};
