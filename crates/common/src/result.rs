//! The uniform result envelope returned by every agent operation.

use serde::{Deserialize, Serialize};

/// Timing and model information attached to an agent call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentMetadata {
    /// Wall-clock milliseconds since the first attempt began
    pub processing_time: u64,

    /// Model identifier that served the call
    pub model: String,
}

/// Outcome of an agent operation.
///
/// Expected failures are carried as data in `error`; nothing above the
/// retry executor raises them as Rust errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentResult<T> {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<AgentMetadata>,
}

impl<T> AgentResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            metadata: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            metadata: None,
        }
    }

    pub fn with_metadata(mut self, metadata: AgentMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Error text, or a generic message when a failure carried none.
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("unknown error")
    }

    /// Transform the payload, keeping success flag, error and metadata.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> AgentResult<U> {
        AgentResult {
            success: self.success,
            data: self.data.map(f),
            error: self.error,
            metadata: self.metadata,
        }
    }

    /// Payload of a successful call as a `Result`, error text otherwise.
    pub fn into_data(self) -> std::result::Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            (_, _) => Err(self
                .error
                .unwrap_or_else(|| "agent returned no data".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ok_result_serializes_camel_case() {
        let result = AgentResult::ok(vec!["a".to_string()]).with_metadata(AgentMetadata {
            processing_time: 42,
            model: "gpt-4o".into(),
        });
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["data"][0], "a");
        assert_eq!(json["metadata"]["processingTime"], 42);
        assert_eq!(json["metadata"]["model"], "gpt-4o");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn failure_has_no_data() {
        let result: AgentResult<u32> = AgentResult::failure("boom");
        assert!(!result.is_success());
        assert_eq!(result.error_message(), "boom");
        assert_eq!(result.into_data(), Err("boom".to_string()));
    }

    #[test]
    fn map_keeps_envelope() {
        let result = AgentResult::ok(2).map(|n| n * 10);
        assert!(result.success);
        assert_eq!(result.data, Some(20));
    }

    #[test]
    fn success_without_data_is_not_data() {
        let result: AgentResult<u32> = AgentResult {
            success: true,
            data: None,
            error: None,
            metadata: None,
        };
        assert!(result.into_data().is_err());
    }
}
