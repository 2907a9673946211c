use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Outcome of a single connectivity probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProbeResult {
    Success { item_count: u64 },
    /// The verification server (or the local guard) reported a failure.
    Failure { message: String },
    /// Transport or decode failure while talking to the verification server.
    Error { message: String },
}

impl ProbeResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ProbeResult::Success { .. })
    }
}

impl std::fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProbeResult::Success { item_count } => {
                write!(f, "Connection successful, {} items found", item_count)
            }
            ProbeResult::Failure { message } => write!(f, "Connection failed: {}", message),
            ProbeResult::Error { message } => write!(f, "Connection error: {}", message),
        }
    }
}

/// Body sent to `POST /test-webdav`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerificationRequest {
    pub url: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub path: String,
}

/// Body returned by `POST /test-webdav`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VerificationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerificationResponse {
    pub fn ok(items: u64) -> Self {
        Self {
            success: true,
            items: Some(items),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            items: None,
            error: Some(error.into()),
        }
    }
}

impl From<VerificationResponse> for ProbeResult {
    fn from(response: VerificationResponse) -> Self {
        if response.success {
            ProbeResult::Success {
                item_count: response.items.unwrap_or(0),
            }
        } else {
            ProbeResult::Failure {
                message: response
                    .error
                    .unwrap_or_else(|| "Verification failed without a reason".to_string()),
            }
        }
    }
}
