use serde_json::{Map, Value};
use std::time::Duration;

/// The system instruction placed ahead of every completion request, forcing
/// the model to ask for confirmation before a function is executed.
pub const CONFIRMATION_INSTRUCTION: &str = "If the user requests a function call, please ask for confirmation with the function arguments before executing the function.";

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub host: String,
    pub api_key: String,
    pub model: String,
    /// Provider-specific fields merged verbatim into every request body.
    pub extra_body: Option<Map<String, Value>>,
    /// When set, overwrites the first system message of every request.
    /// `None` leaves the caller's preprompt in place.
    pub system_instruction: Option<String>,
}

impl OpenAiConfig {
    pub fn new(host: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        OpenAiConfig {
            host: host.into(),
            api_key: api_key.into(),
            model: model.into(),
            extra_body: None,
            system_instruction: Some(CONFIRMATION_INSTRUCTION.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AutomationConfig {
    pub host: String,
    pub api_key: String,
    pub poll_interval: Duration,
    pub max_polls: u32,
}

impl AutomationConfig {
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Self {
        AutomationConfig {
            host: host.into(),
            api_key: api_key.into(),
            poll_interval: Duration::from_secs(1),
            max_polls: 60,
        }
    }
}

/// Credentials merged into the drive-upload action's parameters.
#[derive(Debug, Clone)]
pub struct DriveConfig {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
    pub user_id: String,
}
