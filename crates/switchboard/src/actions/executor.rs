use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use crate::errors::{EndpointError, EndpointResult};
use crate::providers::configs::AutomationConfig;

/// Statuses under which an execution is still in flight.
const PENDING_STATUSES: [&str; 3] = ["requested", "scheduled", "running"];

/// Submits a named action to the automation backend and waits for its result.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    async fn execute(&self, action: &str, parameters: Value) -> EndpointResult<Value>;
}

/// HTTP client for the automation backend's execution API.
///
/// Submit creates an execution; the status endpoint is then polled until the
/// execution leaves the pending set or `max_polls` attempts are spent.
pub struct AutomationClient {
    client: Client,
    config: AutomationConfig,
}

impl AutomationClient {
    pub fn new(config: AutomationConfig) -> EndpointResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self { client, config })
    }

    fn executions_url(&self) -> String {
        format!(
            "{}/api/v1/executions",
            self.config.host.trim_end_matches('/')
        )
    }

    async fn submit(&self, action: &str, parameters: Value) -> EndpointResult<String> {
        let payload = json!({
            "action": action,
            "parameters": parameters,
        });

        let response = self
            .client
            .post(self.executions_url())
            .header("St2-Api-Key", &self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EndpointError::Api {
                status,
                body: response.text().await.unwrap_or_default(),
            });
        }

        let submitted: Value = response.json().await?;
        submitted
            .get("id")
            .and_then(Value::as_str)
            .map(String::from)
            .ok_or_else(|| EndpointError::Protocol("execution response missing id".to_string()))
    }

    async fn poll(&self, id: &str) -> EndpointResult<Value> {
        let url = format!("{}?id={}", self.executions_url(), id);

        let response = self
            .client
            .get(&url)
            .header("St2-Api-Key", &self.config.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EndpointError::Api {
                status,
                body: response.text().await.unwrap_or_default(),
            });
        }

        let listed: Value = response.json().await?;
        listed
            .get(0)
            .cloned()
            .ok_or_else(|| EndpointError::Protocol("execution listing is empty".to_string()))
    }
}

#[async_trait]
impl ActionExecutor for AutomationClient {
    async fn execute(&self, action: &str, parameters: Value) -> EndpointResult<Value> {
        let id = self.submit(action, parameters).await?;
        debug!(action, id = %id, "submitted execution");

        let mut last_status = String::new();
        for attempt in 0..self.config.max_polls {
            if attempt > 0 {
                tokio::time::sleep(self.config.poll_interval).await;
            }

            let execution = self.poll(&id).await?;
            last_status = execution
                .get("status")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();

            if !PENDING_STATUSES.contains(&last_status.as_str()) {
                let mut result = execution.get("result").cloned().unwrap_or_else(|| json!({}));
                if let Some(object) = result.as_object_mut() {
                    object.insert("status".to_string(), json!(last_status));
                }
                return Ok(result);
            }
        }

        warn!(action, id = %id, status = %last_status, "gave up polling execution");
        Err(EndpointError::PollTimeout {
            action: action.to_string(),
            status: last_status,
            attempts: self.config.max_polls,
        })
    }
}
