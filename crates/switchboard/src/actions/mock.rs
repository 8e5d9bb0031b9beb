use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

use super::executor::ActionExecutor;
use crate::errors::EndpointResult;

/// A scripted executor that records invocations and returns canned results.
pub struct MockExecutor {
    results: Arc<Mutex<Vec<EndpointResult<Value>>>>,
    calls: Arc<Mutex<Vec<(String, Value)>>>,
}

impl MockExecutor {
    pub fn new(results: Vec<EndpointResult<Value>>) -> Self {
        Self {
            results: Arc::new(Mutex::new(results)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<(String, Value)>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl ActionExecutor for MockExecutor {
    async fn execute(&self, action: &str, parameters: Value) -> EndpointResult<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((action.to_string(), parameters));
        let mut results = self.results.lock().unwrap();
        if results.is_empty() {
            Ok(json!({"status": "succeeded"}))
        } else {
            results.remove(0)
        }
    }
}
