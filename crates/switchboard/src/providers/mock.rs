use async_trait::async_trait;
use serde_json::Value;
use std::sync::{Arc, Mutex};

use super::base::ChatBackend;
use super::chunk::ChatChunk;
use crate::errors::EndpointResult;

/// A scripted backend that returns pre-configured completion passes and
/// records every request body, for testing the endpoint without a server.
pub struct MockBackend {
    passes: Arc<Mutex<Vec<Vec<ChatChunk>>>>,
    requests: Arc<Mutex<Vec<Value>>>,
}

impl MockBackend {
    pub fn new(passes: Vec<Vec<ChatChunk>>) -> Self {
        Self {
            passes: Arc::new(Mutex::new(passes)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn requests(&self) -> Arc<Mutex<Vec<Value>>> {
        self.requests.clone()
    }
}

#[async_trait]
impl ChatBackend for MockBackend {
    async fn chat_stream(&self, body: Value) -> EndpointResult<Vec<ChatChunk>> {
        self.requests.lock().unwrap().push(body);
        let mut passes = self.passes.lock().unwrap();
        if passes.is_empty() {
            Ok(vec![ChatChunk::stop()])
        } else {
            Ok(passes.remove(0))
        }
    }
}
