use async_trait::async_trait;
use serde_json::Value;

use super::chunk::ChatChunk;
use crate::errors::EndpointResult;

/// A chat-completion backend that streams its response.
///
/// The endpoint decides on tool calls only after a completion has finished,
/// so implementations drain the whole stream and return the ordered chunk
/// list rather than exposing the stream itself.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat_stream(&self, body: Value) -> EndpointResult<Vec<ChatChunk>>;
}
