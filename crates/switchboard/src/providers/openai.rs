use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::base::ChatBackend;
use super::chunk::ChatChunk;
use super::configs::OpenAiConfig;
use crate::errors::{EndpointError, EndpointResult};

/// OpenAI-compatible chat-completion client.
pub struct OpenAiClient {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> EndpointResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600)) // 10 minutes timeout
            .build()?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl ChatBackend for OpenAiClient {
    async fn chat_stream(&self, body: Value) -> EndpointResult<Vec<ChatChunk>> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.host.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EndpointError::Api {
                status,
                body: response.text().await.unwrap_or_default(),
            });
        }

        let mut chunks = Vec::new();
        let mut buffer: Vec<u8> = Vec::new();
        let mut stream = response.bytes_stream();
        let mut done = false;

        'drain: while let Some(bytes) = stream.next().await {
            buffer.extend_from_slice(&bytes?);

            while let Some((at, width)) = frame_boundary(&buffer) {
                let frame: Vec<u8> = buffer.drain(..at + width).collect();
                let frame = String::from_utf8_lossy(&frame[..at]).into_owned();
                match parse_frame(&frame)? {
                    Frame::Chunk(chunk) => chunks.push(chunk),
                    Frame::Done => {
                        done = true;
                        break 'drain;
                    }
                    Frame::Empty => {}
                }
            }
        }

        // A connection closed without the done sentinel may leave a final
        // frame that was never followed by a blank line.
        if !done {
            let tail = String::from_utf8_lossy(&buffer).into_owned();
            if let Frame::Chunk(chunk) = parse_frame(&tail)? {
                chunks.push(chunk);
            }
        }

        debug!(count = chunks.len(), "drained completion stream");
        Ok(chunks)
    }
}

enum Frame {
    Chunk(ChatChunk),
    Done,
    Empty,
}

/// Start and width of the first blank line separating SSE frames. Servers
/// frame with either bare LF or CRLF line endings.
fn frame_boundary(buffer: &[u8]) -> Option<(usize, usize)> {
    let lf = buffer.windows(2).position(|pair| pair == b"\n\n");
    let crlf = buffer.windows(4).position(|quad| quad == b"\r\n\r\n");
    match (lf, crlf) {
        (Some(lf), Some(crlf)) if crlf < lf => Some((crlf, 4)),
        (Some(lf), _) => Some((lf, 2)),
        (None, Some(crlf)) => Some((crlf, 4)),
        (None, None) => None,
    }
}

fn parse_frame(frame: &str) -> EndpointResult<Frame> {
    for line in frame.lines() {
        let line = line.trim_end_matches('\r');
        let Some(payload) = line.strip_prefix("data:") else {
            continue;
        };
        let payload = payload.trim_start();
        if payload == "[DONE]" {
            return Ok(Frame::Done);
        }
        let chunk = serde_json::from_str(payload)
            .map_err(|e| EndpointError::Protocol(format!("bad chunk: {e}")))?;
        return Ok(Frame::Chunk(chunk));
    }
    Ok(Frame::Empty)
}
