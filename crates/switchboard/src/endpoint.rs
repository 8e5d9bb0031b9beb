use async_stream::try_stream;
use futures::stream::BoxStream;
use serde_json::{json, Value};
use tracing::debug;

use crate::actions::catalog::{builtin_tools, ToolKind};
use crate::actions::executor::ActionExecutor;
use crate::errors::{EndpointError, EndpointResult};
use crate::models::message::{ChatRequest, GenerationSettings, Message, Role, ToolCallRef};
use crate::models::token::StreamToken;
use crate::models::tool::Tool;
use crate::providers::accumulate::accumulate_tool_calls;
use crate::providers::base::ChatBackend;
use crate::providers::configs::{DriveConfig, OpenAiConfig};
use crate::providers::stream::TokenStream;

/// ChatEndpoint drives one completion cycle against the backend, servicing
/// at most one round of tool calls in between the two passes.
pub struct ChatEndpoint {
    backend: Box<dyn ChatBackend>,
    executor: Box<dyn ActionExecutor>,
    config: OpenAiConfig,
    tools: Vec<Tool>,
    action_pack: String,
    drive: Option<DriveConfig>,
}

impl ChatEndpoint {
    pub fn new(
        backend: Box<dyn ChatBackend>,
        executor: Box<dyn ActionExecutor>,
        config: OpenAiConfig,
    ) -> Self {
        Self {
            backend,
            executor,
            config,
            tools: builtin_tools(),
            action_pack: "automation".to_string(),
            drive: None,
        }
    }

    /// Replace the tool catalogue offered to the model.
    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = tools;
        self
    }

    /// Set the automation pack that prefixes every action name.
    pub fn with_action_pack(mut self, pack: impl Into<String>) -> Self {
        self.action_pack = pack.into();
        self
    }

    /// Set the drive credentials merged into `save_output` invocations.
    pub fn with_drive(mut self, drive: DriveConfig) -> Self {
        self.drive = Some(drive);
        self
    }

    /// Map the inbound conversation to the wire format. The first message is
    /// normalized to a system message carrying the preprompt; when the
    /// confirmation instruction is configured it takes that slot instead.
    fn conversation(&self, request: &ChatRequest) -> Vec<Message> {
        let mut conversation: Vec<Message> = request.messages.iter().map(Message::from).collect();

        if conversation.first().map(|m| m.role) != Some(Role::System) {
            conversation.insert(0, Message::new(Role::System, ""));
        }
        conversation[0].content = Some(request.preprompt.clone().unwrap_or_default());

        if let Some(instruction) = &self.config.system_instruction {
            conversation[0].content = Some(instruction.clone());
        }

        conversation
    }

    fn build_body(&self, conversation: &[Message], settings: &GenerationSettings) -> Value {
        let mut body = json!({
            "model": self.config.model,
            "messages": conversation,
            "stream": true,
        });
        let object = body.as_object_mut().unwrap();

        if let Some(max_new_tokens) = settings.max_new_tokens {
            object.insert("max_tokens".to_string(), json!(max_new_tokens));
        }
        if let Some(stop) = &settings.stop {
            object.insert("stop".to_string(), json!(stop));
        }
        if let Some(temperature) = settings.temperature {
            object.insert("temperature".to_string(), json!(temperature));
        }
        if let Some(top_p) = settings.top_p {
            object.insert("top_p".to_string(), json!(top_p));
        }
        if let Some(repetition_penalty) = settings.repetition_penalty {
            object.insert("frequency_penalty".to_string(), json!(repetition_penalty));
        }

        let tool_specs: Vec<Value> = self.tools.iter().map(Tool::to_spec).collect();
        object.insert("tools".to_string(), json!(tool_specs));
        object.insert("tool_choice".to_string(), json!("auto"));

        if let Some(extra) = &self.config.extra_body {
            for (key, value) in extra {
                object.insert(key.clone(), value.clone());
            }
        }

        body
    }

    /// Execute every accumulated tool call in order and return the extended
    /// conversation snapshot: one assistant message carrying the calls, then
    /// one tool message per result.
    async fn dispatch_tool_calls(
        &self,
        conversation: &[Message],
        calls: Vec<ToolCallRef>,
    ) -> EndpointResult<Vec<Message>> {
        let mut next = conversation.to_vec();
        next.push(Message::assistant_tool_calls(calls.clone()));

        for call in calls {
            let kind = ToolKind::from_name(&call.function.name)
                .ok_or_else(|| EndpointError::ToolNotFound(call.function.name.clone()))?;
            let invocation =
                kind.invocation(&call.function.arguments, &self.action_pack, self.drive.as_ref())?;

            debug!(tool = kind.name(), action = %invocation.action, "dispatching tool call");
            let result = self
                .executor
                .execute(&invocation.action, invocation.parameters)
                .await?;

            next.push(Message::tool_result(call.id, kind.name(), result.to_string()));
        }

        Ok(next)
    }

    /// Create a stream of normalized tokens for one request.
    ///
    /// The first completion pass is drained fully before anything is surfaced.
    /// If it requested tool calls, they are executed and a second pass carrying
    /// the results becomes the output; the first pass's text is discarded.
    /// All network work happens inside the returned stream, so dropping it
    /// cancels any in-flight dispatch.
    pub async fn reply(
        &self,
        request: &ChatRequest,
    ) -> EndpointResult<BoxStream<'_, EndpointResult<StreamToken>>> {
        let conversation = self.conversation(request);
        let settings = request.settings.clone();

        Ok(Box::pin(try_stream! {
            let first = self
                .backend
                .chat_stream(self.build_body(&conversation, &settings))
                .await?;

            let calls = accumulate_tool_calls(&first)?;
            let chunks = if calls.is_empty() {
                first
            } else {
                debug!(count = calls.len(), "completion requested tool calls");
                let conversation = self.dispatch_tool_calls(&conversation, calls).await?;
                self.backend
                    .chat_stream(self.build_body(&conversation, &settings))
                    .await?
            };

            for token in TokenStream::new(chunks) {
                yield token;
            }
        }))
    }
}
