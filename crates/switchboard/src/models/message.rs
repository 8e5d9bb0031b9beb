use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A message as the chat application sends it to the endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub from: Role,
    pub content: String,
}

/// Generation parameters from the chat application, mapped 1:1 onto the
/// completion backend's parameters when the request body is built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub max_new_tokens: Option<u32>,
    pub stop: Option<Vec<String>>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub repetition_penalty: Option<f32>,
}

/// One request from the chat application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub preprompt: Option<String>,
    #[serde(default)]
    pub settings: GenerationSettings,
}

impl Default for ChatMessage {
    fn default() -> Self {
        ChatMessage {
            from: Role::User,
            content: String::new(),
        }
    }
}

/// The function half of a tool call, with arguments as a JSON-encoded string.
/// Only meaningful once fully accumulated from streamed fragments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

/// A completed tool-call invocation as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRef {
    pub id: String,
    #[serde(rename = "type")]
    pub call_type: String,
    pub function: FunctionCall,
}

impl Default for ToolCallRef {
    fn default() -> Self {
        ToolCallRef {
            id: String::new(),
            call_type: "function".to_string(),
            function: FunctionCall::default(),
        }
    }
}

/// A message in the completion backend's wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCallRef>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Message {
            role,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
            name: None,
        }
    }

    /// The assistant message that carries the tool calls requested by the model.
    pub fn assistant_tool_calls(tool_calls: Vec<ToolCallRef>) -> Self {
        Message {
            role: Role::Assistant,
            content: None,
            tool_calls: Some(tool_calls),
            tool_call_id: None,
            name: None,
        }
    }

    /// The tool message that carries one serialized action result back to the model.
    pub fn tool_result(
        tool_call_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Message {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
            name: Some(name.into()),
        }
    }
}

impl From<&ChatMessage> for Message {
    fn from(message: &ChatMessage) -> Self {
        Message::new(message.from, message.content.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_call_serialization() {
        let call = ToolCallRef {
            id: "call_1".to_string(),
            function: FunctionCall {
                name: "delete_ticket".to_string(),
                arguments: "{\"ticket_id\":\"T1\"}".to_string(),
            },
            ..Default::default()
        };

        let value = serde_json::to_value(&call).unwrap();
        assert_eq!(value["type"], "function");
        assert_eq!(value["function"]["name"], "delete_ticket");
    }

    #[test]
    fn test_message_skips_absent_fields() {
        let message = Message::new(Role::User, "hi");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value, json!({"role": "user", "content": "hi"}));

        let tool = Message::tool_result("call_1", "delete_ticket", "{}");
        let value = serde_json::to_value(&tool).unwrap();
        assert_eq!(value["role"], "tool");
        assert_eq!(value["tool_call_id"], "call_1");
        assert_eq!(value["name"], "delete_ticket");
        assert!(value.get("tool_calls").is_none());
    }
}
