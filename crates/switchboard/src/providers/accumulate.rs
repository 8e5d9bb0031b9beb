use super::chunk::{ChatChunk, ToolCallDelta};
use crate::errors::{EndpointError, EndpointResult};
use crate::models::message::ToolCallRef;

/// Upper bound on the slots a completion pass may address. The working list
/// grows to `index + 1`, so the index is wire-controlled allocation.
const MAX_TOOL_CALLS: usize = 32;

/// Reconstructs complete tool calls from the fragments a streamed completion
/// delivers.
///
/// Fragments are addressed by `index`; the working list grows with empty
/// placeholders so an index can be introduced out of order. Every field is
/// appended, never overwritten, since a single call's name or arguments may
/// arrive split across many chunks.
#[derive(Debug, Default)]
pub struct ToolCallAccumulator {
    calls: Vec<ToolCallRef>,
}

impl ToolCallAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, delta: &ToolCallDelta) -> EndpointResult<()> {
        if delta.index >= MAX_TOOL_CALLS {
            return Err(EndpointError::Protocol(format!(
                "tool call index {} exceeds the {} slot limit",
                delta.index, MAX_TOOL_CALLS
            )));
        }
        while self.calls.len() <= delta.index {
            self.calls.push(ToolCallRef::default());
        }

        let call = &mut self.calls[delta.index];
        if let Some(id) = &delta.id {
            call.id.push_str(id);
        }
        if let Some(function) = &delta.function {
            if let Some(name) = &function.name {
                call.function.name.push_str(name);
            }
            if let Some(arguments) = &function.arguments {
                call.function.arguments.push_str(arguments);
            }
        }
        Ok(())
    }

    pub fn into_calls(self) -> Vec<ToolCallRef> {
        self.calls
    }
}

/// Walk a drained completion and return every tool call it requested, or an
/// empty list when the pass produced plain text only.
pub fn accumulate_tool_calls(chunks: &[ChatChunk]) -> EndpointResult<Vec<ToolCallRef>> {
    let mut accumulator = ToolCallAccumulator::new();
    for chunk in chunks {
        for choice in &chunk.choices {
            if let Some(deltas) = &choice.delta.tool_calls {
                for delta in deltas {
                    accumulator.apply(delta)?;
                }
            }
        }
    }
    Ok(accumulator.into_calls())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::chunk::FunctionDelta;

    fn delta(index: usize, id: Option<&str>, name: Option<&str>, arguments: Option<&str>) -> ToolCallDelta {
        ToolCallDelta {
            index,
            id: id.map(String::from),
            function: (name.is_some() || arguments.is_some()).then(|| FunctionDelta {
                name: name.map(String::from),
                arguments: arguments.map(String::from),
            }),
        }
    }

    #[test]
    fn test_fragments_concatenate() {
        let mut accumulator = ToolCallAccumulator::new();
        accumulator.apply(&delta(0, Some("a"), None, None)).unwrap();
        accumulator.apply(&delta(0, None, Some("sa"), None)).unwrap();
        accumulator.apply(&delta(0, None, Some("ve"), None)).unwrap();
        accumulator.apply(&delta(0, None, None, Some("{}"))).unwrap();

        let calls = accumulator.into_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].id, "a");
        assert_eq!(calls[0].function.name, "save");
        assert_eq!(calls[0].function.arguments, "{}");
    }

    #[test]
    fn test_out_of_order_index_leaves_placeholder() {
        let mut accumulator = ToolCallAccumulator::new();
        accumulator
            .apply(&delta(1, Some("b"), Some("sent_mail"), None))
            .unwrap();

        let calls = accumulator.into_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], ToolCallRef::default());
        assert_eq!(calls[1].function.name, "sent_mail");
    }

    #[test]
    fn test_oversized_index_is_rejected() {
        let mut accumulator = ToolCallAccumulator::new();
        let err = accumulator
            .apply(&delta(usize::MAX, Some("a"), None, None))
            .unwrap_err();
        assert!(matches!(err, EndpointError::Protocol(_)));
        assert!(accumulator.into_calls().is_empty());
    }

    #[test]
    fn test_arguments_split_across_chunks() {
        let chunks = vec![
            ChatChunk::tool_deltas(vec![delta(0, Some("call_1"), Some("delete_ticket"), None)]),
            ChatChunk::tool_deltas(vec![delta(0, None, None, Some("{\"ticket_id\""))]),
            ChatChunk::tool_deltas(vec![delta(0, None, None, Some(":\"T1\"}"))]),
            ChatChunk::stop(),
        ];

        let calls = accumulate_tool_calls(&chunks).unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].function.arguments, "{\"ticket_id\":\"T1\"}");
    }

    #[test]
    fn test_plain_text_pass_yields_no_calls() {
        let chunks = vec![ChatChunk::text("hello"), ChatChunk::stop()];
        assert!(accumulate_tool_calls(&chunks).unwrap().is_empty());
    }
}
