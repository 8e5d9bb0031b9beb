use super::chunk::ChatChunk;
use crate::models::token::StreamToken;

/// Normalizes a drained chunk list into the generic token stream.
///
/// One token per chunk, in input order. Ids are monotonic from zero. The
/// running concatenation of `text` is surfaced as `generated_text` on the
/// chunk that carries `finish_reason == "stop"`, and nowhere else.
pub struct TokenStream {
    chunks: std::vec::IntoIter<ChatChunk>,
    generated: String,
    next_id: u32,
}

impl TokenStream {
    pub fn new(chunks: Vec<ChatChunk>) -> Self {
        TokenStream {
            chunks: chunks.into_iter(),
            generated: String::new(),
            next_id: 0,
        }
    }
}

impl Iterator for TokenStream {
    type Item = StreamToken;

    fn next(&mut self) -> Option<StreamToken> {
        let chunk = self.chunks.next()?;
        let choice = chunk.choices.first();

        let content = choice
            .and_then(|c| c.delta.content.as_deref())
            .unwrap_or("");
        let last = choice
            .and_then(|c| c.finish_reason.as_deref())
            .is_some_and(|reason| reason == "stop");

        self.generated.push_str(content);

        let id = self.next_id;
        self.next_id += 1;

        Some(StreamToken {
            id,
            text: content.to_string(),
            special: last,
            generated_text: last.then(|| self.generated.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::chunk::{ChunkChoice, ChunkDelta};

    fn chunks() -> Vec<ChatChunk> {
        vec![
            ChatChunk::text("Ticket "),
            ChatChunk::text("T1 "),
            ChatChunk::text("deleted."),
            ChatChunk::stop(),
        ]
    }

    #[test]
    fn test_one_token_per_chunk_with_monotonic_ids() {
        let tokens: Vec<StreamToken> = TokenStream::new(chunks()).collect();

        assert_eq!(tokens.len(), 4);
        for (i, token) in tokens.iter().enumerate() {
            assert_eq!(token.id, i as u32);
        }
    }

    #[test]
    fn test_generated_text_only_on_stop() {
        let tokens: Vec<StreamToken> = TokenStream::new(chunks()).collect();

        let finals: Vec<&StreamToken> = tokens.iter().filter(|t| t.generated_text.is_some()).collect();
        assert_eq!(finals.len(), 1);
        assert!(finals[0].special);
        assert_eq!(
            finals[0].generated_text.as_deref(),
            Some("Ticket T1 deleted.")
        );
    }

    #[test]
    fn test_stop_chunk_carrying_text_is_included_in_generated() {
        let input = vec![
            ChatChunk::text("Done"),
            ChatChunk {
                choices: vec![ChunkChoice {
                    delta: ChunkDelta {
                        content: Some("!".to_string()),
                        tool_calls: None,
                    },
                    finish_reason: Some("stop".to_string()),
                }],
            },
        ];

        let tokens: Vec<StreamToken> = TokenStream::new(input).collect();
        assert_eq!(tokens[1].text, "!");
        assert_eq!(tokens[1].generated_text.as_deref(), Some("Done!"));
    }

    #[test]
    fn test_chunk_without_choices_yields_empty_token() {
        let tokens: Vec<StreamToken> = TokenStream::new(vec![ChatChunk::default()]).collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "");
        assert!(!tokens[0].special);
        assert!(tokens[0].generated_text.is_none());
    }

    #[test]
    fn test_normalization_is_pure() {
        let first: Vec<StreamToken> = TokenStream::new(chunks()).collect();
        let second: Vec<StreamToken> = TokenStream::new(chunks()).collect();
        assert_eq!(first, second);
    }
}
