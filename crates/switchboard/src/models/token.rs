use serde::{Deserialize, Serialize};

/// One element of the normalized output stream.
///
/// `generated_text` is `Some` only on the final token, where it holds the
/// concatenation of every `text` field emitted so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamToken {
    pub id: u32,
    pub text: String,
    pub special: bool,
    pub generated_text: Option<String>,
}
