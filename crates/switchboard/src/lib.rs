//! Switchboard adapts an OpenAI-compatible chat-completion backend into a
//! normalized token stream, and routes model-requested tool calls to an
//! automation backend before surfacing the final answer.
//!
//! The flow for one request: build the provider body from the conversation,
//! drain the first streamed completion, reconstruct any tool calls from the
//! streamed fragments, execute them against the automation service, then
//! drain a second completion carrying the tool results. Whichever pass ends
//! the cycle is normalized into [`models::token::StreamToken`]s for the caller.
pub mod actions;
pub mod endpoint;
pub mod errors;
pub mod models;
pub mod providers;
