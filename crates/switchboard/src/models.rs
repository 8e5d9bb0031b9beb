//! These models represent the objects passed around by the endpoint
//!
//! There are three related formats we need to interact with:
//! - chat application messages/parameters, sent from the interface to the endpoint
//! - openai wire messages/tools, sent from the endpoint to the completion backend
//! - stream tokens, sent from the endpoint back to the interface
//!
//! Inbound data is converted into the wire structs immediately; the endpoint
//! only ever works on the wire representation.
pub mod message;
pub mod token;
pub mod tool;
