//! Assistant responder gateway: free-text replies from an external service.
//!
//! Scripted turns never come through here. Anything the transition engine
//! cannot answer on its own is handed to a [`Responder`] together with the
//! full conversation history.

pub mod http;

pub use http::HttpResponder;

use async_trait::async_trait;

use crate::conversation::Message;

/// Reply used whenever the responder cannot produce one.
pub const FALLBACK_REPLY: &str = "Sorry, I couldn't process your request right now.";

/// Produces a free-text assistant reply for a conversation.
///
/// `respond` never fails: implementations recover from their own errors
/// and return [`FALLBACK_REPLY`] instead. Each call is attempted once.
#[async_trait]
pub trait Responder: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Reply to the last user message in `history`.
    async fn respond(&self, history: &[Message]) -> String;
}
