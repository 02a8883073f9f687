//! Channels that put a conversation in front of a user.

pub mod cli;
pub mod http;
pub mod render;

pub use cli::CliChannel;
pub use http::HttpChannel;

use std::pin::Pin;

use futures::Stream;

/// Stream of lines typed by the user.
pub type LineStream = Pin<Box<dyn Stream<Item = String> + Send>>;
