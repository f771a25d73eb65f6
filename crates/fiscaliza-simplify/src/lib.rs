//! Plain-language rewriting of legislative text through a chat-completions
//! endpoint.

mod client;
mod error;
mod prompt;

pub use client::{SimplifyResponse, Simplifier, DEFAULT_TIMEOUT_SECS};
pub use error::SimplifyError;
