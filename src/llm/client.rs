//! Chat client boundary
//!
//! The pipeline depends on exactly one operation: send one rendered prompt,
//! receive one raw text response.

use async_trait::async_trait;

use crate::error::Result;

/// A chat endpoint that turns one prompt into one raw text response
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send a fully rendered prompt and return the raw response text
    ///
    /// Blocks until the endpoint answers. Fails with
    /// [`crate::PromptrError::Transport`] on network, auth, or rate-limit
    /// problems. Retry and backoff belong to the implementation or a
    /// wrapping policy, not this boundary.
    async fn invoke(&self, prompt: &str) -> Result<String>;
}
