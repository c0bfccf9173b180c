//! CompletionClient trait definition

use async_trait::async_trait;

use super::BackendError;

/// Stateless text-completion transport
///
/// Each call is independent: one prompt in, one raw completion out. The
/// remote decomposer owns prompt construction and response validation, so a
/// client only moves text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Name of the backing model or service
    fn model(&self) -> &str;

    /// Send a prompt and wait for the full completion
    async fn complete(&self, prompt: &str) -> Result<String, BackendError>;
}
