//! Chat completion models.

mod openai;

pub use openai::OpenAIChatModel;

use crate::error::Result;
use async_trait::async_trait;

/// A hosted chat model answering a single rendered prompt.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send `prompt` as one user message and return the reply text.
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Name of the underlying model.
    fn model(&self) -> &str;
}
