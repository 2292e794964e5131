use async_trait::async_trait;
use std::fmt;
use crate::Result;

/// A single chat-style completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub temperature: f32,
}

#[async_trait]
pub trait CompletionModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Run one completion and return the raw text of the first choice
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;
}
