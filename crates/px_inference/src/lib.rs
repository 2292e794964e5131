pub mod models;
pub mod rerank;

#[derive(Clone)]
pub struct InferenceConfig {
    /// Model backend, one of `models::AVAILABLE_MODELS`
    pub model: String,
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    pub model_url: Option<String>,
}

impl std::fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("model_name", &self.model_name)
            .field("model_url", &self.model_url)
            .finish()
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            model: "openai".to_string(),
            api_key: None,
            model_name: None,
            model_url: None,
        }
    }
}

pub mod prelude {
    pub use super::InferenceConfig;
    pub use super::models::create_model;
    pub use super::rerank::ProfileReranker;
    pub use px_core::{Article, RankedArticle, SearchResponse, Result, Error};
}

pub use models::create_model;
pub use rerank::ProfileReranker;
