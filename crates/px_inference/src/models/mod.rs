use std::sync::Arc;
use px_core::{CompletionModel, Error, Result};
use tracing::info;
use crate::InferenceConfig;

pub mod dummy;
pub mod openai;

pub use dummy::DummyModel;
pub use openai::OpenAiModel;

pub const AVAILABLE_MODELS: &[&str] = &["openai", "dummy"];

/// Build the completion model named in `config`.
pub fn create_model(config: &InferenceConfig) -> Result<Arc<dyn CompletionModel>> {
    match config.model.to_lowercase().as_str() {
        "openai" => Ok(Arc::new(openai_model(config))),
        "dummy" => Ok(Arc::new(DummyModel::new())),
        other => Err(Error::Inference(format!(
            "Unknown model '{}'. Available models: {}",
            other,
            AVAILABLE_MODELS.join(", ")
        ))),
    }
}

fn openai_model(config: &InferenceConfig) -> OpenAiModel {
    let mut model = OpenAiModel::new(config.api_key.clone());
    if let Some(url) = &config.model_url {
        model = model.with_base_url(url.as_str());
    }
    if let Some(name) = &config.model_name {
        model = model.with_model(name.as_str());
    }
    info!("🧠 OpenAI-compatible model: {}", model.model());
    model
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_model_by_name() {
        let config = InferenceConfig::default();
        assert_eq!(create_model(&config).unwrap().name(), "OpenAI");

        let config = InferenceConfig {
            model: "Dummy".to_string(),
            ..InferenceConfig::default()
        };
        assert_eq!(create_model(&config).unwrap().name(), "Dummy");
    }

    #[test]
    fn test_create_model_without_key_succeeds() {
        let config = InferenceConfig {
            api_key: None,
            ..InferenceConfig::default()
        };
        assert!(create_model(&config).is_ok());
    }

    #[test]
    fn test_openai_model_name_override() {
        assert_eq!(openai_model(&InferenceConfig::default()).model(), openai::DEFAULT_MODEL);

        let config = InferenceConfig {
            model_name: Some("gpt-4o".to_string()),
            ..InferenceConfig::default()
        };
        assert_eq!(openai_model(&config).model(), "gpt-4o");
    }

    #[test]
    fn test_create_unknown_model() {
        let config = InferenceConfig {
            model: "langchain".to_string(),
            ..InferenceConfig::default()
        };
        let err = create_model(&config).unwrap_err();
        assert!(err.to_string().contains("Available models: openai, dummy"));
    }
}
