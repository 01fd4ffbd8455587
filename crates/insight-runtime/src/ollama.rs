//! Ollama LLM Provider
//!
//! Implementation of `LlmProvider` for local Ollama inference.

use std::time::Duration;

use async_trait::async_trait;
use insight_core::{
    error::{CoreError, Result},
    message::{Message, Role},
    provider::{
        Completion, FinishReason, GenerationOptions, LlmProvider, ModelInfo, ProviderInfo,
        TokenUsage,
    },
};
use ollama_rs::{
    generation::chat::{request::ChatMessageRequest, ChatMessage, ChatMessageResponse, MessageRole},
    models::ModelOptions,
    Ollama,
};

/// Ollama provider configuration
#[derive(Clone, Debug)]
pub struct OllamaConfig {
    /// Ollama host URL
    pub host: String,

    /// Ollama port
    pub port: u16,

    /// Upper bound on a single generation request, in seconds
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            host: "http://localhost".into(),
            port: 11434,
            timeout_secs: 120,
        }
    }
}

fn saturate(count: u64) -> u32 {
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Ollama LLM provider
pub struct OllamaProvider {
    client: Ollama,
    config: OllamaConfig,
}

impl OllamaProvider {
    /// Create from configuration
    pub fn from_config(config: OllamaConfig) -> Self {
        Self {
            client: Ollama::new(&config.host, config.port),
            config,
        }
    }

    /// Base URL the client talks to
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Convert prompt messages to Ollama format
    fn convert_messages(messages: &[Message]) -> Vec<ChatMessage> {
        messages
            .iter()
            .map(|m| {
                let role = match m.role {
                    Role::System => MessageRole::System,
                    Role::User => MessageRole::User,
                    Role::Assistant => MessageRole::Assistant,
                };
                ChatMessage::new(role, m.content.clone())
            })
            .collect()
    }

    /// Convert Ollama response to a completion
    fn convert_completion(response: ChatMessageResponse, model: &str) -> Completion {
        Completion {
            content: response.message.content,
            model: model.to_string(),
            usage: response.final_data.as_ref().map(|d| TokenUsage {
                prompt_tokens: saturate(d.prompt_eval_count),
                completion_tokens: saturate(d.eval_count),
                total_tokens: saturate(d.prompt_eval_count.saturating_add(d.eval_count)),
            }),
            finish_reason: Some(FinishReason::Stop),
        }
    }

    /// Build Ollama generation options
    fn build_options(opts: &GenerationOptions) -> ModelOptions {
        let options = ModelOptions::default()
            .temperature(opts.temperature)
            .top_p(opts.top_p)
            .num_predict(i32::try_from(opts.max_tokens).unwrap_or(i32::MAX));

        match opts.top_k {
            Some(k) => options.top_k(k),
            None => options,
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn info(&self) -> Result<ProviderInfo> {
        let models = self.list_models().await.unwrap_or_default();

        Ok(ProviderInfo {
            name: "Ollama".into(),
            version: None, // Ollama API doesn't expose version
            models,
        })
    }

    async fn health_check(&self) -> Result<bool> {
        match self.client.list_local_models().await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!(endpoint = %self.endpoint(), "Ollama health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        messages: &[Message],
        options: &GenerationOptions,
    ) -> Result<Completion> {
        let request = ChatMessageRequest::new(options.model.clone(), Self::convert_messages(messages))
            .options(Self::build_options(options));

        let response = tokio::time::timeout(
            Duration::from_secs(self.config.timeout_secs),
            self.client.send_chat_messages(request),
        )
        .await
        .map_err(|_| CoreError::Timeout(self.config.timeout_secs))?
        .map_err(|e| CoreError::Provider(e.to_string()))?;

        tracing::debug!(model = %options.model, "Ollama completion received");

        Ok(Self::convert_completion(response, &options.model))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let models = self
            .client
            .list_local_models()
            .await
            .map_err(|e| CoreError::ProviderUnavailable(e.to_string()))?;

        Ok(models
            .into_iter()
            .map(|m| ModelInfo {
                id: m.name.clone(),
                name: m.name,
                context_length: None, // Not exposed by Ollama API
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider(host: &str, port: u16) -> OllamaProvider {
        OllamaProvider::from_config(OllamaConfig {
            host: host.into(),
            port,
            ..Default::default()
        })
    }

    #[test]
    fn test_config_defaults() {
        let config = OllamaConfig::default();
        assert_eq!(config.host, "http://localhost");
        assert_eq!(config.port, 11434);
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_endpoint() {
        assert_eq!(provider("http://model-host", 8080).endpoint(), "http://model-host:8080");
    }

    #[test]
    fn test_message_conversion() {
        let messages = vec![
            Message::new(Role::System, "You are a banking assistant."),
            Message::user("User Profile: ..."),
        ];

        let converted = OllamaProvider::convert_messages(&messages);
        assert_eq!(converted.len(), 2);
        assert_eq!(converted[0].role, MessageRole::System);
        assert_eq!(converted[1].role, MessageRole::User);
        assert_eq!(converted[1].content, "User Profile: ...");
    }

    #[test]
    fn test_options_carry_sampling_settings() {
        let opts = GenerationOptions {
            max_tokens: 500,
            top_k: Some(50),
            ..Default::default()
        };
        let json = serde_json::to_value(OllamaProvider::build_options(&opts)).unwrap();
        assert_eq!(json["num_predict"], 500);
        assert_eq!(json["top_k"], 50);

        let json = serde_json::to_value(OllamaProvider::build_options(&GenerationOptions::default()))
            .unwrap();
        assert!(json.get("top_k").is_none());
    }

    #[test]
    fn test_completion_usage_from_final_data() {
        let response: ChatMessageResponse = serde_json::from_value(serde_json::json!({
            "model": "llama3.2",
            "created_at": "2025-03-01T10:00:00Z",
            "message": { "role": "assistant", "content": "Build an emergency fund." },
            "done": true,
            "total_duration": 1,
            "load_duration": 1,
            "prompt_eval_count": 42,
            "prompt_eval_duration": 1,
            "eval_count": 17,
            "eval_duration": 1
        }))
        .unwrap();

        let completion = OllamaProvider::convert_completion(response, "llama3.2");
        assert_eq!(completion.content, "Build an emergency fund.");
        let usage = completion.usage.unwrap();
        assert_eq!(usage.prompt_tokens, 42);
        assert_eq!(usage.completion_tokens, 17);
        assert_eq!(usage.total_tokens, 59);
    }
}
