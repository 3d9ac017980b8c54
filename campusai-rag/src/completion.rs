//! Chat completion client
//!
//! Thin client over an OpenAI-compatible `/chat/completions` endpoint. One
//! request per query, no retry; the orchestrator surfaces failures.

use crate::prompt::PromptMessage;
use async_trait::async_trait;
use campusai_core::{AssistantError, CoreResult, GenerationConfig};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Seam over answer generation so the pipeline can be driven without a model.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, messages: &[PromptMessage]) -> CoreResult<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
    temperature: f32,
    max_tokens: u32,
    presence_penalty: f32,
    frequency_penalty: f32,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

impl ChatResponse {
    /// First choice's content with surrounding whitespace stripped. Models
    /// occasionally pad the answer with leading or trailing newlines.
    fn into_answer(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.trim().to_string())
    }
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: String,
}

pub struct OpenAiChatClient {
    client: reqwest::Client,
    endpoint: String,
    config: GenerationConfig,
}

impl OpenAiChatClient {
    pub fn new(config: GenerationConfig) -> CoreResult<Self> {
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or_else(|| {
                AssistantError::config("no generation API key configured (OPENAI_API_KEY)")
            })?;

        let mut headers = reqwest::header::HeaderMap::new();
        let mut auth = reqwest::header::HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| AssistantError::config("API key contains invalid characters"))?;
        auth.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AssistantError::config(format!("failed to build HTTP client: {e}")))?;

        let endpoint = config.endpoint.trim_end_matches('/').to_string();
        Ok(Self {
            client,
            endpoint,
            config,
        })
    }
}

#[async_trait]
impl ChatCompletion for OpenAiChatClient {
    async fn complete(&self, messages: &[PromptMessage]) -> CoreResult<String> {
        let request = ChatRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            presence_penalty: self.config.presence_penalty,
            frequency_penalty: self.config.frequency_penalty,
        };

        debug!(model = %self.config.model, messages = messages.len(), "requesting completion");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.endpoint))
            .json(&request)
            .send()
            .await
            .map_err(|e| AssistantError::upstream("completion", e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AssistantError::upstream(
                "completion",
                format!("HTTP {status}: {body}"),
            ));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AssistantError::upstream("completion", format!("bad response: {e}")))?;

        parsed
            .into_answer()
            .ok_or_else(|| AssistantError::upstream("completion", "response had no choices"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_generation_knobs() {
        let messages = vec![PromptMessage::system("persona"), PromptMessage::user("hi")];
        let request = ChatRequest {
            model: "gpt-4o-mini",
            messages: &messages,
            temperature: 0.7,
            max_tokens: 800,
            presence_penalty: 0.6,
            frequency_penalty: 0.3,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["temperature"].as_f64().unwrap() as f32, 0.7);
        assert_eq!(json["max_tokens"], 800);
        assert_eq!(json["presence_penalty"].as_f64().unwrap() as f32, 0.6);
        assert_eq!(json["frequency_penalty"].as_f64().unwrap() as f32, 0.3);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "hi");
    }

    #[test]
    fn response_parses_first_choice() {
        let body = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "Welcome to Northgate!"}}
            ]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.into_answer().as_deref(), Some("Welcome to Northgate!"));
    }

    #[test]
    fn answer_is_stripped_of_surrounding_whitespace() {
        let body = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "\n\n  Tuition is due August 28.\n"}}
            ]
        }"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.into_answer().as_deref(), Some("Tuition is due August 28."));
    }

    #[test]
    fn empty_choices_yield_no_answer() {
        let parsed: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(parsed.into_answer(), None);
    }
}
