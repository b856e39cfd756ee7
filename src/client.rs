use std::error::Error;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use crate::error::ProviderError;
use crate::models::{LLMRequest, LLMResponse, Message, ProviderErrorBody, Query};

/// Instruction sent ahead of every question. Conversations are single-turn,
/// so this is the only context the model gets besides the question itself.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// A chat completion backend: one request in, one completion or a
/// classified failure out.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn chat(&self, api_key: &str, request: &LLMRequest) -> Result<LLMResponse, ProviderError>;
}

pub fn build_request(query: &Query) -> LLMRequest {

    LLMRequest {
        model: query.model.clone(),
        messages: vec![
            Message {
                role: "system".to_string(),
                content: SYSTEM_PROMPT.to_string(),
            },
            Message {
                role: "user".to_string(),
                content: query.question.clone(),
            },
        ],
        temperature: query.temperature,
    }

}

/// Talks to an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    http: Client,
    base_url: String,
}

impl OpenAiClient {

    pub fn new(http: Client, base_url: impl Into<String>) -> Self {

        OpenAiClient {
            http,
            base_url: base_url.into(),
        }

    }

    fn completions_url(&self) -> String {

        format!("{}/chat/completions", self.base_url)

    }

}

#[async_trait]
impl ChatProvider for OpenAiClient {

    async fn chat(&self, api_key: &str, request: &LLMRequest) -> Result<LLMResponse, ProviderError> {

        let response = self.http
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", api_key))
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(ProviderError::Authentication(error_message(&body)));
        }

        if !status.is_success() {
            return Err(ProviderError::Status {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let llm_response: LLMResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Decode(e.to_string()))?;

        if llm_response.choices.is_empty() {
            return Err(ProviderError::EmptyChoices);
        }

        Ok(llm_response)

    }

}

// reqwest's top-level message hides the cause (e.g. "connection reset"),
// so walk the source chain
fn transport_error(err: reqwest::Error) -> ProviderError {

    let mut description = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        description.push_str(": ");
        description.push_str(&cause.to_string());
        source = cause.source();
    }

    ProviderError::Transport(description)

}

fn error_message(body: &str) -> String {

    match serde_json::from_str::<ProviderErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if body.trim().is_empty() => "empty response body".to_string(),
        Err(_) => body.trim().to_string(),
    }

}
