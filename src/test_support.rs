use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use async_trait::async_trait;
use crate::client::ChatProvider;
use crate::error::ProviderError;
use crate::models::{Choice, ChoiceMessage, LLMRequest, LLMResponse, Usage};

/// What a `FakeProvider` answers with.
pub enum Outcome {
    Reply { content: Option<&'static str>, total_tokens: u64 },
    AuthFailure,
    Transport(&'static str),
    Decode(&'static str),
}

/// Deterministic `ChatProvider` that records every call it gets.
pub struct FakeProvider {
    outcome: Outcome,
    calls: AtomicUsize,
    pub last_request: Mutex<Option<LLMRequest>>,
    pub last_key: Mutex<Option<String>>,
}

impl FakeProvider {

    pub fn new(outcome: Outcome) -> Arc<Self> {

        Arc::new(FakeProvider {
            outcome,
            calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
            last_key: Mutex::new(None),
        })

    }

    pub fn replying(content: &'static str, total_tokens: u64) -> Arc<Self> {

        Self::new(Outcome::Reply { content: Some(content), total_tokens })

    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

}

#[async_trait]
impl ChatProvider for FakeProvider {

    async fn chat(&self, api_key: &str, request: &LLMRequest) -> Result<LLMResponse, ProviderError> {

        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());
        *self.last_key.lock().unwrap() = Some(api_key.to_string());

        match &self.outcome {
            Outcome::Reply { content, total_tokens } => Ok(LLMResponse {
                choices: vec![Choice {
                    message: ChoiceMessage {
                        role: Some("assistant".to_string()),
                        content: content.map(str::to_string),
                    },
                }],
                usage: Usage { total_tokens: *total_tokens },
            }),
            Outcome::AuthFailure => Err(ProviderError::Authentication("Incorrect API key provided".to_string())),
            Outcome::Transport(message) => Err(ProviderError::Transport(message.to_string())),
            Outcome::Decode(message) => Err(ProviderError::Decode(message.to_string())),
        }

    }

}
