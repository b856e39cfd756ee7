use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

/// Body of `POST /api/query`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Query {
    pub question: String,
    #[serde(default = "default_model")]
    pub model: String,
    // passed through as-is, the provider decides what range it accepts
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

/// Successful reply to `POST /api/query`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Answer {
    pub answer: String,
    pub model: String,
    pub tokens_used: u64,
    pub timestamp: DateTime<Local>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

// provider wire format (OpenAI chat completions)

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LLMRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub temperature: f64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LLMResponse {
    pub choices: Vec<Choice>,
    pub usage: Usage,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub role: Option<String>,
    // null when the model answered with a tool call or refusal only
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Usage {
    pub total_tokens: u64,
}

/// Error payload the provider returns alongside non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ProviderErrorBody {
    pub error: ProviderErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ProviderErrorDetail {
    pub message: String,
}

#[cfg(test)]
mod tests {

    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_defaults() {

        let query: Query = serde_json::from_value(json!({"question": "What is Rust?"})).unwrap();

        assert_eq!(query.question, "What is Rust?");
        assert_eq!(query.model, "gpt-3.5-turbo");
        assert_eq!(query.temperature, 0.7);

    }

    #[test]
    fn test_query_overrides() {

        let query: Query = serde_json::from_value(json!({
            "question": "What is 2+2?",
            "model": "gpt-4",
            "temperature": 0.2
        }))
        .unwrap();

        assert_eq!(query.model, "gpt-4");
        assert_eq!(query.temperature, 0.2);

    }

    #[test]
    fn test_query_requires_question() {

        let result: Result<Query, _> = serde_json::from_value(json!({"model": "gpt-4"}));
        assert!(result.is_err());

    }

    #[test]
    fn test_llm_response_null_content() {

        let response: LLMResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": null}}],
            "usage": {"prompt_tokens": 5, "completion_tokens": 0, "total_tokens": 5}
        }))
        .unwrap();

        assert_eq!(response.choices[0].message.content, None);
        assert_eq!(response.usage.total_tokens, 5);

    }

    #[test]
    fn test_answer_timestamp_is_iso8601() {

        let answer = Answer {
            answer: "4".to_string(),
            model: "gpt-4".to_string(),
            tokens_used: 12,
            timestamp: Local::now(),
        };

        let value = serde_json::to_value(&answer).unwrap();
        let timestamp = value["timestamp"].as_str().unwrap();

        assert!(DateTime::parse_from_rfc3339(timestamp).is_ok());

    }

}
