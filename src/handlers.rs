use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use chrono::Local;
use tracing::{debug, error, info, warn};
use crate::AppState;
use crate::client::build_request;
use crate::error::ApiError;
use crate::models::{Answer, Query};

pub async fn health_check() -> &'static str {

    "OK"

}

pub async fn query_handler(
    State(state): State<AppState>,
    payload: Result<Json<Query>, JsonRejection>,
) -> Result<Json<Answer>, ApiError> {

    // keep the {"detail": ...} shape for bodies that don't parse either
    let Json(query) = payload.map_err(|rejection| {
        warn!("Rejected query body: {}", rejection.body_text());
        ApiError::InvalidRequest(rejection.body_text())
    })?;

    let answer = answer_query(&state, query).await?;

    Ok(Json(answer))

}

/// Validates the query, forwards it to the provider and builds the answer.
/// Empty questions and a missing API key are rejected before any network call.
pub async fn answer_query(state: &AppState, query: Query) -> Result<Answer, ApiError> {

    if query.question.trim().is_empty() {
        warn!("Rejected query with empty question");
        return Err(ApiError::InvalidRequest("Question cannot be empty".to_string()));
    }

    let Some(api_key) = state.api_key.as_deref() else {
        error!("OPENAI_API_KEY is not set, cannot forward query");
        return Err(ApiError::Configuration("OpenAI API key not configured".to_string()));
    };

    debug!(
        model = %query.model,
        temperature = query.temperature,
        question_len = query.question.len(),
        "Forwarding query"
    );

    let request = build_request(&query);

    let response = state.provider
        .chat(api_key, &request)
        .await
        .map_err(|e| {
            match ApiError::from(e) {
                ApiError::Authentication => {
                    warn!(model = %query.model, "Provider rejected the API key");
                    ApiError::Authentication
                }
                other => {
                    error!(model = %query.model, "Provider call failed: {}", other);
                    other
                }
            }
        })?;

    let tokens_used = response.usage.total_tokens;
    let answer = response.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .unwrap_or_default();

    info!(model = %query.model, tokens_used, "Query answered");

    Ok(Answer {
        answer,
        model: query.model,
        tokens_used,
        timestamp: Local::now(),
    })

}
