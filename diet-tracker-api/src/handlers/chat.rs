use axum::{extract::State, Json};
use service_core::error::AppError;
use service_core::utils::ValidatedJson;

use crate::models::{ChatRequest, ChatResponse};
use crate::startup::AppState;

/// Instruction placed in front of every user message.
pub const CHAT_INSTRUCTION: &str = "You are a friendly diet and nutrition assistant. \
Answer questions about foods, calories, macronutrients and healthy eating habits \
clearly and concisely. If a question is unrelated to diet or nutrition, say so briefly.";

pub fn build_prompt(message: &str) -> String {
    format!("{}\n\n{}", CHAT_INSTRUCTION, message)
}

/// Forward one chat message to the LLM and return its reply.
#[tracing::instrument(skip(state, request))]
pub async fn chat(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let prompt = build_prompt(&request.message);

    tracing::info!(
        model = %state.chat.model(),
        message_len = request.message.len(),
        "Forwarding chat message"
    );

    let completion = state.chat.complete(&prompt).await?;

    Ok(Json(ChatResponse {
        response: completion.text,
        usage: completion.usage,
    }))
}
