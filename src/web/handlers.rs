// ============================================================
// Layer 1 — Web Handlers
// ============================================================
// Thin axum handlers: pull the question out of the request,
// hand it to ChatUseCase on the blocking pool, and wrap the
// Markdown reply as a page or as JSON.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::AppState;
use crate::domain::reply::ChatReply;

#[derive(Debug, Deserialize)]
pub struct AskForm {
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Markdown reply, exactly as shown on the page
    pub response: String,
}

pub async fn index(State(state): State<Arc<AppState>>) -> Response {
    render(&state, "", None)
}

pub async fn ask_form(State(state): State<Arc<AppState>>, Form(form): Form<AskForm>) -> Response {
    let reply = answer(&state, form.question.clone()).await;
    render(&state, &form.question, Some(&reply))
}

pub async fn api_chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Json<ChatResponse> {
    let response = answer(&state, req.question).await;
    Json(ChatResponse { response })
}

pub async fn health() -> Response {
    (StatusCode::OK, "OK").into_response()
}

/// Generation is CPU/GPU bound, so it runs on the blocking pool
async fn answer(state: &AppState, question: String) -> String {
    let chat = state.chat.clone();
    info!("Question received ({} chars)", question.len());
    match tokio::task::spawn_blocking(move || chat.respond(&question)).await {
        Ok(reply) => reply,
        Err(e) => {
            error!("Generation task failed: {e}");
            ChatReply::failure(e).to_string()
        }
    }
}

fn render(state: &AppState, question: &str, reply: Option<&str>) -> Response {
    match state.page.render(question, reply) {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            error!("Page rendering failed: {e:#}");
            (StatusCode::INTERNAL_SERVER_ERROR, "page rendering failed").into_response()
        }
    }
}
