use actix_web::{rt, web, HttpResponse, Responder};
use futures::StreamExt;
use log::debug;
use serde_json::json;
use uuid::Uuid;

use crate::error::ChatError;
use crate::web::models::{ChatRequest, ChatResponse};
use crate::AppState;

// Health check endpoint
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Largest request body the chat endpoint accepts.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

// Collect the body ourselves so an oversized one still gets a JSON error
async fn read_body(mut payload: web::Payload) -> Result<web::BytesMut, ChatError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|_| ChatError::InvalidInput)?;
        if body.len() + chunk.len() > MAX_BODY_BYTES {
            return Err(ChatError::PayloadTooLarge);
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

// Chat API endpoint
pub async fn chat(
    data: web::Data<AppState>,
    payload: web::Payload,
) -> Result<HttpResponse, ChatError> {
    let body = read_body(payload).await?;
    let request = ChatRequest::from_slice(&body)?;
    let message = request.trimmed_message()?.to_string();

    debug!("Chat request: {} characters", message.len());

    // Generation runs on its own task so a defect inside it surfaces here as a
    // join error. The task is not cancelled if the client goes away.
    let generator = data.generator.clone();
    let response = rt::spawn(async move { generator.generate(&message).await })
        .await
        .map_err(|e| {
            ChatError::UpstreamUnavailable(format!("request {}: {}", Uuid::new_v4(), e))
        })?;

    Ok(HttpResponse::Ok().json(ChatResponse { response }))
}
