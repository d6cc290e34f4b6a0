use axum::{Extension, response::Json};
use serde_json::{Value, json};

use super::AppState;

pub async fn root() -> &'static str {
    "🎵 Music relay is running!"
}

pub async fn health(Extension(state): Extension<AppState>) -> Json<Value> {
    let tokens = state.store.get().await;

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "authorized": tokens.is_authorized(),
        "token_updated_at": tokens.updated_at.map(|t| t.to_rfc3339()),
    }))
}
