use axum::{
    Extension,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use super::{AppState, error_response, found};
use crate::{error::ExchangeError, success, types::CallbackParams, warning};

pub async fn callback(
    Extension(state): Extension<AppState>,
    Query(params): Query<CallbackParams>,
) -> Response {
    if let Some(error) = params.error {
        warning!("Authorization denied by Spotify: {}", error);
        return error_response(StatusCode::BAD_REQUEST, "Authorization denied", Some(json!(error)));
    }

    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Missing code", None);
    };

    match state.auth.exchange_authorization_code(&code).await {
        Ok(tokens) => {
            state.store.set_from_authorization_grant(&tokens).await;
            success!("Authorization successful");

            match &state.config.frontend_uri {
                Some(frontend) => found(frontend),
                None => "✅ Authorization successful. You can close this window.".into_response(),
            }
        }
        Err(e) => {
            warning!("Token exchange failed: {}", e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to exchange code for tokens",
                Some(exchange_details(&e)),
            )
        }
    }
}

fn exchange_details(err: &ExchangeError) -> Value {
    match err {
        ExchangeError::Rejected {
            status,
            error,
            description,
        } => json!({
            "status": status.as_u16(),
            "error": error,
            "error_description": description,
        }),
        ExchangeError::NoToken { status } => json!({
            "status": status.as_u16(),
            "error": "missing access_token",
        }),
        ExchangeError::Transport(message) => json!({ "error": message }),
    }
}
