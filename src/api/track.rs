use axum::{Extension, extract::Path, http::StatusCode, response::Response};
use serde_json::json;

use super::{AppState, error_response, found};

/// Sends the browser to the public Spotify page of a track.
pub async fn track(Extension(state): Extension<AppState>, Path(id): Path<String>) -> Response {
    let mut url = state.config.open_url.clone();
    match url.path_segments_mut() {
        Ok(mut segments) => {
            segments.pop_if_empty().extend(["track", id.as_str()]);
        }
        Err(_) => {
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Invalid SPOTIFY_OPEN_URL",
                Some(json!(state.config.open_url.to_string())),
            );
        }
    }
    found(url.as_str())
}
