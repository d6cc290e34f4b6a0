use axum::{
    Extension, Json,
    extract::{Path, Query, rejection::JsonRejection},
    http::StatusCode,
    response::Response,
};
use serde_json::json;

use super::{AppState, error_response, forward, require_login};
use crate::{
    spotify::relay::RelayRequest,
    types::{AddTrackRequest, AddTrackToPlaylistRequest},
};

/// Current user's playlists. Paging parameters (`limit`, `offset`) are
/// forwarded as given.
pub async fn playlists(
    Extension(state): Extension<AppState>,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    let request = RelayRequest::get(["me", "playlists"]).queries(query);
    forward(&state, request, "Failed to fetch playlists").await
}

pub async fn playlist(Extension(state): Extension<AppState>, Path(id): Path<String>) -> Response {
    let request = RelayRequest::get(["playlists".to_string(), id]);
    forward(&state, request, "Failed to fetch playlist information").await
}

pub async fn playlist_tracks(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    Query(query): Query<Vec<(String, String)>>,
) -> Response {
    let request = RelayRequest::get(["playlists".to_string(), id, "tracks".to_string()]).queries(query);
    forward(&state, request, "Failed to fetch playlist tracks").await
}

/// Adds a single track, given as `{"trackUri": "spotify:track:..."}`.
///
/// The login is checked before the body, and a body axum cannot decode is
/// answered with a JSON 400 like every other input error.
pub async fn add_track(
    Extension(state): Extension<AppState>,
    Path(id): Path<String>,
    body: Result<Json<AddTrackRequest>, JsonRejection>,
) -> Response {
    if let Some(response) = require_login(&state).await {
        return response;
    }

    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Invalid JSON body",
                Some(json!(rejection.body_text())),
            );
        }
    };

    let Some(track_uri) = body.track_uri.filter(|uri| !uri.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Missing trackUri", None);
    };

    let payload = AddTrackToPlaylistRequest {
        uris: vec![track_uri],
    };
    let request = RelayRequest::post(
        ["playlists".to_string(), id, "tracks".to_string()],
        json!(payload),
    );
    forward(&state, request, "Failed to add track to playlist").await
}
