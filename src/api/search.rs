use axum::{Extension, extract::Query, http::StatusCode, response::Response};

use super::{AppState, error_response, forward, require_login};
use crate::{spotify::relay::RelayRequest, types::SearchParams};

const SEARCH_TYPES: &str = "track,playlist";

pub async fn search(
    Extension(state): Extension<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    if let Some(response) = require_login(&state).await {
        return response;
    }

    let Some(q) = params.q.filter(|q| !q.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Missing q", None);
    };

    let request = RelayRequest::get(["search"])
        .query("q", q)
        .query("type", SEARCH_TYPES);
    forward(&state, request, "Failed to search").await
}
