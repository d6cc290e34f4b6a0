use axum::{Extension, response::Response};

use super::{AppState, forward};
use crate::spotify::relay::RelayRequest;

pub async fn me(Extension(state): Extension<AppState>) -> Response {
    forward(&state, RelayRequest::get(["me"]), "Failed to fetch user info").await
}
