use axum::{Extension, response::Response};

use super::{AppState, found};
use crate::spotify::auth::build_login_url;

pub async fn login(Extension(state): Extension<AppState>) -> Response {
    found(&build_login_url(&state.config))
}
