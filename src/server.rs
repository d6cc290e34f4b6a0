use std::net::SocketAddr;

use axum::{
    Extension, Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::{Res, api, config::Config, info};

pub fn router(state: api::AppState) -> Router {
    Router::new()
        .route("/", get(api::root))
        .route("/health", get(api::health))
        .route("/login", get(api::login))
        .route("/callback", get(api::callback))
        .route("/me", get(api::me))
        .route("/playlists", get(api::playlists))
        .route("/playlist/{id}", get(api::playlist))
        .route("/playlist/{id}/tracks", get(api::playlist_tracks))
        .route("/playlist/{id}/add", post(api::add_track))
        .route("/search", get(api::search))
        .route("/track/{id}", get(api::track))
        .layer(Extension(state))
        .layer(CorsLayer::permissive())
}

pub async fn bind(addr: SocketAddr) -> Res<TcpListener> {
    let listener = TcpListener::bind(addr).await?;
    info!("Relay listening on http://{}", listener.local_addr()?);
    Ok(listener)
}

pub async fn serve(listener: TcpListener, state: api::AppState) -> Res<()> {
    axum::serve(listener, router(state)).await?;
    Ok(())
}

pub async fn start_api_server(config: Config) -> Res<()> {
    let state = api::AppState::new(config.spotify)?;
    let listener = bind(config.server_address).await?;
    serve(listener, state).await
}
