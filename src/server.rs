use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{Res, api, types::AuthCallback};

/// Serves `/callback` and `/health` on `address` until the task is aborted.
pub async fn start_api_server(address: &str, state: Arc<Mutex<AuthCallback>>) -> Res<()> {
    let app = router(state);

    let addr = SocketAddr::from_str(address)
        .map_err(|e| format!("Failed to parse server address {}: {}", address, e))?;

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn router(state: Arc<Mutex<AuthCallback>>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .layer(Extension(state))
}
