use anyhow::{Context, Result};
use axum::http::StatusCode;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

pub fn router() -> Router {
    Router::new().fallback(not_found)
}

async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}

pub async fn serve(addr: &str) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind HTTP listener on {}", addr))?;
    serve_on(listener).await
}

pub async fn serve_on(listener: TcpListener) -> Result<()> {
    info!("HTTP listener on {}", listener.local_addr()?);
    axum::serve(listener, router())
        .await
        .context("HTTP server failed")
}
