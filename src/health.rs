use anyhow::{Context, Result};
use axum::routing::get;
use axum::Router;
use std::net::{Ipv4Addr, SocketAddr};

/// Minimal liveness endpoint for hosting platforms: 200 "OK" on `/`.
pub async fn serve(port: u16) -> Result<()> {
    let app = Router::new().route("/", get(|| async { "OK" }));
    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Could not bind the health endpoint on {addr}"))?;

    log::info!("Health endpoint listening on {addr}");
    axum::serve(listener, app)
        .await
        .context("Health endpoint stopped")?;

    Ok(())
}
