use std::net::SocketAddr;

use super::router::api_router;
use super::types::ApiContext;

/// Bind and serve the API until the process is stopped.
pub async fn serve(ctx: ApiContext, addr: SocketAddr) -> std::io::Result<()> {
    let app = api_router(ctx);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "batcheck API listening");
    axum::serve(listener, app).await
}
