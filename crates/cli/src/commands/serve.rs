use std::sync::Arc;

use anyhow::Result;
use inner_map_http::{AppState, create_router};

use crate::launch_journey;

pub(crate) async fn run(port: u16, host: String) -> Result<()> {
    let (journey, journal) = launch_journey().await?;
    let state = Arc::new(AppState::new(journey, journal));

    let router = create_router(state);
    let addr = format!("{host}:{port}");
    tracing::info!(%addr, "starting HTTP server");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
