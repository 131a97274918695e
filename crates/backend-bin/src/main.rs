use anyhow::Context;
use consult_backend_lib::{
    config::Settings,
    notify::NoopNotifier,
    ws_router, AppState,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first so the log level can come from it; the
    // RUST_LOG environment variable still wins when set.
    let settings = Settings::load().unwrap_or_else(|err| {
        eprintln!("falling back to default settings: {err}");
        Settings::default()
    });

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.log_level.clone())),
        )
        .init();

    // Push notifications are dispatched by the surrounding product; the
    // coordinator ships with the no-op sender unless one is wired in here.
    let state = Arc::new(AppState::new(settings, Arc::new(NoopNotifier)));

    let app = ws_router::create_router(state.clone());

    let addr = state.settings.bind_addr;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "consultation signaling server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
