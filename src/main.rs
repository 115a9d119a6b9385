mod chart;
mod config;
mod errors;
mod models;
mod server;
mod session;
mod state;

use crate::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("asb_yield service starting");

    let cfg = match config::AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        price_max = cfg.default_price_bounds.price_max,
        price_min = cfg.default_price_bounds.price_min,
        max_sessions = cfg.max_sessions,
        "config loaded"
    );

    let port = cfg.server_port;
    let app = server::router(AppState::new(cfg));

    if let Err(e) = serve(app, port).await {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}

async fn serve(app: axum::Router, port: u16) -> errors::CalcResult<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("server listening on {addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
