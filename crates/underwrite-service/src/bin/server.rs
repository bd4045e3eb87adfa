use underwrite_service::{router, AppState, ServiceConfig};

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

    let cfg = match ServiceConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    let addr = match cfg.bind_addr() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };

    let app = router(AppState::from(&cfg));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("bind error: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(round_output = cfg.round_output, "underwrite-server listening on {addr}");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {e}");
    }
}
