use dotenvy::dotenv;
use social::router::init_router;
use social::state::init_app_state;
use social_config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    social_observability::init_tracing()?;

    let server = ServerConfig::from_env();
    let state = init_app_state(&server).await?;
    let app = init_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", server.port)).await?;
    tracing::info!(port = server.port, "🚀 Server running on http://localhost:{}", server.port);
    tracing::info!("📚 Swagger UI available at http://localhost:{}/swagger-ui", server.port);
    axum::serve(listener, app).await?;

    Ok(())
}
