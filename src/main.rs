use anyhow::Context;
use todo_rest::application::document_patch::JsonPatcher;
use todo_rest::application::todo_service::TodoServiceImpl;
use todo_rest::config::Config;
use todo_rest::domain::repository::TodoRepository;
use todo_rest::http::routes::todos;
use todo_rest::http::routing;
use todo_rest::infrastructure::sqlite_repo::SqliteTodoRepository;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    let repo = SqliteTodoRepository::connect(&config.database_url, config.max_connections)
        .await
        .with_context(|| format!("connecting to {}", config.database_url))?;
    repo.init().await.context("creating todos table")?;
    let service = TodoServiceImpl::new(repo, JsonPatcher);
    let router = routing::app(todos::router(todos::AppState { service: service.clone() }));

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    service.repository().close().await;
    tracing::info!("store closed");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal::ctrl_c;
    let _ = ctrl_c().await;
    tracing::info!("shutdown");
}
