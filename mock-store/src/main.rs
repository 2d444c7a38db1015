use mock_store::MockStore;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "54321".to_string());
    let store = match std::env::var("MOCK_STORE_KEY") {
        Ok(key) if !key.is_empty() => MockStore::with_api_key(&key),
        _ => MockStore::open(),
    };

    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(%addr, "mock store listening");
    mock_store::run(listener, store).await
}
