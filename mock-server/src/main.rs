use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use mock_server::Store;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("mock_server=info,tower_http=debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("listening on http://{addr}/api");

    let store = if std::env::var_os("MOCK_EMPTY").is_some() {
        Store::default()
    } else {
        Store::with_demo_data()
    };
    mock_server::run(listener, store).await?;
    Ok(())
}
