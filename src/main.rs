use clap::Parser;
use dotenvy::dotenv;
use std::env;

use coinflow_backend::{api, utils::app_config::AppConfig};

#[derive(Parser, Debug)]
#[command(
    name = "coinflow-backend",
    about = "Coinflow API - smart budget and expense tracker"
)]
struct ServerArgs {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8000)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenv();
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            env::var("RUST_LOG")
                .unwrap_or_else(|_| "info".to_string())
                .as_str(),
        )
        .init();

    let args = ServerArgs::parse();

    let app_config = AppConfig::from_env().await?;
    tracing::info!(
        store = app_config.store.backend(),
        database = %app_config.database_name,
        "Application configuration loaded successfully"
    );

    let router = api::service(app_config);

    let addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Starting Coinflow API server on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
