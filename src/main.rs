use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tutor_client::platform::MemoryStore;
use tutor_client::{ApiClient, Config, RequestGateway, SessionStore};

/// Diagnostic entry point: load config, restore the session, and report
/// client readiness.
#[derive(Parser, Debug)]
#[command(name = "tutor-client", about = "Homework tutoring client core")]
struct Args {
    /// Path to the configuration file (without extension)
    #[arg(long, default_value = "config/tutor-client")]
    config: String,

    /// Override the backend base URL from the config file
    #[arg(long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let mut cfg = Config::load_or_default(&args.config);
    if let Some(base_url) = args.base_url {
        cfg.api.base_url = base_url;
    }

    info!("tutor-client v{}", env!("CARGO_PKG_VERSION"));
    info!("Backend: {}", cfg.api.base_url);
    info!("Request timeout: {} ms", cfg.api.timeout_ms);

    let session = Arc::new(SessionStore::new(Box::new(MemoryStore::new())));
    session.init().await;

    let gateway = RequestGateway::from_config(&cfg.api, Arc::clone(&session));
    let _api = ApiClient::new(gateway);

    let current = session.current();
    if current.is_authenticated() {
        info!(
            "Session restored for user {}",
            current.user_id().unwrap_or("<unknown>")
        );
    } else {
        info!("No session; client starts unauthenticated");
    }

    Ok(())
}
