use alertd_web::WebConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("alertd_web=info,alertd_core=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let config = WebConfig::load()?;

    alertd_web::serve(config).await
}
