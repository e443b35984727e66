use anyhow::Result;
use common::Config;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;
use dotenv;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    let _ = dotenv::dotenv();

    // Configure tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::from_env()?;

    match xai_trends::run_xai_trends(&config).await {
        Ok(outcome) => {
            info!("xAI trends cycle {}", outcome);
            Ok(())
        }
        Err(e) => {
            error!("xAI trends cycle failed: {:#}", e);
            Err(e)
        }
    }
}
