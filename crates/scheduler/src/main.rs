use anyhow::Result;
use common::Config;
use dotenv;
use scheduler::{http, TrendScheduler};
use std::sync::Arc;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;
use xai_trends::XaiTrendFetcher;

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
    let fetcher = XaiTrendFetcher::from_config(&config).await?;

    info!("Starting xAI trend scheduler");

    let mut scheduler = TrendScheduler::new().await?;
    scheduler.add_task_job(&config.schedule, Arc::new(fetcher)).await?;
    scheduler.start().await?;

    info!("Scheduler configured with cron {} (UTC)", config.schedule);
    info!("Press Ctrl+C to stop the scheduler");

    match &config.http_bind_addr {
        Some(addr) => {
            let addr = addr.clone();
            tokio::select! {
                result = http::serve(&addr) => {
                    if let Err(e) = result {
                        error!("HTTP listener stopped: {:#}", e);
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Received interrupt signal, shutting down...");
                }
            }
        }
        None => {
            tokio::signal::ctrl_c().await?;
            info!("Received interrupt signal, shutting down...");
        }
    }

    let failed = scheduler.shutdown().await?;
    if failed > 0 {
        warn!("{} trend cycle(s) failed during this run", failed);
    }

    Ok(())
}
