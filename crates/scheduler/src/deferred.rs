use std::future::Future;
use std::sync::Arc;

use common::{CycleOutcome, TrendResult};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{error, info};

#[derive(Clone, Default)]
pub struct DeferredTasks {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    tasks: JoinSet<bool>,
    failed: usize,
}

impl Inner {
    fn record(&mut self, result: Result<bool, tokio::task::JoinError>) {
        match result {
            Ok(true) => {}
            Ok(false) => self.failed += 1,
            Err(e) => {
                error!("Background task panicked: {}", e);
                self.failed += 1;
            }
        }
    }
}

impl DeferredTasks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn wait_until<F>(&self, name: &'static str, work: F)
    where
        F: Future<Output = TrendResult<CycleOutcome>> + Send + 'static,
    {
        let mut inner = self.inner.lock().await;

        while let Some(result) = inner.tasks.try_join_next() {
            inner.record(result);
        }

        inner.tasks.spawn(async move {
            match work.await {
                Ok(outcome) => {
                    info!("{} cycle finished: {}", name, outcome);
                    true
                }
                Err(e) => {
                    error!("{} cycle failed: {}", name, e);
                    false
                }
            }
        });
    }

    pub async fn pending(&self) -> usize {
        self.inner.lock().await.tasks.len()
    }

    /// Returns how many tasks failed or panicked since the previous drain.
    pub async fn drain(&self) -> usize {
        let mut inner = self.inner.lock().await;
        if !inner.tasks.is_empty() {
            info!("Waiting for {} background task(s) to finish", inner.tasks.len());
        }

        while let Some(result) = inner.tasks.join_next().await {
            inner.record(result);
        }
        std::mem::take(&mut inner.failed)
    }
}
