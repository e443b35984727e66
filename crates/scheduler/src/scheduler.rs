use anyhow::Result;
use common::ScheduledTask;
use tokio_cron_scheduler::{JobScheduler, Job};
use tracing::info;
use time::OffsetDateTime;
use std::sync::Arc;

use crate::deferred::DeferredTasks;

pub struct TrendScheduler {
    scheduler: JobScheduler,
    deferred: DeferredTasks,
}

impl TrendScheduler {
    pub async fn new() -> Result<Self> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            scheduler,
            deferred: DeferredTasks::new(),
        })
    }

    pub fn deferred(&self) -> &DeferredTasks {
        &self.deferred
    }

    // 6-field cron, seconds first, UTC.
    pub async fn add_task_job(&mut self, cron_expression: &str, task: Arc<dyn ScheduledTask>) -> Result<()> {
        info!("Scheduling {} with cron: {}", task.name(), cron_expression);

        let deferred = self.deferred.clone();
        let job = Job::new_async(cron_expression, move |_uuid, _l| {
            let task = task.clone();
            let deferred = deferred.clone();
            Box::pin(async move {
                let trigger = OffsetDateTime::now_utc();
                info!("Timer fired for {} at {}", task.name(), trigger);
                let name = task.name();
                deferred
                    .wait_until(name, async move { task.run_cycle(trigger).await })
                    .await;
            })
        })?;

        self.scheduler.add(job).await?;
        Ok(())
    }

    pub async fn start(&self) -> Result<()> {
        info!("Starting scheduler...");
        self.scheduler.start().await?;
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<usize> {
        info!("Shutting down scheduler...");
        self.scheduler.shutdown().await?;
        let failed = self.deferred.drain().await;
        Ok(failed)
    }
}
