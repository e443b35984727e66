use async_trait::async_trait;
use std::fmt;
use time::OffsetDateTime;

use crate::error::TrendResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    Skipped,
    Recorded,
}

impl fmt::Display for CycleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleOutcome::Skipped => f.write_str("skipped"),
            CycleOutcome::Recorded => f.write_str("recorded"),
        }
    }
}

#[async_trait]
pub trait ScheduledTask: Send + Sync {
    async fn run_cycle(&self, trigger: OffsetDateTime) -> TrendResult<CycleOutcome>;
    fn name(&self) -> &'static str;
}
