pub mod config;
pub mod error;
pub mod task;

pub use config::{Config, XaiConfig};
pub use error::{TrendError, TrendResult};
pub use task::{CycleOutcome, ScheduledTask};
