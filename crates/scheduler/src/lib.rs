pub mod deferred;
pub mod http;
pub mod scheduler;

pub use deferred::DeferredTasks;
pub use scheduler::TrendScheduler;
