pub mod executor;
pub mod report;
pub mod task;
