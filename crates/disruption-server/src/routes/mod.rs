pub mod jobs;
pub mod metrics;
