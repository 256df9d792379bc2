pub mod config;
pub mod jobs;
pub mod metric;
pub mod process;
pub mod serve;
pub mod show;
