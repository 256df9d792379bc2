pub mod cancel;
pub mod config;
pub mod error;
pub mod event;
pub mod io;
pub mod job;
pub mod known_jobs;
pub mod merge;
pub mod metric;
pub mod paths;
pub mod run;

pub use error::{DisruptionError, Result};
