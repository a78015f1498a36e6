//! Command interpretation and task persistence for Taskline.

pub mod config;
pub mod error;
pub mod parser;
pub mod planner;
pub mod storage;
pub mod store;
pub mod task;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
