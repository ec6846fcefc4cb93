pub mod cli;
pub mod config;
pub mod error;
pub mod log;
pub mod runner;
pub mod scenario;
pub mod schema;
pub mod verify;
pub mod workspace;
pub mod write;

pub use config::HarnessConfig;
pub use error::HarnessError;
pub use log::RunLog;
pub use runner::{Harness, TestContent};

#[cfg(test)]
mod tests;
