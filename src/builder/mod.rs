//! Builder API and configuration for query managers.

pub mod config;
pub mod error;
pub mod manager;

pub use config::{ManagerConfig, OverlapPolicy};
pub use error::BuildError;
pub use manager::QueryManagerBuilder;
