//! Scout Core - Shared infrastructure for the Scout research agent
//!
//! This module defines the configuration, error and logging foundations used
//! by every other crate in the workspace.

pub mod config;
pub mod error;
pub mod logging;

pub use config::*;
pub use error::*;
pub use logging::*;

// Re-export commonly used external types
pub use async_trait::async_trait;
pub use tokio;
pub use tracing;
