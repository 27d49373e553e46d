pub mod core;
pub mod data;
pub mod error;
pub mod runner;

// Re-export commonly used items for integration tests and the binary
pub use crate::core::*;
pub use crate::data::{DownloadRequest, Mode, RunConfig, Settings};
pub use crate::error::{PageError, RunError};
pub use crate::runner::{ProcessLauncher, RunReport, Runner, ScriptLauncher};
