//! # matlens Utilities
//!
//! Shared utilities for the matlens workspace, chiefly logging built on
//! `tracing`.

pub mod logging;

// Re-export commonly used logging functions for convenience
pub use logging::{
    init_logging, init_logging_with_level, init_logging_with_options, resolve_format, LogFormat, LogLevel, LoggingError,
};
pub use tracing::{debug, error, info, trace, warn};
