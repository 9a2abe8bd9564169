//! # Holdfast Utilities
//!
//! Shared diagnostics helpers for the Holdfast workspace: the `tracing`
//! setup the injected library and its tooling use for everything that is
//! allowed to allocate (crash-time output lives elsewhere, on the
//! signal-safe path).

pub mod logging;

pub use logging::{init_logging, init_logging_with_level, LogFormat, LogLevel, LoggingError};
pub use tracing::{debug, error, info, trace, warn};
