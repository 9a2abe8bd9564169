//! Common module for library exports

pub use crate::config::{DebugConfig, HandlerFlags};
pub use crate::error::{HoldfastError, HoldfastResult};
pub use crate::install::install_sighandlers;
pub use crate::launcher::{DebuggerFrontend, GdbFrontend, HANDSHAKE_SYMBOL};
pub use crate::session::{run_debug_session, run_debug_session_with};
pub use crate::signals::{MONITORED_SIGNALS, PROTECTED_SIGNAL};
