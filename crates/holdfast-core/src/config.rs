//! # Process-wide Configuration
//!
//! One configuration record per process, created lazily at first use and
//! alive for the process lifetime. The load-time constructor seeds it from
//! the environment; afterwards only [`crate::install`] mutates it (to record
//! the flags and options passed to the installation entry point).
//!
//! ## Environment Variables
//!
//! - `HOLDFAST_DISABLE`: kill switch; both entry points become no-ops
//! - `HOLDFAST_VERBOSE`: emit `tracing` breadcrumbs from setup paths
//! - `HOLDFAST_QUIET`: suppress the crash-time attach message
//! - `HOLDFAST_ALTSTACK`: deliver handled signals on an alternate stack
//! - `HOLDFAST_OPTIONS`: extra arguments passed through to the debugger
//!   frontend
//!
//! A variable counts as set when it is non-empty and not `"0"`.

use std::env;
use std::sync::{Mutex, MutexGuard, PoisonError};

use bitflags::bitflags;
use once_cell::sync::Lazy;
use tracing::debug;

bitflags! {
    /// Behavior flags shared by the installation and debug entry points.
    ///
    /// The bit values are part of the C ABI (`holdfast_install_sighandlers`
    /// takes the raw word), so they are fixed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct HandlerFlags: u32 {
        /// Deliver handled signals on a dedicated alternate stack.
        ///
        /// Useful when the crash being debugged is itself a stack overflow;
        /// off by default.
        const ALT_STACK = 1 << 0;
    }
}

/// Process-wide configuration record.
///
/// Lives behind a `Lazy<Mutex<_>>` singleton; never destroyed.
#[derive(Debug, Clone, Default)]
pub struct DebugConfig
{
    /// Behavior flags recorded by the last install call
    pub flags: HandlerFlags,
    /// Opaque options string passed through to the debugger frontend
    pub options: String,
    /// Whether load-time initialization has run
    pub init_done: bool,
    /// Verbose/debug logging enabled
    pub verbose: bool,
    /// Kill switch: both entry points become no-ops
    pub disabled: bool,
    /// Suppress the crash-time attach message
    pub quiet: bool,
}

impl DebugConfig
{
    /// Build a configuration from the `HOLDFAST_*` environment variables.
    pub fn from_env() -> Self
    {
        let mut flags = HandlerFlags::empty();
        if env_flag("HOLDFAST_ALTSTACK") {
            flags |= HandlerFlags::ALT_STACK;
        }

        DebugConfig {
            flags,
            options: env::var("HOLDFAST_OPTIONS").unwrap_or_default(),
            init_done: false,
            verbose: env_flag("HOLDFAST_VERBOSE"),
            disabled: env_flag("HOLDFAST_DISABLE"),
            quiet: env_flag("HOLDFAST_QUIET"),
        }
    }
}

/// `true` when the variable is present, non-empty and not `"0"`.
fn env_flag(name: &str) -> bool
{
    matches!(env::var(name), Ok(value) if !value.is_empty() && value != "0")
}

static CONFIG: Lazy<Mutex<DebugConfig>> = Lazy::new(|| Mutex::new(DebugConfig::from_env()));

/// Lock the process-wide configuration.
///
/// Poisoning is ignored: the record stays usable even if a panic unwound
/// while it was held (nothing in it can be left half-written in a harmful
/// way).
pub fn lock() -> MutexGuard<'static, DebugConfig>
{
    CONFIG.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One-time load initialization.
///
/// Marks the configuration as initialized; repeated calls are no-ops. Kept
/// separate from the lazy construction so the cdylib constructor has an
/// explicit hook to force the environment read at load time.
pub fn init()
{
    let mut cfg = lock();
    if cfg.init_done {
        return;
    }
    cfg.init_done = true;
    debug!(
        disabled = cfg.disabled,
        verbose = cfg.verbose,
        quiet = cfg.quiet,
        flags = cfg.flags.bits(),
        "holdfast configuration initialized"
    );
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn env_flag_semantics()
    {
        env::remove_var("HOLDFAST_TEST_FLAG");
        assert!(!env_flag("HOLDFAST_TEST_FLAG"));

        env::set_var("HOLDFAST_TEST_FLAG", "");
        assert!(!env_flag("HOLDFAST_TEST_FLAG"));

        env::set_var("HOLDFAST_TEST_FLAG", "0");
        assert!(!env_flag("HOLDFAST_TEST_FLAG"));

        env::set_var("HOLDFAST_TEST_FLAG", "1");
        assert!(env_flag("HOLDFAST_TEST_FLAG"));

        env::set_var("HOLDFAST_TEST_FLAG", "yes");
        assert!(env_flag("HOLDFAST_TEST_FLAG"));

        env::remove_var("HOLDFAST_TEST_FLAG");
    }

    #[test]
    fn alt_stack_bit_value_is_fixed()
    {
        // Part of the C ABI, must never move.
        assert_eq!(HandlerFlags::ALT_STACK.bits(), 1);
    }
}
