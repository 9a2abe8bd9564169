//! # Error Types
//!
//! General error handling for the facility.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.
//!
//! Note the deliberate asymmetry with the C surface: Rust callers get a
//! structured [`HoldfastError`], while the C ABI in the `holdfast` cdylib
//! collapses everything to a 1/0 success flag. The only failure that is not
//! representable here is original-call-table resolution, which aborts the
//! process at load time instead of returning.

use std::time::Duration;

use thiserror::Error;

/// Main error type for facility operations
///
/// ## Error Categories
///
/// 1. **Load errors**: SymbolResolution (reported just before abort)
/// 2. **Policy rejections**: SessionActive
/// 3. **Session failures**: LaunchFailed, AttachTimedOut
#[derive(Error, Debug)]
pub enum HoldfastError
{
    /// One of the real signal-configuration primitives did not resolve past
    /// this library in the loaded-module search order.
    ///
    /// This is fatal: every shim operation depends on the resolved table, and
    /// an unresolved entry would recurse straight back into the shim. The
    /// caller of the resolver aborts the process after reporting this.
    #[error("could not resolve the real `{0}` (dlsym(RTLD_NEXT) returned NULL)")]
    SymbolResolution(&'static str),

    /// A debug session is already in progress.
    ///
    /// Only one external debugger can be attached at a time. This is a policy
    /// rejection, not a fault: the first session's handshake continues
    /// undisturbed and the process is otherwise unaffected.
    #[error("a debug session is already in progress")]
    SessionActive,

    /// The external debugger frontend could not be started.
    ///
    /// The session ends immediately; from the caller's perspective this is
    /// equivalent to an attach timeout.
    #[error("failed to launch {frontend}: {source}")]
    LaunchFailed
    {
        /// Name of the frontend that failed to start (e.g. "gdb")
        frontend: &'static str,
        /// The underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// The debugger did not complete the attach handshake in time.
    ///
    /// The handshake flag was never observed set within the fixed ceiling.
    /// The process itself is unaffected (if it was stopped by the crash
    /// handler, it stays stopped until an operator resumes it).
    #[error("debugger failed to attach within {ceiling:?}")]
    AttachTimedOut
    {
        /// The fixed handshake ceiling that elapsed
        ceiling: Duration,
    },
}

/// Convenience type alias for `Result<T, HoldfastError>`
///
/// ```rust
/// use holdfast_core::error::HoldfastResult;
/// fn foo() -> HoldfastResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type HoldfastResult<T> = std::result::Result<T, HoldfastError>;
