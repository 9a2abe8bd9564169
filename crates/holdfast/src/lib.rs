//! # Holdfast
//!
//! Crash-time debugger attachment. Link this library into a program (or
//! preload it) and a fatal signal no longer kills the process: the crash
//! handler announces an attach command and freezes the process with
//! `SIGSTOP`, so a debugger can be attached at the faulting instruction.
//!
//! The deliverable is the `cdylib`: it exports overrides for the libc
//! signal-configuration entry points (so the host program cannot displace
//! the crash handler), the C entry points
//! [`holdfast_install_sighandlers`](abi::holdfast_install_sighandlers) and
//! [`holdfast_debug`](abi::holdfast_debug), and the `__holdfast_go`
//! handshake flag a debugger writes to release the process. A load-time
//! constructor resolves the original libc entry points and reads the
//! `HOLDFAST_*` environment before `main` runs.
//!
//! Rust programs can skip the C surface and use the re-exported
//! `holdfast-core` API directly.

#![allow(unsafe_code)] // The C ABI surface is inherently unsafe

pub mod abi;

pub use holdfast_core::{
    install_sighandlers, run_debug_session, run_debug_session_with, DebugConfig, DebuggerFrontend, GdbFrontend,
    HandlerFlags, HoldfastError, HoldfastResult,
};

/// Load-time constructor.
///
/// Resolves the original-call table (aborting if any libc entry point cannot
/// be found), seeds the configuration from the environment, and, when
/// `HOLDFAST_VERBOSE` is set, brings up `tracing` output on stderr.
/// Everything here must tolerate running before the host's `main`.
#[ctor::ctor]
fn holdfast_bootstrap()
{
    holdfast_core::bootstrap();

    if holdfast_core::config::lock().verbose {
        // Best-effort: the host program may already own the global
        // subscriber, in which case our events flow there.
        let _ = holdfast_utils::init_logging();
        tracing::debug!("holdfast loaded");
    }
}
