//! # holdfast-core
//!
//! Crash-time debugger attachment for Holdfast.
//!
//! This crate freezes a crashing process instead of letting it die, so a
//! debugger can be attached after the fact. It provides:
//! - Interception of the process's signal-configuration primitives, so
//!   application code cannot silently displace the crash handler
//! - An async-signal-safe crash handler that announces itself and stops the
//!   process
//! - A debug-session orchestrator that launches an external debugger and
//!   waits for the attach handshake
//!
//! ## How the pieces fit
//!
//! At load time the real `sigaction`/`sigprocmask`/signal-set primitives are
//! resolved with `dlsym(RTLD_NEXT, ...)` into the [`interpose::table`]
//! original-call table. The exported overrides in the `holdfast` cdylib route
//! every application call through [`interpose::shim`], which consults that
//! table and refuses to reconfigure the protected segfault signal. The
//! [`install`] module registers the [`handler`] for the fatal signals by
//! calling the table directly, bypassing its own shim. When a fatal signal
//! lands, the handler prints the attach command and sends itself `SIGSTOP`;
//! [`session`] automates the rest by launching a debugger frontend and
//! polling the exported handshake flag.
//!
//! ## Why unsafe code is needed
//!
//! This crate requires `unsafe` code because it resolves and calls raw libc
//! function pointers, installs signal handlers, and runs code in
//! signal-delivery context. These operations bypass normal Rust safety
//! guarantees by nature. The unsafe surface is kept at the edges and wrapped
//! in safe entry points.

#![allow(unsafe_code)] // Required for dlsym, sigaction and signal-context code

pub mod config;
pub mod error;
pub mod handler;
pub mod install;
pub mod interpose;
pub mod launcher;
pub mod prelude;
pub mod safemsg;
pub mod session;
pub mod signals;

pub use config::{DebugConfig, HandlerFlags};
// Re-export commonly used entry points
pub use error::{HoldfastError, HoldfastResult};
pub use install::install_sighandlers;
pub use launcher::{DebuggerFrontend, GdbFrontend};
pub use session::{run_debug_session, run_debug_session_with};

/// Load-time bootstrap: resolve the original-call table and seed the
/// process-wide configuration from the environment.
///
/// Called from the `holdfast` cdylib's constructor. Idempotent; safe to call
/// again (the table and the configuration are both resolved exactly once).
/// If any of the underlying primitives cannot be resolved, the process
/// aborts - a partially populated table is unsafe to operate with.
pub fn bootstrap()
{
    interpose::table::real();
    config::init();
}
