//! # C ABI Surface
//!
//! The exported symbols of the `holdfast` cdylib: the interposed libc
//! signal-configuration entry points and the two public control functions.
//!
//! The interposed symbols carry the exact libc signatures and simply forward
//! to the shim bodies in `holdfast-core`; keeping the `#[no_mangle]` exports
//! here, out of the core crate, means the core's own test binaries do not
//! interpose themselves.
//!
//! The control functions translate between C conventions and the Rust API:
//! a null options pointer means "no options" (a non-null pointer must be a
//! valid NUL-terminated string), and results map to 1 for success and 0 for
//! failure (errors are reported through `tracing` and the signal-safe
//! diagnostics before the status reaches C).

use std::ffi::CStr;

use libc::{c_char, c_int, c_uint, sigset_t};
use tracing::warn;

use holdfast_core::config::HandlerFlags;
use holdfast_core::interpose::shim;

/// Interposed `signal(2)`.
///
/// # Safety
///
/// Same contract as `libc::signal`.
#[no_mangle]
pub unsafe extern "C" fn signal(signum: c_int, handler: libc::sighandler_t) -> libc::sighandler_t
{
    shim::signal(signum, handler)
}

/// Interposed `sigaction(2)`. Reports success without forwarding for the
/// protected segfault signal.
///
/// # Safety
///
/// Same contract as `libc::sigaction`.
#[no_mangle]
pub unsafe extern "C" fn sigaction(signum: c_int, act: *const libc::sigaction, oldact: *mut libc::sigaction) -> c_int
{
    shim::sigaction(signum, act, oldact)
}

/// Interposed `sigprocmask(2)`.
///
/// # Safety
///
/// Same contract as `libc::sigprocmask`.
#[no_mangle]
pub unsafe extern "C" fn sigprocmask(how: c_int, set: *const sigset_t, oldset: *mut sigset_t) -> c_int
{
    shim::sigprocmask(how, set, oldset)
}

/// Interposed `sigemptyset(3)`.
///
/// # Safety
///
/// Same contract as `libc::sigemptyset`.
#[no_mangle]
pub unsafe extern "C" fn sigemptyset(set: *mut sigset_t) -> c_int
{
    shim::sigemptyset(set)
}

/// Interposed `sigaddset(3)`.
///
/// # Safety
///
/// Same contract as `libc::sigaddset`.
#[no_mangle]
pub unsafe extern "C" fn sigaddset(set: *mut sigset_t, signum: c_int) -> c_int
{
    shim::sigaddset(set, signum)
}

/// Interposed `sigfillset(3)`.
///
/// # Safety
///
/// Same contract as `libc::sigfillset`.
#[no_mangle]
pub unsafe extern "C" fn sigfillset(set: *mut sigset_t) -> c_int
{
    shim::sigfillset(set)
}

/// Decode a C options pointer; null means no options.
unsafe fn options_from_c(options: *const c_char) -> String
{
    if options.is_null() {
        return String::new();
    }
    CStr::from_ptr(options).to_string_lossy().into_owned()
}

/// Install the crash handlers for the monitored fatal signals.
///
/// `flags` is the raw [`HandlerFlags`] word (unknown bits are ignored);
/// `options` is a NUL-terminated string of extra debugger arguments, or
/// null. Returns 1 on success, 0 on failure.
///
/// # Safety
///
/// `options` must be null or point to a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn holdfast_install_sighandlers(flags: c_uint, options: *const c_char) -> c_int
{
    let flags = HandlerFlags::from_bits_truncate(flags);
    let options = options_from_c(options);

    match holdfast_core::install_sighandlers(flags, &options) {
        Ok(()) => 1,
        Err(err) => {
            warn!(%err, "handler installation failed");
            0
        }
    }
}

/// Launch a debugger against this process and wait for it to attach.
///
/// On success the debugger has attached, the process has trapped under its
/// control, and the call returns 1 once the debugger resumes it. Returns 0
/// when the debugger could not be launched, did not attach within the
/// handshake ceiling, or another session is already running.
///
/// # Safety
///
/// `options` must be null or point to a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn holdfast_debug(flags: c_uint, options: *const c_char) -> c_int
{
    let flags = HandlerFlags::from_bits_truncate(flags);
    let options = options_from_c(options);

    match holdfast_core::run_debug_session(flags, &options) {
        Ok(()) => 1,
        Err(err) => {
            warn!(%err, "debug session failed");
            0
        }
    }
}
