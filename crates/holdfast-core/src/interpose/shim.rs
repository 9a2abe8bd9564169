//! # Interception Shim
//!
//! The replacement bodies for the intercepted signal-configuration
//! operations. The `holdfast` cdylib exports thin `extern "C"` wrappers
//! around these under the libc names, so every call site in the process -
//! inside or outside this library - observes the shimmed behavior uniformly.
//!
//! One operation deviates from pure pass-through: configuring a handler for
//! the protected segmentation-violation signal reports success without
//! forwarding, so application code cannot silently disable the crash handler
//! for the signal most commonly raised by memory corruption. Everything else
//! delegates verbatim to the original-call table, with no side effects
//! beyond delegation.

use libc::{c_int, sigset_t};
use tracing::trace;

use crate::install;
use crate::interpose::table;
use crate::signals::PROTECTED_SIGNAL;

/// Shimmed `signal(2)`.
///
/// Pure pass-through, even for the protected signal: the legacy entry point
/// is kept only so its resolution cannot bypass the table.
///
/// # Safety
///
/// Same contract as `libc::signal`.
pub unsafe fn signal(signum: c_int, handler: libc::sighandler_t) -> libc::sighandler_t
{
    (table::real().signal)(signum, handler)
}

/// Shimmed `sigaction(2)`.
///
/// For the protected signal this unconditionally reports success without
/// altering any handler. For every other signal it forwards verbatim.
///
/// # Safety
///
/// Same contract as `libc::sigaction`.
pub unsafe fn sigaction(signum: c_int, act: *const libc::sigaction, oldact: *mut libc::sigaction) -> c_int
{
    if signum == PROTECTED_SIGNAL {
        // The suppression flag is informational for now: the installer talks
        // to the table directly, so a swallowed call here always came from
        // application code.
        trace!(
            signum,
            own_configuration = install::configuring_own_handler(),
            "refusing to reconfigure the protected signal"
        );
        return 0;
    }
    (table::real().sigaction)(signum, act, oldact)
}

/// Shimmed `sigprocmask(2)`. Pure pass-through.
///
/// # Safety
///
/// Same contract as `libc::sigprocmask`.
pub unsafe fn sigprocmask(how: c_int, set: *const sigset_t, oldset: *mut sigset_t) -> c_int
{
    (table::real().sigprocmask)(how, set, oldset)
}

/// Shimmed `sigemptyset(3)`. Pure pass-through.
///
/// # Safety
///
/// Same contract as `libc::sigemptyset`.
pub unsafe fn sigemptyset(set: *mut sigset_t) -> c_int
{
    (table::real().sigemptyset)(set)
}

/// Shimmed `sigaddset(3)`. Pure pass-through.
///
/// # Safety
///
/// Same contract as `libc::sigaddset`.
pub unsafe fn sigaddset(set: *mut sigset_t, signum: c_int) -> c_int
{
    (table::real().sigaddset)(set, signum)
}

/// Shimmed `sigfillset(3)`. Pure pass-through.
///
/// # Safety
///
/// Same contract as `libc::sigfillset`.
pub unsafe fn sigfillset(set: *mut sigset_t) -> c_int
{
    (table::real().sigfillset)(set)
}
