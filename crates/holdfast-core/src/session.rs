//! # Debug Session Orchestrator
//!
//! Automates "launch a debugger and hand the process over": spawn the
//! frontend, poll the handshake flag until the debugger signals it has
//! attached, then raise a trap so the debugger takes control right here.
//!
//! ## The handshake
//!
//! The only channel between this process and the attached debugger is
//! [`__holdfast_go`], an exported plain int. The debugger sets it with an
//! ordinary memory write once attached; this process observes it, clears it
//! and raises `SIGTRAP`. The flag stays a bare int on purpose: a
//! language-level synchronization primitive would not be writable from a
//! debugger's memory-poke facility.
//!
//! ## Re-entrancy
//!
//! Only one session may run at a time. The guard is an atomic swap (the
//! read-then-set in the original protocol was racy) and is released on every
//! exit path by an RAII guard. The external protocol is unchanged.

use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use libc::c_int;
use tracing::{debug, warn};

use crate::config::{self, HandlerFlags};
use crate::error::{HoldfastError, HoldfastResult};
use crate::launcher::{DebuggerFrontend, GdbFrontend};
use crate::safemsg;

/// Poll granularity for the handshake loop.
pub const POLL_INTERVAL: Duration = Duration::from_micros(10);

/// Fixed ceiling for the attach handshake, wall-clock.
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(1);

/// Interface with the debugger: set to nonzero by an attached debugger to
/// let the frozen process proceed.
#[allow(non_upper_case_globals)]
#[no_mangle]
pub static mut __holdfast_go: c_int = 0;

/// Volatile read of the handshake flag.
///
/// Volatile because the writer is outside this program's memory model
/// entirely (a debugger poking process memory).
pub fn handshake_requested() -> bool
{
    unsafe { ptr::read_volatile(ptr::addr_of!(__holdfast_go)) != 0 }
}

/// Set the handshake flag, as an attached debugger would.
///
/// Exists for in-process tests and for callers that want to release a
/// session programmatically.
pub fn request_handshake()
{
    unsafe { ptr::write_volatile(ptr::addr_of_mut!(__holdfast_go), 1) }
}

fn clear_handshake()
{
    unsafe { ptr::write_volatile(ptr::addr_of_mut!(__holdfast_go), 0) }
}

static SESSION_ACTIVE: AtomicBool = AtomicBool::new(false);

/// Whether a debug session currently holds the guard.
pub fn session_in_progress() -> bool
{
    SESSION_ACTIVE.load(Ordering::SeqCst)
}

/// RAII ownership of the single-session guard.
struct SessionGuard;

impl SessionGuard
{
    /// Take the guard; `None` if a session is already in progress.
    fn acquire() -> Option<Self>
    {
        if SESSION_ACTIVE.swap(true, Ordering::SeqCst) {
            return None;
        }
        Some(SessionGuard)
    }
}

impl Drop for SessionGuard
{
    fn drop(&mut self)
    {
        SESSION_ACTIVE.store(false, Ordering::SeqCst);
    }
}

/// Debug-session entry point using the default gdb frontend.
///
/// See [`run_debug_session_with`] for the full contract.
pub fn run_debug_session(flags: HandlerFlags, options: &str) -> HoldfastResult<()>
{
    run_debug_session_with(&GdbFrontend, flags, options)
}

/// Launch `frontend` against this process and wait for the attach handshake.
///
/// A no-op success when the facility is disabled. At most one session runs
/// at a time; a concurrent call gets [`HoldfastError::SessionActive`] and
/// leaves the running session undisturbed.
///
/// On a completed handshake the flag is cleared and `SIGTRAP` is raised, so
/// the now-attached debugger gains control at this exact point; the call
/// then returns success. If the flag is never observed within
/// [`HANDSHAKE_TIMEOUT`] the session ends with
/// [`HoldfastError::AttachTimedOut`]; a launch failure ends it with
/// [`HoldfastError::LaunchFailed`]. The guard is released on every path.
pub fn run_debug_session_with(frontend: &dyn DebuggerFrontend, flags: HandlerFlags, options: &str) -> HoldfastResult<()>
{
    if config::lock().disabled {
        debug!("holdfast is disabled, skipping debug session");
        return Ok(());
    }

    let _guard = match SessionGuard::acquire() {
        Some(guard) => guard,
        None => {
            safemsg::write_line("holdfast: can't attach more than one debugger simultaneously");
            return Err(HoldfastError::SessionActive);
        }
    };

    debug!(frontend = frontend.name(), "starting debug session");
    frontend.launch(std::process::id(), flags, options)?;

    // Wait for the debugger to unblock us.
    let started = Instant::now();
    while !handshake_requested() {
        thread::sleep(POLL_INTERVAL);
        if started.elapsed() > HANDSHAKE_TIMEOUT {
            safemsg::write_line("holdfast: debugger failed to attach");
            warn!(ceiling = ?HANDSHAKE_TIMEOUT, "attach handshake timed out");
            return Err(HoldfastError::AttachTimedOut {
                ceiling: HANDSHAKE_TIMEOUT,
            });
        }
    }
    clear_handshake();

    // Hand control to the attached debugger at this exact spot.
    unsafe {
        libc::raise(libc::SIGTRAP);
    }

    debug!("debug session handshake complete");
    Ok(())
}
