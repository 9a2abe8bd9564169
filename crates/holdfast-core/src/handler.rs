//! # Crash Handler
//!
//! The routine the kernel invokes when a monitored fatal signal is
//! delivered. It runs in signal-delivery context, interrupting ordinary
//! execution at an arbitrary instruction boundary, so it must be
//! async-signal-safe: no heap allocation, no locks, no `tracing`.
//!
//! The attach message is pre-formatted by the installer while allocation is
//! still legal; the handler only replays those bytes and then stops its own
//! process. It never resumes, retries or re-raises: once an external agent
//! resumes the process, control returns to the faulting context under the
//! attached debugger.

use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};

use libc::c_int;

use crate::safemsg::{self, MsgBuf};

// Filled once by `prepare_attach_message`, read only by the handler. The
// length store is the release point for the buffer contents.
static mut ATTACH_MSG: [u8; MsgBuf::CAPACITY] = [0; MsgBuf::CAPACITY];
static ATTACH_MSG_LEN: AtomicUsize = AtomicUsize::new(0);

/// Pre-format the crash-time diagnostic: the process id and the literal
/// attach command an operator would run.
///
/// Called by the installer before any handler is registered. With `quiet`
/// set the handler stays silent.
pub fn prepare_attach_message(quiet: bool)
{
    if quiet {
        ATTACH_MSG_LEN.store(0, Ordering::Release);
        return;
    }

    let pid = u64::from(std::process::id());
    let mut msg = MsgBuf::new();
    msg.push_str("holdfast: fatal signal in process ");
    msg.push_unsigned(pid);
    msg.push_str(", stopping\nconnect by running:\ngdb --pid=");
    msg.push_unsigned(pid);
    msg.push_str("\n");

    let bytes = msg.as_bytes();
    // Safety: single writer (the installer holds the config lock), and the
    // handler only reads up to the length published below.
    unsafe {
        let buf = &mut *ptr::addr_of_mut!(ATTACH_MSG);
        buf[..bytes.len()].copy_from_slice(bytes);
    }
    ATTACH_MSG_LEN.store(bytes.len(), Ordering::Release);
}

/// The signal-context entry point registered for every monitored signal.
///
/// Announces the attach command on standard error and sends the process
/// `SIGSTOP`. Does not call into the session orchestrator; automated
/// attachment is a next step for the surrounding caller or an operator.
///
/// # Safety
///
/// Only to be installed as an `SA_SIGINFO` signal handler. Everything it
/// touches is async-signal-safe (`write`, `getpid`, `kill`).
pub unsafe extern "C" fn crash_handler(_signum: c_int, _info: *mut libc::siginfo_t, _context: *mut libc::c_void)
{
    let len = ATTACH_MSG_LEN.load(Ordering::Acquire);
    if len > 0 {
        let buf = &*ptr::addr_of!(ATTACH_MSG);
        safemsg::write_raw(&buf[..len]);
    }

    libc::kill(libc::getpid(), libc::SIGSTOP);
}
