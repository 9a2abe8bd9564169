//! Tests for the debug-session orchestrator
//!
//! These exercise the handshake loop with stub frontends instead of a real
//! debugger. The session guard and handshake flag are process-global, so a
//! static mutex serializes every test here; the harness would otherwise
//! interleave them.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use holdfast_core::config::{self, HandlerFlags};
use holdfast_core::error::{HoldfastError, HoldfastResult};
use holdfast_core::launcher::DebuggerFrontend;
use holdfast_core::session::{
    handshake_requested, request_handshake, run_debug_session_with, session_in_progress, HANDSHAKE_TIMEOUT,
};

static LOCK: Mutex<()> = Mutex::new(());

fn serialized() -> std::sync::MutexGuard<'static, ()>
{
    LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

// A successful handshake ends in raise(SIGTRAP); without a debugger attached
// the default disposition would kill the test process.
fn ignore_sigtrap()
{
    unsafe {
        libc::signal(libc::SIGTRAP, libc::SIG_IGN);
    }
}

/// Frontend stub that never launches anything.
struct StubFrontend
{
    launches: AtomicUsize,
    fail: bool,
}

impl StubFrontend
{
    fn new() -> Self
    {
        StubFrontend {
            launches: AtomicUsize::new(0),
            fail: false,
        }
    }

    fn failing() -> Self
    {
        StubFrontend {
            launches: AtomicUsize::new(0),
            fail: true,
        }
    }
}

impl DebuggerFrontend for StubFrontend
{
    fn name(&self) -> &'static str
    {
        "stub"
    }

    fn launch(&self, _pid: u32, _flags: HandlerFlags, _options: &str) -> HoldfastResult<()>
    {
        self.launches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(HoldfastError::LaunchFailed {
                frontend: "stub",
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "stub refused"),
            });
        }
        Ok(())
    }
}

#[test]
fn test_disabled_facility_skips_the_session()
{
    let _serial = serialized();
    config::lock().disabled = true;

    let frontend = StubFrontend::new();
    let result = run_debug_session_with(&frontend, HandlerFlags::empty(), "");

    config::lock().disabled = false;

    assert!(result.is_ok());
    assert_eq!(frontend.launches.load(Ordering::SeqCst), 0);
}

#[test]
fn test_handshake_times_out_after_about_one_second()
{
    let _serial = serialized();

    let started = Instant::now();
    let result = run_debug_session_with(&StubFrontend::new(), HandlerFlags::empty(), "");
    let elapsed = started.elapsed();

    match result {
        Err(HoldfastError::AttachTimedOut { ceiling }) => assert_eq!(ceiling, HANDSHAKE_TIMEOUT),
        other => panic!("expected a timeout, got {:?}", other),
    }

    // The ceiling is wall-clock, so the loop cannot drift far past it.
    assert!(elapsed >= Duration::from_millis(900), "gave up too early: {:?}", elapsed);
    assert!(elapsed <= Duration::from_secs(2), "gave up too late: {:?}", elapsed);

    // Timeout releases the guard.
    assert!(!session_in_progress());
}

#[test]
fn test_handshake_completes_when_flag_is_set()
{
    let _serial = serialized();
    ignore_sigtrap();

    let setter = thread::spawn(|| {
        thread::sleep(Duration::from_millis(50));
        request_handshake();
    });

    let started = Instant::now();
    let result = run_debug_session_with(&StubFrontend::new(), HandlerFlags::empty(), "");
    let elapsed = started.elapsed();
    setter.join().unwrap();

    assert!(result.is_ok());
    assert!(elapsed < Duration::from_millis(900), "should return promptly: {:?}", elapsed);
    assert!(!handshake_requested(), "flag should be cleared after the handshake");
    assert!(!session_in_progress());
}

#[test]
fn test_second_concurrent_session_is_rejected()
{
    let _serial = serialized();
    ignore_sigtrap();

    // First session polls in the background.
    let first = thread::spawn(|| run_debug_session_with(&StubFrontend::new(), HandlerFlags::empty(), ""));
    while !session_in_progress() {
        thread::sleep(Duration::from_millis(1));
    }

    let second = run_debug_session_with(&StubFrontend::new(), HandlerFlags::empty(), "");
    assert!(matches!(second, Err(HoldfastError::SessionActive)));

    // The rejected attempt left the running session undisturbed.
    assert!(session_in_progress());

    request_handshake();
    assert!(first.join().unwrap().is_ok());
    assert!(!session_in_progress());
}

#[test]
fn test_launch_failure_releases_the_guard()
{
    let _serial = serialized();

    let frontend = StubFrontend::failing();
    let result = run_debug_session_with(&frontend, HandlerFlags::empty(), "");

    assert!(matches!(result, Err(HoldfastError::LaunchFailed { .. })));
    assert_eq!(frontend.launches.load(Ordering::SeqCst), 1);
    assert!(!session_in_progress());
}
