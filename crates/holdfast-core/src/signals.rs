//! # Monitored Signals
//!
//! The fixed set of fatal signals the crash handler covers, plus the one
//! signal whose disposition the shim refuses to let application code change.

use libc::c_int;

/// The fatal signals routed through the crash handler.
///
/// Fixed at compile time and not configurable through the public surface.
pub const MONITORED_SIGNALS: [c_int; 5] = [libc::SIGILL, libc::SIGABRT, libc::SIGFPE, libc::SIGSEGV, libc::SIGBUS];

/// The signal whose handler configuration the shim silently swallows.
///
/// Memory corruption most commonly surfaces as a segmentation violation, so
/// this is the one disposition application code is not allowed to displace.
pub const PROTECTED_SIGNAL: c_int = libc::SIGSEGV;

/// Human-readable name for a monitored signal (for diagnostics).
pub fn signal_name(signum: c_int) -> &'static str
{
    match signum {
        libc::SIGILL => "SIGILL",
        libc::SIGABRT => "SIGABRT",
        libc::SIGFPE => "SIGFPE",
        libc::SIGSEGV => "SIGSEGV",
        libc::SIGBUS => "SIGBUS",
        libc::SIGTRAP => "SIGTRAP",
        libc::SIGSTOP => "SIGSTOP",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn monitored_set_is_the_five_fatal_signals()
    {
        assert_eq!(MONITORED_SIGNALS.len(), 5);
        assert!(MONITORED_SIGNALS.contains(&libc::SIGILL));
        assert!(MONITORED_SIGNALS.contains(&libc::SIGABRT));
        assert!(MONITORED_SIGNALS.contains(&libc::SIGFPE));
        assert!(MONITORED_SIGNALS.contains(&libc::SIGSEGV));
        assert!(MONITORED_SIGNALS.contains(&libc::SIGBUS));
    }

    #[test]
    fn protected_signal_is_monitored()
    {
        assert!(MONITORED_SIGNALS.contains(&PROTECTED_SIGNAL));
    }

    #[test]
    fn signal_names()
    {
        assert_eq!(signal_name(libc::SIGSEGV), "SIGSEGV");
        assert_eq!(signal_name(libc::SIGBUS), "SIGBUS");
        assert_eq!(signal_name(12345), "unknown");
    }
}
