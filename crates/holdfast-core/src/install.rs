//! # Crash Handler Installer
//!
//! Routes the monitored fatal-signal set through the crash handler. All
//! configuration goes through the original-call table directly, never the
//! shim - the shim would refuse to touch the protected signal.
//!
//! Installation is best-effort: a signal whose handler cannot be registered
//! gets a diagnostic and the remaining signals are still configured. No
//! signal is load-bearing for the others. The same applies to the alternate
//! signal stack; most fatal-signal deliveries work without it unless the
//! crash is itself a stack overflow.

use std::io;
use std::ptr;
use std::sync::atomic::{AtomicBool, Ordering};

use libc::c_int;
use tracing::{debug, warn};

use crate::config::{self, DebugConfig, HandlerFlags};
use crate::error::HoldfastResult;
use crate::handler;
use crate::interpose::table::{NextSignalConfig, SignalConfig};
use crate::safemsg::MsgBuf;
use crate::signals::{signal_name, MONITORED_SIGNALS};

// Set while the installer itself is calling into the original-call table,
// so the shim can tell our own configuration apart from application code.
// Informational for now; the shim does not gate on it.
static CONFIGURING: AtomicBool = AtomicBool::new(false);

/// Whether the installer is currently configuring its own handler.
pub fn configuring_own_handler() -> bool
{
    CONFIGURING.load(Ordering::Relaxed)
}

/// RAII bracket for the suppression flag.
struct ConfigureGuard;

impl ConfigureGuard
{
    fn enter() -> Self
    {
        CONFIGURING.store(true, Ordering::Relaxed);
        ConfigureGuard
    }
}

impl Drop for ConfigureGuard
{
    fn drop(&mut self)
    {
        CONFIGURING.store(false, Ordering::Relaxed);
    }
}

/// Installation entry point.
///
/// Records `flags` and `options` in the process-wide configuration (the
/// debug-session orchestrator reads them later), then configures an extended
/// handler for each monitored signal. A no-op success when the facility is
/// disabled.
///
/// ## Errors
///
/// Currently infallible beyond the per-signal diagnostics; the `Result`
/// shape matches the other entry points so the C surface can map uniformly.
pub fn install_sighandlers(flags: HandlerFlags, options: &str) -> HoldfastResult<()>
{
    let mut cfg = config::lock();
    install_with(&NextSignalConfig, &mut cfg, flags, options)
}

/// Installer body, generic over the signal-configuration provider.
///
/// Production code passes [`NextSignalConfig`]; tests can pass a recorder to
/// observe exactly which dispositions get touched.
pub fn install_with<C: SignalConfig>(
    provider: &C,
    cfg: &mut DebugConfig,
    flags: HandlerFlags,
    options: &str,
) -> HoldfastResult<()>
{
    if cfg.disabled {
        debug!("holdfast is disabled, skipping handler installation");
        return Ok(());
    }

    cfg.flags = flags;
    cfg.options = options.to_string();

    // Format the crash-time message now, while allocation is still legal.
    handler::prepare_attach_message(cfg.quiet);

    for &signum in &MONITORED_SIGNALS {
        if cfg.verbose {
            debug!(signum, name = signal_name(signum), "installing crash handler");
        }

        // Safety: `action` is fully initialized before registration and the
        // handler is SA_SIGINFO-shaped.
        let rc = unsafe {
            let mut action: libc::sigaction = std::mem::zeroed();
            provider.empty_set(&mut action.sa_mask);
            action.sa_sigaction = handler::crash_handler as usize;
            action.sa_flags = sa_flags(flags);

            let _bracket = ConfigureGuard::enter();
            provider.set_action(signum, &action, ptr::null_mut())
        };

        if rc != 0 {
            warn!(signum, name = signal_name(signum), "failed to install crash handler");
            let mut msg = MsgBuf::new();
            msg.push_str("holdfast: failed to intercept signal ");
            msg.push_signal(signum);
            msg.push_str(" (");
            msg.push_str(signal_name(signum));
            msg.push_str(")\n");
            msg.write();
        }
    }

    if flags.contains(HandlerFlags::ALT_STACK) {
        install_alt_stack();
    }

    Ok(())
}

/// The `sa_flags` word for the crash handler registration.
fn sa_flags(flags: HandlerFlags) -> c_int
{
    let mut sa = libc::SA_SIGINFO;
    if flags.contains(HandlerFlags::ALT_STACK) {
        sa |= libc::SA_ONSTACK;
    }
    sa
}

// 16 KiB covers SIGSTKSZ on every libc we target, with headroom for the
// handler's own frames.
const ALT_STACK_SIZE: usize = 16 * 1024;

#[repr(C, align(16))]
struct AltStack([u8; ALT_STACK_SIZE]);

static mut ALT_STACK: AltStack = AltStack([0; ALT_STACK_SIZE]);

/// Install the static alternate signal stack. Failure is diagnostic-only.
fn install_alt_stack()
{
    // Safety: the stack buffer is static, correctly aligned and never
    // reclaimed; sigaltstack only stores the pointer.
    let rc = unsafe {
        let stack = libc::stack_t {
            ss_sp: ptr::addr_of_mut!(ALT_STACK).cast::<libc::c_void>(),
            ss_flags: 0,
            ss_size: ALT_STACK_SIZE,
        };
        libc::sigaltstack(&stack, ptr::null_mut())
    };

    if rc != 0 {
        let err = io::Error::last_os_error();
        warn!(%err, "failed to install the alternate signal stack");
    }
}
