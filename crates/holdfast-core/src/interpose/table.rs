//! # Original-Call Table
//!
//! Holds resolved references to the process's true signal-configuration
//! primitives, obtained exactly once at load time by looking up "the next"
//! definition in the loaded-module search order (`dlsym(RTLD_NEXT, ...)`).
//! This bypasses the overrides the `holdfast` cdylib itself exports.
//!
//! ## Resolution policy
//!
//! All entries must resolve or the process aborts. A partially populated
//! table is unsafe to operate with: every shim operation depends on it, and
//! an unresolved reference would recurse straight back into the shim.
//!
//! ## Capability interface
//!
//! [`SignalConfig`] expresses "something that can configure signals" as an
//! ordinary trait, with [`NextSignalConfig`] as the one real implementation
//! backed by this table. The installer is generic over it, which keeps the
//! dlsym machinery out of its tests.

use std::ffi::{c_void, CStr};
use std::mem;

use libc::{c_int, sigset_t};
use once_cell::sync::Lazy;

use crate::error::{HoldfastError, HoldfastResult};
use crate::safemsg;

/// `signal(2)` - legacy set-disposition entry point.
pub type SignalFn = unsafe extern "C" fn(c_int, libc::sighandler_t) -> libc::sighandler_t;
/// `sigaction(2)` - set/query a signal disposition.
pub type SigactionFn = unsafe extern "C" fn(c_int, *const libc::sigaction, *mut libc::sigaction) -> c_int;
/// `sigprocmask(2)` - query/set the process signal mask.
pub type SigprocmaskFn = unsafe extern "C" fn(c_int, *const sigset_t, *mut sigset_t) -> c_int;
/// `sigemptyset(3)` / `sigfillset(3)` - signal-set builders.
pub type SigsetOpFn = unsafe extern "C" fn(*mut sigset_t) -> c_int;
/// `sigaddset(3)` - add one signal to a set.
pub type SigaddsetFn = unsafe extern "C" fn(*mut sigset_t, c_int) -> c_int;

/// The resolved real primitives.
///
/// Immutable after resolution; shared by the shim and the installer for the
/// process lifetime.
pub struct RealSignalFns
{
    /// The real `signal`
    pub signal: SignalFn,
    /// The real `sigaction`
    pub sigaction: SigactionFn,
    /// The real `sigprocmask`
    pub sigprocmask: SigprocmaskFn,
    /// The real `sigemptyset`
    pub sigemptyset: SigsetOpFn,
    /// The real `sigaddset`
    pub sigaddset: SigaddsetFn,
    /// The real `sigfillset`
    pub sigfillset: SigsetOpFn,
}

impl RealSignalFns
{
    /// Resolve every entry, or report the first symbol that failed.
    fn resolve() -> HoldfastResult<Self>
    {
        // Safety: transmuting a non-null dlsym result to the function type
        // the symbol is documented to have.
        unsafe {
            Ok(RealSignalFns {
                signal: mem::transmute::<*mut c_void, SignalFn>(next_symbol(c"signal", "signal")?),
                sigaction: mem::transmute::<*mut c_void, SigactionFn>(next_symbol(c"sigaction", "sigaction")?),
                sigprocmask: mem::transmute::<*mut c_void, SigprocmaskFn>(next_symbol(c"sigprocmask", "sigprocmask")?),
                sigemptyset: mem::transmute::<*mut c_void, SigsetOpFn>(next_symbol(c"sigemptyset", "sigemptyset")?),
                sigaddset: mem::transmute::<*mut c_void, SigaddsetFn>(next_symbol(c"sigaddset", "sigaddset")?),
                sigfillset: mem::transmute::<*mut c_void, SigsetOpFn>(next_symbol(c"sigfillset", "sigfillset")?),
            })
        }
    }
}

/// Look up the next definition of `name` after this library.
unsafe fn next_symbol(name: &'static CStr, label: &'static str) -> HoldfastResult<*mut c_void>
{
    let sym = libc::dlsym(libc::RTLD_NEXT, name.as_ptr());
    if sym.is_null() {
        return Err(HoldfastError::SymbolResolution(label));
    }
    Ok(sym)
}

static REAL: Lazy<RealSignalFns> = Lazy::new(|| match RealSignalFns::resolve() {
    Ok(table) => table,
    Err(err) => {
        // No degraded mode: report on the signal-safe path and abort.
        let mut msg = safemsg::MsgBuf::new();
        msg.push_str("holdfast: fatal: could not resolve the real `");
        if let HoldfastError::SymbolResolution(name) = err {
            msg.push_str(name);
        }
        msg.push_str("`\n");
        msg.write();
        unsafe { libc::abort() }
    }
});

/// The process-wide original-call table.
///
/// First call performs the resolution (and aborts the process if any entry
/// is missing); later calls are a plain static read.
pub fn real() -> &'static RealSignalFns
{
    &REAL
}

/// Capability interface over the five signal-configuration operations.
///
/// All methods are `unsafe`: they take raw pointers with the same validity
/// requirements as the underlying libc calls.
pub trait SignalConfig
{
    /// Set (or query, with a null `act`) a signal disposition.
    unsafe fn set_action(&self, signum: c_int, act: *const libc::sigaction, old: *mut libc::sigaction) -> c_int;

    /// Query/set the process signal mask.
    unsafe fn set_mask(&self, how: c_int, set: *const sigset_t, old: *mut sigset_t) -> c_int;

    /// Initialize a signal set to empty.
    unsafe fn empty_set(&self, set: *mut sigset_t) -> c_int;

    /// Add one signal to a set.
    unsafe fn add_to_set(&self, set: *mut sigset_t, signum: c_int) -> c_int;

    /// Initialize a signal set to full.
    unsafe fn fill_set(&self, set: *mut sigset_t) -> c_int;
}

/// The real provider: delegates to the resolved original-call table.
#[derive(Debug, Default, Clone, Copy)]
pub struct NextSignalConfig;

impl SignalConfig for NextSignalConfig
{
    unsafe fn set_action(&self, signum: c_int, act: *const libc::sigaction, old: *mut libc::sigaction) -> c_int
    {
        (real().sigaction)(signum, act, old)
    }

    unsafe fn set_mask(&self, how: c_int, set: *const sigset_t, old: *mut sigset_t) -> c_int
    {
        (real().sigprocmask)(how, set, old)
    }

    unsafe fn empty_set(&self, set: *mut sigset_t) -> c_int
    {
        (real().sigemptyset)(set)
    }

    unsafe fn add_to_set(&self, set: *mut sigset_t, signum: c_int) -> c_int
    {
        (real().sigaddset)(set, signum)
    }

    unsafe fn fill_set(&self, set: *mut sigset_t) -> c_int
    {
        (real().sigfillset)(set)
    }
}
