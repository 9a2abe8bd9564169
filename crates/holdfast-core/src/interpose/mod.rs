//! # Signal-configuration Interception
//!
//! Two halves of one mechanism:
//!
//! - [`table`]: the original-call table, holding the real signal
//!   configuration primitives resolved once at load time with
//!   `dlsym(RTLD_NEXT, ...)` - i.e. the definitions *behind* this library in
//!   the loaded-module search order.
//! - [`shim`]: the replacement operations the `holdfast` cdylib exports under
//!   the libc names. Every process-level attempt to alter signal disposition
//!   passes through here first.
//!
//! The crash handler installer deliberately bypasses the shim and calls the
//! table directly; the shim would otherwise refuse configuration of the very
//! signal it protects.

pub mod shim;
pub mod table;

pub use table::{NextSignalConfig, SignalConfig};
