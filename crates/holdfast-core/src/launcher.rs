//! # Debugger Frontends
//!
//! Launching the external debugger is fire-and-forget: the orchestrator
//! only needs a "start attaching to this pid" call that reports whether the
//! frontend process could be spawned. Everything after that happens over the
//! handshake flag.
//!
//! The frontend is a trait even though only one concrete launcher exists
//! today; it keeps the handshake logic independent of the tool choice and
//! lets tests substitute a stub.

use std::process::Command;

use tracing::{info, warn};

use crate::config::HandlerFlags;
use crate::error::{HoldfastError, HoldfastResult};

/// The exported symbol an attached debugger writes to release the process.
///
/// This is the entire wire protocol toward the debugger: a plain int it can
/// set with a single memory write (`set variable __holdfast_go = 1`).
pub const HANDSHAKE_SYMBOL: &str = "__holdfast_go";

/// An external debugger launcher.
///
/// Implementations spawn their tool against the given pid and return
/// immediately; they must not wait for the attach to complete.
pub trait DebuggerFrontend
{
    /// Short tool name, for diagnostics.
    fn name(&self) -> &'static str;

    /// Spawn the debugger against `pid`.
    ///
    /// `options` is the opaque pass-through string recorded at install time
    /// (extra command-line arguments, whitespace separated).
    fn launch(&self, pid: u32, flags: HandlerFlags, options: &str) -> HoldfastResult<()>;
}

/// The gdb frontend.
///
/// Spawns `gdb --pid=<pid>` with a canned command that performs the
/// handshake once gdb has control, plus any extra arguments from `options`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GdbFrontend;

impl DebuggerFrontend for GdbFrontend
{
    fn name(&self) -> &'static str
    {
        "gdb"
    }

    fn launch(&self, pid: u32, _flags: HandlerFlags, options: &str) -> HoldfastResult<()>
    {
        let mut command = Command::new("gdb");
        command
            .arg(format!("--pid={pid}"))
            .arg("-q")
            .arg("-ex")
            .arg(format!("set variable {HANDSHAKE_SYMBOL} = 1"));
        for extra in options.split_whitespace() {
            command.arg(extra);
        }

        match command.spawn() {
            Ok(child) => {
                info!(debugger_pid = child.id(), target_pid = pid, "launched gdb");
                Ok(())
            }
            Err(source) => {
                warn!(%source, "could not launch gdb");
                Err(HoldfastError::LaunchFailed {
                    frontend: self.name(),
                    source,
                })
            }
        }
    }
}
