//! Deliberately crash with the handlers installed.
//!
//! Run with `cargo run --example crashy`, then attach from another terminal
//! with the printed `gdb --pid=...` command. `HOLDFAST_ALTSTACK=1` exercises
//! the alternate-stack delivery path.

use holdfast::HandlerFlags;
use holdfast_utils::{init_logging, init_logging_with_level, LogFormat, LogLevel, LoggingError};

fn main()
{
    let _ = setup_logging();

    let mut flags = HandlerFlags::empty();
    if std::env::var_os("HOLDFAST_ALTSTACK").is_some() {
        flags |= HandlerFlags::ALT_STACK;
    }
    holdfast::install_sighandlers(flags, "").expect("handler installation");

    println!("pid {}: dereferencing null now", std::process::id());

    // The store faults, the crash handler freezes the process, and the
    // attach command appears on stderr.
    unsafe {
        std::ptr::write_volatile(std::ptr::null_mut::<u32>(), 0xdead);
    }

    println!("unreachable: the crash handler should have stopped us");
}

fn setup_logging() -> Result<(), LoggingError>
{
    if std::env::var_os("HOLDFAST_LOG").is_some() {
        init_logging()
    } else {
        init_logging_with_level(LogLevel::Debug, LogFormat::Pretty)
    }
}
