//! # Signal-safe Diagnostics
//!
//! A minimal, allocation-free path for writing to standard error. This is
//! the only output facility reachable from signal-delivery context; the
//! general-purpose `tracing` machinery used elsewhere must never be called
//! from there (it allocates and takes locks).
//!
//! Everything here sticks to async-signal-safe primitives: `write(2)` and
//! errno inspection.

use std::io;

use libc::c_int;

/// Write raw bytes to standard error, unbuffered.
///
/// Retries on `EINTR` and short writes; gives up silently on any other
/// error (there is nowhere to report a failing stderr).
pub fn write_raw(bytes: &[u8])
{
    let mut rest = bytes;
    while !rest.is_empty() {
        // Safety: the pointer/length pair comes from a live slice.
        let written = unsafe { libc::write(libc::STDERR_FILENO, rest.as_ptr().cast(), rest.len()) };
        if written > 0 {
            rest = &rest[written as usize..];
        } else if written == -1 && io::Error::last_os_error().raw_os_error() == Some(libc::EINTR) {
            continue;
        } else {
            break;
        }
    }
}

/// Write a one-line diagnostic (a trailing newline is appended).
pub fn write_line(msg: &str)
{
    let mut buf = MsgBuf::new();
    buf.push_str(msg);
    buf.push_str("\n");
    write_raw(buf.as_bytes());
}

/// A fixed-capacity message buffer for building diagnostics without
/// allocating.
///
/// Content past the capacity is silently truncated; a truncated attach
/// message is still better than a heap allocation in a crashing process.
#[derive(Debug)]
pub struct MsgBuf
{
    buf: [u8; MsgBuf::CAPACITY],
    len: usize,
}

impl MsgBuf
{
    /// Fixed capacity in bytes. Large enough for the attach message with the
    /// widest possible pid.
    pub const CAPACITY: usize = 160;

    /// Create an empty buffer.
    pub const fn new() -> Self
    {
        MsgBuf {
            buf: [0; MsgBuf::CAPACITY],
            len: 0,
        }
    }

    /// Append a string, truncating at capacity.
    pub fn push_str(&mut self, s: &str)
    {
        for &b in s.as_bytes() {
            if self.len == MsgBuf::CAPACITY {
                return;
            }
            self.buf[self.len] = b;
            self.len += 1;
        }
    }

    /// Append a non-negative integer in decimal, truncating at capacity.
    pub fn push_unsigned(&mut self, mut value: u64)
    {
        // Render digits into a small scratch array, least significant first.
        let mut digits = [0u8; 20];
        let mut n = 0;
        loop {
            digits[n] = b'0' + (value % 10) as u8;
            value /= 10;
            n += 1;
            if value == 0 {
                break;
            }
        }
        while n > 0 {
            n -= 1;
            if self.len == MsgBuf::CAPACITY {
                return;
            }
            self.buf[self.len] = digits[n];
            self.len += 1;
        }
    }

    /// Append a signal number (signed, but signals are never negative).
    pub fn push_signal(&mut self, signum: c_int)
    {
        self.push_unsigned(signum.max(0) as u64);
    }

    /// The bytes written so far.
    pub fn as_bytes(&self) -> &[u8]
    {
        &self.buf[..self.len]
    }

    /// Write the buffer to standard error.
    pub fn write(&self)
    {
        write_raw(self.as_bytes());
    }
}

impl Default for MsgBuf
{
    fn default() -> Self
    {
        MsgBuf::new()
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn push_str_and_unsigned()
    {
        let mut buf = MsgBuf::new();
        buf.push_str("pid=");
        buf.push_unsigned(40961);
        assert_eq!(buf.as_bytes(), b"pid=40961");
    }

    #[test]
    fn push_unsigned_zero()
    {
        let mut buf = MsgBuf::new();
        buf.push_unsigned(0);
        assert_eq!(buf.as_bytes(), b"0");
    }

    #[test]
    fn truncates_at_capacity()
    {
        let mut buf = MsgBuf::new();
        let long = "x".repeat(MsgBuf::CAPACITY + 50);
        buf.push_str(&long);
        assert_eq!(buf.as_bytes().len(), MsgBuf::CAPACITY);

        // Further pushes are silently dropped, not panics.
        buf.push_unsigned(7);
        assert_eq!(buf.as_bytes().len(), MsgBuf::CAPACITY);
    }

    #[test]
    fn push_signal_clamps_negative()
    {
        let mut buf = MsgBuf::new();
        buf.push_signal(-3);
        assert_eq!(buf.as_bytes(), b"0");
    }
}
