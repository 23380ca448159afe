//! Global log ring for the formatting core
//!
//! Fixed-size, no heap. Entries are formatted straight into their slot,
//! so a log call never needs an allocation (the pool is reserved for
//! `Print` itself). Oldest entries are overwritten when the ring is full.
//!
//! The bootloader dumps the ring to ConOut when a print fails; the host
//! harness prints it with `--verbose`.

use core::fmt::{self, Write};
use core::sync::atomic::{AtomicU8, Ordering};

use spin::Mutex;

/// Maximum message length in bytes
pub const LOG_MSG_LEN: usize = 96;

/// Number of entries in the ring
pub const LOG_RING_SIZE: usize = 32;

/// Severity of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl LogLevel {
    /// Get short level name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }

    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Trace,
            1 => Self::Debug,
            2 => Self::Info,
            3 => Self::Warn,
            _ => Self::Error,
        }
    }
}

/// Single entry in the ring
#[derive(Clone, Copy)]
pub struct LogEntry {
    msg: [u8; LOG_MSG_LEN],
    len: u8,
    pub level: LogLevel,
}

impl LogEntry {
    const fn empty() -> Self {
        Self {
            msg: [0u8; LOG_MSG_LEN],
            len: 0,
            level: LogLevel::Info,
        }
    }

    /// Get message as string slice (truncated messages end on a char boundary)
    pub fn message(&self) -> &str {
        let slice = &self.msg[..self.len as usize];
        match core::str::from_utf8(slice) {
            Ok(s) => s,
            Err(e) => core::str::from_utf8(&slice[..e.valid_up_to()]).unwrap_or_default(),
        }
    }

    /// Format entry for display: "[LEVEL] message". Returns bytes written.
    pub fn format(&self, buf: &mut [u8]) -> usize {
        let mut pos = 0;
        for part in ["[", self.level.name(), "] ", self.message()] {
            for &b in part.as_bytes() {
                if pos >= buf.len() {
                    return pos;
                }
                buf[pos] = b;
                pos += 1;
            }
        }
        pos
    }
}

impl Write for LogEntry {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let start = self.len as usize;
        let room = LOG_MSG_LEN - start;
        let take = s.len().min(room);
        self.msg[start..start + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len = (start + take) as u8;
        // Silently truncate
        Ok(())
    }
}

/// Ring storage. Public so callers can keep a private ring if needed.
pub struct LogRing {
    entries: [LogEntry; LOG_RING_SIZE],
    head: usize,
    count: usize,
}

impl LogRing {
    pub const fn new() -> Self {
        Self {
            entries: [LogEntry::empty(); LOG_RING_SIZE],
            head: 0,
            count: 0,
        }
    }

    /// Append an entry, overwriting the oldest when full.
    pub fn push(&mut self, level: LogLevel, args: fmt::Arguments<'_>) {
        let slot = (self.head + self.count) % LOG_RING_SIZE;
        let entry = &mut self.entries[slot];
        *entry = LogEntry::empty();
        entry.level = level;
        let _ = entry.write_fmt(args);

        if self.count < LOG_RING_SIZE {
            self.count += 1;
        } else {
            self.head = (self.head + 1) % LOG_RING_SIZE;
        }
    }

    /// Hand every entry, oldest first, to `f` and empty the ring.
    pub fn drain<F: FnMut(&LogEntry)>(&mut self, mut f: F) {
        for i in 0..self.count {
            f(&self.entries[(self.head + i) % LOG_RING_SIZE]);
        }
        self.head = 0;
        self.count = 0;
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

static RING: Mutex<LogRing> = Mutex::new(LogRing::new());
static MIN_LEVEL: AtomicU8 = AtomicU8::new(LogLevel::Info as u8);

/// Set the minimum level that reaches the ring.
pub fn set_level(level: LogLevel) {
    MIN_LEVEL.store(level as u8, Ordering::Relaxed);
}

pub fn level() -> LogLevel {
    LogLevel::from_u8(MIN_LEVEL.load(Ordering::Relaxed))
}

#[inline]
pub fn enabled(level: LogLevel) -> bool {
    level as u8 >= MIN_LEVEL.load(Ordering::Relaxed)
}

/// Record a message in the global ring.
pub fn log(level: LogLevel, args: fmt::Arguments<'_>) {
    if enabled(level) {
        RING.lock().push(level, args);
    }
}

/// Drain the global ring oldest-first.
pub fn drain<F: FnMut(&LogEntry)>(f: F) {
    RING.lock().drain(f);
}

#[macro_export]
macro_rules! log_trace {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::LogLevel::Trace, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::LogLevel::Debug, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::LogLevel::Info, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::LogLevel::Warn, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::LogLevel::Error, format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_keeps_order() {
        let mut ring = LogRing::new();
        ring.push(LogLevel::Info, format_args!("first {}", 1));
        ring.push(LogLevel::Warn, format_args!("second"));

        let mut idx = 0;
        ring.drain(|entry| {
            if idx == 0 {
                assert_eq!(entry.message(), "first 1");
                assert_eq!(entry.level, LogLevel::Info);
            } else {
                assert_eq!(entry.message(), "second");
                assert_eq!(entry.level, LogLevel::Warn);
            }
            idx += 1;
        });
        assert_eq!(idx, 2);
        assert!(ring.is_empty());
    }

    #[test]
    fn test_ring_overwrites_oldest() {
        let mut ring = LogRing::new();
        for i in 0..LOG_RING_SIZE + 3 {
            ring.push(LogLevel::Debug, format_args!("{}", i));
        }
        assert_eq!(ring.len(), LOG_RING_SIZE);

        let mut drained = 0;
        ring.drain(|entry| {
            if drained == 0 {
                assert_eq!(entry.message(), "3");
            }
            drained += 1;
        });
        assert_eq!(drained, LOG_RING_SIZE);
    }

    #[test]
    fn test_long_message_truncated() {
        let mut ring = LogRing::new();
        let long = [b'x'; LOG_MSG_LEN * 2];
        let long = core::str::from_utf8(&long).unwrap();
        ring.push(LogLevel::Error, format_args!("{}", long));
        ring.drain(|entry| assert_eq!(entry.message().len(), LOG_MSG_LEN));
    }

    #[test]
    fn test_entry_format() {
        let mut ring = LogRing::new();
        ring.push(LogLevel::Warn, format_args!("pool low"));
        let mut buf = [0u8; 64];
        let mut written = 0;
        ring.drain(|entry| written = entry.format(&mut buf));
        assert_eq!(&buf[..written], b"[WARN] pool low");
    }

    #[test]
    fn test_level_ordering() {
        assert!(LogLevel::Error > LogLevel::Warn);
        assert!(LogLevel::Trace < LogLevel::Debug);
        assert_eq!(LogLevel::from_u8(3), LogLevel::Warn);
    }
}
