// Global logging system for RamDisk
//
// Records live in a fixed ring in memory; the oldest record is overwritten
// once the ring is full. Nothing here allocates on the logging path.

use core::fmt::{self, Write};
use core::sync::atomic::{AtomicU8, Ordering};

use alloc::vec::Vec;
use spin::Mutex;

const MAX_LOG_ENTRIES: usize = 64;
const MAX_MESSAGE_LEN: usize = 120;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl Level {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }

    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Error,
            1 => Self::Warn,
            2 => Self::Info,
            _ => Self::Debug,
        }
    }
}

/// One formatted log line, truncated to `MAX_MESSAGE_LEN` bytes.
#[derive(Copy, Clone)]
pub struct LogRecord {
    level: Level,
    len: usize,
    buf: [u8; MAX_MESSAGE_LEN],
}

impl LogRecord {
    const EMPTY: Self = Self {
        level: Level::Debug,
        len: 0,
        buf: [0; MAX_MESSAGE_LEN],
    };

    pub fn format(level: Level, args: fmt::Arguments<'_>) -> Self {
        let mut record = Self {
            level,
            ..Self::EMPTY
        };
        // Truncation is reported as an error by write_str; the prefix is kept.
        let _ = record.write_fmt(args);
        record
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &str {
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or("")
    }
}

impl Write for LogRecord {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.chars() {
            let width = ch.len_utf8();
            if self.len + width > MAX_MESSAGE_LEN {
                return Err(fmt::Error);
            }
            ch.encode_utf8(&mut self.buf[self.len..self.len + width]);
            self.len += width;
        }
        Ok(())
    }
}

impl fmt::Debug for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level.as_str(), self.message())
    }
}

/// Fixed-capacity ring of log records.
pub struct LogRing {
    records: [LogRecord; MAX_LOG_ENTRIES],
    next: usize,
    total: usize,
}

impl LogRing {
    pub const fn new() -> Self {
        Self {
            records: [LogRecord::EMPTY; MAX_LOG_ENTRIES],
            next: 0,
            total: 0,
        }
    }

    pub fn push(&mut self, record: LogRecord) {
        self.records[self.next] = record;
        self.next = (self.next + 1) % MAX_LOG_ENTRIES;
        self.total += 1;
    }

    /// Records currently held, oldest first.
    pub fn len(&self) -> usize {
        self.total.min(MAX_LOG_ENTRIES)
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Records ever pushed, including overwritten ones.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogRecord> {
        let start = if self.total > MAX_LOG_ENTRIES { self.next } else { 0 };
        (0..self.len()).map(move |i| &self.records[(start + i) % MAX_LOG_ENTRIES])
    }

    pub fn clear(&mut self) {
        self.next = 0;
        self.total = 0;
    }
}

static LOG: Mutex<LogRing> = Mutex::new(LogRing::new());
static MAX_LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);

pub fn set_max_level(level: Level) {
    MAX_LEVEL.store(level as u8, Ordering::SeqCst);
}

pub fn max_level() -> Level {
    Level::from_u8(MAX_LEVEL.load(Ordering::SeqCst))
}

pub fn enabled(level: Level) -> bool {
    level <= max_level()
}

pub fn log(level: Level, args: fmt::Arguments<'_>) {
    if !enabled(level) {
        return;
    }
    let record = LogRecord::format(level, args);
    LOG.lock().push(record);
}

pub fn get_logs() -> Vec<LogRecord> {
    LOG.lock().iter().copied().collect()
}

pub fn log_count() -> usize {
    LOG.lock().len()
}

pub fn clear() {
    LOG.lock().clear();
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::Level::Error, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::Level::Warn, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::Level::Info, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::logger::log($crate::logger::Level::Debug, format_args!($($arg)*))
    };
}
