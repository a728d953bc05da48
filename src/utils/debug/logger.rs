/*
 * Buffered Logging System
 *
 * This module implements a logger for the scheduler that keeps the most
 * recent log lines in memory instead of writing them anywhere. The host
 * drains the buffer whenever it wants to show or store them.
 *
 * Design:
 * - Fixed number of fixed-length lines (no heap allocation per record)
 * - Oldest line is dropped when the buffer is full
 * - Lines longer than LINE_LEN are cut at the last character that fits
 * - One short spin lock per record; draining runs the sink unlocked
 */

use core::fmt::Write;
use core::sync::atomic::{AtomicUsize, Ordering};

use heapless::{Deque, String};
use log::{LevelFilter, Metadata, Record, SetLoggerError};
use spin::Mutex;

/// Maximum length of one buffered line
pub const LINE_LEN: usize = 160;

/// Number of lines kept
pub const MAX_LINES: usize = 128;

/// A single formatted log line
pub type LogLine = String<LINE_LEN>;

/// Logger that buffers formatted records in memory
pub struct BufferedLogger {
    lines: Mutex<Deque<LogLine, MAX_LINES>>,

    /// Maximum level recorded, stored as `LevelFilter as usize`
    level: AtomicUsize,

    /// Lines evicted because the buffer was full
    dropped: AtomicUsize,
}

impl BufferedLogger {
    pub const fn new(level: LevelFilter) -> Self {
        Self {
            lines: Mutex::new(Deque::new()),
            level: AtomicUsize::new(level as usize),
            dropped: AtomicUsize::new(0),
        }
    }

    pub fn set_level(&self, level: LevelFilter) {
        self.level.store(level as usize, Ordering::Relaxed);
    }

    /// Number of buffered lines
    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    /// Number of lines lost to overflow so far
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Hand every buffered line to `sink`, oldest first, and empty the buffer
    ///
    /// The buffer is detached before `sink` runs, so the sink may log to this
    /// same logger. Lines it produces are kept for the next drain.
    pub fn drain<F>(&self, mut sink: F)
    where
        F: FnMut(&str),
    {
        let mut lines = core::mem::replace(&mut *self.lines.lock(), Deque::new());
        while let Some(line) = lines.pop_front() {
            sink(&line);
        }
    }

    fn push(&self, line: LogLine) {
        let mut lines = self.lines.lock();
        if lines.is_full() {
            lines.pop_front();
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
        // Cannot fail: a slot was freed above
        let _ = lines.push_back(line);
    }
}

impl log::Log for BufferedLogger {
    /// Checks if the given log level is enabled.
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() as usize <= self.level.load(Ordering::Relaxed)
    }

    /// Formats the record into a line and buffers it.
    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut line = LogLine::new();
        let mut out = Truncating(&mut line);
        let _ = write!(out, "[{}] {}", record.level(), record.args());
        self.push(line);
    }

    /// Nothing to flush; lines stay until drained.
    fn flush(&self) {}
}

/// Writer that keeps as many whole characters as fit and drops the rest
struct Truncating<'a>(&'a mut LogLine);

impl Write for Truncating<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for ch in s.chars() {
            if self.0.push(ch).is_err() {
                break;
            }
        }
        Ok(())
    }
}

/// The logger instance installed by `init`.
static LOGGER: BufferedLogger = BufferedLogger::new(LevelFilter::Info);

/// Installs the buffered logger as the global `log` backend.
///
/// # Arguments
///
/// * `level` - Maximum level to record.
///
/// # Errors
///
/// Fails if another logger was already installed.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    LOGGER.set_level(level);
    log::set_logger(&LOGGER).map(|()| log::set_max_level(level))
}

/// The global buffered logger
pub fn logger() -> &'static BufferedLogger {
    &LOGGER
}
