//! Per-line diagnostics.
//!
//! Tracing is opt-in and injected by the caller instead of being compiled in.
//! Every callback has an empty default so sinks only implement what they
//! care about.

use crate::info::EntryKind;

/// Receives per-line events while a path list is lexed and classified.
pub trait TraceSink {
    /// Called once the line slots are known, before splitting.
    fn slots(&mut self, _count: usize) {}

    /// Called for every slot after trimming, including empty ones.
    fn line(&mut self, _index: usize, _path: &[u8]) {}

    /// Called after empty lines were packed away.
    fn lexed(&mut self, _count: usize) {}

    /// Called when a line was stored into a category.
    fn classified(&mut self, _index: usize, _kind: EntryKind, _path: &str) {}

    /// Called when a line resolved to an unsupported entry type.
    fn malformed(&mut self, _index: usize, _line: &[u8]) {}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTrace;

impl TraceSink for NoopTrace {}

/// Forwards every event to `log::trace!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTrace;

impl TraceSink for LogTrace {
    fn slots(&mut self, count: usize) {
        log::trace!("number of lines: {}", count);
    }

    fn line(&mut self, index: usize, path: &[u8]) {
        log::trace!("[{}] path: '{}'", index, String::from_utf8_lossy(path));
    }

    fn lexed(&mut self, count: usize) {
        log::trace!("packed lines: {}", count);
    }

    fn classified(&mut self, index: usize, kind: EntryKind, path: &str) {
        log::trace!("[{}] {}: '{}'", index, kind.as_str(), path);
    }

    fn malformed(&mut self, index: usize, line: &[u8]) {
        log::trace!("[{}] malformed: '{}'", index, String::from_utf8_lossy(line));
    }
}
