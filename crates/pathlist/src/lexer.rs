//! Destructive line lexer over a NUL-terminated buffer.
//!
//! Each `'\n'` is overwritten with NUL and every line is trimmed in place:
//! leading spaces are skipped and the line is cut at the first following
//! space, which is also overwritten with NUL. Only the space byte counts;
//! tabs and carriage returns are part of the path. An embedded NUL ends the
//! line early.
//!
//! Only `'\n'`-terminated lines are lexed; trailing bytes after the last
//! newline are ignored.
//!
//! Lines are kept as index ranges into the buffer, so they stay valid for as
//! long as the caller holds on to that buffer. Empty lines are packed away
//! before `lex` returns.

use std::ops::Range;

use memchr::{memchr, memchr2, memchr_iter};

use crate::error::Result;
use crate::mapper::MappedBuffer;
use crate::pack::pack;
use crate::trace::TraceSink;

/// A trimmed line, as a range into the buffer it was lexed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineView {
    start: usize,
    len: usize,
}

impl LineView {
    /// Offset of the first byte of the trimmed line.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Length of the trimmed line.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Range covered by the line.
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }

    /// Resolves the view against the buffer it was lexed from.
    pub fn bytes<'a>(&self, buffer: &'a [u8]) -> &'a [u8] {
        &buffer[self.range()]
    }

    /// Resolves the view as UTF-8, if it is valid.
    pub fn to_str<'a>(&self, buffer: &'a [u8]) -> Option<&'a str> {
        std::str::from_utf8(self.bytes(buffer)).ok()
    }
}

/// Number of line slots in `content`: one per `'\n'`.
///
/// Bytes after the last `'\n'` do not form a line.
pub fn count_line_slots(content: &[u8]) -> usize {
    memchr_iter(b'\n', content).count()
}

/// Trims a single line: skips leading spaces, then cuts at the first space
/// or NUL. Returns the range of the surviving bytes within `line`.
pub fn trim(line: &[u8]) -> Range<usize> {
    let start = line
        .iter()
        .position(|&b| b != b' ')
        .unwrap_or(line.len());
    let end = memchr2(b' ', b'\0', &line[start..]).map_or(line.len(), |offset| start + offset);
    start..end
}

/// Lexes the mapped buffer into trimmed, non-empty lines.
pub fn lex(buffer: &mut MappedBuffer, trace: &mut dyn TraceSink) -> Result<Vec<LineView>> {
    lex_bytes(buffer.as_mut_bytes(), trace)
}

/// Lexes `bytes`, whose last byte must be the NUL terminator.
pub fn lex_bytes(bytes: &mut [u8], trace: &mut dyn TraceSink) -> Result<Vec<LineView>> {
    debug_assert_eq!(bytes.last(), Some(&b'\0'), "buffer must be NUL-terminated");
    let content_len = bytes.len().saturating_sub(1);
    let slots = count_line_slots(&bytes[..content_len]);
    trace.slots(slots);

    let mut lines = Vec::new();
    lines.try_reserve_exact(slots)?;

    let mut ptr = 0;
    for index in 0..slots {
        let end = memchr(b'\n', &bytes[ptr..content_len]).map_or(content_len, |offset| ptr + offset);
        bytes[end] = b'\0';

        let span = trim(&bytes[ptr..end]);
        let cut = ptr + span.end;
        if cut < end {
            bytes[cut] = b'\0';
        }

        let line = LineView {
            start: ptr + span.start,
            len: span.len(),
        };
        trace.line(index, line.bytes(bytes));
        lines.push(line);
        ptr = end + 1;
    }

    let count = pack(&mut lines, slots, |line| !line.is_empty());
    trace.lexed(count);
    Ok(lines)
}
