//! Parse lifecycle for a single path list file.
//!
//! A context is created with [`ParseContext::init`] before any I/O, then
//! driven through `open`, `lex` and `parse`, and finally `close`d. The
//! mapping is also released when the context is dropped, so early returns
//! through `?` never leak it.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::classify::classify;
use crate::error::{PathListError, Result};
use crate::info::PathInfo;
use crate::lexer::{lex, LineView};
use crate::mapper::MappedBuffer;
use crate::options::ParseOptions;
use crate::trace::{LogTrace, NoopTrace, TraceSink};

pub struct ParseContext {
    path: PathBuf,
    options: ParseOptions,
    buffer: Option<MappedBuffer>,
    lines: Vec<LineView>,
    /// Set once the mapping has been tokenized.
    lexed: bool,
    trace: Box<dyn TraceSink>,
}

impl ParseContext {
    /// Creates a context for `path`. Nothing is opened yet.
    pub fn init(path: impl Into<PathBuf>, options: ParseOptions) -> Self {
        let trace: Box<dyn TraceSink> = if options.trace {
            Box::new(LogTrace)
        } else {
            Box::new(NoopTrace)
        };
        Self {
            path: path.into(),
            options,
            buffer: None,
            lines: Vec::new(),
            lexed: false,
            trace,
        }
    }

    /// Replaces the trace sink chosen from the options.
    pub fn with_trace(mut self, trace: Box<dyn TraceSink>) -> Self {
        self.trace = trace;
        self
    }

    /// Maps the file. Reopening releases the previous mapping first.
    pub fn open(&mut self) -> Result<()> {
        if self.buffer.is_some() {
            self.close()?;
        }
        self.buffer = Some(MappedBuffer::open(&self.path)?);
        Ok(())
    }

    /// Splits the mapped file into trimmed, non-empty lines. Returns the
    /// number of lines.
    ///
    /// Lexing rewrites the mapping, so a second `lex` fails with
    /// `AlreadyLexed` until the file is opened again.
    pub fn lex(&mut self) -> Result<usize> {
        let buffer = self
            .buffer
            .as_mut()
            .ok_or_else(|| PathListError::NotOpen(self.path.clone()))?;
        if self.lexed {
            return Err(PathListError::AlreadyLexed(self.path.clone()));
        }
        self.lines = lex(buffer, &mut *self.trace)?;
        self.lexed = true;
        log::debug!("lexed {} lines from {}", self.lines.len(), self.path.display());
        Ok(self.lines.len())
    }

    /// Classifies the lexed lines into a packed [`PathInfo`].
    pub fn parse(&mut self) -> Result<PathInfo> {
        let buffer = self
            .buffer
            .as_ref()
            .ok_or_else(|| PathListError::NotOpen(self.path.clone()))?;

        let mut info = PathInfo::init(self.lines.len())?;
        classify(
            buffer.as_bytes(),
            &self.lines,
            &mut info,
            &self.options,
            &mut *self.trace,
        )?;
        log::debug!(
            "classified {} of {} lines from {}",
            info.total(),
            self.lines.len(),
            self.path.display()
        );
        Ok(info)
    }

    /// Releases the mapping. The lexed lines are dropped with it.
    pub fn close(&mut self) -> Result<()> {
        self.lines.clear();
        self.lexed = false;
        match self.buffer.take() {
            Some(buffer) => buffer.close(),
            None => Ok(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.buffer.is_some()
    }

    /// Number of lexed lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Lexed lines, resolved against the mapping.
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> + '_ {
        let bytes = self.buffer.as_ref().map_or(&[][..], |buffer| buffer.as_bytes());
        self.lines.iter().map(move |line| line.bytes(bytes))
    }
}

impl fmt::Debug for ParseContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseContext")
            .field("path", &self.path)
            .field("options", &self.options)
            .field("buffer", &self.buffer)
            .field("lines", &self.lines.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::info::EntryKind;
    use crate::trace::tests::RecordingTrace;
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;
    use tempfile::TempDir;

    /// Lets a test keep reading a sink after the context took ownership.
    struct SharedTrace(Rc<RefCell<RecordingTrace>>);

    impl TraceSink for SharedTrace {
        fn slots(&mut self, count: usize) {
            self.0.borrow_mut().slots(count);
        }

        fn line(&mut self, index: usize, path: &[u8]) {
            self.0.borrow_mut().line(index, path);
        }

        fn lexed(&mut self, count: usize) {
            self.0.borrow_mut().lexed(count);
        }

        fn classified(&mut self, index: usize, kind: EntryKind, path: &str) {
            self.0.borrow_mut().classified(index, kind, path);
        }

        fn malformed(&mut self, index: usize, line: &[u8]) {
            self.0.borrow_mut().malformed(index, line);
        }
    }

    fn write_list(temp: &TempDir, contents: &str) -> PathBuf {
        let path = temp.path().join("paths.csv");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn lex_before_open_fails() {
        let temp = TempDir::new().unwrap();
        let mut ctx = ParseContext::init(write_list(&temp, "/a\n"), ParseOptions::default());

        assert!(matches!(ctx.lex(), Err(PathListError::NotOpen(_))));
        assert!(matches!(ctx.parse(), Err(PathListError::NotOpen(_))));
    }

    #[test]
    fn full_lifecycle() {
        let temp = TempDir::new().unwrap();
        let lib = temp.path().join("libcuda.so");
        fs::write(&lib, b"").unwrap();
        let path = write_list(
            &temp,
            &format!("  {}  \n\n{}\n", lib.display(), temp.path().display()),
        );

        let mut ctx = ParseContext::init(&path, ParseOptions::default());
        ctx.open().unwrap();
        assert_eq!(ctx.lex().unwrap(), 2);

        let lines: Vec<_> = ctx.lines().map(<[u8]>::to_vec).collect();
        assert_eq!(lines[0], lib.display().to_string().into_bytes());

        let info = ctx.parse().unwrap();
        assert_eq!(info.total(), 2);
        ctx.close().unwrap();
        assert!(!ctx.is_open());
        assert_eq!(ctx.line_count(), 0);
    }

    #[test]
    fn source_file_is_untouched() {
        let temp = TempDir::new().unwrap();
        let contents = " /a b \n\n/c\n";
        let path = write_list(&temp, contents);

        let mut ctx = ParseContext::init(&path, ParseOptions::default());
        ctx.open().unwrap();
        ctx.lex().unwrap();
        ctx.close().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), contents);
    }

    #[test]
    fn drop_without_close_is_safe() {
        let temp = TempDir::new().unwrap();
        let path = write_list(&temp, "/a\n");

        let mut ctx = ParseContext::init(&path, ParseOptions::default().with_trace(true));
        ctx.open().unwrap();
        ctx.lex().unwrap();
        drop(ctx);
    }

    #[test]
    fn close_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let mut ctx = ParseContext::init(write_list(&temp, ""), ParseOptions::default());
        ctx.close().unwrap();
        ctx.open().unwrap();
        ctx.open().unwrap();
        ctx.close().unwrap();
        ctx.close().unwrap();
    }

    #[test]
    fn second_lex_needs_reopen() {
        let temp = TempDir::new().unwrap();
        let path = write_list(&temp, "/a\n/b\n/c\n");

        let mut ctx = ParseContext::init(&path, ParseOptions::default());
        ctx.open().unwrap();
        assert_eq!(ctx.lex().unwrap(), 3);
        assert!(matches!(ctx.lex(), Err(PathListError::AlreadyLexed(_))));
        assert_eq!(ctx.line_count(), 3);

        ctx.open().unwrap();
        assert_eq!(ctx.lex().unwrap(), 3);
    }

    #[test]
    fn injected_trace_sees_every_line() {
        let temp = TempDir::new().unwrap();
        let lib = temp.path().join("libcuda.so");
        fs::write(&lib, b"").unwrap();
        let missing = temp.path().join("missing.so");
        let path = write_list(
            &temp,
            &format!("{}\n\n{}\n", lib.display(), missing.display()),
        );

        let recorded = Rc::new(RefCell::new(RecordingTrace::default()));
        let mut ctx = ParseContext::init(&path, ParseOptions::default())
            .with_trace(Box::new(SharedTrace(Rc::clone(&recorded))));
        ctx.open().unwrap();
        ctx.lex().unwrap();
        ctx.parse().unwrap();
        ctx.close().unwrap();

        let recorded = recorded.borrow();
        assert_eq!(recorded.slots, Some(3));
        assert_eq!(recorded.lexed, Some(2));
        assert_eq!(
            recorded.lines,
            vec![
                (0, lib.display().to_string().into_bytes()),
                (1, Vec::new()),
                (2, missing.display().to_string().into_bytes()),
            ]
        );
        assert_eq!(
            recorded.classified,
            vec![(0, EntryKind::Lib, lib.display().to_string())]
        );
        assert!(recorded.malformed.is_empty());
    }

    #[test]
    fn open_missing_file_fails() {
        let temp = TempDir::new().unwrap();
        let mut ctx = ParseContext::init(temp.path().join("nope"), ParseOptions::default());
        assert!(matches!(ctx.open(), Err(PathListError::Map { .. })));
        assert!(!ctx.is_open());
    }
}
