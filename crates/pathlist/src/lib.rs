//! Path list parsing and classification.
//!
//! A path list is a text file with one filesystem path per line. This crate
//! provides:
//! - A writable, NUL-terminated mapping of the list (`mapper`)
//! - A destructive line lexer that trims and drops blank lines (`lexer`)
//! - Classification of each path by entry type into libs, dirs, devs and
//!   symlinks (`classify`, `info`)
//! - Order-preserving compaction shared by all of the above (`pack`)
//!
//! Only the first space-delimited field of a line is kept; there is no
//! quoting, escaping or comment syntax.

pub mod classify;
pub mod context;
pub mod error;
pub mod info;
pub mod lexer;
pub mod mapper;
pub mod options;
pub mod pack;
pub mod trace;

use std::path::Path;

// Re-export main types
pub use context::ParseContext;
pub use error::{PathListError, Result};
pub use info::{EntryKind, PathInfo, PathLists};
pub use lexer::LineView;
pub use mapper::MappedBuffer;
pub use options::{ParseOptions, SymlinkPolicy};
pub use trace::{LogTrace, NoopTrace, TraceSink};

/// Parses and classifies the path list at `path`.
///
/// The mapping is released before returning, whether or not parsing
/// succeeded.
pub fn parse_path_list(path: impl AsRef<Path>, options: ParseOptions) -> Result<PathLists> {
    let mut ctx = ParseContext::init(path.as_ref(), options);
    ctx.open()?;

    let parsed = ctx.lex().and_then(|_| ctx.parse());
    let closed = ctx.close();

    let info = parsed?;
    closed?;
    Ok(PathLists::from(info))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    #[test]
    fn empty_file_yields_empty_lists() {
        let temp = TempDir::new().unwrap();
        let list = temp.path().join("empty.csv");
        File::create(&list).unwrap();

        let lists = parse_path_list(&list, ParseOptions::default()).unwrap();
        assert_eq!(lists, PathLists::default());
    }

    #[cfg(unix)]
    #[test]
    fn classifies_a_mixed_list() {
        let temp = TempDir::new().unwrap();
        let lib = temp.path().join("libnvidia-ml.so.1");
        let dir = temp.path().join("firmware");
        File::create(&lib).unwrap();
        fs::create_dir(&dir).unwrap();

        let list = temp.path().join("drivers.csv");
        fs::write(
            &list,
            format!(
                "{} trailing fields\n\n   {}\n{}\n/dev/null\n/dev/zero",
                lib.display(),
                dir.display(),
                temp.path().join("absent.so").display()
            ),
        )
        .unwrap();

        let lists = parse_path_list(&list, ParseOptions::default()).unwrap();
        assert_eq!(lists.libs, vec![lib.display().to_string()]);
        assert_eq!(lists.dirs, vec![dir.display().to_string()]);
        assert_eq!(lists.devs, vec!["/dev/null"]);
        assert!(lists.symlinks.is_empty());
    }

    #[test]
    fn missing_list_is_an_error() {
        let temp = TempDir::new().unwrap();
        let err = parse_path_list(temp.path().join("missing.csv"), ParseOptions::default())
            .unwrap_err();
        assert!(matches!(err, PathListError::Map { .. }));
        assert!(err.to_string().contains("missing.csv"));
    }
}
