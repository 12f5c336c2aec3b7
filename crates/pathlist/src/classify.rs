//! Sorts lexed paths into categories by filesystem entry type.
//!
//! Paths that cannot be queried are skipped without a diagnostic. Paths
//! whose type has no category (sockets, FIFOs) are logged as malformed and
//! skipped. Every stored path lands at its line index; the categories are
//! packed once all lines were seen.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::info::{EntryKind, PathInfo};
use crate::lexer::LineView;
use crate::options::ParseOptions;
use crate::trace::TraceSink;

/// Maps a filesystem entry type to its category, if it has one.
pub fn entry_kind(file_type: fs::FileType) -> Option<EntryKind> {
    if file_type.is_file() {
        Some(EntryKind::Lib)
    } else if file_type.is_dir() {
        Some(EntryKind::Dir)
    } else if is_device(file_type) {
        Some(EntryKind::Dev)
    } else if file_type.is_symlink() {
        Some(EntryKind::Symlink)
    } else {
        None
    }
}

#[cfg(unix)]
fn is_device(file_type: fs::FileType) -> bool {
    use std::os::unix::fs::FileTypeExt;
    file_type.is_block_device() || file_type.is_char_device()
}

#[cfg(not(unix))]
fn is_device(_file_type: fs::FileType) -> bool {
    false
}

#[cfg(unix)]
fn line_path(line: &[u8]) -> Option<&Path> {
    use std::os::unix::ffi::OsStrExt;
    Some(Path::new(std::ffi::OsStr::from_bytes(line)))
}

#[cfg(not(unix))]
fn line_path(line: &[u8]) -> Option<&Path> {
    std::str::from_utf8(line).ok().map(Path::new)
}

/// Classifies every line into `info`, then packs it.
///
/// `info` must have been initialised with a capacity of `lines.len()`.
pub fn classify(
    buffer: &[u8],
    lines: &[LineView],
    info: &mut PathInfo,
    options: &ParseOptions,
    trace: &mut dyn TraceSink,
) -> Result<()> {
    debug_assert!(info.capacity() >= lines.len());

    for (index, line) in lines.iter().enumerate() {
        let bytes = line.bytes(buffer);
        let Some(path) = line_path(bytes) else {
            continue;
        };
        let Ok(metadata) = options.symlinks.metadata(path) else {
            continue;
        };

        let kind = entry_kind(metadata.file_type());
        let (Some(kind), Ok(path)) = (kind, std::str::from_utf8(bytes)) else {
            log::warn!("malformed line: {}", String::from_utf8_lossy(bytes));
            trace.malformed(index, bytes);
            continue;
        };

        info.insert(kind, index, owned(path)?);
        trace.classified(index, kind, path);
    }

    info.pack(lines.len());
    Ok(())
}

fn owned(path: &str) -> Result<String> {
    let mut copy = String::new();
    copy.try_reserve_exact(path.len())?;
    copy.push_str(path);
    Ok(copy)
}
