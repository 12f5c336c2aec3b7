//! Writable, NUL-terminated mapping of a path list file.
//!
//! The lexer tokenizes in place, so the bytes it works on must be writable
//! and must end in a NUL sentinel. The source file is mapped read-only and
//! its contents are moved into an anonymous mapping one byte longer than the
//! file; the extra byte holds the terminator. The file on disk is never
//! written.

use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use memmap2::{Mmap, MmapMut, MmapOptions};

use crate::error::{PathListError, Result};

/// Writable mapping holding the file bytes followed by one NUL byte.
pub struct MappedBuffer {
    /// Source file, kept for error reporting.
    path: PathBuf,

    /// Anonymous mapping of `content_len + 1` bytes.
    map: MmapMut,
}

impl MappedBuffer {
    /// Maps `path` and appends the NUL terminator.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_map = Self::map_file(path).map_err(|source| PathListError::Map {
            path: path.to_path_buf(),
            source,
        })?;
        let content = file_map.as_deref().unwrap_or(&[]);
        let content_len = content.len();

        let mut map = Self::grow(content).map_err(|source| PathListError::Remap {
            path: path.to_path_buf(),
            source,
        })?;
        map[content_len] = b'\0';

        log::debug!("mapped {} ({} bytes)", path.display(), content_len);
        Ok(Self {
            path: path.to_path_buf(),
            map,
        })
    }

    /// Maps the file read-only. Empty files are not mapped at all.
    fn map_file(path: &Path) -> io::Result<Option<Mmap>> {
        let file = File::open(path)?;
        let len = file.metadata()?.len();
        if len == 0 {
            return Ok(None);
        }
        // SAFETY: the mapping is only read while copying into the grown buffer
        // and is dropped before `open` returns.
        let map = unsafe { MmapOptions::new().map(&file)? };
        Ok(Some(map))
    }

    /// Allocates a writable mapping one byte larger than `content` and copies
    /// `content` into it.
    fn grow(content: &[u8]) -> io::Result<MmapMut> {
        let mut map = MmapMut::map_anon(content.len() + 1)?;
        map[..content.len()].copy_from_slice(content);
        Ok(map)
    }

    /// Releases the mapping.
    ///
    /// Dropping the buffer also unmaps it; `close` additionally reports a
    /// failing flush.
    pub fn close(self) -> Result<()> {
        self.map.flush().map_err(|source| PathListError::Unmap {
            path: self.path.clone(),
            source,
        })?;
        log::debug!("unmapped {}", self.path.display());
        Ok(())
    }

    /// Source file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Mapped length, including the NUL terminator.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Always false: the terminator is always present.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Length of the original file contents.
    pub fn content_len(&self) -> usize {
        self.map.len() - 1
    }

    /// File contents without the terminator.
    pub fn content(&self) -> &[u8] {
        &self.map[..self.content_len()]
    }

    /// All mapped bytes, including the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.map
    }

    /// All mapped bytes, including the terminator.
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.map
    }
}

impl fmt::Debug for MappedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MappedBuffer")
            .field("path", &self.path)
            .field("len", &self.map.len())
            .finish()
    }
}
