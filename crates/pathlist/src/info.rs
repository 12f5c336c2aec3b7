//! Classification results.
//!
//! `PathInfo` is the sparse container the classifier fills by line index;
//! `PathLists` is the dense output handed to callers once it is packed.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pack::pack_sparse;

/// Category a path is sorted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file
    Lib,
    /// Directory
    Dir,
    /// Block or character device
    Dev,
    /// Symbolic link
    Symlink,
}

impl EntryKind {
    pub const ALL: [EntryKind; 4] = [Self::Lib, Self::Dir, Self::Dev, Self::Symlink];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lib => "lib",
            Self::Dir => "dir",
            Self::Dev => "dev",
            Self::Symlink => "symlink",
        }
    }
}

/// Four category arrays, one slot per input line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PathInfo {
    libs: Vec<Option<String>>,
    dirs: Vec<Option<String>>,
    devs: Vec<Option<String>>,
    symlinks: Vec<Option<String>>,
}

impl PathInfo {
    /// Sizes every category to `capacity` empty slots.
    pub fn init(capacity: usize) -> Result<Self> {
        let mut info = Self::default();
        for kind in EntryKind::ALL {
            let slots = info.slots_mut(kind);
            slots.try_reserve_exact(capacity)?;
            slots.resize(capacity, None);
        }
        Ok(info)
    }

    /// Number of slots per category.
    pub fn capacity(&self) -> usize {
        self.libs.len()
    }

    /// Stores `path` at `index` of the `kind` category.
    ///
    /// # Panics
    /// Panics if `index` is not below the capacity given to `init`.
    pub fn insert(&mut self, kind: EntryKind, index: usize, path: String) {
        self.slots_mut(kind)[index] = Some(path);
    }

    /// Removes the unused slots of every category, keeping line order.
    pub fn pack(&mut self, capacity: usize) {
        for kind in EntryKind::ALL {
            pack_sparse(self.slots_mut(kind), capacity);
        }
    }

    /// Paths stored under `kind`, in line order.
    pub fn paths(&self, kind: EntryKind) -> impl Iterator<Item = &str> {
        self.slots(kind).iter().filter_map(|slot| slot.as_deref())
    }

    /// Total number of stored paths across all categories.
    pub fn total(&self) -> usize {
        EntryKind::ALL
            .iter()
            .map(|&kind| self.slots(kind).iter().flatten().count())
            .sum()
    }

    fn slots(&self, kind: EntryKind) -> &Vec<Option<String>> {
        match kind {
            EntryKind::Lib => &self.libs,
            EntryKind::Dir => &self.dirs,
            EntryKind::Dev => &self.devs,
            EntryKind::Symlink => &self.symlinks,
        }
    }

    fn slots_mut(&mut self, kind: EntryKind) -> &mut Vec<Option<String>> {
        match kind {
            EntryKind::Lib => &mut self.libs,
            EntryKind::Dir => &mut self.dirs,
            EntryKind::Dev => &mut self.devs,
            EntryKind::Symlink => &mut self.symlinks,
        }
    }
}

/// Dense per-category path lists.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathLists {
    pub libs: Vec<String>,
    pub dirs: Vec<String>,
    pub devs: Vec<String>,
    pub symlinks: Vec<String>,
}

impl PathLists {
    pub fn get(&self, kind: EntryKind) -> &[String] {
        match kind {
            EntryKind::Lib => &self.libs,
            EntryKind::Dir => &self.dirs,
            EntryKind::Dev => &self.devs,
            EntryKind::Symlink => &self.symlinks,
        }
    }

    pub fn len(&self) -> usize {
        self.libs.len() + self.dirs.len() + self.devs.len() + self.symlinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<PathInfo> for PathLists {
    fn from(info: PathInfo) -> Self {
        fn dense(slots: Vec<Option<String>>) -> Vec<String> {
            slots.into_iter().flatten().collect()
        }

        Self {
            libs: dense(info.libs),
            dirs: dense(info.dirs),
            devs: dense(info.devs),
            symlinks: dense(info.symlinks),
        }
    }
}
