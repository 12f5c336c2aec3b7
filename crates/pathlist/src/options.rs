//! Parse options and their environment overrides.

use std::fs;
use std::io;
use std::path::Path;

/// Environment variable selecting the symlink policy (`follow` | `nofollow`).
pub const ENV_SYMLINKS: &str = "PATHLIST_SYMLINKS";

/// Environment variable enabling per-line tracing (`1` | `true`).
pub const ENV_TRACE: &str = "PATHLIST_TRACE";

/// How the entry type of a listed path is queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SymlinkPolicy {
    /// Resolve symbolic links and report the target's type. Links themselves
    /// never land in the symlink category under this policy.
    #[default]
    Follow,
    /// Report links as links.
    NoFollow,
}

impl SymlinkPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "follow" => Some(Self::Follow),
            "nofollow" | "no-follow" => Some(Self::NoFollow),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Follow => "follow",
            Self::NoFollow => "nofollow",
        }
    }

    /// Queries the metadata of `path` under this policy.
    pub fn metadata(self, path: &Path) -> io::Result<fs::Metadata> {
        match self {
            Self::Follow => fs::metadata(path),
            Self::NoFollow => fs::symlink_metadata(path),
        }
    }
}

/// Options for parsing a path list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    pub symlinks: SymlinkPolicy,
    /// Forward per-line events to `log::trace!`.
    pub trace: bool,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_symlinks(mut self, symlinks: SymlinkPolicy) -> Self {
        self.symlinks = symlinks;
        self
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Builds options from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Builds options from a variable lookup. Unrecognized values are logged
    /// and ignored.
    pub fn from_vars<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = Self::default();

        if let Some(value) = lookup(ENV_SYMLINKS) {
            match SymlinkPolicy::parse(&value) {
                Some(policy) => options.symlinks = policy,
                None => log::warn!("ignoring {}={:?}", ENV_SYMLINKS, value),
            }
        }

        if let Some(value) = lookup(ENV_TRACE) {
            match parse_flag(&value) {
                Some(flag) => options.trace = flag,
                None => log::warn!("ignoring {}={:?}", ENV_TRACE, value),
            }
        }

        options
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
