//! Filesystem probing.
//!
//! A probe takes an ordered list of candidate paths and reports the first
//! one that exists in an acceptable form. The server's resolution
//! strategies never touch the filesystem directly; they go through a
//! [`Probe`] so tests can observe and fake the lookups.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

/// Which entry types satisfy a probe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProbeKind {
    /// Regular files only (directories may still match through an index).
    #[default]
    File,
    /// Files or directories.
    Any,
}

/// Options for a probe.
#[derive(Clone, Debug, Default)]
pub struct ProbeOptions {
    /// File looked up inside a matching directory.
    pub index: Option<String>,
    /// Extension appended to each candidate and tried first (e.g. `".md"`).
    pub ext: Option<String>,
    /// Accepted entry types.
    pub kind: ProbeKind,
}

/// Type of a matched entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Dir,
}

/// A matched filesystem entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Found {
    /// Path of the matched entry (the index file when one was used).
    pub path: PathBuf,
    /// Entry type.
    pub kind: EntryKind,
}

impl Found {
    /// Check whether the match is a regular file.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }
}

/// Filesystem existence and type checks.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Return the first candidate satisfying `options`, or `None`.
    ///
    /// For each candidate, in order:
    /// 1. with `ext`, `<candidate><ext>` matches if it is a file
    /// 2. the candidate matches if it is a file
    /// 3. a directory matches through `<dir>/<index>` if that is a file
    /// 4. otherwise a directory matches only with [`ProbeKind::Any`]
    async fn probe(&self, candidates: &[PathBuf], options: &ProbeOptions) -> Option<Found>;
}

/// [`Probe`] backed by `tokio::fs`.
#[derive(Clone, Copy, Debug, Default)]
pub struct FsProbe;

#[async_trait]
impl Probe for FsProbe {
    async fn probe(&self, candidates: &[PathBuf], options: &ProbeOptions) -> Option<Found> {
        for candidate in candidates {
            if let Some(found) = probe_one(candidate, options).await {
                tracing::trace!(path = %found.path.display(), kind = ?found.kind, "Probe matched");
                return Some(found);
            }
        }
        None
    }
}

async fn probe_one(candidate: &Path, options: &ProbeOptions) -> Option<Found> {
    if let Some(ext) = &options.ext {
        let with_ext = append_ext(candidate, ext);
        if is_file(&with_ext).await {
            return Some(Found {
                path: with_ext,
                kind: EntryKind::File,
            });
        }
    }

    let metadata = tokio::fs::metadata(candidate).await.ok()?;
    if metadata.is_file() {
        return Some(Found {
            path: candidate.to_path_buf(),
            kind: EntryKind::File,
        });
    }
    if !metadata.is_dir() {
        return None;
    }

    if let Some(index) = &options.index {
        let index_path = candidate.join(index);
        if is_file(&index_path).await {
            return Some(Found {
                path: index_path,
                kind: EntryKind::File,
            });
        }
    }

    (options.kind == ProbeKind::Any).then(|| Found {
        path: candidate.to_path_buf(),
        kind: EntryKind::Dir,
    })
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|m| m.is_file())
}

fn append_ext(path: &Path, ext: &str) -> PathBuf {
    let mut raw = OsString::from(path.as_os_str());
    raw.push(ext);
    PathBuf::from(raw)
}
