use std::collections::BTreeMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::vfs::{FileSystem, OsFs};

/// How a discovered repository stores itself on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepoKind {
    /// Metadata only, detected by a top-level `HEAD` file.
    Bare,
    /// Checked-out files plus `.git` metadata, detected by `.git/HEAD`.
    WorkTree,
}

/// One discovered repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRecord {
    /// Display name: the directory name, or `parent/dirname` for
    /// repositories found below an intermediate container directory.
    pub name: String,
    /// Absolute path to the repository root.
    pub path: PathBuf,
    /// `path` relative to the originating scan root, separators trimmed.
    /// The unique key in the flat index.
    pub trimmed_path: String,
    /// Contents of the repository's description file, if present.
    pub description: Option<String>,
    pub kind: RepoKind,
}

impl fmt::Display for RepoRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.path.display())
    }
}

/// What to scan and what to suppress. Read-only for the scanner's lifetime.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanConfig {
    /// Absolute directories to search, in order.
    pub roots: Vec<PathBuf>,
    /// Absolute paths excluded from discovery (exact match).
    pub hidden: Vec<PathBuf>,
    /// Optional allow-list of display names for the flat index. `Some` with
    /// an empty list is a valid "show nothing" configuration.
    pub projects: Option<Vec<String>>,
}

#[derive(Debug)]
pub enum ScanEvent {
    Discovered(RepoRecord),
    Completed,
    Failed(String),
}

/// Walks the configured roots and produces the flat index; the hierarchical
/// view lives in [`crate::tree`]. Every call re-reads the filesystem, there
/// is no cache.
pub struct Scanner<F: FileSystem = OsFs> {
    config: ScanConfig,
    fs: F,
}

impl Scanner<OsFs> {
    pub fn new(config: ScanConfig) -> Self {
        Self::with_fs(config, OsFs)
    }
}

impl<F: FileSystem> Scanner<F> {
    pub fn with_fs(config: ScanConfig, fs: F) -> Self {
        Self { config, fs }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub(crate) fn fs(&self) -> &F {
        &self.fs
    }

    /// Flat index over all roots: `(trimmed_path, record)` pairs, later root
    /// winning on key collisions, sorted descending case-insensitively.
    ///
    /// A root that yields no repositories at all fails the whole call with
    /// [`Error::NoRepositories`].
    pub fn repositories(&self) -> Result<Vec<(String, RepoRecord)>> {
        let mut merged: BTreeMap<String, RepoRecord> = BTreeMap::new();

        for root in &self.config.roots {
            let found = self.walk(root, root, true).map_err(|source| Error::RootUnreadable {
                path: root.clone(),
                source,
            })?;

            if found.is_empty() {
                return Err(Error::NoRepositories { path: root.clone() });
            }

            for record in found {
                merged.insert(record.trimmed_path.clone(), record);
            }
        }

        let mut index: Vec<(String, RepoRecord)> = merged.into_iter().collect();
        sort_descending(&mut index);
        Ok(index)
    }

    /// Runs a full flat scan, then streams the results over `sender`. Events
    /// are only emitted after the walk completes, so receivers never observe
    /// a partial index.
    pub fn scan_background(&self, sender: Sender<ScanEvent>) -> Result<()> {
        let index = match self.repositories() {
            Ok(index) => index,
            Err(err) => {
                let _ = sender.send(ScanEvent::Failed(err.to_string()));
                return Err(err);
            }
        };

        for (_, record) in index {
            if sender.send(ScanEvent::Discovered(record)).is_err() {
                // Receiver dropped, stop sending
                return Ok(());
            }
        }

        let _ = sender.send(ScanEvent::Completed);
        Ok(())
    }

    fn walk(&self, dir: &Path, root: &Path, top_level: bool) -> io::Result<Vec<RepoRecord>> {
        let mut found = Vec::new();

        for entry in self.fs.read_dir(dir)? {
            let Some(file_name) = entry_name(&entry) else {
                continue;
            };
            if file_name.starts_with('.') {
                continue;
            }
            if !self.fs.is_dir(&entry) {
                continue;
            }

            let Some(kind) = self.classify(&entry) else {
                // Plain container directory, keep descending
                match self.walk(&entry, root, false) {
                    Ok(nested) => found.extend(nested),
                    Err(err) => {
                        debug!(path = %entry.display(), error = %err, "skipping unreadable directory");
                    }
                }
                continue;
            };

            // A repository is a leaf, never recursed into
            if self.is_hidden(&entry) {
                continue;
            }

            let name = if top_level {
                file_name
            } else {
                flat_name(&entry, &file_name)
            };

            if let Some(projects) = &self.config.projects {
                if !projects.iter().any(|p| p == &name) {
                    continue;
                }
            }

            found.push(RepoRecord {
                name,
                trimmed_path: trimmed_path(&entry, root),
                description: self.description(&entry, kind),
                path: entry,
                kind,
            });
        }

        Ok(found)
    }

    /// Repository detection: `<dir>/HEAD` means bare, `<dir>/.git/HEAD`
    /// means working copy. A directory with both counts as bare.
    pub(crate) fn classify(&self, dir: &Path) -> Option<RepoKind> {
        if self.fs.exists(&dir.join("HEAD")) {
            Some(RepoKind::Bare)
        } else if self.fs.exists(&dir.join(".git").join("HEAD")) {
            Some(RepoKind::WorkTree)
        } else {
            None
        }
    }

    pub(crate) fn is_hidden(&self, path: &Path) -> bool {
        self.config.hidden.iter().any(|hidden| hidden == path)
    }

    pub(crate) fn description(&self, dir: &Path, kind: RepoKind) -> Option<String> {
        let file = match kind {
            RepoKind::Bare => dir.join("description"),
            RepoKind::WorkTree => dir.join(".git").join("description"),
        };
        self.fs.read_to_string(&file).ok()
    }
}

pub(crate) fn entry_name(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}

/// Display name for a repository found below an intermediate container:
/// always `<immediateParent>/<dirName>`, whatever the actual depth.
fn flat_name(path: &Path, file_name: &str) -> String {
    match path.parent().and_then(|parent| parent.file_name()) {
        Some(parent) => format!("{}/{}", parent.to_string_lossy(), file_name),
        None => file_name.to_string(),
    }
}

pub(crate) fn trimmed_path(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .to_string_lossy()
        .trim_matches(['/', '\\'])
        .to_string()
}

/// Descending, case-insensitive key order, raw descending compare as the
/// tie-break so the order is total.
pub(crate) fn sort_descending<T>(items: &mut [(String, T)]) {
    items.sort_by(|a, b| {
        b.0.to_lowercase()
            .cmp(&a.0.to_lowercase())
            .then_with(|| b.0.cmp(&a.0))
    });
}
