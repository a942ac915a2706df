//! gitgrove discovers Git repositories under configured scan roots and
//! serves two views of them: a flat sorted index keyed by root-relative
//! path, and a directory tree with substring filtering and empty branches
//! pruned.
//!
//! Discovery is a point-in-time, synchronous read of the filesystem; records
//! are rebuilt on every call and never cached. Opening and creating single
//! repositories are boundary calls into the git layer, kept behind the
//! [`RepositoryFactory`] capability.

pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod scan;
pub mod tree;
pub mod vfs;

// Re-exports for ergonomics
pub use error::{Error, Result};
pub use git::{GitFactory, Repo, RepositoryFactory};
pub use scan::{RepoKind, RepoRecord, ScanConfig, ScanEvent, Scanner};
pub use tree::DirNode;
pub use vfs::{FileSystem, OsFs};

use std::path::{Path, PathBuf};

use crossbeam_channel::Sender;

/// The composed engine: the scanner over a [`FileSystem`] plus the
/// [`RepositoryFactory`] its records are handed off to.
pub struct Grove<F: FileSystem = OsFs, R: RepositoryFactory = GitFactory> {
    scanner: Scanner<F>,
    factory: R,
}

impl Grove {
    /// Engine over the real filesystem and git layer.
    pub fn new(config: &config::Config) -> Self {
        Grove {
            scanner: Scanner::new(config.scan_config()),
            factory: GitFactory::new(config.default_branch.clone()),
        }
    }
}

impl<F: FileSystem, R: RepositoryFactory> Grove<F, R> {
    pub fn with_parts(scanner: Scanner<F>, factory: R) -> Self {
        Grove { scanner, factory }
    }

    /// Flat index of every visible repository under the configured roots.
    pub fn repositories(&self) -> Result<Vec<(String, RepoRecord)>> {
        self.scanner.repositories()
    }

    /// Hierarchical view, filtered by name/description substring.
    pub fn repository_tree(&self, filter: &str) -> Result<Vec<(String, DirNode)>> {
        self.scanner.repository_tree(filter)
    }

    /// Full flat scan streamed as [`ScanEvent`]s once the walk completes.
    pub fn scan_background(&self, sender: Sender<ScanEvent>) -> Result<()> {
        self.scanner.scan_background(sender)
    }

    pub fn open(&self, path: &Path) -> Result<Repo> {
        self.factory.open(path)
    }

    pub fn create(&self, path: &Path, bare: bool) -> Result<Repo> {
        self.factory.create(path, bare)
    }

    /// Resolve a flat-index key to its record and open that repository.
    pub fn repository_from_key(&self, key: &str) -> Result<Repo> {
        let index = self.repositories()?;
        let record = index
            .iter()
            .find(|(index_key, _)| index_key == key)
            .map(|(_, record)| record)
            .ok_or_else(|| Error::RepositoryNotFound {
                path: PathBuf::from(key),
            })?;
        self.open(&record.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::MemFs;

    #[test]
    fn facade_scans_through_injected_filesystem() {
        let fs = MemFs::new().file("/r/a/HEAD", "");
        let scanner = Scanner::with_fs(
            ScanConfig {
                roots: vec![PathBuf::from("/r")],
                ..ScanConfig::default()
            },
            fs,
        );
        let grove = Grove::with_parts(scanner, GitFactory::new("main"));

        let index = grove.repositories().unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index[0].0, "a");

        // An unknown key fails before the factory is ever consulted
        assert!(matches!(
            grove.repository_from_key("missing"),
            Err(Error::RepositoryNotFound { .. })
        ));
    }
}
