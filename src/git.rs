use std::fmt;
use std::path::{Path, PathBuf};

use git2::{Repository, RepositoryInitOptions};
use tracing::info;

use crate::error::{Error, Result};

/// Handle to one opened repository, the unit discovery records are exchanged
/// for at the git boundary.
pub struct Repo {
    path: PathBuf,
    default_branch: String,
    inner: Repository,
}

impl Repo {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_bare(&self) -> bool {
        self.inner.is_bare()
    }

    /// Name of the currently checked-out branch, falling back to the
    /// configured default branch when HEAD is unborn or detached.
    pub fn head_branch(&self) -> String {
        match self.inner.head() {
            Ok(head) if head.is_branch() => head
                .shorthand()
                .map(|name| name.to_string())
                .unwrap_or_else(|| self.default_branch.clone()),
            _ => self.default_branch.clone(),
        }
    }
}

impl fmt::Debug for Repo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repo")
            .field("path", &self.path)
            .field("bare", &self.is_bare())
            .finish()
    }
}

/// Capability for opening and creating single repositories. Composed into
/// [`crate::Grove`] so discovery itself stays free of git internals.
pub trait RepositoryFactory: Send + Sync {
    fn open(&self, path: &Path) -> Result<Repo>;
    fn create(&self, path: &Path, bare: bool) -> Result<Repo>;
}

/// git2-backed factory.
#[derive(Debug, Clone)]
pub struct GitFactory {
    default_branch: String,
}

impl GitFactory {
    pub fn new(default_branch: impl Into<String>) -> Self {
        Self {
            default_branch: default_branch.into(),
        }
    }

    fn is_repository(path: &Path) -> bool {
        path.join(".git").join("HEAD").exists() || path.join("HEAD").exists()
    }

    fn handle(&self, path: &Path, inner: Repository) -> Repo {
        Repo {
            path: path.to_path_buf(),
            default_branch: self.default_branch.clone(),
            inner,
        }
    }
}

impl RepositoryFactory for GitFactory {
    fn open(&self, path: &Path) -> Result<Repo> {
        if !path.exists() || !Self::is_repository(path) {
            return Err(Error::RepositoryNotFound {
                path: path.to_path_buf(),
            });
        }
        let inner = Repository::open(path)?;
        Ok(self.handle(path, inner))
    }

    fn create(&self, path: &Path, bare: bool) -> Result<Repo> {
        if Self::is_repository(path) {
            return Err(Error::RepositoryExists {
                path: path.to_path_buf(),
            });
        }
        let mut opts = RepositoryInitOptions::new();
        opts.bare(bare).initial_head(&self.default_branch);
        let inner = Repository::init_opts(path, &opts)?;
        info!(path = %path.display(), bare, "initialized repository");
        Ok(self.handle(path, inner))
    }
}
