use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by discovery and the repository factory.
#[derive(Error, Debug)]
pub enum Error {
    #[error("no git repositories found in {path}")]
    NoRepositories { path: PathBuf },

    #[error("cannot list scan root {path}")]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("a git repository already exists at {path}")]
    RepositoryExists { path: PathBuf },

    #[error("no git repository at {path}")]
    RepositoryNotFound { path: PathBuf },

    #[error(transparent)]
    Git(#[from] git2::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
