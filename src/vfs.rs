use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Filesystem access used by the scanners.
///
/// Discovery only ever lists directories, probes for entries, and reads small
/// text files, so the surface is kept to exactly that. Injecting it keeps the
/// scan logic testable against an in-memory double.
pub trait FileSystem: Send + Sync {
    /// List the entries of a directory. Entries that cannot be stat'ed are
    /// dropped; an unlistable directory is an error the caller decides on.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    fn is_dir(&self, path: &Path) -> bool;

    fn exists(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFs;

impl FileSystem for OsFs {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            match entry {
                Ok(entry) => entries.push(entry.path()),
                Err(_) => continue,
            }
        }
        Ok(entries)
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }
}

#[cfg(test)]
pub(crate) use mem::MemFs;


#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn os_fs_lists_entries() -> io::Result<()> {
        let temp = TempDir::new()?;
        fs::create_dir(temp.path().join("sub"))?;
        fs::write(temp.path().join("file.txt"), "hi")?;

        let fs = OsFs;
        let mut entries = fs.read_dir(temp.path())?;
        entries.sort();

        assert_eq!(entries.len(), 2);
        assert!(fs.is_dir(&temp.path().join("sub")));
        assert!(!fs.is_dir(&temp.path().join("file.txt")));
        assert_eq!(fs.read_to_string(&temp.path().join("file.txt"))?, "hi");
        Ok(())
    }

    #[test]
    fn mem_fs_lists_direct_children_only() {
        let fs = MemFs::new()
            .dir("/root/a/deep")
            .file("/root/note.txt", "n");

        let mut entries = fs.read_dir(Path::new("/root")).unwrap();
        entries.sort();
        assert_eq!(
            entries,
            vec![PathBuf::from("/root/a"), PathBuf::from("/root/note.txt")]
        );
    }

    #[test]
    fn mem_fs_denied_dir_errors() {
        let fs = MemFs::new().dir("/root/locked").deny("/root/locked");
        assert!(fs.read_dir(Path::new("/root/locked")).is_err());
        assert!(fs.read_dir(Path::new("/root")).is_ok());
    }
}
