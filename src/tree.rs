use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::scan::{RepoRecord, Scanner, entry_name, sort_descending, trimmed_path};
use crate::vfs::FileSystem;

/// One container directory in the hierarchical view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirNode {
    /// Path-derived token (absolute path, separators stripped). Best effort,
    /// not a clean identifier.
    pub id: String,
    /// Base name of the container directory.
    pub name: String,
    /// Repositories directly inside this container that matched the filter,
    /// keyed by display name.
    pub repositories: Vec<(String, RepoRecord)>,
    /// Child containers that still hold at least one match somewhere below.
    pub subdirs: Vec<(String, DirNode)>,
}

impl<F: FileSystem> Scanner<F> {
    /// Hierarchical view of the scan roots: one node per root, keyed by the
    /// root's base name. Repositories are admitted when `filter` is empty or
    /// is a case-insensitive substring of their name or description; branches
    /// left without a single match are pruned. Roots that end up empty are
    /// omitted, never an error.
    ///
    /// The name allow-list does not apply here; hidden paths do.
    pub fn repository_tree(&self, filter: &str) -> Result<Vec<(String, DirNode)>> {
        let mut forest: BTreeMap<String, DirNode> = BTreeMap::new();

        for root in &self.config().roots {
            match self.tree_node(root, root, filter) {
                Ok(Some(node)) => {
                    forest.insert(node.name.clone(), node);
                }
                Ok(None) => {}
                Err(source) => {
                    return Err(Error::RootUnreadable {
                        path: root.clone(),
                        source,
                    });
                }
            }
        }

        let mut out: Vec<(String, DirNode)> = forest.into_iter().collect();
        sort_descending(&mut out);
        Ok(out)
    }

    /// Bottom-up: children are built before the parent decides to keep them,
    /// and `None` signals an empty subtree to prune.
    fn tree_node(&self, dir: &Path, root: &Path, filter: &str) -> io::Result<Option<DirNode>> {
        let mut repositories: Vec<(String, RepoRecord)> = Vec::new();
        let mut subdirs: Vec<(String, DirNode)> = Vec::new();

        for entry in self.fs().read_dir(dir)? {
            let Some(file_name) = entry_name(&entry) else {
                continue;
            };
            if file_name.starts_with('.') {
                continue;
            }
            if !self.fs().is_dir(&entry) {
                continue;
            }

            let Some(kind) = self.classify(&entry) else {
                match self.tree_node(&entry, root, filter) {
                    Ok(Some(child)) => subdirs.push((file_name, child)),
                    Ok(None) => {}
                    Err(err) => {
                        debug!(path = %entry.display(), error = %err, "skipping unreadable directory");
                    }
                }
                continue;
            };

            if self.is_hidden(&entry) {
                continue;
            }

            let description = self.description(&entry, kind);
            if !filter_matches(filter, &file_name, description.as_deref()) {
                continue;
            }

            let record = RepoRecord {
                name: file_name.clone(),
                trimmed_path: trimmed_path(&entry, root),
                description,
                path: entry,
                kind,
            };
            repositories.push((file_name, record));
        }

        if repositories.is_empty() && subdirs.is_empty() {
            return Ok(None);
        }

        sort_descending(&mut repositories);
        sort_descending(&mut subdirs);

        Ok(Some(DirNode {
            id: path_token(dir),
            name: entry_name(dir).unwrap_or_default(),
            repositories,
            subdirs,
        }))
    }
}

fn filter_matches(filter: &str, name: &str, description: Option<&str>) -> bool {
    if filter.is_empty() {
        return true;
    }
    let needle = filter.to_lowercase();
    name.to_lowercase().contains(&needle)
        || description.is_some_and(|text| text.to_lowercase().contains(&needle))
}

fn path_token(path: &Path) -> String {
    path.to_string_lossy().replace(['/', '\\'], "")
}
