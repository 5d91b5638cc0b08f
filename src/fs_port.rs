use std::path::{Path, PathBuf};

/// A directory entry name paired with whether it is itself a directory.
///
/// `is_directory` must not follow symbolic links: a symlink to a directory
/// is reported as non-directory, so the traversal treats it as a leaf
/// (spec Non-goals: "do not traverse" symlinks).
#[derive(Debug, Clone)]
pub struct Entry {
    pub name: PathBuf,
    pub is_directory: bool,
}

/// The narrow interface the core consumes for all filesystem access.
///
/// This is the seam the spec calls out as an external collaborator: the
/// core never parses paths beyond joining a directory path with an entry
/// name, and never decides *how* a directory is enumerated or an entry is
/// removed.
pub trait FilesystemPort: Send + Sync {
    /// List the immediate children of `path`. Must classify symlinks as
    /// non-directories.
    ///
    /// # Errors
    /// Returns the underlying I/O error if `path` cannot be read.
    fn list_directory(&self, path: &Path) -> std::io::Result<Vec<Entry>>;

    /// Remove a single entry: `unlink` for a file (or un-followed symlink),
    /// `rmdir` for a directory.
    ///
    /// # Errors
    /// Returns the underlying I/O error if removal fails.
    fn remove_entry(&self, path: &Path, is_directory: bool) -> std::io::Result<()>;
}

/// The production [`FilesystemPort`], backed by `std::fs`.
///
/// `std::fs::read_dir`'s entries already classify type via `file_type()`
/// (which on every platform std supports is derived without following
/// symlinks), so no raw platform enumeration primitive is needed here.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFilesystem;

impl FilesystemPort for StdFilesystem {
    fn list_directory(&self, path: &Path) -> std::io::Result<Vec<Entry>> {
        let mut out = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            // `file_type()` uses the entry's cached type on most platforms
            // without a second stat call, and does not follow symlinks.
            let is_directory = entry.file_type()?.is_dir();
            out.push(Entry {
                name: entry.path(),
                is_directory,
            });
        }
        Ok(out)
    }

    fn remove_entry(&self, path: &Path, is_directory: bool) -> std::io::Result<()> {
        if is_directory {
            std::fs::remove_dir(path)
        } else {
            std::fs::remove_file(path)
        }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! An in-memory [`FilesystemPort`] for deterministic unit tests of the
    //! refcount protocol, independent of any real disk.

    use super::{Entry, FilesystemPort};
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    pub enum Node {
        File,
        Dir(Vec<(PathBuf, Node)>),
    }

    /// A fixed in-memory tree. Removal is tracked in `removed` rather than
    /// by mutating the tree, so tests can assert on what *would* have been
    /// removed without needing the enumeration to reflect prior deletions
    /// (the real `std::fs` port does not have this luxury, but the fake
    /// only needs to support the termination/refcount properties, not
    /// double-enumeration semantics).
    pub struct FakeFilesystem {
        tree: BTreeMap<PathBuf, Node>,
        pub removed: Mutex<Vec<(PathBuf, bool)>>,
        pub fail_unlink: Mutex<Vec<PathBuf>>,
        pub fail_rmdir: Mutex<Vec<PathBuf>>,
    }

    impl FakeFilesystem {
        #[must_use]
        pub fn new(root: PathBuf, tree: Node) -> Self {
            let mut flat = BTreeMap::new();
            Self::flatten(&root, &tree, &mut flat);
            Self {
                tree: flat,
                removed: Mutex::new(Vec::new()),
                fail_unlink: Mutex::new(Vec::new()),
                fail_rmdir: Mutex::new(Vec::new()),
            }
        }

        fn flatten(path: &Path, node: &Node, out: &mut BTreeMap<PathBuf, Node>) {
            out.insert(path.to_path_buf(), node.clone());
            if let Node::Dir(children) = node {
                for (name, child) in children {
                    Self::flatten(&path.join(name), child, out);
                }
            }
        }

        #[must_use]
        pub fn removed_count(&self) -> usize {
            self.removed.lock().unwrap().len()
        }
    }

    impl FilesystemPort for FakeFilesystem {
        fn list_directory(&self, path: &Path) -> std::io::Result<Vec<Entry>> {
            match self.tree.get(path) {
                Some(Node::Dir(children)) => Ok(children
                    .iter()
                    .map(|(name, node)| Entry {
                        name: path.join(name),
                        is_directory: matches!(node, Node::Dir(_)),
                    })
                    .collect()),
                Some(Node::File) => Err(std::io::Error::from(std::io::ErrorKind::Other)),
                None => Err(std::io::Error::from(std::io::ErrorKind::NotFound)),
            }
        }

        fn remove_entry(&self, path: &Path, is_directory: bool) -> std::io::Result<()> {
            if is_directory && self.fail_rmdir.lock().unwrap().contains(&path.to_path_buf()) {
                return Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
            }
            if !is_directory && self.fail_unlink.lock().unwrap().contains(&path.to_path_buf()) {
                return Err(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
            }
            self.removed
                .lock()
                .unwrap()
                .push((path.to_path_buf(), is_directory));
            Ok(())
        }
    }
}
