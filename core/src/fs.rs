//! Filesystem seam for the materializer, manifest store and location resolver.
//!
//! Tree walks are written against [`FileSystem`] rather than `std::fs` so
//! tests can swap in implementations that fail on particular operations.

use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: PathBuf,
    pub is_dir: bool,
}

pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;

    /// Follows symlinks.
    fn is_dir(&self, path: &Path) -> bool;

    /// True for the link itself, whether or not its target exists.
    fn is_symlink(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write the whole file, replacing any existing content.
    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Copy a single file, overwriting the destination.
    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Immediate children of `path`. Symlinks are reported as non-directories.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;

    /// Remove a file or a symlink, never what the link points at.
    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Remove an empty directory.
    fn remove_dir(&self, path: &Path) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_symlink(&self, path: &Path) -> bool {
        path.is_symlink()
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        std::fs::write(path, contents)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::copy(from, to).map(|_| ())
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
        let mut entries = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let entry = entry?;
            entries.push(DirEntry {
                path: entry.path(),
                is_dir: entry.file_type()?.is_dir(),
            });
        }
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        // Directory links on Windows are removed as directories.
        #[cfg(windows)]
        if path.is_symlink() && path.is_dir() {
            return std::fs::remove_dir(path);
        }
        std::fs::remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        std::fs::remove_dir(path)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    fn injected(op: &str, path: &Path) -> io::Error {
        io::Error::new(
            io::ErrorKind::PermissionDenied,
            format!("injected {op} failure at {}", path.display()),
        )
    }

    /// Local filesystem with selected operations forced to fail.
    #[derive(Debug, Default)]
    pub struct FaultyFileSystem {
        pub fail_writes: bool,
        pub fail_removes: bool,
        /// Copies whose source file name matches fail.
        pub fail_copies_of: Vec<&'static str>,
        /// File names that `exists` always reports as absent.
        pub hidden_names: Vec<&'static str>,
    }

    impl FaultyFileSystem {
        fn is_hidden(&self, path: &Path) -> bool {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| self.hidden_names.contains(&n))
        }
    }

    impl FileSystem for FaultyFileSystem {
        fn exists(&self, path: &Path) -> bool {
            !self.is_hidden(path) && LocalFileSystem.exists(path)
        }

        fn is_dir(&self, path: &Path) -> bool {
            LocalFileSystem.is_dir(path)
        }

        fn is_symlink(&self, path: &Path) -> bool {
            LocalFileSystem.is_symlink(path)
        }

        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            LocalFileSystem.read_to_string(path)
        }

        fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
            if self.fail_writes {
                return Err(injected("write", path));
            }
            LocalFileSystem.write(path, contents)
        }

        fn create_dir_all(&self, path: &Path) -> io::Result<()> {
            LocalFileSystem.create_dir_all(path)
        }

        fn copy_file(&self, from: &Path, to: &Path) -> io::Result<()> {
            let name = from.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if self.fail_copies_of.contains(&name) {
                return Err(injected("copy", from));
            }
            LocalFileSystem.copy_file(from, to)
        }

        fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
            LocalFileSystem.read_dir(path)
        }

        fn remove_file(&self, path: &Path) -> io::Result<()> {
            if self.fail_removes {
                return Err(injected("remove", path));
            }
            LocalFileSystem.remove_file(path)
        }

        fn remove_dir(&self, path: &Path) -> io::Result<()> {
            if self.fail_removes {
                return Err(injected("remove", path));
            }
            LocalFileSystem.remove_dir(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn read_dir_lists_files_and_dirs() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("sub")).unwrap();
        std::fs::write(tmp.path().join("a.txt"), "a").unwrap();

        let entries = LocalFileSystem.read_dir(tmp.path()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].path, tmp.path().join("a.txt"));
        assert!(!entries[0].is_dir);
        assert!(entries[1].is_dir);
    }

    #[test]
    fn copy_file_overwrites() {
        let tmp = TempDir::new().unwrap();
        let from = tmp.path().join("from.txt");
        let to = tmp.path().join("to.txt");
        std::fs::write(&from, "new").unwrap();
        std::fs::write(&to, "old").unwrap();

        LocalFileSystem.copy_file(&from, &to).unwrap();
        assert_eq!(std::fs::read_to_string(&to).unwrap(), "new");
    }

    #[cfg(unix)]
    #[test]
    fn symlink_is_reported_without_following() {
        let tmp = TempDir::new().unwrap();
        let real = tmp.path().join("real");
        let link = tmp.path().join("link");
        std::fs::create_dir_all(&real).unwrap();
        std::os::unix::fs::symlink(&real, &link).unwrap();

        assert!(LocalFileSystem.is_symlink(&link));
        assert!(LocalFileSystem.is_dir(&link));
        assert!(!LocalFileSystem.is_symlink(&real));

        let entries = LocalFileSystem.read_dir(tmp.path()).unwrap();
        let link_entry = entries.iter().find(|e| e.path == link).unwrap();
        assert!(!link_entry.is_dir);
    }
}
