use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{Settings, claude_skills_dir};
use crate::fs::FileSystem;

const PROJECT_MARKERS: &[&str] = &["package.json", ".git"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallKind {
    Personal,
    Project,
}

impl fmt::Display for InstallKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Personal => write!(f, "personal"),
            Self::Project => write!(f, "project"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallLocation {
    pub kind: InstallKind,
    pub base: PathBuf,
}

impl InstallLocation {
    pub fn skill_dir(&self, name: &str) -> PathBuf {
        self.base.join(name)
    }
}

/// Install and uninstall must both go through here so they agree on scope.
pub fn resolve(settings: &Settings, fs: &dyn FileSystem) -> InstallLocation {
    if settings.global {
        return InstallLocation {
            kind: InstallKind::Personal,
            base: claude_skills_dir(&settings.home_dir),
        };
    }

    let root = find_project_root(fs, &settings.cwd);
    InstallLocation {
        kind: InstallKind::Project,
        base: claude_skills_dir(&root),
    }
}

/// Nearest ancestor of `start` (inclusive) holding a project marker, or
/// `start` itself when none does.
pub fn find_project_root(fs: &dyn FileSystem, start: &Path) -> PathBuf {
    for dir in start.ancestors() {
        if PROJECT_MARKERS.iter().any(|m| fs.exists(&dir.join(m))) {
            tracing::debug!(root = %dir.display(), "Found project root");
            return dir.to_path_buf();
        }
    }

    tracing::debug!(
        cwd = %start.display(),
        "No project marker found, using current directory"
    );
    start.to_path_buf()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::LocalFileSystem;
    use crate::fs::testing::FaultyFileSystem;
    use std::fs;
    use tempfile::TempDir;

    fn settings(global: bool, cwd: &Path, home: &Path) -> Settings {
        Settings {
            global,
            bundle_dir: cwd.to_path_buf(),
            cwd: cwd.to_path_buf(),
            home_dir: home.to_path_buf(),
        }
    }

    #[test]
    fn global_resolves_under_home() {
        let tmp = TempDir::new().unwrap();
        let home = tmp.path().join("home");
        let project = tmp.path().join("proj");
        fs::create_dir_all(&project).unwrap();
        fs::write(project.join("package.json"), "{}").unwrap();

        let location = resolve(&settings(true, &project, &home), &LocalFileSystem);
        assert_eq!(location.kind, InstallKind::Personal);
        assert_eq!(location.base, home.join(".claude").join("skills"));
    }

    #[test]
    fn project_root_found_by_package_json() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("proj");
        let nested = root.join("src").join("deep");
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.join("package.json"), "{}").unwrap();

        let location = resolve(&settings(false, &nested, tmp.path()), &LocalFileSystem);
        assert_eq!(location.kind, InstallKind::Project);
        assert_eq!(location.base, root.join(".claude").join("skills"));
    }

    #[test]
    fn project_root_found_by_git_dir() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("repo");
        let nested = root.join("a");
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root(&LocalFileSystem, &nested), root);
    }

    #[test]
    fn nearest_marker_wins() {
        let tmp = TempDir::new().unwrap();
        let outer = tmp.path().join("outer");
        let inner = outer.join("inner");
        fs::create_dir_all(outer.join(".git")).unwrap();
        fs::create_dir_all(&inner).unwrap();
        fs::write(inner.join("package.json"), "{}").unwrap();

        assert_eq!(find_project_root(&LocalFileSystem, &inner), inner);
    }

    #[test]
    fn no_marker_falls_back_to_cwd() {
        let tmp = TempDir::new().unwrap();
        let cwd = tmp.path().join("nowhere").join("special");
        fs::create_dir_all(&cwd).unwrap();

        // The host tree above the temp dir may carry markers of its own.
        let fs = FaultyFileSystem {
            hidden_names: PROJECT_MARKERS.to_vec(),
            ..Default::default()
        };

        let location = resolve(&settings(false, &cwd, tmp.path()), &fs);
        assert_eq!(location.kind, InstallKind::Project);
        assert_eq!(location.base, cwd.join(".claude").join("skills"));
    }

    #[test]
    fn kind_display() {
        assert_eq!(InstallKind::Personal.to_string(), "personal");
        assert_eq!(InstallKind::Project.to_string(), "project");
    }
}
