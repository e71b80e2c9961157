use std::path::{Path, PathBuf};

use super::{FileMapping, SKILL_FILE};
use crate::error::{Result, SkillError};
use crate::fs::FileSystem;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopiedEntry {
    pub source: String,
    pub dest: PathBuf,
    pub is_dir: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopyReport {
    pub copied: Vec<CopiedEntry>,
    /// One message per declared source that was not in the bundle.
    pub warnings: Vec<String>,
}

/// Copies `SKILL.md` into `target_dir`, creating the directory first.
pub fn copy_required(
    fs: &dyn FileSystem,
    source_dir: &Path,
    target_dir: &Path,
) -> Result<PathBuf> {
    fs.create_dir_all(target_dir)
        .map_err(|e| SkillError::io("create directory", target_dir, e))?;

    let source = source_dir.join(SKILL_FILE);
    if !fs.exists(&source) {
        return Err(SkillError::RequiredFileMissing(source));
    }

    let dest = target_dir.join(SKILL_FILE);
    fs.copy_file(&source, &dest)
        .map_err(|e| SkillError::io("copy", &source, e))?;

    tracing::info!(dest = %dest.display(), "Copied {}", SKILL_FILE);
    Ok(dest)
}

/// Copies each declared file or directory in order. Missing sources are
/// skipped with a warning; I/O failures abort and leave earlier copies in place.
pub fn copy_declared(
    fs: &dyn FileSystem,
    source_dir: &Path,
    target_dir: &Path,
    files: &[FileMapping],
) -> Result<CopyReport> {
    let mut report = CopyReport::default();

    for mapping in files {
        let source = source_dir.join(&mapping.source);
        let dest = target_dir.join(&mapping.dest);

        if !fs.exists(&source) {
            tracing::debug!("{} not found, skipping", mapping.source);
            report
                .warnings
                .push(format!("{} not found, skipping", mapping.source));
            continue;
        }

        let is_dir = fs.is_dir(&source);
        if is_dir {
            copy_tree(fs, &source, &dest)?;
            tracing::info!(source = %mapping.source, "Copied directory");
        } else {
            if let Some(parent) = dest.parent() {
                fs.create_dir_all(parent)
                    .map_err(|e| SkillError::io("create directory", parent, e))?;
            }
            fs.copy_file(&source, &dest)
                .map_err(|e| SkillError::io("copy", &source, e))?;
            tracing::info!(source = %mapping.source, "Copied file");
        }

        report.copied.push(CopiedEntry {
            source: mapping.source.clone(),
            dest,
            is_dir,
        });
    }

    Ok(report)
}

/// Recursively copies the directory `src` to `dest`, merging into anything
/// already at `dest`.
pub fn copy_tree(fs: &dyn FileSystem, src: &Path, dest: &Path) -> Result<()> {
    fs.create_dir_all(dest)
        .map_err(|e| SkillError::io("create directory", dest, e))?;

    let entries = fs
        .read_dir(src)
        .map_err(|e| SkillError::io("read directory", src, e))?;

    for entry in entries {
        let Some(name) = entry.path.file_name() else {
            continue;
        };
        let dest_path = dest.join(name);

        if entry.is_dir {
            copy_tree(fs, &entry.path, &dest_path)?;
        } else {
            fs.copy_file(&entry.path, &dest_path)
                .map_err(|e| SkillError::io("copy", &entry.path, e))?;
        }
    }

    Ok(())
}

/// Deletes `target_dir` and everything below it. Absent targets are a no-op.
/// A symlinked target is unlinked; the directory it points at is left alone.
pub fn remove_all(fs: &dyn FileSystem, target_dir: &Path) -> Result<()> {
    if fs.is_symlink(target_dir) {
        return fs
            .remove_file(target_dir)
            .map_err(|e| SkillError::io("remove", target_dir, e));
    }

    if !fs.exists(target_dir) {
        return Ok(());
    }

    if fs.is_dir(target_dir) {
        remove_tree(fs, target_dir)
    } else {
        fs.remove_file(target_dir)
            .map_err(|e| SkillError::io("remove", target_dir, e))
    }
}

fn remove_tree(fs: &dyn FileSystem, dir: &Path) -> Result<()> {
    let entries = fs
        .read_dir(dir)
        .map_err(|e| SkillError::io("read directory", dir, e))?;

    for entry in entries {
        if entry.is_dir {
            remove_tree(fs, &entry.path)?;
        } else {
            fs.remove_file(&entry.path)
                .map_err(|e| SkillError::io("remove", &entry.path, e))?;
        }
    }

    fs.remove_dir(dir)
        .map_err(|e| SkillError::io("remove", dir, e))
}
