use std::path::PathBuf;

use super::descriptor::{SkillConfig, load_descriptor};
use super::location::{InstallLocation, resolve};
use super::manifest::{ManifestEntry, ManifestStore};
use super::materialize::{CopiedEntry, copy_declared, copy_required, remove_all};
use crate::config::Settings;
use crate::error::Result;
use crate::fs::{FileSystem, LocalFileSystem};
use crate::hooks::{HookRunner, HookStatus, ShellHookRunner};

#[derive(Debug, Clone)]
pub struct InstallOutcome {
    pub skill: SkillConfig,
    pub location: InstallLocation,
    pub target_dir: PathBuf,
    pub copied: Vec<CopiedEntry>,
    /// Non-fatal problems, returned for the caller to report. Core only
    /// logs them at debug level.
    pub warnings: Vec<String>,
    pub hook: Option<HookStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UninstallOutcome {
    /// No usable descriptor, so there was nothing to identify.
    Skipped { reason: String },
    NotInstalled { target_dir: PathBuf },
    Removed {
        target_dir: PathBuf,
        warnings: Vec<String>,
    },
}

/// Drives install, uninstall and listing for the bundle named in [`Settings`].
pub struct SkillInstaller {
    settings: Settings,
    fs: Box<dyn FileSystem>,
    hooks: Box<dyn HookRunner>,
}

impl SkillInstaller {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            fs: Box::new(LocalFileSystem),
            hooks: Box::new(ShellHookRunner),
        }
    }

    pub fn with_file_system(mut self, fs: impl FileSystem + 'static) -> Self {
        self.fs = Box::new(fs);
        self
    }

    pub fn with_hook_runner(mut self, hooks: impl HookRunner + 'static) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    pub fn location(&self) -> InstallLocation {
        resolve(&self.settings, self.fs.as_ref())
    }

    pub fn descriptor(&self) -> Result<SkillConfig> {
        load_descriptor(self.fs.as_ref(), &self.settings.bundle_dir)
    }

    pub fn install(&self) -> Result<InstallOutcome> {
        let fs = self.fs.as_ref();
        let bundle_dir = &self.settings.bundle_dir;

        let skill = self.descriptor()?;
        let location = self.location();
        let target_dir = location.skill_dir(&skill.name);

        tracing::info!(
            skill = %skill.name,
            kind = %location.kind,
            target = %target_dir.display(),
            "Installing skill"
        );

        copy_required(fs, bundle_dir, &target_dir)?;
        let report = copy_declared(fs, bundle_dir, &target_dir, &skill.files)?;
        let mut warnings = report.warnings;

        let store = ManifestStore::new(fs, &location.base);
        let mut manifest = store.read().unwrap_or_else(|warning| {
            tracing::debug!("{}", warning);
            warnings.push(warning);
            Default::default()
        });
        manifest.upsert(&skill.name, ManifestEntry::new(&skill, &target_dir));
        store.save(&manifest)?;

        let hook = skill.postinstall().map(|cmd| {
            let status = self.hooks.run(cmd, &target_dir);
            if let HookStatus::Failed(reason) = &status {
                tracing::debug!("postinstall hook failed: {}", reason);
                warnings.push(format!("postinstall hook failed: {}", reason));
            }
            status
        });

        tracing::info!(skill = %skill.name, warnings = warnings.len(), "Skill installed");

        Ok(InstallOutcome {
            skill,
            location,
            target_dir,
            copied: report.copied,
            warnings,
            hook,
        })
    }

    /// Best-effort removal. Never fails; problems surface as warnings.
    pub fn uninstall(&self) -> UninstallOutcome {
        let fs = self.fs.as_ref();

        let skill = match self.descriptor() {
            Ok(skill) => skill,
            Err(e) => {
                tracing::debug!("{}, skipping cleanup", e);
                return UninstallOutcome::Skipped {
                    reason: e.to_string(),
                };
            }
        };

        let location = self.location();
        let target_dir = location.skill_dir(&skill.name);

        if !fs.exists(&target_dir) && !fs.is_symlink(&target_dir) {
            tracing::info!(target = %target_dir.display(), "Skill was not installed");
            return UninstallOutcome::NotInstalled { target_dir };
        }

        let mut warnings = Vec::new();

        if let Err(e) = remove_all(fs, &target_dir) {
            tracing::debug!("Could not remove skill directory: {}", e);
            warnings.push(format!("could not remove skill directory: {}", e));
        }

        let store = ManifestStore::new(fs, &location.base);
        match store.read() {
            Ok(mut manifest) => {
                if manifest.remove(&skill.name)
                    && let Err(e) = store.save(&manifest)
                {
                    tracing::debug!("Could not update manifest: {}", e);
                    warnings.push(format!("could not update manifest: {}", e));
                }
            }
            Err(warning) => {
                tracing::debug!("{}", warning);
                warnings.push(warning);
            }
        }

        tracing::info!(skill = %skill.name, "Skill uninstalled");
        UninstallOutcome::Removed {
            target_dir,
            warnings,
        }
    }

    /// Manifest entries recorded at the resolved base directory.
    pub fn installed(&self) -> (InstallLocation, Vec<(String, ManifestEntry)>) {
        let location = self.location();
        let entries = ManifestStore::new(self.fs.as_ref(), &location.base)
            .load()
            .entries();
        (location, entries)
    }
}
