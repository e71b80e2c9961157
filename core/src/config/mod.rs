use anyhow::{Context, Result};
use std::path::PathBuf;

/// Set to `"true"` by npm for `npm install -g`; selects a personal install.
pub const GLOBAL_ENV: &str = "npm_config_global";

/// Overrides the directory the skill bundle is read from.
pub const BUNDLE_DIR_ENV: &str = "SKILLPACK_BUNDLE_DIR";

const CLAUDE_DIR: &str = ".claude";
const SKILLS_DIR: &str = "skills";

/// Everything the installer reads from its environment, captured once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub global: bool,
    pub bundle_dir: PathBuf,
    pub cwd: PathBuf,
    pub home_dir: PathBuf,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;

        Ok(Settings {
            global: is_global_flag(std::env::var(GLOBAL_ENV).ok().as_deref()),
            bundle_dir: default_bundle_dir()?,
            cwd,
            home_dir: get_home_dir(),
        })
    }

    pub fn with_global(mut self, global: bool) -> Self {
        self.global = global;
        self
    }

    pub fn with_bundle_dir(mut self, bundle_dir: impl Into<PathBuf>) -> Self {
        self.bundle_dir = bundle_dir.into();
        self
    }
}

pub fn is_global_flag(value: Option<&str>) -> bool {
    value == Some("true")
}

pub fn get_home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// `<dir>/.claude/skills`
pub fn claude_skills_dir(dir: &std::path::Path) -> PathBuf {
    dir.join(CLAUDE_DIR).join(SKILLS_DIR)
}

/// The bundle ships next to the installer binary unless overridden.
pub fn default_bundle_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(BUNDLE_DIR_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }

    let exe = std::env::current_exe().context("Failed to locate installer executable")?;
    exe.parent()
        .map(|p| p.to_path_buf())
        .ok_or_else(|| anyhow::anyhow!("Installer executable has no parent directory"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn global_flag_requires_exact_true() {
        assert!(is_global_flag(Some("true")));
        assert!(!is_global_flag(Some("TRUE")));
        assert!(!is_global_flag(Some("1")));
        assert!(!is_global_flag(Some("")));
        assert!(!is_global_flag(None));
    }

    #[test]
    fn skills_dir_layout() {
        assert_eq!(
            claude_skills_dir(Path::new("/home/me")),
            PathBuf::from("/home/me/.claude/skills")
        );
    }

    #[test]
    fn builder_overrides() {
        let settings = Settings {
            global: false,
            bundle_dir: PathBuf::from("/a"),
            cwd: PathBuf::from("/b"),
            home_dir: PathBuf::from("/c"),
        }
        .with_global(true)
        .with_bundle_dir("/bundle");

        assert!(settings.global);
        assert_eq!(settings.bundle_dir, PathBuf::from("/bundle"));
    }
}
