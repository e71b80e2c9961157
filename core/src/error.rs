use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SkillError>;

#[derive(Error, Debug)]
pub enum SkillError {
    #[error("{} not found", .0.display())]
    ConfigMissing(PathBuf),

    #[error("invalid skill descriptor {}: {source}", path.display())]
    ConfigInvalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Names that would resolve outside the skills base directory.
    #[error("unsafe skill name: {0:?}")]
    UnsafeName(String),

    #[error("SKILL.md is required but not found at {}", .0.display())]
    RequiredFileMissing(PathBuf),

    #[error("failed to write manifest {}: {source}", path.display())]
    ManifestWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to {action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SkillError {
    pub fn io(action: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.to_path_buf(),
            source,
        }
    }

    /// Descriptor problems are the ones uninstall treats as "nothing to do".
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigMissing(_) | Self::ConfigInvalid { .. } | Self::UnsafeName(_)
        )
    }
}
