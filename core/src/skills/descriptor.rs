use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::Path;

use super::DESCRIPTOR_FILE;
use crate::error::{Result, SkillError};
use crate::fs::FileSystem;

const DEFAULT_PACKAGE_SCOPE: &str = "@antskill";

/// A skill's `.claude-skill.json`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SkillConfig {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default, deserialize_with = "declared_files")]
    pub files: Vec<FileMapping>,
    #[serde(default)]
    pub hooks: Option<Hooks>,
}

/// One `"source": "dest"` pair from `files`, relative to the bundle and the
/// target directory respectively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMapping {
    pub source: String,
    pub dest: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Hooks {
    #[serde(default)]
    pub postinstall: Option<String>,
}

impl SkillConfig {
    pub fn package_id(&self) -> String {
        self.package
            .clone()
            .unwrap_or_else(|| format!("{}/{}", DEFAULT_PACKAGE_SCOPE, self.name))
    }

    pub fn postinstall(&self) -> Option<&str> {
        self.hooks
            .as_ref()
            .and_then(|h| h.postinstall.as_deref())
            .filter(|cmd| !cmd.trim().is_empty())
    }
}

pub fn load_descriptor(fs: &dyn FileSystem, bundle_dir: &Path) -> Result<SkillConfig> {
    let path = bundle_dir.join(DESCRIPTOR_FILE);

    if !fs.exists(&path) {
        return Err(SkillError::ConfigMissing(path));
    }

    let content = fs
        .read_to_string(&path)
        .map_err(|e| SkillError::io("read", &path, e))?;

    let config: SkillConfig = serde_json::from_str(&content)
        .map_err(|source| SkillError::ConfigInvalid { path, source })?;

    if is_unsafe_skill_name(&config.name) {
        return Err(SkillError::UnsafeName(config.name));
    }

    tracing::debug!(name = %config.name, version = %config.version, "Loaded skill descriptor");
    Ok(config)
}

fn is_unsafe_skill_name(name: &str) -> bool {
    name.contains("..")
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
        || name.trim().is_empty()
}

struct DeclaredFiles(Vec<FileMapping>);

impl<'de> Deserialize<'de> for DeclaredFiles {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct FilesVisitor;

        impl<'de> Visitor<'de> for FilesVisitor {
            type Value = DeclaredFiles;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of source path to destination path")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut map: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut files = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((source, dest)) = map.next_entry::<String, String>()? {
                    files.push(FileMapping { source, dest });
                }
                Ok(DeclaredFiles(files))
            }
        }

        deserializer.deserialize_map(FilesVisitor)
    }
}

// Keeps declaration order, which a HashMap would lose.
fn declared_files<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<FileMapping>, D::Error> {
    Ok(Option::<DeclaredFiles>::deserialize(deserializer)?
        .map(|files| files.0)
        .unwrap_or_default())
}
