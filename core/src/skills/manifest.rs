use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::path::{Path, PathBuf};

use super::{MANIFEST_FILE, SkillConfig};
use crate::error::{Result, SkillError};
use crate::fs::FileSystem;

/// Contents of `.skills-manifest.json`.
///
/// Entries are kept as raw JSON so records written by other installers
/// survive a rewrite untouched. Unknown top-level keys are preserved too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub skills: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub installed_at: String,
    #[serde(default)]
    pub package: String,
    #[serde(default)]
    pub path: String,
}

impl ManifestEntry {
    /// Entry for `config` installed at `skill_dir`, stamped with the current time.
    pub fn new(config: &SkillConfig, skill_dir: &Path) -> Self {
        Self {
            version: config.version.clone(),
            installed_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            package: config.package_id(),
            path: skill_dir.to_string_lossy().into_owned(),
        }
    }
}

impl From<ManifestEntry> for Value {
    fn from(entry: ManifestEntry) -> Self {
        json!({
            "version": entry.version,
            "installedAt": entry.installed_at,
            "package": entry.package,
            "path": entry.path,
        })
    }
}

impl Manifest {
    /// Replaces any existing entry for `name`.
    pub fn upsert(&mut self, name: &str, entry: ManifestEntry) {
        self.skills.insert(name.to_string(), entry.into());
    }

    /// Returns whether an entry was present.
    pub fn remove(&mut self, name: &str) -> bool {
        self.skills.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.skills.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<ManifestEntry> {
        self.skills
            .get(name)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Well-formed entries sorted by skill name.
    pub fn entries(&self) -> Vec<(String, ManifestEntry)> {
        let mut entries: Vec<_> = self
            .skills
            .iter()
            .filter_map(|(name, value)| match serde_json::from_value(value.clone()) {
                Ok(entry) => Some((name.clone(), entry)),
                Err(e) => {
                    tracing::debug!("Skipping malformed manifest entry '{}': {}", name, e);
                    None
                }
            })
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }
}

/// Reads and writes the manifest under one base directory. Nothing is cached;
/// callers load, mutate and save within a single operation.
pub struct ManifestStore<'a> {
    fs: &'a dyn FileSystem,
    path: PathBuf,
}

impl<'a> ManifestStore<'a> {
    pub fn new(fs: &'a dyn FileSystem, base: &Path) -> Self {
        Self {
            fs,
            path: base.join(MANIFEST_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.fs.exists(&self.path)
    }

    /// Missing manifests read as empty. An unreadable or corrupt one is an
    /// `Err` carrying the message callers surface as a warning.
    pub fn read(&self) -> std::result::Result<Manifest, String> {
        if !self.fs.exists(&self.path) {
            return Ok(Manifest::default());
        }

        self.fs
            .read_to_string(&self.path)
            .map_err(|e| e.to_string())
            .and_then(|content| {
                serde_json::from_str::<Manifest>(&content).map_err(|e| e.to_string())
            })
            .map_err(|e| {
                format!(
                    "could not read existing manifest {}, creating new one: {}",
                    self.path.display(),
                    e
                )
            })
    }

    /// Like [`read`](Self::read), logging the problem and falling back to an
    /// empty manifest. A corrupt file is replaced on the next save.
    pub fn load(&self) -> Manifest {
        self.read().unwrap_or_else(|warning| {
            tracing::warn!("{}", warning);
            Manifest::default()
        })
    }

    pub fn save(&self, manifest: &Manifest) -> Result<()> {
        let write_err = |source| SkillError::ManifestWrite {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            self.fs.create_dir_all(parent).map_err(write_err)?;
        }

        let data = serde_json::to_string_pretty(manifest)
            .map_err(|e| write_err(std::io::Error::other(e)))?;

        self.fs
            .write(&self.path, data.as_bytes())
            .map_err(write_err)?;

        tracing::debug!(path = %self.path.display(), skills = manifest.len(), "Manifest saved");
        Ok(())
    }
}
