pub mod descriptor;
pub mod lifecycle;
pub mod location;
pub mod manifest;
pub mod materialize;

pub use descriptor::{FileMapping, Hooks, SkillConfig, load_descriptor};
pub use lifecycle::{InstallOutcome, SkillInstaller, UninstallOutcome};
pub use location::{InstallKind, InstallLocation, find_project_root, resolve};
pub use manifest::{Manifest, ManifestEntry, ManifestStore};
pub use materialize::{CopiedEntry, CopyReport, copy_declared, copy_required, remove_all};

/// Minimum content of a skill; always copied.
pub const SKILL_FILE: &str = "SKILL.md";
pub const DESCRIPTOR_FILE: &str = ".claude-skill.json";
pub const MANIFEST_FILE: &str = ".skills-manifest.json";
