pub mod config;
pub mod error;
pub mod fs;
pub mod hooks;
pub mod skills;

pub use config::Settings;
pub use error::{Result, SkillError};
pub use fs::{FileSystem, LocalFileSystem};
pub use hooks::{HookRunner, HookStatus, ShellHookRunner};
pub use skills::*;
