use anyhow::Result;
use console::style;
use skillpack_core::{
    HookStatus, InstallLocation, Settings, SkillInstaller, UninstallOutcome, config,
};
use std::path::PathBuf;

/// Flag overrides layered on top of the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bundle: Option<PathBuf>,
    pub global: bool,
}

impl Overrides {
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if self.global {
            settings = settings.with_global(true);
        }
        if let Some(bundle) = &self.bundle {
            settings = settings.with_bundle_dir(bundle);
        }
        settings
    }
}

/// Only install can fail; uninstall and list report problems and succeed.
pub fn handle_command(command: SkillsCommands, overrides: &Overrides) -> Result<()> {
    match command {
        SkillsCommands::Install => install_skill(overrides),
        SkillsCommands::Uninstall => {
            uninstall_skill(overrides);
            Ok(())
        }
        SkillsCommands::List => {
            list_skills(overrides);
            Ok(())
        }
    }
}

fn install_skill(overrides: &Overrides) -> Result<()> {
    let settings = overrides.apply(Settings::from_env()?);
    let installer = SkillInstaller::new(settings);

    println!("{} Installing skill...", style("→").cyan());
    println!();

    let outcome = installer.install()?;

    println!("Installation type: {}", outcome.location.kind);
    println!("Target directory: {}", outcome.target_dir.display());
    println!();
    println!("{} Copied SKILL.md", style("✓").green());
    for entry in &outcome.copied {
        let what = if entry.is_dir { "directory" } else { "file" };
        println!("{} Copied {}: {}", style("✓").green(), what, entry.source);
    }
    for warning in &outcome.warnings {
        println!("{} Warning: {}", style("!").yellow(), warning);
    }

    if let Some(HookStatus::Succeeded) = outcome.hook {
        println!("{} Ran postinstall hook", style("✓").green());
    }

    println!();
    println!(
        "{} Skill installed successfully!",
        style("✓").green().bold()
    );
    println!();
    println!("Location: {}", outcome.target_dir.display());
    println!("Type: {} skill", outcome.location.kind);
    println!();
    println!("Usage:");
    println!("  Ask Claude: \"What skills are available?\"");

    Ok(())
}

fn uninstall_skill(overrides: &Overrides) {
    let settings = match Settings::from_env() {
        Ok(settings) => overrides.apply(settings),
        Err(e) => {
            eprintln!("{} Warning during uninstall: {:#}", style("!").yellow(), e);
            return;
        }
    };

    println!("{} Uninstalling skill...", style("→").cyan());
    println!();

    match SkillInstaller::new(settings).uninstall() {
        UninstallOutcome::Skipped { reason } => {
            println!(
                "{} Warning: {}, skipping cleanup",
                style("!").yellow(),
                reason
            );
        }
        UninstallOutcome::NotInstalled { target_dir } => {
            println!(
                "{} Skill was not installed at {}, nothing to remove",
                style("i").blue(),
                target_dir.display()
            );
        }
        UninstallOutcome::Removed {
            target_dir,
            warnings,
        } => {
            println!("Uninstalled from: {}", target_dir.display());
            for warning in &warnings {
                println!("{} Warning: {}", style("!").yellow(), warning);
            }
            println!();
            println!(
                "{} Skill uninstalled successfully!",
                style("✓").green().bold()
            );
        }
    }
}

fn list_skills(overrides: &Overrides) {
    let settings = match Settings::from_env() {
        Ok(settings) => overrides.apply(settings),
        Err(e) => {
            eprintln!("{} {:#}", style("!").yellow(), e);
            return;
        }
    };

    let (location, entries) = SkillInstaller::new(settings).installed();

    if entries.is_empty() {
        println!(
            "{} No skills installed ({} scope)",
            style("!").yellow(),
            location.kind
        );
        println!();
        print_install_help(&location);
        return;
    }

    println!(
        "{} Installed {} skills ({})",
        style("✓").green().bold(),
        location.kind,
        entries.len()
    );
    println!();

    for (name, entry) in entries {
        println!(
            "  {} {}",
            style(&name).white().bold(),
            style(format!("v{}", entry.version)).dim()
        );
        println!("    Package: {}", entry.package);
        println!("    Installed: {}", entry.installed_at);
        println!("    Path: {}", entry.path);
        println!();
    }
}

fn print_install_help(location: &InstallLocation) {
    println!("Skills are recorded in {}", location.base.display());
    println!("Install one from its bundle directory:");
    println!("  {}=<bundle-dir> skillpack install", config::BUNDLE_DIR_ENV);
}

#[derive(clap::Subcommand, Clone, Debug)]
pub enum SkillsCommands {
    /// Copy the bundle into the resolved skills directory (default)
    Install,
    /// Remove the skill directory and its manifest entry
    Uninstall,
    /// Show skills recorded in the manifest
    List,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        Settings {
            global: false,
            bundle_dir: PathBuf::from("/bundle"),
            cwd: PathBuf::from("/work"),
            home_dir: PathBuf::from("/home/me"),
        }
    }

    #[test]
    fn overrides_default_keeps_env() {
        let applied = Overrides::default().apply(settings());
        assert_eq!(applied, settings());
    }

    #[test]
    fn overrides_force_global_and_bundle() {
        let overrides = Overrides {
            bundle: Some(PathBuf::from("/other")),
            global: true,
        };
        let applied = overrides.apply(settings());
        assert!(applied.global);
        assert_eq!(applied.bundle_dir, PathBuf::from("/other"));
    }

    #[test]
    fn global_flag_cannot_be_unset_by_overrides() {
        let applied = Overrides::default().apply(settings().with_global(true));
        assert!(applied.global);
    }
}
