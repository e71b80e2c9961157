use clap::Parser;
use console::style;
use skillpack_core::config::BUNDLE_DIR_ENV;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
mod skills;

use skills::SkillsCommands;

#[derive(Parser)]
#[command(name = "skillpack")]
#[command(about = "skillpack - install Claude skill bundles", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<SkillsCommands>,

    /// Directory holding .claude-skill.json and SKILL.md
    #[arg(long, global = true, env = BUNDLE_DIR_ENV)]
    bundle: Option<PathBuf>,

    /// Install into ~/.claude/skills instead of the project
    #[arg(long, global = true)]
    global: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(SkillsCommands::Install);
    let overrides = skills::Overrides {
        bundle: cli.bundle,
        global: cli.global,
    };

    match skills::handle_command(command, &overrides) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!();
            eprintln!("{} Failed to install skill: {:#}", style("✗").red().bold(), e);
            eprintln!();
            eprintln!("Troubleshooting:");
            eprintln!("- Ensure .claude-skill.json exists and is valid JSON");
            eprintln!("- Ensure SKILL.md exists");
            eprintln!("- Check file permissions for ~/.claude directory");
            eprintln!("- Try running with sudo for global installation (if needed)");
            ExitCode::FAILURE
        }
    }
}
