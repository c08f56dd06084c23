use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::transition::TransitionKind;

#[derive(Parser)]
#[command(name = "slidectl")]
#[command(author, version, about)]
#[command(long_about = "A slide presentation controller.\n\n\
    Present a markdown deck with keyboard, click and swipe navigation.\n\n\
    Examples:\n  \
    slidectl                      Present the bundled sample deck\n  \
    slidectl deck.md              Present deck.md in a window\n  \
    slidectl deck.md --slide 4    Start on slide 4\n  \
    slidectl console deck.md      Drive the navigator from the terminal")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Markdown deck to present (defaults to the bundled sample deck)
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Keep the window at its normal size instead of going fullscreen
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Start on a specific slide (1-indexed)
    #[arg(long, global = false)]
    pub slide: Option<usize>,

    /// Swap slides instantly and turn off decorative effects
    #[arg(long, global = false)]
    pub no_animation: bool,

    /// Transition style
    #[arg(long, value_enum, global = false)]
    pub transition: Option<TransitionArg>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Drive the navigator from an interactive prompt
    Console {
        /// Markdown deck (defaults to the bundled sample deck)
        file: Option<PathBuf>,

        /// Print slide info as JSON
        #[arg(long)]
        json: bool,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.theme, defaults.transition, defaults.settle_ms)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum TransitionArg {
    Slide,
    Fade,
    None,
}

impl TransitionArg {
    pub fn kind(self) -> TransitionKind {
        match self {
            Self::Slide => TransitionKind::SlideHorizontal,
            Self::Fade => TransitionKind::Fade,
            Self::None => TransitionKind::None,
        }
    }
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Console { file, json }) => crate::commands::console::run(file, json),
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            Some(Commands::Version) => {
                println!("slidectl {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
            None => {
                if let Some(file) = &self.file {
                    if !file.exists() {
                        anyhow::bail!("File not found: {}", file.display());
                    }
                }
                crate::app::run(crate::app::LaunchOptions {
                    file: self.file,
                    windowed: self.windowed,
                    start_slide: self.slide,
                    animated: self.no_animation.then_some(false),
                    transition: self.transition.map(TransitionArg::kind),
                })
            }
        }
    }
}
