//! The command-line vocabulary.
//!
//! Every invocation performs exactly one [`Command`]; running the binary
//! without one behaves like [`Command::Config`], which is how bspwm runs its
//! `bspwmrc` at startup.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bspwmrc", about = "Desktop controller for bspwm", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// The requested command, defaulting to [`Command::Config`].
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Config)
    }
}

/// Every operation the controller can perform.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Configure bspwm, reload auxiliary daemons and run setup commands.
    Config,
    /// Show, focus, hide or launch the scratchpad bound to `key`.
    ToggleScratchpad { key: String },
    /// Periodic check: warn about low batteries.
    Cron,
    /// Open the application launcher.
    Run,
    /// Show the date and time.
    Clock,
    /// Show the charge of every battery.
    BatteryCharge,
    /// Focus the previously focused window.
    Prev,
}
