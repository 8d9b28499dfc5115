//! Entry point for **bspwmrc**.
//!
//! bspwm runs the binary without arguments at startup (and on reload) to
//! configure the desktop; key bindings and a periodic scheduler run it with
//! one of the other subcommands.  Each invocation loads the configuration,
//! performs its single operation and exits.  Failures are logged and end the
//! invocation with a non-zero status.

use bspwmrc::bspwm::wm::BspwmWm;
use bspwmrc::command::{Cli, Command};
use bspwmrc::config::{config_dir, Config};
use bspwmrc::notify::DesktopNotifier;
use bspwmrc::session::{Session, SessionError};
use clap::Parser;
use log::{error, info};

/// Try to load the config from `$XDG_CONFIG_HOME/bspwmrc/config.json`,
/// falling back to compiled-in defaults.
fn load_config() -> Config {
    let path = config_dir().join("config.json");
    match Config::load(&path) {
        Ok(cfg) => {
            info!("loaded config from {}", path.display());
            cfg
        }
        Err(e) => {
            info!("no config file ({}), using defaults", e);
            Config::default()
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let command = cli.command();
    let session = Session::new(BspwmWm::new(), DesktopNotifier, load_config());

    if let Err(e) = dispatch(&session, &command) {
        error!("{:?} failed: {}", command, e);
        std::process::exit(1);
    }
}

fn dispatch(
    session: &Session<BspwmWm, DesktopNotifier>,
    command: &Command,
) -> Result<(), SessionError> {
    match command {
        Command::Config => session.configure(),
        Command::ToggleScratchpad { key } => session.toggle_scratchpad(key).map(|_| ()),
        Command::Cron => session.cron(),
        Command::Run => session.run_launcher(),
        Command::Clock => session.clock(),
        Command::BatteryCharge => session.battery_charge(),
        Command::Prev => session.focus_previous(),
    }
}
