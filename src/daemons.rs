//! Auxiliary background processes that live alongside bspwm.
//!
//! Reloading the desktop brings each daemon into its expected state
//! according to its [`Policy`].  Deciding what to do ([`plan`]) is separate
//! from doing it ([`reload`]) so the decision can be checked without a
//! process table.

use crate::spawn::{spawn_detached, SpawnError};
use crate::xrdb::Resources;
use log::info;
use std::ffi::OsStr;
use sysinfo::{Process, Signal, System};

/// Fallback `dunst -geometry` when the X resources do not set one.
pub const DEFAULT_DUNST_GEOMETRY: &str = "200x5-30+30";

/// How a daemon is brought up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Send `SIGUSR1` to reread configuration; start it if absent.
    Signal,
    /// Kill any running instance, then start a new one.
    Restart,
    /// Start it only if absent.
    EnsureRunning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Daemon {
    /// Process name as listed in the process table.
    pub name: String,
    pub command: Vec<String>,
    pub policy: Policy,
}

/// A single step of a reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Signal(String),
    Kill(String),
    Spawn(Vec<String>),
}

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("reload {0}: signal failed")]
    Signal(String),
    #[error("reload {0}: kill failed")]
    Kill(String),
    #[error("reload processes: {0}")]
    Spawn(#[from] SpawnError),
}

fn daemon(name: &str, command: &[&str], policy: Policy) -> Daemon {
    Daemon {
        name: name.into(),
        command: command.iter().map(|s| s.to_string()).collect(),
        policy,
    }
}

/// The daemons of this desktop, in reload order.
pub fn default_daemons(resources: &Resources) -> Vec<Daemon> {
    let geometry = if resources.dunst.geometry.is_empty() {
        DEFAULT_DUNST_GEOMETRY
    } else {
        resources.dunst.geometry.as_str()
    };
    vec![
        daemon("sxhkd", &["sxhkd", "-t", "1"], Policy::Signal),
        daemon("dunst", &["dunst", "-geometry", geometry], Policy::Restart),
        daemon(
            "xcape",
            &["xcape", "-e", "Control_L=Escape;Hyper_L=Tab", "-t", "250"],
            Policy::Restart,
        ),
        daemon(
            "urxvtd",
            &["urxvtd", "--quiet", "--fork", "--opendisplay"],
            Policy::EnsureRunning,
        ),
    ]
}

/// Decide the actions that bring `daemons` up to date.
pub fn plan(daemons: &[Daemon], is_running: impl Fn(&str) -> bool) -> Vec<Action> {
    let mut actions = Vec::new();
    for d in daemons {
        let running = is_running(&d.name);
        match (d.policy, running) {
            (Policy::Signal, true) => actions.push(Action::Signal(d.name.clone())),
            (Policy::Restart, true) => {
                actions.push(Action::Kill(d.name.clone()));
                actions.push(Action::Spawn(d.command.clone()));
            }
            (Policy::EnsureRunning, true) => {}
            (_, false) => actions.push(Action::Spawn(d.command.clone())),
        }
    }
    actions
}

/// Processes named `name`, excluding the thread entries Linux lists
/// alongside them.
fn processes_named<'a>(system: &'a System, name: &str) -> Vec<&'a Process> {
    system
        .processes_by_exact_name(OsStr::new(name))
        .filter(|p| p.thread_kind().is_none())
        .collect()
}

/// Reload `daemons` against the live process table.
pub fn reload(daemons: &[Daemon]) -> Result<(), DaemonError> {
    let system = System::new_all();
    let processes = |name: &str| processes_named(&system, name);

    for action in plan(daemons, |name| !processes(name).is_empty()) {
        match action {
            Action::Signal(name) => {
                info!("reloading {}", name);
                for p in processes(&name) {
                    if p.kill_with(Signal::User1) != Some(true) {
                        return Err(DaemonError::Signal(name));
                    }
                }
            }
            Action::Kill(name) => {
                info!("killing {}", name);
                for p in processes(&name) {
                    if !p.kill() {
                        return Err(DaemonError::Kill(name));
                    }
                }
            }
            Action::Spawn(command) => {
                info!("starting {}", command.join(" "));
                spawn_detached(&command, None)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn nothing_running_starts_everything() {
        let daemons = default_daemons(&Resources::default());
        let actions = plan(&daemons, |_| false);
        assert_eq!(
            actions,
            vec![
                Action::Spawn(argv(&["sxhkd", "-t", "1"])),
                Action::Spawn(argv(&["dunst", "-geometry", DEFAULT_DUNST_GEOMETRY])),
                Action::Spawn(argv(&["xcape", "-e", "Control_L=Escape;Hyper_L=Tab", "-t", "250"])),
                Action::Spawn(argv(&["urxvtd", "--quiet", "--fork", "--opendisplay"])),
            ]
        );
    }

    #[test]
    fn everything_running_reloads_in_place() {
        let daemons = default_daemons(&Resources::default());
        let actions = plan(&daemons, |_| true);
        assert_eq!(
            actions,
            vec![
                Action::Signal("sxhkd".into()),
                Action::Kill("dunst".into()),
                Action::Spawn(argv(&["dunst", "-geometry", DEFAULT_DUNST_GEOMETRY])),
                Action::Kill("xcape".into()),
                Action::Spawn(argv(&["xcape", "-e", "Control_L=Escape;Hyper_L=Tab", "-t", "250"])),
            ]
        );
    }

    #[test]
    fn dunst_geometry_comes_from_resources() {
        let mut resources = Resources::default();
        resources.dunst.geometry = "300x5-10+10".into();
        let daemons = default_daemons(&resources);
        let dunst = daemons.iter().find(|d| d.name == "dunst").unwrap();
        assert_eq!(dunst.command, argv(&["dunst", "-geometry", "300x5-10+10"]));
    }

    #[test]
    fn restart_of_absent_daemon_only_spawns() {
        let daemons = vec![daemon("dunst", &["dunst"], Policy::Restart)];
        assert_eq!(plan(&daemons, |_| false), vec![Action::Spawn(argv(&["dunst"]))]);
    }

    #[test]
    fn thread_entries_are_not_processes() {
        // The test harness runs this on a worker thread, so the current
        // process always has at least two tasks.
        let system = System::new_all();
        let own = sysinfo::get_current_pid().unwrap();
        let name = system.process(own).unwrap().name().to_string_lossy().into_owned();

        let found = processes_named(&system, &name);
        assert!(found.iter().any(|p| p.pid() == own));
        assert!(found.iter().all(|p| p.thread_kind().is_none()));
    }
}
