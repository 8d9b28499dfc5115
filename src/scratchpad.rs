//! Scratchpad windows: applications summoned and dismissed by a hotkey.
//!
//! A [`Scratchpad`] names an application and the `(class, instance)` pair its
//! window carries.  Toggling one works on a fresh [`State`] snapshot:
//!
//! 1. [`Scratchpad::locate`] searches every monitor, desktop and layout tree
//!    for the window.
//! 2. If it is found, [`SearchResult::toggle`] issues the minimal sequence
//!    of requests: hide it when it is the frontmost window, otherwise pull it
//!    onto the focused desktop (if needed) and show and focus it.
//! 3. If it is not found, the application is launched and bspwm picks up the
//!    new window on its own.
//!
//! [`ScratchpadManager`] runs this flow for a key from a [`Registry`].

use crate::spawn::{spawn_detached, SpawnError};
use crate::state::{Client, Desktop, InconsistentStateError, Monitor, Node, State};
use crate::traits::WindowManager;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// Static description of a scratchpad application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scratchpad {
    /// Human-readable name, used in logs.
    pub name: String,
    /// Argument vector that starts the application.
    pub command: Vec<String>,
    /// `WM_CLASS` class of the application's window.
    pub class_name: String,
    /// `WM_CLASS` instance of the application's window.
    pub instance_name: String,
}

/// Scratchpads by hotkey.
pub type Registry = BTreeMap<String, Scratchpad>;

/// Errors from locating, toggling or launching a scratchpad.
#[derive(Debug, thiserror::Error)]
pub enum ScratchpadError {
    #[error("no such scratchpad: {0}")]
    UnknownScratchpad(String),
    /// The window manager returned an error.
    #[error("window manager error: {0}")]
    WindowManager(String),
    #[error("toggle scratchpad: {0}")]
    InconsistentState(#[from] InconsistentStateError),
    #[error("start scratchpad: {0}")]
    Launch(#[from] SpawnError),
    #[error("start scratchpad: cannot determine home directory")]
    NoHomeDir,
}

fn wm_error(e: impl fmt::Display) -> ScratchpadError {
    ScratchpadError::WindowManager(e.to_string())
}

/// What a toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The window was frontmost and has been hidden.
    Hidden,
    /// The window has been shown and focused, after being moved onto the
    /// focused desktop when `moved` is set.
    Shown { moved: bool },
    /// No window existed; the application was started.
    Launched,
}

/// A window located in a snapshot, with its enclosing desktop and monitor.
#[derive(Debug, Clone, Copy)]
pub struct SearchResult<'a> {
    pub node: &'a Node,
    pub desktop: &'a Desktop,
    pub monitor: &'a Monitor,
}

fn scratchpad(name: &str, command: &[&str], class_name: &str, instance_name: &str) -> Scratchpad {
    Scratchpad {
        name: name.into(),
        command: command.iter().map(|s| s.to_string()).collect(),
        class_name: class_name.into(),
        instance_name: instance_name.into(),
    }
}

const BROWSER_PROFILE: &str = "--user-data-dir=.local/share/browser-scratchpad";

/// The built-in scratchpads.
pub fn default_registry() -> Registry {
    let web_app = |name: &str, host: &str| {
        let app = format!("--app=https://{}", host);
        scratchpad(
            name,
            &["google-chrome", BROWSER_PROFILE, app.as_str()],
            "Google-chrome",
            host,
        )
    };
    let mut registry = Registry::new();
    registry.insert(
        "u".into(),
        scratchpad("terminal", &["urxvtmux", "scratchpad"], "URxvt", "scratchpad"),
    );
    registry.insert("d".into(), scratchpad("arandr", &["arandr"], "Arandr", "arandr"));
    registry.insert(
        "h".into(),
        scratchpad(
            "browser",
            &["google-chrome", BROWSER_PROFILE],
            "Google-chrome",
            "google-chrome (.local/share/browser-scratchpad)",
        ),
    );
    registry.insert(
        "t".into(),
        scratchpad("keepassxc", &["keepassxc"], "keepassxc", "keepassxc"),
    );
    // Spotify maps its window before setting WM_CLASS, so bspwm records it
    // with an empty class and instance.
    registry.insert("n".into(), scratchpad("spotify", &["spotify"], "", ""));
    registry.insert("s".into(), scratchpad("slack", &["slack"], "Slack", "slack"));
    registry.insert("g".into(), web_app("mail", "mail.google.com"));
    registry.insert("c".into(), web_app("calendar", "calendar.google.com"));
    registry.insert("r".into(), web_app("drive", "drive.google.com"));
    registry.insert("l".into(), web_app("meet", "meet.google.com"));
    registry
}

impl Scratchpad {
    /// Exact match on both class and instance.
    pub fn matches(&self, client: &Client) -> bool {
        client.class_name == self.class_name && client.instance_name == self.instance_name
    }

    /// Find the first window carrying this scratchpad's identity.
    ///
    /// Monitors and desktops are visited in snapshot order; each layout
    /// tree is searched pre-order (node, first child, second child).
    pub fn locate<'a>(&self, state: &'a State) -> Option<SearchResult<'a>> {
        state.monitors.iter().find_map(|monitor| {
            monitor.desktops.iter().find_map(|desktop| {
                let node = self.search_node(desktop.root.as_deref()?)?;
                Some(SearchResult {
                    node,
                    desktop,
                    monitor,
                })
            })
        })
    }

    fn search_node<'a>(&self, node: &'a Node) -> Option<&'a Node> {
        if node.client.as_ref().is_some_and(|c| self.matches(c)) {
            return Some(node);
        }
        node.first_child
            .as_deref()
            .and_then(|child| self.search_node(child))
            .or_else(|| {
                node.second_child
                    .as_deref()
                    .and_then(|child| self.search_node(child))
            })
    }

    /// Start the application from the user's home directory.
    pub fn launch(&self) -> Result<(), ScratchpadError> {
        if self.command.is_empty() {
            return Err(SpawnError::EmptyCommand.into());
        }
        let home = dirs_next::home_dir().ok_or(ScratchpadError::NoHomeDir)?;
        self.launch_in(&home)
    }

    /// Start the application from `dir`, without waiting for it.
    pub fn launch_in(&self, dir: &Path) -> Result<(), ScratchpadError> {
        info!("starting {}: {}", self.name, self.command.join(" "));
        spawn_detached(&self.command, Some(dir))?;
        Ok(())
    }
}

impl SearchResult<'_> {
    /// `true` when the window is the focused node of the focused desktop of
    /// the focused monitor.
    pub fn is_focused(&self, state: &State) -> bool {
        state.focused_monitor_id == self.monitor.id
            && self.monitor.focused_desktop_id == self.desktop.id
            && self.desktop.focused_node_id == self.node.id
    }

    /// Hide the window if it is frontmost, otherwise bring it to the front.
    ///
    /// Bringing to the front moves the window to the focused desktop when it
    /// lives elsewhere, then shows and focuses it.  A window that is visible
    /// but not focused is focused rather than hidden.
    pub fn toggle<W: WindowManager>(
        &self,
        wm: &W,
        state: &State,
    ) -> Result<Outcome, ScratchpadError> {
        let node = self.node.id;
        if self.is_focused(state) {
            debug!("node {} is frontmost, hiding", node);
            wm.hide_node(node).map_err(wm_error)?;
            return Ok(Outcome::Hidden);
        }

        let focused_desktop = state.focused_desktop()?;
        let moved = self.desktop.id != focused_desktop.id;
        if moved {
            debug!(
                "moving node {} from desktop {} to desktop {}",
                node, self.desktop.id, focused_desktop.id
            );
            wm.move_node_to_desktop(node, focused_desktop.id)
                .map_err(wm_error)?;
        }
        wm.show_and_focus_node(node).map_err(wm_error)?;
        Ok(Outcome::Shown { moved })
    }
}

/// Toggles scratchpads from a registry against a live window manager.
///
/// Every call loads a fresh snapshot; nothing is cached between calls.
pub struct ScratchpadManager<W: WindowManager> {
    wm: W,
    registry: Registry,
}

impl<W: WindowManager> ScratchpadManager<W> {
    pub fn new(wm: W, registry: Registry) -> Self {
        Self { wm, registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Toggle the scratchpad bound to `key`, launching it if its window does
    /// not exist.
    pub fn toggle(&self, key: &str) -> Result<Outcome, ScratchpadError> {
        let scratchpad = self
            .registry
            .get(key)
            .ok_or_else(|| ScratchpadError::UnknownScratchpad(key.to_string()))?;
        info!("toggle scratchpad {} ({})", key, scratchpad.name);

        let state = self.wm.query_state().map_err(wm_error)?;
        let outcome = match scratchpad.locate(&state) {
            Some(found) => {
                debug!(
                    "found {} as node {} on desktop {} of monitor {}",
                    scratchpad.name, found.node.id, found.desktop.name, found.monitor.name
                );
                found.toggle(&self.wm, &state)?
            }
            None => {
                scratchpad.launch()?;
                Outcome::Launched
            }
        };
        info!("{}: {:?}", scratchpad.name, outcome);
        Ok(outcome)
    }
}
