//! [`WindowManager`] implementation backed by bspwm's socket.
//!
//! Speaks the same protocol as `bspc` directly, avoiding a child process per
//! request.

use super::socket;
use super::BspwmError;
use crate::state::{Id, State};
use crate::traits::WindowManager;
use log::{debug, warn};
use std::path::PathBuf;

/// bspwm-backed window manager.
///
/// No connection is held; each method call opens a short-lived request.
#[derive(Debug, Default)]
pub struct BspwmWm {
    /// Fixed socket path; resolved from the environment when `None`.
    socket: Option<PathBuf>,
}

impl BspwmWm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Talk to the socket at `path` instead of the one named by the
    /// environment.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            socket: Some(path.into()),
        }
    }

    fn request(&self, args: &[&str]) -> Result<Vec<u8>, BspwmError> {
        match &self.socket {
            Some(path) => socket::request_at(path, args),
            None => socket::request(args),
        }
    }

    /// Issue a command whose reply is only diagnostic.
    ///
    /// bspwm answers successful commands with an empty reply; anything else
    /// is surfaced in the log but not interpreted.
    fn bspc(&self, args: &[&str]) -> Result<(), BspwmError> {
        debug!("bspc {}", args.join(" "));
        let response = self.request(args)?;
        if !response.is_empty() {
            warn!(
                "bspc {}: {}",
                args.join(" "),
                String::from_utf8_lossy(&response).trim()
            );
        }
        Ok(())
    }
}

impl WindowManager for BspwmWm {
    type Error = BspwmError;

    fn query_state(&self) -> Result<State, Self::Error> {
        debug!("bspc wm -d");
        let response = self.request(&["wm", "-d"])?;
        Ok(State::from_json(&response)?)
    }

    fn hide_node(&self, node: Id) -> Result<(), Self::Error> {
        let node = node.to_string();
        self.bspc(&["node", node.as_str(), "--flag", "hidden=on"])
    }

    fn move_node_to_desktop(&self, node: Id, desktop: Id) -> Result<(), Self::Error> {
        let (node, desktop) = (node.to_string(), desktop.to_string());
        self.bspc(&["node", node.as_str(), "--to-desktop", desktop.as_str()])
    }

    fn show_and_focus_node(&self, node: Id) -> Result<(), Self::Error> {
        let node = node.to_string();
        self.bspc(&["node", node.as_str(), "--flag", "hidden=off", "--focus"])
    }

    fn focus_previous_node(&self) -> Result<(), Self::Error> {
        self.bspc(&["node", "--focus", "prev"])
    }

    fn set_config(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        self.bspc(&["config", key, value])
    }
}
