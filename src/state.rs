//! Snapshot of bspwm's layout tree.
//!
//! bspwm answers `wm -d` with a JSON document describing every monitor, its
//! desktops and the binary layout tree of each desktop.  The types here are a
//! read-only mirror of that document: a [`State`] is loaded fresh for every
//! invocation and discarded once a decision has been made, so it never acts
//! as local truth.
//!
//! Only the fields this crate reads (plus a few cheap ones useful for
//! logging) are modelled; everything else in the document is ignored.

use serde::Deserialize;

/// Identifier bspwm assigns to monitors, desktops and nodes.
///
/// Node identifiers are X window ids; `0` means "none" wherever bspwm
/// reports a focused id.
pub type Id = u32;

/// Root of a `wm -d` snapshot.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    pub focused_monitor_id: Id,
    pub primary_monitor_id: Id,
    #[serde(default)]
    pub clients_count: usize,
    pub monitors: Vec<Monitor>,
}

/// A physical display.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monitor {
    pub name: String,
    pub id: Id,
    #[serde(default)]
    pub randr_id: u32,
    #[serde(default)]
    pub wired: bool,
    pub focused_desktop_id: Id,
    #[serde(default)]
    pub rectangle: Rectangle,
    pub desktops: Vec<Desktop>,
}

/// A virtual desktop and its layout tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Desktop {
    pub name: String,
    pub id: Id,
    #[serde(default)]
    pub layout: String,
    pub focused_node_id: Id,
    /// `None` for a desktop without any windows.
    pub root: Option<Box<Node>>,
}

/// One element of a desktop's binary layout tree.
///
/// An internal node carries two children and no client; a leaf carries a
/// client, or nothing at all for an empty receptacle.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: Id,
    #[serde(default)]
    pub split_type: String,
    #[serde(default)]
    pub vacant: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub sticky: bool,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub rectangle: Rectangle,
    #[serde(default)]
    pub first_child: Option<Box<Node>>,
    #[serde(default)]
    pub second_child: Option<Box<Node>>,
    #[serde(default)]
    pub client: Option<Client>,
}

/// The concrete X window held by a leaf node.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub class_name: String,
    pub instance_name: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub layer: String,
    #[serde(default)]
    pub urgent: bool,
    #[serde(default)]
    pub shown: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Rectangle {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// The snapshot refers to an id it does not contain.
///
/// This means bspwm's own state is self-contradictory; there is nothing
/// sensible to fall back to.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InconsistentStateError {
    #[error("no monitor for id: {0}")]
    NoMonitor(Id),
    #[error("no desktop for id: {0}")]
    NoDesktop(Id),
}

impl State {
    /// Decode the response to `wm -d`.
    pub fn from_json(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// The monitor named by `focused_monitor_id`.
    pub fn focused_monitor(&self) -> Result<&Monitor, InconsistentStateError> {
        self.monitors
            .iter()
            .find(|m| m.id == self.focused_monitor_id)
            .ok_or(InconsistentStateError::NoMonitor(self.focused_monitor_id))
    }

    /// The focused desktop of the focused monitor.
    pub fn focused_desktop(&self) -> Result<&Desktop, InconsistentStateError> {
        self.focused_monitor()?.focused_desktop()
    }
}

impl Monitor {
    pub fn focused_desktop(&self) -> Result<&Desktop, InconsistentStateError> {
        self.desktops
            .iter()
            .find(|d| d.id == self.focused_desktop_id)
            .ok_or(InconsistentStateError::NoDesktop(self.focused_desktop_id))
    }
}

impl Node {
    /// `true` when the node has no children.
    pub fn is_leaf(&self) -> bool {
        self.first_child.is_none() && self.second_child.is_none()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A trimmed-down but structurally faithful `wm -d` response: one
    /// monitor, desktop 10 focused with a split, desktop 11 holding a
    /// keepassxc window in node 5.
    pub(crate) const SNAPSHOT: &str = r#"{
        "focusedMonitorId": 1,
        "primaryMonitorId": 1,
        "clientsCount": 3,
        "monitors": [{
            "name": "eDP-1",
            "id": 1,
            "randrId": 66,
            "wired": true,
            "stickyCount": 0,
            "windowGap": 6,
            "borderWidth": 1,
            "focusedDesktopId": 10,
            "padding": {"top": 0, "right": 0, "bottom": 0, "left": 0},
            "rectangle": {"x": 0, "y": 0, "width": 1920, "height": 1080},
            "desktops": [
                {
                    "name": "1",
                    "id": 10,
                    "layout": "tiled",
                    "focusedNodeId": 2,
                    "root": {
                        "id": 1,
                        "splitType": "vertical",
                        "splitRatio": 0.5,
                        "vacant": false,
                        "hidden": false,
                        "sticky": false,
                        "private": false,
                        "locked": false,
                        "presel": null,
                        "rectangle": {"x": 0, "y": 0, "width": 1920, "height": 1080},
                        "firstChild": {
                            "id": 2,
                            "splitType": "vertical",
                            "rectangle": {"x": 0, "y": 0, "width": 960, "height": 1080},
                            "firstChild": null,
                            "secondChild": null,
                            "client": {
                                "className": "URxvt",
                                "instanceName": "urxvt",
                                "borderWidth": 1,
                                "state": "tiled",
                                "lastState": "tiled",
                                "layer": "normal",
                                "lastLayer": "normal",
                                "urgent": false,
                                "shown": true
                            }
                        },
                        "secondChild": {
                            "id": 3,
                            "firstChild": null,
                            "secondChild": null,
                            "client": {
                                "className": "Google-chrome",
                                "instanceName": "google-chrome",
                                "shown": true
                            }
                        },
                        "client": null
                    }
                },
                {
                    "name": "2",
                    "id": 11,
                    "layout": "monocle",
                    "focusedNodeId": 5,
                    "root": {
                        "id": 5,
                        "hidden": true,
                        "firstChild": null,
                        "secondChild": null,
                        "client": {
                            "className": "keepassxc",
                            "instanceName": "keepassxc",
                            "state": "floating",
                            "shown": false
                        }
                    }
                },
                {
                    "name": "3",
                    "id": 12,
                    "layout": "tiled",
                    "focusedNodeId": 0,
                    "root": null
                }
            ]
        }]
    }"#;

    pub(crate) fn snapshot() -> State {
        State::from_json(SNAPSHOT.as_bytes()).unwrap()
    }

    #[test]
    fn decode_snapshot() {
        let state = snapshot();
        assert_eq!(state.focused_monitor_id, 1);
        assert_eq!(state.primary_monitor_id, 1);
        assert_eq!(state.clients_count, 3);
        assert_eq!(state.monitors.len(), 1);

        let monitor = &state.monitors[0];
        assert_eq!(monitor.name, "eDP-1");
        assert_eq!(monitor.rectangle.width, 1920);
        assert_eq!(monitor.desktops.len(), 3);

        let root = monitor.desktops[0].root.as_ref().unwrap();
        assert!(root.client.is_none());
        assert!(!root.is_leaf());
        let first = root.first_child.as_ref().unwrap();
        assert!(first.is_leaf());
        assert_eq!(first.client.as_ref().unwrap().class_name, "URxvt");

        let parked = monitor.desktops[1].root.as_ref().unwrap();
        assert!(parked.hidden);
        assert!(!parked.client.as_ref().unwrap().shown);

        assert!(monitor.desktops[2].root.is_none());
    }

    #[test]
    fn decode_rejects_malformed_json() {
        assert!(State::from_json(b"not json").is_err());
        assert!(State::from_json(b"").is_err());
    }

    #[test]
    fn decode_rejects_schema_mismatch() {
        // `monitors` missing.
        let json = r#"{ "focusedMonitorId": 1, "primaryMonitorId": 1 }"#;
        assert!(State::from_json(json.as_bytes()).is_err());
        // Id of the wrong type.
        let json = r#"{ "focusedMonitorId": "one", "primaryMonitorId": 1, "monitors": [] }"#;
        assert!(State::from_json(json.as_bytes()).is_err());
    }

    #[test]
    fn focused_desktop_resolves() {
        let state = snapshot();
        assert_eq!(state.focused_monitor().unwrap().id, 1);
        let desktop = state.focused_desktop().unwrap();
        assert_eq!(desktop.id, 10);
        assert_eq!(desktop.name, "1");
    }

    #[test]
    fn focused_desktop_fails_without_focused_monitor() {
        let mut state = snapshot();
        state.focused_monitor_id = 99;
        assert_eq!(
            state.focused_desktop(),
            Err(InconsistentStateError::NoMonitor(99))
        );
    }

    #[test]
    fn focused_desktop_fails_without_focused_desktop() {
        let mut state = snapshot();
        state.monitors[0].focused_desktop_id = 42;
        assert_eq!(
            state.focused_desktop(),
            Err(InconsistentStateError::NoDesktop(42))
        );
    }
}
