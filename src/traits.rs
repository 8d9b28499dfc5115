//! Core traits that decouple bspwmrc from the bspwm transport and the
//! notification daemon.
//!
//! The concrete backends are [`BspwmWm`](crate::bspwm::wm::BspwmWm) and
//! [`DesktopNotifier`](crate::notify::DesktopNotifier); the
//! [`ScratchpadManager`](crate::scratchpad::ScratchpadManager) and the
//! [`session`](crate::session) operations only depend on these abstractions.

use crate::notify::Message;
use crate::state::{Id, State};

/// Abstraction over the bspwm requests this crate issues.
///
/// An implementation might talk to bspwm over its socket, or it might be a
/// recording stub used in tests.  Every call is a blocking request/response;
/// implementations apply no retries.
pub trait WindowManager {
    /// The error type produced by this window manager.
    type Error: std::error::Error + Send + 'static;

    /// Fetch a fresh snapshot of the whole layout tree.
    fn query_state(&self) -> Result<State, Self::Error>;

    /// Set the hidden flag on `node`.
    fn hide_node(&self, node: Id) -> Result<(), Self::Error>;

    /// Send `node` to `desktop`.
    fn move_node_to_desktop(&self, node: Id, desktop: Id) -> Result<(), Self::Error>;

    /// Clear the hidden flag on `node` and focus it.
    fn show_and_focus_node(&self, node: Id) -> Result<(), Self::Error>;

    /// Focus the previously focused node.
    fn focus_previous_node(&self) -> Result<(), Self::Error>;

    /// Set a global window manager setting.
    fn set_config(&self, key: &str, value: &str) -> Result<(), Self::Error>;
}

impl<W: WindowManager + ?Sized> WindowManager for &W {
    type Error = W::Error;

    fn query_state(&self) -> Result<State, Self::Error> {
        (**self).query_state()
    }

    fn hide_node(&self, node: Id) -> Result<(), Self::Error> {
        (**self).hide_node(node)
    }

    fn move_node_to_desktop(&self, node: Id, desktop: Id) -> Result<(), Self::Error> {
        (**self).move_node_to_desktop(node, desktop)
    }

    fn show_and_focus_node(&self, node: Id) -> Result<(), Self::Error> {
        (**self).show_and_focus_node(node)
    }

    fn focus_previous_node(&self) -> Result<(), Self::Error> {
        (**self).focus_previous_node()
    }

    fn set_config(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        (**self).set_config(key, value)
    }
}

/// A sink for desktop notifications.
pub trait Notifier {
    type Error: std::error::Error + Send + 'static;

    /// Display `message`.  Delivery is fire-and-forget.
    fn send(&self, message: &Message) -> Result<(), Self::Error>;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;

    //  Mock WindowManager

    /// A test double that serves a fixed snapshot and records every call
    /// made to it, rendered the way bspc would spell it.
    #[derive(Debug, Default)]
    pub(crate) struct MockWm {
        pub state: Option<State>,
        pub log: RefCell<Vec<String>>,
        pub fail: bool,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("mock error")]
    pub(crate) struct MockError;

    impl MockWm {
        pub fn with_state(state: State) -> Self {
            Self {
                state: Some(state),
                ..Self::default()
            }
        }

        pub fn calls(&self) -> Vec<String> {
            self.log.borrow().clone()
        }

        fn record(&self, call: String) -> Result<(), MockError> {
            if self.fail {
                return Err(MockError);
            }
            self.log.borrow_mut().push(call);
            Ok(())
        }
    }

    impl WindowManager for MockWm {
        type Error = MockError;

        fn query_state(&self) -> Result<State, MockError> {
            self.state.clone().ok_or(MockError)
        }

        fn hide_node(&self, node: Id) -> Result<(), MockError> {
            self.record(format!("hide node {}", node))
        }

        fn move_node_to_desktop(&self, node: Id, desktop: Id) -> Result<(), MockError> {
            self.record(format!("move node {} to desktop {}", node, desktop))
        }

        fn show_and_focus_node(&self, node: Id) -> Result<(), MockError> {
            self.record(format!("show+focus node {}", node))
        }

        fn focus_previous_node(&self) -> Result<(), MockError> {
            self.record("focus prev".into())
        }

        fn set_config(&self, key: &str, value: &str) -> Result<(), MockError> {
            self.record(format!("config {} {}", key, value))
        }
    }

    //  Mock Notifier

    #[derive(Debug, Default)]
    pub(crate) struct MockNotifier {
        pub sent: RefCell<Vec<Message>>,
    }

    impl Notifier for MockNotifier {
        type Error = MockError;

        fn send(&self, message: &Message) -> Result<(), MockError> {
            self.sent.borrow_mut().push(message.clone());
            Ok(())
        }
    }

    #[test]
    fn mock_wm_records_calls() {
        let wm = MockWm::default();
        wm.hide_node(5).unwrap();
        wm.move_node_to_desktop(5, 10).unwrap();
        assert_eq!(wm.calls(), vec!["hide node 5", "move node 5 to desktop 10"]);
    }

    #[test]
    fn mock_wm_without_state_fails() {
        let wm = MockWm::default();
        assert!(wm.query_state().is_err());
    }

    #[test]
    fn mock_notifier_keeps_messages() {
        let notifier = MockNotifier::default();
        notifier.send(&Message::new("summary", "body", 1000)).unwrap();
        let sent = notifier.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].summary, "summary");
        assert_eq!(sent[0].timeout_ms, 1000);
    }
}
