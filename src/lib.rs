//! **bspwmrc**: a personal desktop controller for bspwm.
//!
//! Every invocation is a short-lived CLI run triggered by a key binding or a
//! periodic scheduler: it applies the window manager configuration, toggles a
//! scratchpad window, or surfaces a battery/clock notification, then exits.
//!
//! # Architecture
//!
//! The crate is organised around two traits:
//!
//! * [`traits::WindowManager`] abstracts the handful of bspwm requests the
//!   scratchpad logic needs, so the toggle decision is not coupled to the
//!   socket transport and can be tested against literal snapshots.
//! * [`traits::Notifier`] abstracts the desktop notification daemon.
//!
//! The concrete implementations live in [`bspwm`] (bspwm's Unix socket) and
//! [`notify`] (the session bus).  [`state`] models the snapshot returned by
//! `wm -d`, and [`scratchpad`] locates and toggles windows within it.  The
//! remaining modules are thin glue over the OS: [`battery`], [`xrdb`],
//! [`daemons`] and [`spawn`].  [`session`] wires them into the operations
//! behind each [`command::Command`].

pub mod battery;
pub mod bspwm;
pub mod command;
pub mod config;
pub mod daemons;
pub mod notify;
pub mod scratchpad;
pub mod session;
pub mod spawn;
pub mod state;
pub mod traits;
pub mod xrdb;
