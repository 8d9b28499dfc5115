//! bspwm-specific implementations.
//!
//! This module provides the concrete backend for the
//! [`WindowManager`](crate::traits::WindowManager) trait, powered by bspwm's
//! Unix socket.
//!
//! Nothing outside this module should reference the socket protocol directly.

pub mod socket;
pub mod wm;

use std::path::PathBuf;

/// Errors that can occur when talking to bspwm.
///
/// Everything except [`Decode`](BspwmError::Decode) is a transport failure.
#[derive(Debug, thiserror::Error)]
pub enum BspwmError {
    #[error("cannot resolve bspwm socket: {0}")]
    SocketPath(String),
    #[error("connect to {}: {source}", path.display())]
    Connect {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("bspwm socket io: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode wm state: {0}")]
    Decode(#[from] serde_json::Error),
}

impl BspwmError {
    /// `true` for socket resolution, connect, write and read failures.
    pub fn is_transport(&self) -> bool {
        !matches!(self, BspwmError::Decode(_))
    }
}
