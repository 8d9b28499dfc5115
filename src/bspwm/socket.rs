//! Raw request/response over bspwm's Unix socket.
//!
//! A request is the argument vector of a `bspc` invocation, each argument
//! terminated by a NUL byte.  bspwm writes its reply and closes the
//! connection, so the response is everything read until EOF.
//!
//! The socket lives at `$BSPWM_SOCKET` when set, otherwise at
//! `/tmp/bspwm<host>_<display>_<screen>-socket` derived from `$DISPLAY`.

use super::BspwmError;
use log::debug;
use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the socket path.
pub const SOCKET_ENV: &str = "BSPWM_SOCKET";

/// Resolve the socket path from the process environment.
pub fn socket_path() -> Result<PathBuf, BspwmError> {
    resolve_socket_path(std::env::var(SOCKET_ENV).ok(), std::env::var("DISPLAY").ok())
}

/// Resolve the socket path from an explicit override and `DISPLAY` value.
///
/// `DISPLAY` has the form `[host]:display[.screen]`; the screen defaults
/// to `0`.
pub fn resolve_socket_path(
    override_path: Option<String>,
    display: Option<String>,
) -> Result<PathBuf, BspwmError> {
    if let Some(path) = override_path {
        return Ok(PathBuf::from(path));
    }
    let display = display.unwrap_or_default();
    let (host, rest) = display
        .split_once(':')
        .ok_or_else(|| BspwmError::SocketPath(format!("malformed DISPLAY: {:?}", display)))?;
    let (number, screen) = rest.split_once('.').unwrap_or((rest, "0"));
    Ok(PathBuf::from(format!(
        "/tmp/bspwm{}_{}_{}-socket",
        host, number, screen
    )))
}

/// Frame an argument vector: every argument followed by a NUL byte.
pub fn encode_request<S: AsRef<str>>(args: &[S]) -> Vec<u8> {
    let mut buf = Vec::new();
    for arg in args {
        buf.extend_from_slice(arg.as_ref().as_bytes());
        buf.push(0);
    }
    buf
}

/// Send `args` to the bspwm socket and return the raw response.
pub fn request<S: AsRef<str>>(args: &[S]) -> Result<Vec<u8>, BspwmError> {
    let path = socket_path()?;
    request_at(&path, args)
}

/// Send `args` to the socket at `path` and return the raw response.
pub fn request_at<S: AsRef<str>>(path: &Path, args: &[S]) -> Result<Vec<u8>, BspwmError> {
    let mut stream = UnixStream::connect(path).map_err(|source| BspwmError::Connect {
        path: path.to_path_buf(),
        source,
    })?;

    stream.write_all(&encode_request(args))?;

    let mut response = Vec::new();
    stream.read_to_end(&mut response)?;
    debug!("bspwm replied with {} byte(s)", response.len());
    Ok(response)
}

//  Tests
