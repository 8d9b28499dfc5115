//! Fire-and-forget process spawning.
//!
//! Scratchpad applications and auxiliary daemons are started detached: the
//! child's stdio is pointed at `/dev/null` and the handle is dropped without
//! waiting, so the child outlives this short-lived process.

use log::debug;
use std::path::Path;
use std::process::{Command, Stdio};

/// Errors from [`spawn_detached`].
#[derive(Debug, thiserror::Error)]
pub enum SpawnError {
    #[error("empty command")]
    EmptyCommand,
    #[error("spawn {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },
}

/// Start `argv` in the background, optionally in `dir`.
///
/// An empty `argv` fails before any OS call is made.
pub fn spawn_detached<S: AsRef<str>>(argv: &[S], dir: Option<&Path>) -> Result<(), SpawnError> {
    let (program, args) = argv.split_first().ok_or(SpawnError::EmptyCommand)?;
    let program: &str = program.as_ref();

    let mut cmd = Command::new(program);
    cmd.args(args.iter().map(|a| a.as_ref()))
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }

    let child = cmd.spawn().map_err(|source| SpawnError::Spawn {
        program: program.to_string(),
        source,
    })?;
    debug!("spawned {} (pid {})", program, child.id());
    Ok(())
}
