//! X resources consulted when configuring the desktop.
//!
//! `xrdb -query -all` prints one `key:\tvalue` line per resource.  Only the
//! `bspwm.*` and `dunst.*` keys are read; everything else is skipped.

use log::debug;
use std::io::BufRead;
use std::process::Command;

/// Resources relevant to this crate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resources {
    pub bspwm: BspwmResources,
    pub dunst: DunstResources,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BspwmResources {
    pub border_width: i32,
    pub window_gap: i32,
    pub normal_border_color: String,
    pub active_border_color: String,
    pub focused_border_color: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DunstResources {
    pub geometry: String,
}

#[derive(Debug, thiserror::Error)]
pub enum XrdbError {
    #[error("xrdb query: {0}")]
    Io(#[from] std::io::Error),
    #[error("xrdb query: exited with {0}")]
    Status(std::process::ExitStatus),
    #[error("malformed line: {0:?}")]
    MalformedLine(String),
    #[error("{key}: not an integer: {value:?}")]
    InvalidInteger { key: String, value: String },
}

fn parse_int(key: &str, value: &str) -> Result<i32, XrdbError> {
    value.parse().map_err(|_| XrdbError::InvalidInteger {
        key: key.to_string(),
        value: value.to_string(),
    })
}

impl Resources {
    /// Apply one `key: value` line.
    pub fn apply_line(&mut self, line: &str) -> Result<(), XrdbError> {
        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| XrdbError::MalformedLine(line.to_string()))?;
        let value = value.trim();
        match key {
            "bspwm.borderWidth" => self.bspwm.border_width = parse_int(key, value)?,
            "bspwm.windowGap" => self.bspwm.window_gap = parse_int(key, value)?,
            "bspwm.normalBorderColor" => self.bspwm.normal_border_color = value.to_string(),
            "bspwm.activeBorderColor" => self.bspwm.active_border_color = value.to_string(),
            "bspwm.focusedBorderColor" => self.bspwm.focused_border_color = value.to_string(),
            "dunst.geometry" => self.dunst.geometry = value.to_string(),
            _ => {}
        }
        Ok(())
    }

    /// Parse a whole `xrdb -query` listing.
    ///
    /// Lines are decoded lossily; a resource holding invalid UTF-8 does not
    /// affect the keys read here.
    pub fn read(reader: impl BufRead) -> Result<Self, XrdbError> {
        let mut resources = Self::default();
        for line in reader.split(b'\n') {
            resources.apply_line(&String::from_utf8_lossy(&line?))?;
        }
        Ok(resources)
    }
}

/// Run `xrdb -query -all` and parse its output.
pub fn query() -> Result<Resources, XrdbError> {
    debug!("xrdb -query -all");
    let output = Command::new("xrdb").args(["-query", "-all"]).output()?;
    if !output.status.success() {
        return Err(XrdbError::Status(output.status));
    }
    Resources::read(output.stdout.as_slice())
}
