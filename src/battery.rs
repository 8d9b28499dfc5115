//! Battery state from sysfs.
//!
//! Every entry under `/sys/class/power_supply` whose `type` file reads
//! `Battery` is a battery.  Charge is `energy_now / energy_full`; batteries
//! that only report charge in µAh expose `charge_now` / `charge_full`
//! instead.

use std::fs;
use std::path::{Path, PathBuf};

/// Where the kernel exposes power supplies.
pub const POWER_SUPPLY_DIR: &str = "/sys/class/power_supply";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Battery {
    /// Directory name, e.g. `BAT0`.
    pub name: String,
    /// `Charging`, `Discharging`, `Full`, …
    pub status: String,
    pub now: u64,
    pub full: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum BatteryError {
    #[error("read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse {}: {value:?}", path.display())]
    Parse { path: PathBuf, value: String },
}

fn read_str(path: &Path) -> Result<String, BatteryError> {
    fs::read_to_string(path)
        .map(|s| s.trim().to_string())
        .map_err(|source| BatteryError::Read {
            path: path.to_path_buf(),
            source,
        })
}

fn read_int(path: &Path) -> Result<u64, BatteryError> {
    let value = read_str(path)?;
    value.parse().map_err(|_| BatteryError::Parse {
        path: path.to_path_buf(),
        value,
    })
}

impl Battery {
    /// Charge ratio in `[0, 1]`; `0.0` when the full capacity is unknown.
    pub fn charge(&self) -> f64 {
        if self.full == 0 {
            return 0.0;
        }
        self.now as f64 / self.full as f64
    }

    /// Charge as a percentage with two decimals, e.g. `"57.32%"`.
    pub fn percentage(&self) -> String {
        format!("{:.2}%", self.charge() * 100.0)
    }

    /// Read the battery whose sysfs directory is `dir`.
    pub fn load(dir: &Path) -> Result<Self, BatteryError> {
        let status = read_str(&dir.join("status"))?;
        let (now, full) = if dir.join("energy_full").exists() {
            (
                read_int(&dir.join("energy_now"))?,
                read_int(&dir.join("energy_full"))?,
            )
        } else {
            (
                read_int(&dir.join("charge_now"))?,
                read_int(&dir.join("charge_full"))?,
            )
        };
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self {
            name,
            status,
            now,
            full,
        })
    }
}

/// Load every battery under [`POWER_SUPPLY_DIR`].
pub fn load_all() -> Result<Vec<Battery>, BatteryError> {
    load_all_from(Path::new(POWER_SUPPLY_DIR))
}

/// Load every battery under `root`, in name order.
pub fn load_all_from(root: &Path) -> Result<Vec<Battery>, BatteryError> {
    let read_dir_err = |source: std::io::Error| BatteryError::Read {
        path: root.to_path_buf(),
        source,
    };
    let mut supplies = fs::read_dir(root)
        .map_err(read_dir_err)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_dir_err)?;
    supplies.sort();

    let mut batteries = Vec::new();
    for supply in supplies {
        if read_str(&supply.join("type"))? == "Battery" {
            batteries.push(Battery::load(&supply)?);
        }
    }
    Ok(batteries)
}
