//! Runtime configuration, read from the environment at startup.
//!
//! | Variable | Default |
//! |---|---|
//! | `BUDGET_TRACKER_DATA_DIR` | `$HOME/Documents/Budget Tracker`, else `./budget_data` |
//! | `BUDGET_TRACKER_BIND` | `127.0.0.1:3000` |
//! | `BUDGET_TRACKER_ALLOWED_ORIGIN` | `http://localhost:8080` |

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::warn;

pub const DATA_DIR_VAR: &str = "BUDGET_TRACKER_DATA_DIR";
pub const BIND_VAR: &str = "BUDGET_TRACKER_BIND";
pub const ALLOWED_ORIGIN_VAR: &str = "BUDGET_TRACKER_ALLOWED_ORIGIN";

const DEFAULT_BIND: &str = "127.0.0.1:3000";
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:8080";
const FALLBACK_DATA_DIR: &str = "budget_data";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub allowed_origin: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let data_dir = match get(DATA_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir(get("HOME").or_else(|| get("USERPROFILE"))),
        };

        let bind = get(BIND_VAR).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind
            .parse::<SocketAddr>()
            .with_context(|| format!("{} is not a valid socket address: '{}'", BIND_VAR, bind))?;

        let allowed_origin = get(ALLOWED_ORIGIN_VAR).unwrap_or_else(|| DEFAULT_ALLOWED_ORIGIN.to_string());

        Ok(Self {
            data_dir,
            bind_addr,
            allowed_origin,
        })
    }
}

fn default_data_dir(home_dir: Option<String>) -> PathBuf {
    match home_dir {
        Some(home) => PathBuf::from(home).join("Documents").join("Budget Tracker"),
        None => {
            warn!("Could not determine home directory, using ./{}", FALLBACK_DATA_DIR);
            PathBuf::from(FALLBACK_DATA_DIR)
        }
    }
}
