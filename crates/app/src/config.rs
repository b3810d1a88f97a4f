//! Environment-driven configuration with logged fallbacks

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use directories::ProjectDirs;
use tracing::{info, warn};

pub struct Config {
    pub port: u16,
    pub database_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("PGTRACKER_PORT", "8003"),
            database_path: database_path(),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| ())
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}

fn database_path() -> PathBuf {
    if let Ok(path) = var("PGTRACKER_DB") {
        return PathBuf::from(path);
    }

    let default = ProjectDirs::from("dev", "pgtracker", "pgtracker")
        .map(|dirs| dirs.data_dir().join("pgtracker.db"))
        .unwrap_or_else(|| PathBuf::from("pgtracker.db"));
    info!(path = %default.display(), "PGTRACKER_DB not set, using default");
    default
}
