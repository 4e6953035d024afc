// src/config.rs

//! Process-wide settings, layered with `figment`:
//! built-in defaults -> optional TOML file -> `LIME_`-prefixed environment variables.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::warn;

use crate::core::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Default bound, in seconds, on a batched model call and on waiting for an explanation.
    #[serde(default = "default_async_timeout_secs")]
    pub async_timeout_secs: u64,
}

fn default_async_timeout_secs() -> u64 {
    10
}

impl Default for Config {
    fn default() -> Self {
        Config {
            async_timeout_secs: default_async_timeout_secs(),
        }
    }
}

static GLOBAL: OnceLock<Config> = OnceLock::new();

impl Config {
    /// Loads settings from an optional TOML file and the environment.
    pub fn load(file: Option<&Path>) -> Result<Config> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = file {
            figment = figment.merge(Toml::file(path));
        }
        figment = figment.merge(Env::prefixed("LIME_"));
        Ok(figment.extract().map_err(Box::new)?)
    }

    /// Lazily loaded process-wide settings. Falls back to defaults if loading fails.
    pub fn global() -> &'static Config {
        GLOBAL.get_or_init(|| match Config::load(None) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "failed to load settings, using defaults");
                Config::default()
            }
        })
    }

    pub fn async_timeout(&self) -> Duration {
        Duration::from_secs(self.async_timeout_secs)
    }
}
