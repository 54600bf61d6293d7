use std::path::{Path, PathBuf};

use serde::Deserialize;

static CONFIG: OnceCell<Config> = OnceCell::const_new();

mod config_dir;
pub use config_dir::{find_config_file, read_config, read_config_from};

mod error;
pub use error::{ConfigError, ConfigResult};
use tokio::sync::OnceCell;

use crate::game::Timing;

#[derive(Debug, Deserialize)]
pub struct Config {
    host: Host,
    #[serde(default)]
    app: App,
    #[serde(default)]
    timing: Timing,
}

#[derive(Debug, Deserialize)]
pub struct Host {
    bindto: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct App {
    #[serde(default)]
    docs: bool,
    /// Level catalog to load instead of the built-in one.
    catalog: Option<PathBuf>,
}

impl Config {
    #[tracing::instrument]
    pub async fn get_or_init(use_local: bool) -> &'static Config {
        CONFIG
            .get_or_init(|| async {
                let read_cfg = |use_local| -> ConfigResult<Self> {
                    let bytes = read_config(use_local)?;
                    Self::from_slice(&bytes)
                };

                let config = match read_cfg(use_local) {
                    Ok(c) => c,
                    Err(e) => {
                        if !matches!(e, error::ConfigError::ConfigNotFound) {
                            crate::error::log_error(&e);
                        }
                        tracing::error!("Config not found.");
                        std::process::exit(1);
                    }
                };

                config
            })
            .await
    }

    pub fn from_slice(bytes: &[u8]) -> ConfigResult<Self> {
        let source = std::str::from_utf8(bytes).map_err(|_| ConfigError::NotUtf8)?;
        Ok(toml::from_str(source)?)
    }

    #[inline]
    pub fn host(&self) -> &Host {
        &self.host
    }

    #[inline]
    pub fn app(&self) -> &App {
        &self.app
    }

    #[inline]
    pub fn timing(&self) -> Timing {
        self.timing
    }
}

impl Host {
    #[inline]
    pub fn bindto(&self) -> &str {
        &self.bindto
    }
}

impl App {
    #[inline]
    pub fn docs(&self) -> bool {
        self.docs
    }

    #[inline]
    pub fn catalog(&self) -> Option<&Path> {
        self.catalog.as_deref()
    }
}
