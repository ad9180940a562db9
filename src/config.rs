use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

pub const DEFAULT_DOCKER_ENDPOINT: &str = "unix:///var/run/docker.sock";

/// Startup configuration. The two knobs are independent of each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Enable debug-level logging
    pub debug: bool,
    /// Docker daemon endpoint URL
    pub docker: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            docker: DEFAULT_DOCKER_ENDPOINT.to_string(),
        }
    }
}

/// On-disk form of the configuration; every field is optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DockersqlConfig {
    pub debug: Option<bool>,
    pub docker: Option<String>,
}

impl Config {
    /// Layer a config file and command-line overrides on top of the defaults.
    pub fn resolve(file: Option<DockersqlConfig>, debug_flag: bool, docker_flag: Option<String>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Config::default();
        Self {
            debug: debug_flag || file.debug.unwrap_or(defaults.debug),
            docker: docker_flag.or(file.docker).unwrap_or(defaults.docker),
        }
    }

    pub fn endpoint(&self) -> Result<Endpoint> {
        Endpoint::parse(&self.docker)
    }
}

/// Where the Docker daemon listens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Unix(PathBuf),
    Http(String),
}

impl Endpoint {
    pub fn parse(url: &str) -> Result<Self> {
        if let Some(path) = url.strip_prefix("unix://") {
            if path.is_empty() {
                return Err(Error::Config(format!("missing socket path in {url:?}")));
            }
            return Ok(Endpoint::Unix(PathBuf::from(path)));
        }
        if url.starts_with('/') {
            return Ok(Endpoint::Unix(PathBuf::from(url)));
        }
        if url.starts_with("tcp://") || url.starts_with("http://") {
            return Ok(Endpoint::Http(url.to_string()));
        }
        Err(Error::Config(format!("unsupported docker endpoint {url:?}")))
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("dockersql.toml")
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<DockersqlConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: DockersqlConfig = toml::from_str(&contents)?;
    Ok(Some(config))
}
