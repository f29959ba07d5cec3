//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `MATCHRATE_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::constants::{DEFAULT_MODEL_ID, DEFAULT_MODEL_REVISION, DEFAULT_PORT};
use crate::embedding::SbertConfig;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `MATCHRATE_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8046`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Hub identifier of the sentence-embedding model.
    pub model_id: String,

    /// Hub revision (branch, tag or commit). Default: `main`.
    pub model_revision: String,

    /// Local model directory used instead of the hub.
    pub model_dir: Option<PathBuf>,

    /// Cache directory for hub downloads (hub default when unset).
    pub hf_cache_dir: Option<PathBuf>,

    /// Overrides the model's own `max_seq_length`.
    pub max_seq_len: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            model_id: DEFAULT_MODEL_ID.to_string(),
            model_revision: DEFAULT_MODEL_REVISION.to_string(),
            model_dir: None,
            hf_cache_dir: None,
            max_seq_len: None,
        }
    }
}

impl Config {
    pub const ENV_PORT: &'static str = "MATCHRATE_PORT";
    const ENV_BIND_ADDR: &'static str = "MATCHRATE_BIND_ADDR";
    const ENV_MODEL_ID: &'static str = "MATCHRATE_MODEL_ID";
    const ENV_MODEL_REVISION: &'static str = "MATCHRATE_MODEL_REVISION";
    const ENV_MODEL_DIR: &'static str = "MATCHRATE_MODEL_DIR";
    const ENV_HF_CACHE: &'static str = "MATCHRATE_HF_CACHE";
    const ENV_MAX_SEQ_LEN: &'static str = "MATCHRATE_MAX_SEQ_LEN";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let model_id = Self::parse_string_from_env(Self::ENV_MODEL_ID, defaults.model_id);
        let model_revision =
            Self::parse_string_from_env(Self::ENV_MODEL_REVISION, defaults.model_revision);
        let model_dir = Self::parse_optional_path_from_env(Self::ENV_MODEL_DIR);
        let hf_cache_dir = Self::parse_optional_path_from_env(Self::ENV_HF_CACHE);
        let max_seq_len = Self::parse_max_seq_len_from_env()?;

        Ok(Self {
            port,
            bind_addr,
            model_id,
            model_revision,
            model_dir,
            hf_cache_dir,
            max_seq_len,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model_id.trim().is_empty() {
            return Err(ConfigError::EmptyModelId);
        }

        if let Some(ref path) = self.model_dir {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        if let Some(ref path) = self.hf_cache_dir
            && path.exists()
            && !path.is_dir()
        {
            return Err(ConfigError::NotADirectory { path: path.clone() });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        match self.bind_addr {
            IpAddr::V4(addr) => format!("{}:{}", addr, self.port),
            IpAddr::V6(addr) => format!("[{}]:{}", addr, self.port),
        }
    }

    /// Builds the embedding model configuration. Nothing is loaded here.
    pub fn sbert_config(&self) -> SbertConfig {
        let mut sbert = SbertConfig::new(self.model_id.clone()).with_revision(&self.model_revision);
        if let Some(ref dir) = self.model_dir {
            sbert = sbert.with_model_dir(dir.clone());
        }
        if let Some(ref dir) = self.hf_cache_dir {
            sbert = sbert.with_cache_dir(dir.clone());
        }
        if let Some(len) = self.max_seq_len {
            sbert = sbert.with_max_seq_len(len);
        }
        sbert
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_max_seq_len_from_env() -> Result<Option<usize>, ConfigError> {
        let Some(value) = env::var(Self::ENV_MAX_SEQ_LEN)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        else {
            return Ok(None);
        };

        match value.parse::<usize>() {
            Ok(len) if len > 0 => Ok(Some(len)),
            _ => Err(ConfigError::InvalidMaxSeqLen { value }),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }
}
