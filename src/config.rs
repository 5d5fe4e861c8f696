use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Environment variable naming an optional YAML config file.
pub const CONFIG_PATH_ENV: &str = "SSE_ECHO_CONFIG";

/// Environment variable overriding the listen address.
pub const LISTEN_ENV: &str = "LISTEN";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Address the listening socket binds to.
    pub listen_addr: String,
    /// Backlog passed to `listen(2)`.
    pub backlog: i32,
    /// Size of the single request read buffer. One byte is always left unused.
    pub buffer_size: usize,
    /// The one path served with an SSE response.
    pub endpoint_path: String,
    /// How long an SSE connection is held open after the event is sent.
    pub hold_open_ms: u64,
    /// Default tracing filter when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".to_string(),
            backlog: 3,
            buffer_size: 1024,
            endpoint_path: "/events".to_string(),
            hold_open_ms: 5000,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads the configuration: defaults, then the YAML file named by
    /// `SSE_ECHO_CONFIG` (if set), then the `LISTEN` override.
    pub fn load() -> Result<Self> {
        let mut cfg = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => {
                let text = std::fs::read_to_string(&path)
                    .map_err(|e| Error::Config(format!("cannot read {}: {}", path, e)))?;
                Self::from_yaml_str(&text)?
            }
            Err(_) => Self::default(),
        };

        if let Ok(listen_addr) = std::env::var(LISTEN_ENV) {
            cfg.listen_addr = listen_addr;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    /// Parses YAML text. Missing fields keep their defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let cfg: Self = serde_yaml::from_str(text)
            .map_err(|e| Error::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn hold_open(&self) -> Duration {
        Duration::from_millis(self.hold_open_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.buffer_size < 2 {
            return Err(Error::Config(format!(
                "buffer_size must be at least 2, got {}",
                self.buffer_size
            )));
        }
        if !self.endpoint_path.starts_with('/') {
            return Err(Error::Config(format!(
                "endpoint_path must start with '/', got {:?}",
                self.endpoint_path
            )));
        }
        Ok(())
    }
}
