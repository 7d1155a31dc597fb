//! Server configuration.
//!
//! Defaults match the usual deployment; each setting can be overridden
//! through an environment variable.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Default server port.
pub const DEFAULT_PORT: u16 = 7070;

/// Frontend build directory inside the container image.
const DOCKER_STATIC_DIR: &str = "./frontend/build";

/// Frontend build directory when running from the backend checkout.
const LOCAL_STATIC_DIR: &str = "../frontend/build";

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to listen on (default: 0.0.0.0).
    pub bind: IpAddr,

    /// Port to listen on (default: 7070).
    pub port: u16,

    /// Directory holding the built frontend.
    pub static_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            static_dir: detect_static_dir(),
        }
    }
}

impl ServerConfig {
    /// Loads settings from `SLIDESHOW_BIND`, `SLIDESHOW_PORT` and
    /// `SLIDESHOW_STATIC_DIR`, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(value) = lookup("SLIDESHOW_BIND") {
            config.bind = value.trim().parse().map_err(|_| Error::Config {
                key: "SLIDESHOW_BIND",
                value,
            })?;
        }

        if let Some(value) = lookup("SLIDESHOW_PORT") {
            config.port = value.trim().parse().map_err(|_| Error::Config {
                key: "SLIDESHOW_PORT",
                value,
            })?;
        }

        if let Some(value) = lookup("SLIDESHOW_STATIC_DIR") {
            config.static_dir = PathBuf::from(value);
        }

        Ok(config)
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

/// Prefers the container layout when present.
fn detect_static_dir() -> PathBuf {
    if Path::new(DOCKER_STATIC_DIR).exists() {
        PathBuf::from(DOCKER_STATIC_DIR)
    } else {
        PathBuf::from(LOCAL_STATIC_DIR)
    }
}
