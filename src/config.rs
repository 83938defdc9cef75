//! Server configuration from environment variables

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 5001;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Frontend files served as the fallback route
    pub static_dir: PathBuf,
    /// One subdirectory of meme images per category
    pub templates_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from("static"),
            templates_dir: PathBuf::from("static/images/memes"),
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

impl ServerConfig {
    /// Load configuration from environment variables
    ///
    /// Unset, blank or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let bind_addr = non_empty_var("BIND_ADDR")
            .and_then(|v| match v.parse() {
                Ok(addr) => Some(addr),
                Err(_) => {
                    tracing::warn!("Ignoring invalid BIND_ADDR {:?}", v);
                    None
                }
            })
            .unwrap_or(defaults.bind_addr);

        let port = non_empty_var("PORT")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.port);

        Self {
            bind_addr,
            port,
            static_dir: non_empty_var("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.static_dir),
            templates_dir: non_empty_var("TEMPLATES_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.templates_dir),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}
