//! Server configuration for marnotes.
//!
//! Loads configuration from environment variables with sensible defaults.
//! All settings can be overridden via `MARNOTES_*` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Default listen address.
pub const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::new(
    std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
    8080,
);

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Directory holding the `*.json` documents.
    pub docs_dir: PathBuf,
    /// PEM public key file to publish at `/publickey` (optional).
    pub public_key_path: Option<PathBuf>,
    /// Whether to try the following ports when the bind port is taken.
    pub port_search: bool,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR,
            docs_dir: PathBuf::from("./documents"),
            public_key_path: None,
            port_search: true,
            log_level: "info".to_owned(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PORT` — port to bind on (binds to `0.0.0.0`)
    /// - `MARNOTES_BIND_ADDR` — full bind address (overrides `PORT`, default: `127.0.0.1:8080`)
    /// - `MARNOTES_DOCS_DIR` — documents directory (default: `./documents`)
    /// - `MARNOTES_PUBLIC_KEY` — path to a PEM public key (optional)
    /// - `MARNOTES_PORT_SEARCH` — try the next ports if busy (default: `true`)
    /// - `MARNOTES_LOG_LEVEL` — log filter (default: `info`)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        // Priority: MARNOTES_BIND_ADDR > PORT > default 127.0.0.1:8080
        let bind_addr = if let Some(addr) = lookup("MARNOTES_BIND_ADDR") {
            addr.parse().unwrap_or(DEFAULT_BIND_ADDR)
        } else if let Some(port_str) = lookup("PORT") {
            let port: u16 = port_str
                .trim_start_matches(':')
                .parse()
                .unwrap_or(DEFAULT_BIND_ADDR.port());
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            DEFAULT_BIND_ADDR
        };

        let docs_dir = lookup("MARNOTES_DOCS_DIR")
            .filter(|v| !v.is_empty())
            .map_or(defaults.docs_dir, PathBuf::from);

        let public_key_path = lookup("MARNOTES_PUBLIC_KEY")
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let port_search = lookup("MARNOTES_PORT_SEARCH")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(defaults.port_search);

        let log_level = lookup("MARNOTES_LOG_LEVEL").unwrap_or(defaults.log_level);

        Self {
            bind_addr,
            docs_dir,
            public_key_path,
            port_search,
            log_level,
        }
    }
}
