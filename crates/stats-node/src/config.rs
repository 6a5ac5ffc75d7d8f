//! Configuration types for the stats binary

use stats_rpc::ServerConfig;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use thiserror::Error;

use crate::cli::Cli;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Listen address could not be parsed or resolved
    #[error("invalid listen address {addr:?}: {reason}")]
    ListenAddr {
        /// Address as given
        addr: String,
        /// Why it was rejected
        reason: String,
    },

    /// Retention window of zero points
    #[error("max points must be at least 1")]
    ZeroMaxPoints,
}

/// Node configuration
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Address serving RPC, snapshot and assets
    pub listen_addr: SocketAddr,
    /// Points retained per series
    pub max_points: usize,
    /// Dashboard asset directory
    pub static_dir: Option<PathBuf>,
    /// Maximum RPC request body size
    pub max_body_size: usize,
    /// Whether to send permissive CORS headers
    pub enable_cors: bool,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8090)),
            max_points: 60,
            static_dir: Some(PathBuf::from("static")),
            max_body_size: 1024 * 1024,
            enable_cors: true,
        }
    }
}

impl NodeConfig {
    /// Validate CLI arguments into a node configuration
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        if cli.max == 0 {
            return Err(ConfigError::ZeroMaxPoints);
        }

        Ok(Self {
            listen_addr: parse_listen_addr(&cli.http)?,
            max_points: cli.max,
            static_dir: (!cli.no_static).then(|| cli.static_dir.clone()),
            max_body_size: cli.max_body_size,
            enable_cors: !cli.no_cors,
        })
    }

    /// Server configuration derived from this node configuration
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            listen_addr: self.listen_addr,
            max_body_size: self.max_body_size,
            enable_cors: self.enable_cors,
            static_dir: self.static_dir.clone(),
        }
    }
}

/// Parse a listen address
///
/// `":8090"` listens on all interfaces. Anything else must be `host:port`,
/// with the host resolved if it is not an IP literal.
pub fn parse_listen_addr(addr: &str) -> Result<SocketAddr, ConfigError> {
    let invalid = |reason: String| ConfigError::ListenAddr {
        addr: addr.to_string(),
        reason,
    };

    if let Some(port) = addr.strip_prefix(':') {
        let port: u16 = port.parse().map_err(|e| invalid(format!("bad port: {}", e)))?;
        return Ok(SocketAddr::from(([0, 0, 0, 0], port)));
    }

    if let Ok(socket_addr) = addr.parse() {
        return Ok(socket_addr);
    }

    addr.to_socket_addrs()
        .map_err(|e| invalid(e.to_string()))?
        .next()
        .ok_or_else(|| invalid("no addresses resolved".to_string()))
}
