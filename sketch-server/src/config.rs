//! Server configuration.
//!
//! Command-line arguments (with environment fallbacks) are parsed into
//! [`ServerArgs`] and converted into a [`ServerConfig`].

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

/// Default listening port.
pub const DEFAULT_PORT: u16 = 5000;

/// Origins allowed when none are configured: common local dev servers.
pub const DEFAULT_DEV_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:5173", // Vite
    "http://localhost:8080",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
    "http://127.0.0.1:8080",
];

/// Command-line arguments for the history server.
#[derive(Debug, Clone, Parser)]
#[command(name = "drawmotion-server")]
#[command(about = "DrawMotion drawing history server")]
#[command(version)]
pub struct ServerArgs {
    /// Port to listen on
    #[arg(long, env = "SKETCH_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind
    #[arg(long, env = "SKETCH_BIND", default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub bind: IpAddr,

    /// Directory for durable history logs (in-memory when absent)
    #[arg(long, env = "SKETCH_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Allowed CORS origin; may be repeated
    #[arg(long = "allow-origin", env = "SKETCH_ALLOW_ORIGIN", value_delimiter = ',')]
    pub allow_origins: Vec<String>,
}

/// Resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Socket address to bind.
    pub addr: SocketAddr,
    /// Durable storage directory.
    pub data_dir: Option<PathBuf>,
    /// Origins allowed by CORS.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            data_dir: None,
            allowed_origins: default_origins(DEFAULT_PORT),
        }
    }
}

impl From<ServerArgs> for ServerConfig {
    fn from(args: ServerArgs) -> Self {
        let allowed_origins = if args.allow_origins.is_empty() {
            default_origins(args.port)
        } else {
            args.allow_origins
        };
        Self {
            addr: SocketAddr::new(args.bind, args.port),
            data_dir: args.data_dir,
            allowed_origins,
        }
    }
}

/// The server's own localhost origins plus [`DEFAULT_DEV_ORIGINS`].
#[must_use]
pub fn default_origins(port: u16) -> Vec<String> {
    let mut origins = vec![
        format!("http://localhost:{port}"),
        format!("http://127.0.0.1:{port}"),
    ];
    origins.extend(DEFAULT_DEV_ORIGINS.iter().map(ToString::to_string));
    origins
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_listen_on_localhost_5000() {
        let args = ServerArgs::parse_from(["drawmotion-server"]);
        let config = ServerConfig::from(args);
        assert_eq!(config.addr.port(), 5000);
        assert!(config.addr.ip().is_loopback());
        assert_eq!(config.data_dir, None);
        assert!(config
            .allowed_origins
            .contains(&"http://localhost:5000".to_string()));
    }

    #[test]
    fn explicit_arguments_override_defaults() {
        let args = ServerArgs::parse_from([
            "drawmotion-server",
            "--port",
            "8123",
            "--bind",
            "0.0.0.0",
            "--data-dir",
            "/tmp/history",
            "--allow-origin",
            "https://draw.example",
            "--allow-origin",
            "https://other.example",
        ]);
        let config = ServerConfig::from(args);
        assert_eq!(config.addr, "0.0.0.0:8123".parse().expect("addr"));
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/history")));
        assert_eq!(
            config.allowed_origins,
            vec!["https://draw.example", "https://other.example"]
        );
    }

    #[test]
    fn comma_separated_origins_are_split() {
        let args =
            ServerArgs::parse_from(["drawmotion-server", "--allow-origin", "http://a,http://b"]);
        assert_eq!(args.allow_origins, vec!["http://a", "http://b"]);
    }
}
