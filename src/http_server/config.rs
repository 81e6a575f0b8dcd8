//! HTTP Server Configuration
//!
//! Configuration for the demo server and for request binding.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "127.0.0.1")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Binding settings shared by every route
    #[serde(default)]
    pub bind: BindConfig,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            bind: BindConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Request binding configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindConfig {
    /// Bytes of multipart file content kept in memory per request
    /// (default: 64 MiB)
    #[serde(default = "default_multipart_memory")]
    pub multipart_memory: u64,

    /// Where file parts beyond the memory budget are spilled
    /// (default: the OS temp dir)
    #[serde(default)]
    pub spill_dir: Option<PathBuf>,

    /// Largest request body accepted by the server, replacing axum's
    /// 2 MiB default (default: 256 MiB)
    #[serde(default = "default_max_body_size")]
    pub max_body_size: u64,
}

fn default_multipart_memory() -> u64 {
    64 << 20
}

fn default_max_body_size() -> u64 {
    256 << 20
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            multipart_memory: default_multipart_memory(),
            spill_dir: None,
            max_body_size: default_max_body_size(),
        }
    }
}

impl BindConfig {
    /// Spill directory, falling back to the OS temp dir
    pub fn spill_dir(&self) -> PathBuf {
        self.spill_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }

    /// Config spilling every file part into `dir`
    pub fn spill_everything_to(dir: &Path) -> Self {
        Self {
            multipart_memory: 0,
            spill_dir: Some(dir.to_path_buf()),
            ..Self::default()
        }
    }

    /// Body limit as a byte count usable on this platform
    pub fn body_limit(&self) -> usize {
        usize::try_from(self.max_body_size).unwrap_or(usize::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind.multipart_memory, 64 * 1024 * 1024);
        assert!(config.bind.spill_dir.is_none());
        assert_eq!(config.bind.body_limit(), 256 * 1024 * 1024);
        assert!(config.bind.max_body_size > config.bind.multipart_memory);
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig::with_port(9000);
        assert_eq!(config.socket_addr(), "127.0.0.1:9000");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ServerConfig =
            serde_json::from_str(r#"{"port": 3000, "bind": {"spill_dir": "/var/tmp"}}"#).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.bind.multipart_memory, 64 << 20);
        assert_eq!(config.bind.spill_dir(), PathBuf::from("/var/tmp"));
        assert_eq!(config.bind.max_body_size, 256 << 20);
    }

    #[test]
    fn test_spill_dir_falls_back_to_temp() {
        assert_eq!(BindConfig::default().spill_dir(), std::env::temp_dir());
    }
}
