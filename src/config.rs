use crate::constants::MAX_CHUNK_SIZE;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_ip: String,
    pub listen_port: u16,
    pub data_port: u16, // Used when the client never sent PORT
    pub max_clients: usize, // Concurrent data transfers, not control sessions
    pub chunk_size: usize,
    pub root_dir: String,
    pub data_connect_timeout: u64, // Seconds, 0 disables
    pub system_type: String,
    pub greeting: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    /// Username -> password (plain or bcrypt). Absent disables authentication.
    pub users: Option<HashMap<String, String>>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_ip: String::from("0.0.0.0"),
            listen_port: 21,
            data_port: 20,
            max_clients: 2,
            chunk_size: 512,
            root_dir: String::from("/var/ftp"),
            data_connect_timeout: 10,
            system_type: String::from("UNIX Type: L8"),
            greeting: String::from("Welcome to micro FTP server"),
        }
    }
}

impl ServerConfig {
    /// Bound on opening a data connection; `None` waits for the OS.
    pub fn connect_timeout(&self) -> Option<Duration> {
        match self.data_connect_timeout {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &str) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path))?;
        Self::from_toml(&config_str)
            .with_context(|| format!("Failed to parse configuration file: {}", path))
    }

    pub fn from_toml(config_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(config_str)?;
        Ok(config)
    }

    pub fn bind_ip(&self) -> Result<IpAddr> {
        self.server
            .bind_ip
            .parse()
            .with_context(|| format!("Invalid bind_ip: {}", self.server.bind_ip))
    }

    /// Checks the values a session relies on before anything is bound.
    pub fn validate(&self) -> Result<()> {
        if self.server.max_clients == 0 {
            bail!("max_clients must be at least 1");
        }
        if self.server.chunk_size == 0 || self.server.chunk_size > MAX_CHUNK_SIZE {
            bail!(
                "chunk_size must be between 1 and {} bytes, got {}",
                MAX_CHUNK_SIZE,
                self.server.chunk_size
            );
        }
        self.bind_ip()?;
        if !Path::new(&self.server.root_dir).is_dir() {
            bail!("root_dir is not a directory: {}", self.server.root_dir);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.server.chunk_size, 512);
        assert_eq!(config.server.max_clients, 2);
        assert_eq!(config.server.listen_port, 21);
        assert!(config.users.is_none());
    }

    #[test]
    fn users_table_and_partial_server_section() {
        let config = Config::from_toml(
            r#"
            [server]
            listen_port = 2121
            chunk_size = 1024

            [users]
            Alice = "secret"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.listen_port, 2121);
        assert_eq!(config.server.chunk_size, 1024);
        assert_eq!(config.server.data_port, 20);
        let users = config.users.unwrap();
        assert_eq!(users.get("Alice").map(String::as_str), Some("secret"));
    }

    #[test]
    fn validate_rejects_zero_limits() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.server.root_dir = dir.path().to_string_lossy().to_string();
        assert!(config.validate().is_ok());

        config.server.max_clients = 0;
        assert!(config.validate().is_err());
        config.server.max_clients = 1;
        config.server.chunk_size = 0;
        assert!(config.validate().is_err());
        config.server.chunk_size = MAX_CHUNK_SIZE + 1;
        assert!(config.validate().is_err());
        config.server.chunk_size = 512;
        config.server.bind_ip = "not-an-ip".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_timeout_disables_it() {
        let mut server = ServerConfig::default();
        assert_eq!(server.connect_timeout(), Some(Duration::from_secs(10)));
        server.data_connect_timeout = 0;
        assert_eq!(server.connect_timeout(), None);
    }

    #[test]
    fn validate_rejects_missing_root() {
        let mut config = Config::default();
        config.server.root_dir = "/definitely/not/here/microftpd".into();
        assert!(config.validate().is_err());
    }
}
