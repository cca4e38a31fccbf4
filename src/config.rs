use crate::error::{ConfigError, Error};
use serde::Deserialize;
use std::{
    net::{IpAddr, SocketAddr},
    path::{Path, PathBuf},
};

///Whole-process configuration, deserialized once at startup and passed by
///Arc into every component. There is no runtime mutation API; rotating
///access codes or secrets requires a restart.
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub gate: GateConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub smtp: Option<SmtpConfig>,
    #[serde(default)]
    pub admin: Option<AdminConfig>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    #[serde(default)]
    pub cookie_secure: bool,
    #[serde(default)]
    pub cookie_domain: Option<String>,
    #[serde(default)]
    pub log_directory: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GateConfig {
    pub access_codes: Vec<String>,
    ///invite-token verification is disabled entirely when unset
    #[serde(default)]
    pub invite_signing_secret: Option<String>,
    #[serde(default = "default_invite_base_url")]
    pub invite_base_url: String,
    #[serde(default = "default_session_lifetime_seconds")]
    pub session_lifetime_seconds: i64,
    #[serde(default = "default_invite_lifetime_seconds")]
    pub invite_lifetime_seconds: i64,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "backend", rename_all = "snake_case")]
pub enum StorageConfig {
    Json { data_dir: PathBuf },
    Sqlite { database_url: String },
}

#[derive(Deserialize, Debug, Clone)]
pub struct SmtpConfig {
    pub server: String,
    pub username: String,
    pub password: String,
    pub sender_address: String,
    pub recipient_address: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AdminConfig {
    pub email: String,
    ///argon2 encoded hash, never the plain password
    pub password_hash: String,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        let config: Config = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        Ok(config)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, Error> {
        let ip: IpAddr = self
            .server
            .bind_address
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress(self.server.bind_address.to_owned()))?;
        Ok(SocketAddr::from((ip, self.server.port)))
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_cookie_name() -> String {
    "gh_sid".to_string()
}

fn default_invite_base_url() -> String {
    "http://localhost:5000".to_string()
}

///8 hours, matching the session cookie max-age
fn default_session_lifetime_seconds() -> i64 {
    8 * 60 * 60
}

///14 days
fn default_invite_lifetime_seconds() -> i64 {
    14 * 24 * 60 * 60
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_config_with_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            allowed_origins = ["http://localhost:3000"]

            [gate]
            access_codes = ["IC-1234", "IC-5678"]

            [storage]
            backend = "json"
            data_dir = "./data"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.cookie_name, "gh_sid");
        assert_eq!(config.gate.session_lifetime_seconds, 8 * 60 * 60);
        assert!(config.gate.invite_signing_secret.is_none());
        assert!(config.smtp.is_none());
        assert!(config.admin.is_none());
        assert!(matches!(config.storage, StorageConfig::Json { .. }));
    }

    #[test]
    fn parses_sqlite_backend_and_admin() {
        let config: Config = toml::from_str(
            r#"
            [server]
            allowed_origins = []
            port = 8080

            [gate]
            access_codes = []
            invite_signing_secret = "change-this-long-random-too"

            [storage]
            backend = "sqlite"
            database_url = "gatehouse.sqlite"

            [admin]
            email = "admin@example.com"
            password_hash = "$argon2id$v=19$m=4096,t=3,p=1$c2FsdA$hash"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert!(matches!(config.storage, StorageConfig::Sqlite { .. }));
        assert!(config.admin.is_some());
        assert_eq!(
            config.gate.invite_signing_secret.as_deref(),
            Some("change-this-long-random-too")
        );
    }

    #[test]
    fn socket_addr_rejects_garbage_bind_address() {
        let mut config: Config = toml::from_str(
            r#"
            [server]
            allowed_origins = []

            [gate]
            access_codes = []

            [storage]
            backend = "json"
            data_dir = "./data"
            "#,
        )
        .unwrap();
        config.server.bind_address = "not-an-ip".to_string();
        assert!(config.socket_addr().is_err());
    }
}
