use std::{fmt, str::FromStr};

use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub enrichment: EnrichmentConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port(), worker_threads: Some(4) }
    }
}

/// Which storage backend the process runs with. Chosen once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Memory,
    #[default]
    File,
    Elastic,
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(BackendKind::Memory),
            "file" => Ok(BackendKind::File),
            "elastic" => Ok(BackendKind::Elastic),
            other => Err(anyhow!("unknown storage backend '{other}'; available: memory|file|elastic")),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BackendKind::Memory => "memory",
            BackendKind::File => "file",
            BackendKind::Elastic => "elastic",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: BackendKind,
    #[serde(default = "default_file_path")]
    pub file_path: String,
    #[serde(default)]
    pub elastic: ElasticConfig,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { backend: BackendKind::default(), file_path: default_file_path(), elastic: ElasticConfig::default() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElasticConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_index")]
    pub index: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl Default for ElasticConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            username: None,
            password: None,
            index: default_index(),
            connect_timeout_secs: default_connect_timeout(),
            accept_invalid_certs: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnrichmentConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_genderize_url")]
    pub genderize_url: String,
    #[serde(default = "default_nationalize_url")]
    pub nationalize_url: String,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            genderize_url: default_genderize_url(),
            nationalize_url: default_nationalize_url(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_port() -> u16 {
    8080
}

fn default_file_path() -> String {
    "data/contacts.json".into()
}

fn default_index() -> String {
    "contacts".into()
}

fn default_connect_timeout() -> u64 {
    1
}

fn default_enabled() -> bool {
    true
}

fn default_genderize_url() -> String {
    "https://api.genderize.io".into()
}

fn default_nationalize_url() -> String {
    "https://api.nationalize.io".into()
}

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` (or `CONFIG_PATH`), falling back to defaults when the
    /// file is absent, then apply env overrides and validate.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = match load_default() {
            Ok(cfg) => cfg,
            Err(e) if is_not_found(&e) => AppConfig::default(),
            Err(e) => return Err(e),
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Same as [`AppConfig::load_and_validate`] but from an explicit file.
    pub fn load_from_path(path: &str) -> Result<Self> {
        let mut cfg = load_from_file(path)?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize_from_env();
        self.server.normalize()?;
        self.storage.normalize_from_env()?;
        self.storage.validate()?;
        Ok(())
    }
}

fn is_not_found(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl ServerConfig {
    fn normalize_from_env(&mut self) {
        if let Some(host) = env_non_empty("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = env_non_empty("SERVER_PORT").and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
    }

    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl StorageConfig {
    pub fn normalize_from_env(&mut self) -> Result<()> {
        if let Some(kind) = env_non_empty("STORAGE_BACKEND") {
            self.backend = kind.parse()?;
        }
        if let Some(path) = env_non_empty("LOCAL_FILENAME") {
            self.file_path = path;
        }
        if let Some(url) = env_non_empty("ELASTIC_URL") {
            self.elastic.url = url;
        }
        if let Some(user) = env_non_empty("ELASTIC_USERNAME") {
            self.elastic.username = Some(user);
        }
        if let Some(pass) = env_non_empty("ELASTIC_PASSWORD") {
            self.elastic.password = Some(pass);
        }
        if let Some(index) = env_non_empty("ELASTIC_INDEX") {
            self.elastic.index = index;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        match self.backend {
            BackendKind::Memory => Ok(()),
            BackendKind::File => {
                if self.file_path.trim().is_empty() {
                    return Err(anyhow!("storage.file_path is empty; set it in config.toml or LOCAL_FILENAME"));
                }
                Ok(())
            }
            BackendKind::Elastic => self.elastic.validate(),
        }
    }
}

impl ElasticConfig {
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("storage.elastic.url is empty; set it in config.toml or ELASTIC_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("storage.elastic.url must start with http:// or https://"));
        }
        if self.index.trim().is_empty() {
            return Err(anyhow!("storage.elastic.index must not be empty"));
        }
        if self.password.is_some() && self.username.is_none() {
            return Err(anyhow!("storage.elastic.password given without username"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_toml() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [storage]
            backend = "elastic"

            [storage.elastic]
            url = "https://localhost:9200"
            username = "elastic"
            password = "changeme"

            [enrichment]
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.storage.backend, BackendKind::Elastic);
        assert_eq!(cfg.storage.elastic.index, "contacts");
        assert_eq!(cfg.storage.file_path, "data/contacts.json");
        assert!(!cfg.enrichment.enabled);
        assert!(cfg.storage.elastic.validate().is_ok());
    }

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.storage.backend, BackendKind::File);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert!(cfg.enrichment.enabled);
        assert_eq!(cfg.enrichment.genderize_url, "https://api.genderize.io");
    }

    #[test]
    fn partial_server_table_keeps_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            worker_threads = 2
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.worker_threads, Some(2));
    }

    #[test]
    fn backend_kind_from_str() {
        assert_eq!("memory".parse::<BackendKind>().unwrap(), BackendKind::Memory);
        assert_eq!(" File ".parse::<BackendKind>().unwrap(), BackendKind::File);
        assert_eq!("elastic".parse::<BackendKind>().unwrap(), BackendKind::Elastic);
        assert!("redis".parse::<BackendKind>().is_err());
        assert_eq!(BackendKind::Elastic.to_string(), "elastic");
    }

    #[test]
    fn elastic_requires_http_url() {
        let mut storage = StorageConfig { backend: BackendKind::Elastic, ..StorageConfig::default() };
        assert!(storage.validate().is_err());
        storage.elastic.url = "localhost:9200".into();
        assert!(storage.validate().is_err());
        storage.elastic.url = "http://localhost:9200".into();
        assert!(storage.validate().is_ok());
    }

    #[test]
    fn zero_port_rejected() {
        let mut server = ServerConfig { port: 0, ..ServerConfig::default() };
        assert!(server.normalize().is_err());
    }
}
