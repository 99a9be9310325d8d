//! Monitor configuration with TOML file support.

use fleet_directory::{DirectoryUrls, DEFAULT_BASE_URL};
use fleet_rpc::{ClientConfig, RpcError, DEFAULT_MONITOR_PORT};
use fleet_utils::{LogFormat, DEFAULT_LEVEL};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("invalid configuration: {0}")]
    Parse(String),
}

/// Configuration for the fleet monitor.
///
/// Loaded from a TOML file via [`MonitorConfig::from_toml_file`] or built
/// programmatically. Every field has a default, so an empty file is valid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default)]
    pub directory: DirectoryConfig,

    #[serde(default)]
    pub rpc: RpcConfig,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter, e.g. "info" or "warn,fleet_membership=debug".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Where the directory documents are published.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Branch suffix substituted into `base_url`.
    #[serde(default = "default_feature")]
    pub feature: String,

    /// URL template; `{feature}` is replaced by `feature`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

/// How to reach each node's monitor agent.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcConfig {
    #[serde(default = "default_monitor_port")]
    pub port: u16,

    #[serde(default = "default_scheme")]
    pub scheme: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// PEM client certificate presented to monitor agents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_cert: Option<PathBuf>,

    /// PEM private key matching `client_cert`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_key: Option<PathBuf>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_log_level() -> String {
    DEFAULT_LEVEL.to_string()
}

fn default_feature() -> String {
    "ibft".to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_monitor_port() -> u16 {
    DEFAULT_MONITOR_PORT
}

fn default_scheme() -> String {
    "https".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    5
}

// ── Impl ───────────────────────────────────────────────────────────────

impl MonitorConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("MonitorConfig is always serializable to TOML")
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            directory: DirectoryConfig::default(),
            rpc: RpcConfig::default(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

impl DirectoryConfig {
    pub fn urls(&self) -> DirectoryUrls {
        DirectoryUrls::for_feature(&self.base_url, &self.feature)
    }
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            feature: default_feature(),
            base_url: default_base_url(),
        }
    }
}

impl RpcConfig {
    /// Transport settings for the monitor client, reading the client
    /// certificate from disk when both halves are configured.
    pub fn client_config(&self) -> Result<ClientConfig, RpcError> {
        let config = ClientConfig {
            scheme: self.scheme.clone(),
            port: self.port,
            timeout: Duration::from_secs(self.timeout_secs),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            identity_pem: None,
        };
        match (&self.client_cert, &self.client_key) {
            (Some(cert), Some(key)) => config.with_identity_files(cert, key),
            (None, None) => Ok(config),
            _ => Err(RpcError::Tls(
                "client_cert and client_key must be set together".into(),
            )),
        }
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            port: default_monitor_port(),
            scheme: default_scheme(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            client_cert: None,
            client_key: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = MonitorConfig::default();
        let toml_str = config.to_toml_string();
        let parsed = MonitorConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config = MonitorConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.rpc.port, 8443);
        assert_eq!(config.rpc.scheme, "https");
        assert_eq!(config.rpc.timeout_secs, 10);
        assert_eq!(config.directory.feature, "ibft");
        assert_eq!(config.log_format, LogFormat::Human);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            log_format = "json"

            [directory]
            feature = "besu"

            [rpc]
            port = 9443
        "#;
        let config = MonitorConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.directory.feature, "besu");
        assert_eq!(config.directory.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.rpc.port, 9443);
        assert_eq!(config.rpc.connect_timeout_secs, 5); // default
    }

    #[test]
    fn directory_urls_follow_feature() {
        let config = DirectoryConfig {
            feature: "besu".into(),
            base_url: "https://example.org/{feature}/".into(),
        };
        let urls = config.urls();
        assert_eq!(urls.validators, "https://example.org/besu/DIRECTORY_VALIDATOR.md");
        assert_eq!(urls.regulars, "https://example.org/besu/DIRECTORY_REGULAR.md");
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        let result = MonitorConfig::from_toml_str(r#"log_format = "xml""#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[rpc]\nscheme = \"http\"\ntimeout_secs = 3").unwrap();
        let config = MonitorConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.rpc.scheme, "http");
        assert_eq!(config.rpc.timeout_secs, 3);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = MonitorConfig::from_toml_file(&dir.path().join("absent.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn client_config_carries_transport_settings() {
        let rpc = RpcConfig {
            timeout_secs: 3,
            ..RpcConfig::default()
        };
        let client = rpc.client_config().unwrap();
        assert_eq!(client.timeout, Duration::from_secs(3));
        assert_eq!(client.port, 8443);
        assert!(client.identity_pem.is_none());
    }

    #[test]
    fn half_configured_identity_is_rejected() {
        let rpc = RpcConfig {
            client_cert: Some(PathBuf::from("cert.pem")),
            ..RpcConfig::default()
        };
        assert!(matches!(rpc.client_config(), Err(RpcError::Tls(_))));
    }

    #[test]
    fn identity_files_are_concatenated() {
        let dir = tempfile::tempdir().unwrap();
        let cert = dir.path().join("cert.pem");
        let key = dir.path().join("key.pem");
        std::fs::write(&cert, "CERT").unwrap();
        std::fs::write(&key, "KEY\n").unwrap();
        let rpc = RpcConfig {
            client_cert: Some(cert),
            client_key: Some(key),
            ..RpcConfig::default()
        };
        let client = rpc.client_config().unwrap();
        assert_eq!(client.identity_pem.as_deref(), Some(&b"CERT\nKEY\n"[..]));
    }
}
