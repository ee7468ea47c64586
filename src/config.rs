//! Server configuration.
//!
//! Loaded once at startup from a YAML file and shared read-only by every
//! connection as an `Arc<Config>`.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::content::BlockList;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "GEMSERVE_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory below which all servable content lives.
    pub content: PathBuf,
    /// Host name requests must be addressed to.
    pub host: String,
    /// Path prefixes reported as nonexistent.
    #[serde(default)]
    pub block: BlockList,
    #[serde(default = "default_charset")]
    pub default_charset: String,
    /// List directory entries instead of redirecting to `index.gmi`.
    #[serde(default)]
    pub auto_list: bool,
    #[serde(default = "default_site_name")]
    pub site_name: String,
    #[serde(default = "default_gemini_addr")]
    pub listen_addr: SocketAddr,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub tls: TlsConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TlsConfig {
    #[serde(default = "default_cert")]
    pub cert: PathBuf,
    #[serde(default = "default_key")]
    pub key: PathBuf,
    pub passphrase: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_http_addr")]
    pub listen_addr: SocketAddr,
    /// Stylesheet embedded in every generated page.
    #[serde(rename = "css")]
    pub css_file: Option<PathBuf>,
    /// Contents of `css_file`, read by [`Config::from_file`].
    #[serde(skip)]
    pub css: Option<String>,
}

fn default_charset() -> String {
    "utf-8".to_string()
}

fn default_site_name() -> String {
    "gemserve".to_string()
}

fn default_gemini_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 1965))
}

fn default_http_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 1966))
}

fn default_request_timeout() -> u64 {
    10
}

fn default_cert() -> PathBuf {
    PathBuf::from("cert.pem")
}

fn default_key() -> PathBuf {
    PathBuf::from("key.pem")
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            cert: default_cert(),
            key: default_key(),
            passphrase: None,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            listen_addr: default_http_addr(),
            css_file: None,
            css: None,
        }
    }
}

impl Config {
    /// Loads the file named by `GEMSERVE_CONFIG`, or `config.yaml`.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_ENV)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::from_file(path)
    }

    /// Reads a YAML config file. Relative paths inside it (content, TLS
    /// credentials, stylesheet) are taken relative to the working directory.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut cfg = Self::from_yaml(&raw)
            .with_context(|| format!("invalid config {}", path.display()))?;

        if let Some(css_file) = &cfg.http.css_file {
            let css = std::fs::read_to_string(css_file)
                .with_context(|| format!("failed to read stylesheet {}", css_file.display()))?;
            cfg.http.css = Some(css);
        }

        Ok(cfg)
    }

    /// Parses configuration text without touching the filesystem.
    pub fn from_yaml(raw: &str) -> Result<Self> {
        let cfg: Config = serde_yaml::from_str(raw)?;

        if cfg.host.is_empty() || cfg.host.contains(char::is_whitespace) {
            anyhow::bail!("invalid host {:?}", cfg.host);
        }
        if cfg.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be positive");
        }

        Ok(cfg)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
