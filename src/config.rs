//! Configuration file handling for sales-dash.
//!
//! The configuration file is stored at `$SALES_DASH_HOME/config.json` and contains the location of
//! the sales data service, the names of its query parameters and display settings. When the file
//! does not exist the built-in defaults are used, which point at the public sales data service.

use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;
use url::Url;

const APP_NAME: &str = "sales-dash";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const DEFAULT_BASE_URL: &str = "https://labdados.com/produtos";
const DEFAULT_REGION_PARAM: &str = "regiao";
const DEFAULT_YEAR_PARAM: &str = "ano";
const DEFAULT_CURRENCY_PREFIX: &str = "R$";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$SALES_DASH_HOME` and from there it loads `$SALES_DASH_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    base_url: Url,
}

impl Config {
    /// Creates the home directory and writes an initial `config.json` with default settings.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the home directory, e.g. `$HOME/.sales-dash`
    /// - `base_url` - The sales data service endpoint. Uses the public service when `None`.
    ///
    /// # Errors
    /// - Returns an error if `base_url` is not a valid URL.
    /// - Returns an error if a `config.json` already exists in `dir`.
    /// - Returns an error if any file operations fail.
    pub async fn create(dir: impl Into<PathBuf>, base_url: Option<&str>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the sales-dash home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.is_file() {
            bail!("The config file already exists '{}'", config_path.display())
        }

        let mut config_file = ConfigFile::default();
        if let Some(url) = base_url {
            config_file.base_url = url.to_string();
        }
        let base_url = parse_base_url(&config_file.base_url)?;
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
            base_url,
        })
    }

    /// Loads `config.json` from `home`. If the file does not exist then the defaults are used.
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let root = home.into();
        let config_path = root.join(CONFIG_JSON);
        let config_file = if config_path.is_file() {
            ConfigFile::load(&config_path).await?
        } else {
            debug!(
                "No config file found at '{}', using defaults",
                config_path.display()
            );
            ConfigFile::default()
        };
        let base_url = parse_base_url(&config_file.base_url)?;
        Ok(Self {
            root,
            config_path,
            config_file,
            base_url,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The sales data service endpoint.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The name of the query parameter that carries the region filter.
    pub fn region_param(&self) -> &str {
        &self.config_file.region_param
    }

    /// The name of the query parameter that carries the year filter.
    pub fn year_param(&self) -> &str {
        &self.config_file.year_param
    }

    /// The prefix used when displaying revenue, e.g. `R$`.
    pub fn currency_prefix(&self) -> &str {
        &self.config_file.currency_prefix
    }

    /// How long to wait for the sales data service before giving up.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.config_file.timeout_secs)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "sales-dash",
///   "config_version": 1,
///   "base_url": "https://labdados.com/produtos",
///   "region_param": "regiao",
///   "year_param": "ano",
///   "currency_prefix": "R$",
///   "timeout_secs": 30
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "sales-dash"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// URL of the sales data service
    base_url: String,

    #[serde(default = "default_region_param")]
    region_param: String,

    #[serde(default = "default_year_param")]
    year_param: String,

    /// Prefix for revenue metrics
    #[serde(default = "default_currency_prefix")]
    currency_prefix: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            base_url: DEFAULT_BASE_URL.to_string(),
            region_param: default_region_param(),
            year_param: default_year_param(),
            currency_prefix: default_currency_prefix(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it belongs to another app.
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .with_context(|| format!("Failed to load config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}

fn default_region_param() -> String {
    DEFAULT_REGION_PARAM.to_string()
}

fn default_year_param() -> String {
    DEFAULT_YEAR_PARAM.to_string()
}

fn default_currency_prefix() -> String {
    DEFAULT_CURRENCY_PREFIX.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn parse_base_url(s: &str) -> Result<Url> {
    let url = Url::parse(s).with_context(|| format!("Invalid base_url '{s}'"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => bail!("Unsupported scheme '{other}' in base_url '{s}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("sales_home");

        let config = Config::create(&home_dir, Some("http://localhost:8080/vendas"))
            .await
            .unwrap();

        assert_eq!(config.base_url().as_str(), "http://localhost:8080/vendas");
        assert!(config.config_path().is_file());
        assert!(config.root().is_dir());

        let loaded = Config::load(config.root()).await.unwrap();
        assert_eq!(loaded.base_url(), config.base_url());
        assert_eq!(loaded.region_param(), "regiao");
    }

    #[tokio::test]
    async fn test_config_create_twice_fails() {
        let dir = TempDir::new().unwrap();
        Config::create(dir.path(), None).await.unwrap();
        let result = Config::create(dir.path(), None).await;
        assert!(result.unwrap_err().to_string().contains("already exists"));
    }

    #[tokio::test]
    async fn test_config_create_bad_url() {
        let dir = TempDir::new().unwrap();
        assert!(Config::create(dir.path(), Some("not a url")).await.is_err());
        assert!(Config::create(dir.path(), Some("ftp://example.com/x"))
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_config_load_defaults_when_missing() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path().join("nothing-here")).await.unwrap();
        assert_eq!(config.base_url().as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.region_param(), "regiao");
        assert_eq!(config.year_param(), "ano");
        assert_eq!(config.currency_prefix(), "R$");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_config_file_load_with_minimal_config() {
        let dir = TempDir::new().unwrap();
        let json = r#"{
            "app_name": "sales-dash",
            "config_version": 1,
            "base_url": "https://example.com/api/sales"
        }"#;
        utils::write(dir.path().join(CONFIG_JSON), json).await.unwrap();

        let config = Config::load(dir.path()).await.unwrap();
        assert_eq!(config.base_url().as_str(), "https://example.com/api/sales");
        assert_eq!(config.year_param(), "ano");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_config_file_load_invalid_app_name() {
        let dir = TempDir::new().unwrap();
        let json = r#"{
            "app_name": "wrong_app",
            "config_version": 1,
            "base_url": "https://example.com/api/sales"
        }"#;
        utils::write(dir.path().join(CONFIG_JSON), json).await.unwrap();

        let result = Config::load(dir.path()).await;
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_config_file_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("file.json");
        let original = ConfigFile {
            region_param: "region".to_string(),
            year_param: "year".to_string(),
            currency_prefix: "US$".to_string(),
            timeout_secs: 5,
            ..ConfigFile::default()
        };
        original.save(&path).await.unwrap();
        let read = ConfigFile::load(&path).await.unwrap();
        assert_eq!(original, read);
    }
}
