use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// Remote nutrition service settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Local recipe storage settings
    #[serde(default)]
    pub storage: StorageConfig,
    /// How long an info message stays visible, in milliseconds
    #[serde(default = "default_info_ttl_ms")]
    pub info_ttl_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            storage: StorageConfig::default(),
            info_ttl_ms: default_info_ttl_ms(),
        }
    }
}

/// Connection settings for the nutrition service
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    /// Base URL; requests go to `{base_url}/ingredients.php`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// HTTP Basic username
    #[serde(default)]
    pub username: String,
    /// HTTP Basic password
    #[serde(default)]
    pub password: String,
    /// Request timeout in seconds. Unset means the transport default.
    #[serde(default)]
    pub timeout: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            username: String::new(),
            password: String::new(),
            timeout: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

/// Where saved recipes and the draft live on disk
#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_storage_dir")]
    pub dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: default_storage_dir(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from(".recipe-nutrition")
}

fn default_info_ttl_ms() -> u64 {
    2200
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with RECIPE_NUTRITION__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: RECIPE_NUTRITION__API__PASSWORD
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    pub fn info_ttl(&self) -> Duration {
        Duration::from_millis(self.info_ttl_ms)
    }
}

/// Load configuration from file and environment variables
///
/// See [`AppConfig::load`] for the source priority.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested: RECIPE_NUTRITION__API__BASE_URL
        .add_source(
            Environment::with_prefix("RECIPE_NUTRITION")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}
