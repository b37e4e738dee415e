//! Application configuration management.

use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Identity provider token configuration.
    pub auth: AuthConfig,
    /// ART (antigen rapid test) rules.
    #[serde(default)]
    pub art: ArtConfig,
    /// Object storage for employee images. Uploads are disabled when absent.
    #[serde(default)]
    pub storage: Option<StorageSettings>,
    /// Payment gateway. Charging is disabled when absent.
    #[serde(default)]
    pub payment: Option<PaymentConfig>,
    /// News and construction-updates feeds.
    #[serde(default)]
    pub feeds: FeedConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Token verification settings for the external identity provider.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Shared secret used to verify (and, in development, sign) tokens.
    pub secret: String,
    /// Expected `iss` claim.
    pub issuer: String,
    /// Group name that grants the admin role.
    #[serde(default = "default_admin_group")]
    pub admin_group: String,
    /// Lifetime of development tokens in minutes.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: i64,
}

fn default_admin_group() -> String {
    "admin".to_string()
}

fn default_token_ttl() -> i64 {
    60
}

/// ART rules.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtConfig {
    /// Days a test stays valid after the test date.
    #[serde(default = "default_art_validity_days")]
    pub validity_days: u32,
}

impl Default for ArtConfig {
    fn default() -> Self {
        Self {
            validity_days: default_art_validity_days(),
        }
    }
}

fn default_art_validity_days() -> u32 {
    7
}

/// Object storage provider.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible storage: AWS S3, Cloudflare R2, MinIO
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// S3 bucket name.
        bucket: String,
        /// Access key ID.
        access_key_id: String,
        /// Secret access key.
        secret_access_key: String,
        /// Region.
        region: String,
    },
    /// Azure Blob Storage
    AzureBlob {
        /// Storage account name.
        account: String,
        /// Storage access key.
        access_key: String,
        /// Container name.
        container: String,
    },
    /// Local filesystem (development only)
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
}

impl StorageProvider {
    /// Get the provider name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::AzureBlob { .. } => "azure_blob",
            Self::LocalFs { .. } => "local",
        }
    }
}

/// Object storage settings for employee images.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Storage provider.
    pub provider: StorageProvider,
    /// Base URL under which stored objects are publicly readable.
    pub public_base_url: String,
    /// Maximum upload size in bytes.
    #[serde(default = "default_max_image_size")]
    pub max_file_size: u64,
    /// URL returned for employees without a profile image.
    #[serde(default)]
    pub placeholder_image_url: Option<String>,
}

fn default_max_image_size() -> u64 {
    5 * 1024 * 1024
}

/// Payment gateway settings.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Secret API key.
    pub api_key: String,
    /// Gateway base URL.
    #[serde(default = "default_payment_api_base")]
    pub api_base: String,
    /// ISO 4217 currency code charged.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Request timeout in seconds.
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

fn default_payment_api_base() -> String {
    "https://api.stripe.com".to_string()
}

fn default_currency() -> String {
    "usd".to_string()
}

fn default_http_timeout() -> u64 {
    10
}

/// News and updates feed settings.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Endpoint returning COVID-19 news headlines.
    #[serde(default)]
    pub news_url: Option<String>,
    /// Endpoint returning construction-sector updates.
    #[serde(default)]
    pub updates_url: Option<String>,
    /// Cron expression (with seconds) for the refresh job.
    #[serde(default = "default_feed_schedule")]
    pub schedule: String,
    /// Request timeout in seconds.
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            news_url: None,
            updates_url: None,
            schedule: default_feed_schedule(),
            timeout_secs: default_http_timeout(),
        }
    }
}

fn default_feed_schedule() -> String {
    "0 0 * * * *".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("KAIZEN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
