/// Configuration management for the client core
use crate::error::{ClientError, ClientResult};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Main client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Backend endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the backend; resolved once per process
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

/// Durable client-side storage locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// File holding the persisted session blob
    pub session_file: PathBuf,
    /// Directory spreadsheet exports are written to
    pub export_directory: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ClientResult<Self> {
        dotenv::dotenv().ok();

        let base_url =
            env::var("MANDAL_API_URL").unwrap_or_else(|_| "http://localhost:4000".to_string());
        let timeout_secs = env::var("MANDAL_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        let data_directory: PathBuf = env::var("MANDAL_DATA_DIRECTORY")
            .unwrap_or_else(|_| "./data".to_string())
            .into();
        let session_file = env::var("MANDAL_SESSION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_directory.join("session.json"));
        let export_directory = env::var("MANDAL_EXPORT_DIRECTORY")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_directory.clone());

        let level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(ClientConfig {
            api: ApiConfig {
                base_url,
                timeout_secs,
            },
            storage: StorageConfig {
                session_file,
                export_directory,
            },
            logging: LoggingConfig { level },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> ClientResult<()> {
        if self.api.base_url.is_empty() {
            return Err(ClientError::Config("Base URL cannot be empty".to_string()));
        }
        Url::parse(&self.api.base_url).map_err(|e| {
            ClientError::Config(format!("Invalid base URL '{}': {}", self.api.base_url, e))
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_url(base_url: &str) -> ClientConfig {
        ClientConfig {
            api: ApiConfig {
                base_url: base_url.to_string(),
                timeout_secs: 30,
            },
            storage: StorageConfig {
                session_file: PathBuf::from("./data/session.json"),
                export_directory: PathBuf::from("./data"),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }

    #[test]
    fn test_validate_accepts_http_url() {
        assert!(config_with_url("http://localhost:4000").validate().is_ok());
        assert!(config_with_url("https://donations.example.org")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        assert!(config_with_url("").validate().is_err());
        assert!(config_with_url("not a url").validate().is_err());
    }
}
